//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `cadence_core` linkage from a standalone executable.
//! - Start core file logging when `CADENCE_LOG_DIR` names an absolute dir.
//! - Print a preview of one demo template resolved around the current time.

use cadence_core::{
    init_logging_with, CalendarRule, CompletionPolicy, DeletionBoundary, Duration, Instant,
    LogConfig, LogResult, Priority, TaskTemplate, TemplateRegistry,
};
use chrono::Local;
use std::process::ExitCode;

fn start_logging() -> LogResult<Option<LogConfig>> {
    let Some(config) = LogConfig::from_env()? else {
        return Ok(None);
    };
    init_logging_with(&config)?;
    Ok(Some(config))
}

fn main() -> ExitCode {
    println!("cadence_core ping={}", cadence_core::ping());
    println!("cadence_core version={}", cadence_core::core_version());

    match start_logging() {
        Ok(Some(config)) => println!(
            "logging level={} dir={}",
            config.level(),
            config.log_dir().display()
        ),
        Ok(None) => {}
        Err(err) => {
            eprintln!("logging setup failed: {err}");
            return ExitCode::FAILURE;
        }
    }

    let mut registry = TemplateRegistry::new();
    let defined = registry.define(
        &TaskTemplate::new()
            .name("daily standup notes")
            .priority(Priority::Medium)
            .due_on(CalendarRule::daily_at(9, 0))
            .create_offset(Duration::minutes(-15))
            .automatically_delete(
                Duration::hours(12),
                DeletionBoundary::Due,
                CompletionPolicy::always(),
            ),
    );
    if let Err(err) = defined {
        eprintln!("demo template rejected: {err}");
        return ExitCode::FAILURE;
    }

    let now = Local::now().fixed_offset();
    let show = |value: Option<Instant>| {
        value.map_or_else(|| "-".to_string(), |instant| instant.to_rfc3339())
    };
    for instance in registry.next_instances_at(now) {
        let hash = match instance.content_hash() {
            Ok(hash) => hash,
            Err(err) => {
                eprintln!("hash failed for {}: {err}", instance.name);
                return ExitCode::FAILURE;
            }
        };
        println!(
            "preview name={} create={} due={} hash={}",
            instance.name,
            show(instance.create_at),
            show(instance.due_at),
            hash
        );
    }

    ExitCode::SUCCESS
}
