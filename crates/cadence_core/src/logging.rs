//! Logging bootstrap for hosts embedding the scheduling core.
//!
//! # Responsibility
//! - Parse logging configuration from arguments or the process environment.
//! - Start one rolling file sink per process.
//! - Record panics as single-line error events.
//!
//! # Invariants
//! - Re-initializing with an equal [`LogConfig`] is a no-op; any other
//!   configuration is rejected with [`LogError::AlreadyInitialized`].
//! - Initialization never panics.
//! - Core events use `event=<name> module=<module> status=<ok|error>` keys and
//!   never include template descriptions.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Directory variable read by [`LogConfig::from_env`].
pub const LOG_DIR_ENV: &str = "CADENCE_LOG_DIR";
/// Level variable read by [`LogConfig::from_env`].
pub const LOG_LEVEL_ENV: &str = "CADENCE_LOG_LEVEL";

const LOG_FILE_BASENAME: &str = "cadence";
const ROTATE_AT_BYTES: u64 = 4 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 3;
const PANIC_SUMMARY_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    config: LogConfig,
    _handle: LoggerHandle,
}

pub type LogResult<T> = Result<T, LogError>;

/// Logging setup failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    UnknownLevel(String),
    EmptyDirectory,
    RelativeDirectory(PathBuf),
    /// A sink is already running with a different configuration.
    AlreadyInitialized { active: LogConfig },
    /// Directory creation or backend start failed.
    Backend(String),
}

impl Display for LogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLevel(raw) => write!(
                f,
                "unknown log level `{raw}` (use trace, debug, info, warn or error)"
            ),
            Self::EmptyDirectory => write!(f, "log directory is empty"),
            Self::RelativeDirectory(path) => {
                write!(f, "log directory `{}` is not absolute", path.display())
            }
            Self::AlreadyInitialized { active } => write!(
                f,
                "logging already running at level {} in `{}`",
                active.level,
                active.log_dir.display()
            ),
            Self::Backend(message) => write!(f, "logger backend failed: {message}"),
        }
    }
}

impl Error for LogError {}

/// Verbosity threshold for the file sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parses a case-insensitive level name; `warning` is accepted for `warn`.
    pub fn parse(raw: &str) -> LogResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(LogError::UnknownLevel(raw.trim().to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// `debug` in debug builds, `info` otherwise.
    pub fn build_default() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Info
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated logging configuration: a level and an absolute directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    level: LogLevel,
    log_dir: PathBuf,
}

impl LogConfig {
    /// # Errors
    /// - `UnknownLevel` for anything but `trace|debug|info|warn|error`.
    /// - `EmptyDirectory` / `RelativeDirectory` for a blank or relative dir.
    pub fn new(level: &str, log_dir: &str) -> LogResult<Self> {
        Ok(Self {
            level: LogLevel::parse(level)?,
            log_dir: absolute_dir(log_dir)?,
        })
    }

    /// Reads [`LOG_DIR_ENV`] and [`LOG_LEVEL_ENV`].
    ///
    /// Returns `Ok(None)` when no directory is configured. A missing level
    /// falls back to [`LogLevel::build_default`].
    pub fn from_env() -> LogResult<Option<Self>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LogResult<Option<Self>> {
        let Some(dir) = lookup(LOG_DIR_ENV).filter(|dir| !dir.trim().is_empty()) else {
            return Ok(None);
        };
        let level = match lookup(LOG_LEVEL_ENV) {
            Some(raw) => LogLevel::parse(&raw)?,
            None => LogLevel::build_default(),
        };
        Ok(Some(Self {
            level,
            log_dir: absolute_dir(&dir)?,
        }))
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// Validates `level`/`log_dir` and starts the file sink.
pub fn init_logging(level: &str, log_dir: &str) -> LogResult<()> {
    init_logging_with(&LogConfig::new(level, log_dir)?)
}

/// Starts the file sink for `config`, or confirms it is already running.
pub fn init_logging_with(config: &LogConfig) -> LogResult<()> {
    let active = ACTIVE.get_or_try_init(|| start(config))?;
    if &active.config == config {
        Ok(())
    } else {
        Err(LogError::AlreadyInitialized {
            active: active.config.clone(),
        })
    }
}

/// Active configuration, or `None` before initialization.
pub fn logging_status() -> Option<LogConfig> {
    ACTIVE.get().map(|active| active.config.clone())
}

pub fn default_log_level() -> LogLevel {
    LogLevel::build_default()
}

fn absolute_dir(raw: &str) -> LogResult<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LogError::EmptyDirectory);
    }
    let path = PathBuf::from(trimmed);
    if path.is_absolute() {
        Ok(path)
    } else {
        Err(LogError::RelativeDirectory(path))
    }
}

fn start(config: &LogConfig) -> LogResult<ActiveLogger> {
    std::fs::create_dir_all(&config.log_dir).map_err(|err| {
        LogError::Backend(format!("create `{}`: {err}", config.log_dir.display()))
    })?;

    let handle = Logger::try_with_str(config.level.as_str())
        .map_err(|err| LogError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(&config.log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LogError::Backend(err.to_string()))?;

    if PANIC_HOOK.set(()).is_ok() {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic| {
            let location = panic.location().map_or_else(
                || "unknown".to_string(),
                |loc| format!("{}:{}", loc.file(), loc.line()),
            );
            error!(
                "event=panic_captured module=logging status=error location={} payload={}",
                location,
                panic_summary(panic.payload())
            );
            previous(panic);
        }));
    }

    info!(
        "event=logging_start module=logging status=ok version={} level={} log_dir={}",
        env!("CARGO_PKG_VERSION"),
        config.level,
        config.log_dir.display()
    );

    Ok(ActiveLogger {
        config: config.clone(),
        _handle: handle,
    })
}

fn panic_summary(payload: &(dyn std::any::Any + Send)) -> String {
    let text = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload");
    single_line(text, PANIC_SUMMARY_LIMIT)
}

fn single_line(text: &str, limit: usize) -> String {
    let mut line: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .take(limit)
        .collect();
    if text.chars().nth(limit).is_some() {
        line.push_str("...");
    }
    line
}
