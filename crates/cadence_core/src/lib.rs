//! Core scheduling logic for recurring task templates.
//! This crate is the single source of truth for create/due/deletion
//! resolution invariants.

pub mod logging;
pub mod model;
pub mod recurrence;
pub mod registry;
pub mod template;
pub mod time;

pub use logging::{
    default_log_level, init_logging, init_logging_with, logging_status, LogConfig, LogError,
    LogLevel, LogResult,
};
pub use model::anchor::{AnchorError, AnchorKind, TemporalAnchor};
pub use model::duration::Duration;
pub use model::instance::{DeletionSchedule, TaskInstance};
pub use model::policy::{CompletionPolicy, CompletionState, DeletionBoundary, DeletionSlots};
pub use model::priority::Priority;
pub use recurrence::{CalendarRule, RecurrenceRule};
pub use registry::{
    RegisteredTemplate, RegistryError, RegistryResult, TemplateId, TemplateRegistry,
};
pub use template::builder::{DeletionRules, TaskTemplate, TemplateError, TemplateResult};
pub use template::resolved::ResolvedTemplate;
pub use time::{equal_to_minute, shift, truncate_to_minute, Instant};

/// Minimal health-check API for embedding hosts.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
