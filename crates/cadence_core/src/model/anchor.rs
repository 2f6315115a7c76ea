//! Temporal anchor for create/due boundaries.
//!
//! # Responsibility
//! - Represent one boundary as either a recurrence rule or a signed offset
//!   relative to the other boundary.
//! - Expose typed accessors that reject the wrong variant.
//!
//! # Invariants
//! - An anchor is exactly one variant; "both" and "neither" are unrepresentable.
//! - Two anchors are equal iff they share the recurrence expression, or carry
//!   the same signed seconds.

use crate::model::duration::Duration;
use crate::recurrence::RecurrenceRule;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Discriminant of a [`TemporalAnchor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    Recurrence,
    Duration,
}

impl AnchorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recurrence => "recurrence",
            Self::Duration => "duration",
        }
    }
}

/// Accessor misuse on a [`TemporalAnchor`].
///
/// A programmer error: callers check `is_recurrence()`/`is_duration()` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorError {
    WrongAnchorKind {
        expected: AnchorKind,
        found: AnchorKind,
    },
}

impl Display for AnchorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongAnchorKind { expected, found } => write!(
                f,
                "wrong anchor kind: expected {}, found {}",
                expected.as_str(),
                found.as_str()
            ),
        }
    }
}

impl Error for AnchorError {}

/// One boundary of a task template.
#[derive(Clone)]
pub enum TemporalAnchor {
    /// Boundary fires on every occurrence of the rule.
    Recurrence(Arc<dyn RecurrenceRule>),
    /// Boundary sits at a signed offset from the other boundary.
    Duration(Duration),
}

impl TemporalAnchor {
    pub fn recurrence(rule: impl RecurrenceRule + 'static) -> Self {
        Self::Recurrence(Arc::new(rule))
    }

    pub fn duration(duration: Duration) -> Self {
        Self::Duration(duration)
    }

    pub fn kind(&self) -> AnchorKind {
        match self {
            Self::Recurrence(_) => AnchorKind::Recurrence,
            Self::Duration(_) => AnchorKind::Duration,
        }
    }

    pub fn is_recurrence(&self) -> bool {
        matches!(self, Self::Recurrence(_))
    }

    pub fn is_duration(&self) -> bool {
        matches!(self, Self::Duration(_))
    }

    /// Returns the recurrence rule, or `WrongAnchorKind` for duration anchors.
    pub fn as_recurrence(&self) -> Result<&dyn RecurrenceRule, AnchorError> {
        match self {
            Self::Recurrence(rule) => Ok(rule.as_ref()),
            Self::Duration(_) => Err(AnchorError::WrongAnchorKind {
                expected: AnchorKind::Recurrence,
                found: AnchorKind::Duration,
            }),
        }
    }

    /// Returns the offset, or `WrongAnchorKind` for recurrence anchors.
    pub fn as_duration(&self) -> Result<Duration, AnchorError> {
        match self {
            Self::Duration(duration) => Ok(*duration),
            Self::Recurrence(_) => Err(AnchorError::WrongAnchorKind {
                expected: AnchorKind::Duration,
                found: AnchorKind::Recurrence,
            }),
        }
    }
}

impl PartialEq for TemporalAnchor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Recurrence(left), Self::Recurrence(right)) => {
                left.expression() == right.expression()
            }
            (Self::Duration(left), Self::Duration(right)) => left == right,
            _ => false,
        }
    }
}

impl Eq for TemporalAnchor {}

impl std::fmt::Debug for TemporalAnchor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Recurrence(rule) => f
                .debug_tuple("Recurrence")
                .field(&rule.expression())
                .finish(),
            Self::Duration(duration) => f.debug_tuple("Duration").field(duration).finish(),
        }
    }
}

impl From<Duration> for TemporalAnchor {
    fn from(value: Duration) -> Self {
        Self::Duration(value)
    }
}
