//! Task priority levels.

use serde::{Deserialize, Serialize};

/// Priority carried from a template onto its instances.
///
/// `None` is an explicit "no priority" choice; an unset priority is modelled
/// as `Option::<Priority>::None` by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    None,
    Low,
    Medium,
    High,
}

impl Priority {
    /// Numeric weight used in content hashing (`high=4` .. `none=1`).
    pub fn weight(self) -> u8 {
        match self {
            Self::High => 4,
            Self::Medium => 3,
            Self::Low => 2,
            Self::None => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::None => "none",
        }
    }
}
