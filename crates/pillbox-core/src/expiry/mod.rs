//! Medicine lifecycle classification.
//!
//! Every status is derived from an expiry date and a caller-supplied `today`:
//!
//! ```text
//!             today                     horizon end
//!               │                            │
//!   Expired     │       ExpiringSoon         │      Valid
//! ──────────────┼────────────────────────────┼──────────────▶ expiry date
//!          expiry < today           expiry <= horizon end
//! ```
//!
//! Nothing here touches the clock or storage. Callers pick one `today` per
//! batch so that all records in a rendering pass agree.
//!
//! # Modules
//!
//! - `date`: calendar-date parsing and normalization
//! - `policy`: the alerting horizon (calendar months or days)
//! - `classifier`: the per-record decision rule
//! - `batch`: stable partition and urgency ordering
//! - `alerts`: derived alert rows and summary counts

mod alerts;
mod batch;
mod classifier;
mod date;
mod policy;

pub use alerts::*;
pub use batch::*;
pub use classifier::*;
pub use date::*;
pub use policy::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Expiry classification errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpiryError {
    #[error("Invalid expiry date: {0}")]
    InvalidDate(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type ExpiryResult<T> = Result<T, ExpiryError>;

/// Lifecycle status of a medicine.
///
/// Variant order is urgency order: `Expired < ExpiringSoon < Valid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    /// Expiry date is before today
    Expired,
    /// Expires today or within the alerting horizon
    ExpiringSoon,
    /// Expires after the horizon
    Valid,
}

impl ExpiryStatus {
    /// Urgency rank, 0 being the most urgent.
    pub fn rank(self) -> u8 {
        match self {
            ExpiryStatus::Expired => 0,
            ExpiryStatus::ExpiringSoon => 1,
            ExpiryStatus::Valid => 2,
        }
    }

    /// Human-readable badge label.
    pub fn label(self) -> &'static str {
        match self {
            ExpiryStatus::Expired => "Expired",
            ExpiryStatus::ExpiringSoon => "Expiring Soon",
            ExpiryStatus::Valid => "Valid",
        }
    }

    /// Whether this status should raise an alert.
    pub fn needs_attention(self) -> bool {
        !matches!(self, ExpiryStatus::Valid)
    }
}

impl std::fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
