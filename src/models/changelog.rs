//! Changelog entries attached to mutable documents.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A single audit entry. Timestamps are offset-aware, stamped in the
/// timezone of the event the document belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Changelog {
    pub timestamp: DateTime<FixedOffset>,
    pub user_id: String,
    pub comment: String,
}
