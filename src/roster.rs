//! Canonical roster models
//!
//! The system of record for active students. Students are created
//! exclusively by the injection engine and carry no back-reference to the
//! Mission that produced them.

use crate::candidate::GuardianInfo;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An enrolled student in the canonical store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalStudent {
    pub id: Uuid,
    pub tenant_id: String,
    /// Normalized full name (trimmed, collapsed, uppercased)
    pub full_name: String,
    pub document_id: Option<String>,
    pub birth_date: NaiveDate,
    pub grade: String,
    pub group: String,
    pub guardian: Option<GuardianInfo>,
    pub enrolled_at: DateTime<Utc>,
}
