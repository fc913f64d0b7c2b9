//! Candidate record models and triage state machine

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Triage state of a candidate record.
///
/// Pending <-> Rejected is reversible; every other forward transition is
/// one-way. Processed is terminal and reachable only through injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordState {
    Pending,
    Verified,
    Rejected,
    AwaitingVerification,
    PaymentValidated,
    Processed,
}

impl RecordState {
    /// Legal staff-driven triage transitions. Injection moves records to
    /// Processed outside of this table.
    pub fn can_transition_to(self, next: RecordState) -> bool {
        use RecordState::*;
        matches!(
            (self, next),
            (Pending, Verified)
                | (Pending, Rejected)
                | (Rejected, Pending)
                | (AwaitingVerification, PaymentValidated)
                | (AwaitingVerification, Rejected)
        )
    }

    /// Terminal for triage purposes: legalization requires every record
    /// under the Mission to be in one of these states.
    pub fn is_terminal_triage(self) -> bool {
        use RecordState::*;
        matches!(self, Verified | PaymentValidated | Rejected | Processed)
    }

    /// Eligible for promotion into the canonical roster
    pub fn is_injectable(self) -> bool {
        matches!(self, RecordState::Verified | RecordState::PaymentValidated)
    }
}

/// Guardian details for minor applicants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardianInfo {
    pub name: String,
    /// Phone or email the notification collaborator can reach
    pub contact: Option<String>,
    pub relationship: Option<String>,
}

/// Tagged applicant variant. A minor always carries guardian details;
/// the invariant is a type-level fact, not a runtime null check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Applicant {
    Minor { guardian: GuardianInfo },
    Adult,
}

impl Applicant {
    pub fn guardian(&self) -> Option<&GuardianInfo> {
        match self {
            Applicant::Minor { guardian } => Some(guardian),
            Applicant::Adult => None,
        }
    }
}

/// Free-text submission payload from the public form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePayload {
    /// Full name as typed by the submitter; normalized during homologation
    pub names: String,
    pub document_id: Option<String>,
    pub birth_date: NaiveDate,
    pub applicant: Applicant,
}

/// Proof of payment attached by the payment-gated intake variant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub amount: f64,
    pub method: String,
    pub proof_ref: String,
    pub paid_at: DateTime<Utc>,
}

/// One prospective-student submission awaiting triage.
///
/// Weakly linked to its Mission: mission_id is a lookup key, not a hard
/// foreign key. tenant_id must equal the Mission's tenant on every access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub id: Uuid,
    pub mission_id: Uuid,
    pub tenant_id: String,
    pub submitted_at: DateTime<Utc>,
    pub state: RecordState,
    pub payload: CandidatePayload,
    pub payment: Option<PaymentInfo>,
}

impl CandidateRecord {
    pub fn new(
        mission_id: Uuid,
        tenant_id: String,
        payload: CandidatePayload,
        payment: Option<PaymentInfo>,
        state: RecordState,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            mission_id,
            tenant_id,
            submitted_at: Utc::now(),
            state,
            payload,
            payment,
        }
    }
}
