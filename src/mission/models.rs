//! Mission data models

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Batch lifecycle of a Mission.
///
/// Advances Capture -> Legalized -> Processed, never backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchState {
    /// Accepting public submissions
    Capture,
    /// Director signed off; triage is frozen
    Legalized,
    /// Batch promoted into the canonical roster
    Processed,
}

impl Default for BatchState {
    fn default() -> Self {
        BatchState::Capture
    }
}

/// Director's signed attestation, attached once at freeze time.
/// Immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalizationReceipt {
    pub signature_image: String,
    pub signed_at: DateTime<Utc>,
    pub signed_by: String,
}

/// A tenant-scoped, time-boxed public intake campaign
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: Uuid,
    /// Owning tenant (school)
    pub tenant_id: String,
    /// Human-readable title
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Submissions past this instant are rejected
    pub expires_at: DateTime<Utc>,
    /// At most one active Mission per tenant
    pub active: bool,
    /// Intake variant that gates on proof of payment
    pub requires_payment: bool,
    /// Count of accepted submissions, maintained by atomic increment
    pub received_count: u64,
    pub batch_state: BatchState,
    /// Present once the Mission has been legalized
    pub legalization_receipt: Option<LegalizationReceipt>,
}

impl Mission {
    pub fn new(tenant_id: String, title: String, ttl: Duration, requires_payment: bool) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            title,
            created_at: now,
            expires_at: now + ttl,
            active: true,
            requires_payment,
            received_count: 0,
            batch_state: BatchState::Capture,
            legalization_receipt: None,
        }
    }

    /// Pure wall-clock comparison. An expired Mission still exists and
    /// remains legalizable for what it already collected.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_mission_defaults() {
        let mission = Mission::new("acme-school".into(), "Fall intake".into(), Duration::hours(1), false);
        assert!(mission.active);
        assert_eq!(mission.received_count, 0);
        assert_eq!(mission.batch_state, BatchState::Capture);
        assert!(mission.legalization_receipt.is_none());
    }

    #[test]
    fn test_is_expired_is_pure_comparison() {
        let mission = Mission::new("acme-school".into(), "Fall intake".into(), Duration::hours(1), false);
        let now = Utc::now();
        assert!(!mission.is_expired(now));
        assert!(mission.is_expired(now + Duration::hours(2)));
    }

    #[test]
    fn test_batch_state_default_is_capture() {
        assert_eq!(BatchState::default(), BatchState::Capture);
    }
}
