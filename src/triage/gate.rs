//! Triage gate service
//!
//! Staff-only per-record approve/reject workflow. Once a Mission is
//! legalized, triage is frozen.

use crate::candidate::{CandidateRecord, RecordState};
use crate::error::AppError;
use crate::notify::{Channel, Notifier};
use crate::store::IntakeStore;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub struct TriageGate {
    store: Arc<IntakeStore>,
    notifier: Arc<Notifier>,
}

impl TriageGate {
    pub fn new(store: Arc<IntakeStore>, notifier: Arc<Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Apply a triage decision to a record.
    ///
    /// Re-applying the record's current state is a no-op success so client
    /// retries stay safe. A decision that actually changes state notifies
    /// the guardian contact when one exists; delivery is fire-and-forget.
    pub async fn set_state(
        &self,
        record_id: Uuid,
        new_state: RecordState,
        staff_user: Option<&str>,
    ) -> Result<CandidateRecord, AppError> {
        let (record, changed) = self
            .store
            .set_record_state(record_id, new_state, staff_user)
            .await?;

        if changed {
            debug!("Record {} moved to {:?}", record_id, new_state);
            self.notify_decision(&record);
        }
        Ok(record)
    }

    fn notify_decision(&self, record: &CandidateRecord) {
        let Some(guardian) = record.payload.applicant.guardian() else {
            return;
        };
        let Some(contact) = guardian.contact.as_deref() else {
            return;
        };

        let text = match record.state {
            RecordState::Verified | RecordState::PaymentValidated => format!(
                "The registration for {} has been approved.",
                record.payload.names
            ),
            RecordState::Rejected => format!(
                "The registration for {} could not be approved. Please contact the school.",
                record.payload.names
            ),
            _ => return,
        };
        self.notifier.send_message(Channel::Whatsapp, contact, &text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{Applicant, CandidatePayload, GuardianInfo};
    use crate::mission::Mission;
    use chrono::{Duration, NaiveDate};

    fn payload_with_guardian(name: &str) -> CandidatePayload {
        CandidatePayload {
            names: name.to_string(),
            document_id: None,
            birth_date: NaiveDate::from_ymd_opt(2014, 2, 10).unwrap(),
            applicant: Applicant::Minor {
                guardian: GuardianInfo {
                    name: "Jane Doe".into(),
                    contact: Some("+5215512345678".into()),
                    relationship: Some("mother".into()),
                },
            },
        }
    }

    async fn gate_with_record() -> (TriageGate, Arc<Notifier>, Uuid) {
        let store = Arc::new(IntakeStore::new());
        let notifier = Arc::new(Notifier::new());
        let mission = Mission::new("acme".into(), "Fall".into(), Duration::hours(1), false);
        let mission = store.create_mission(mission, None).await.unwrap();
        let record = store
            .submit_record(mission.id, "acme", payload_with_guardian("Kid Name"), None)
            .await
            .unwrap();
        (
            TriageGate::new(store, notifier.clone()),
            notifier,
            record.id,
        )
    }

    #[tokio::test]
    async fn test_verify_notifies_guardian() {
        let (gate, notifier, record_id) = gate_with_record().await;
        let record = gate
            .set_state(record_id, RecordState::Verified, Some("staff-1"))
            .await
            .unwrap();
        assert_eq!(record.state, RecordState::Verified);
        assert_eq!(notifier.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_noop_decision_sends_nothing() {
        let (gate, notifier, record_id) = gate_with_record().await;
        gate.set_state(record_id, RecordState::Pending, None)
            .await
            .unwrap();
        assert_eq!(notifier.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_reject_then_reopen() {
        let (gate, _, record_id) = gate_with_record().await;
        gate.set_state(record_id, RecordState::Rejected, None)
            .await
            .unwrap();
        let record = gate
            .set_state(record_id, RecordState::Pending, None)
            .await
            .unwrap();
        assert_eq!(record.state, RecordState::Pending);
    }

    #[tokio::test]
    async fn test_illegal_transition_is_rejected() {
        let (gate, _, record_id) = gate_with_record().await;
        gate.set_state(record_id, RecordState::Verified, None)
            .await
            .unwrap();
        let err = gate
            .set_state(record_id, RecordState::Pending, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn test_processed_unreachable_via_triage() {
        let (gate, _, record_id) = gate_with_record().await;
        let err = gate
            .set_state(record_id, RecordState::Processed, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }
}
