//! Legalization gate service
//!
//! The director signs off on the whole validated batch. Every record under
//! the Mission must already hold a terminal triage state; the scan and the
//! freeze run in one store transaction.

use crate::error::AppError;
use crate::mission::{LegalizationReceipt, Mission};
use crate::store::IntakeStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct LegalizationGate {
    store: Arc<IntakeStore>,
}

impl LegalizationGate {
    pub fn new(store: Arc<IntakeStore>) -> Self {
        Self { store }
    }

    /// Freeze the batch behind the director's signature.
    ///
    /// One-shot: a Mission that is already Legalized or Processed rejects
    /// with `MissionClosed`, and the receipt is immutable once attached.
    pub async fn legalize(
        &self,
        mission_id: Uuid,
        director_user_id: &str,
        signature_image: &str,
    ) -> Result<Mission, AppError> {
        if director_user_id.trim().is_empty() {
            return Err(AppError::Validation(
                "directorUserId must not be empty".to_string(),
            ));
        }
        if signature_image.trim().is_empty() {
            return Err(AppError::Validation(
                "signatureImage must not be empty".to_string(),
            ));
        }

        let receipt = LegalizationReceipt {
            signature_image: signature_image.to_string(),
            signed_at: Utc::now(),
            signed_by: director_user_id.to_string(),
        };
        let mission = self.store.legalize_mission(mission_id, receipt).await?;

        info!(
            "Mission {} legalized by director '{}'",
            mission_id, director_user_id
        );
        Ok(mission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{Applicant, CandidatePayload, RecordState};
    use crate::mission::BatchState;
    use chrono::{Duration, NaiveDate};

    fn payload(name: &str) -> CandidatePayload {
        CandidatePayload {
            names: name.to_string(),
            document_id: None,
            birth_date: NaiveDate::from_ymd_opt(2012, 4, 1).unwrap(),
            applicant: Applicant::Adult,
        }
    }

    async fn mission_with_triaged_records(store: &Arc<IntakeStore>) -> Mission {
        let mission = Mission::new("acme".into(), "Fall".into(), Duration::hours(1), false);
        let mission = store.create_mission(mission, None).await.unwrap();
        for (name, state) in [
            ("A", RecordState::Verified),
            ("B", RecordState::Verified),
            ("C", RecordState::Rejected),
        ] {
            let record = store
                .submit_record(mission.id, "acme", payload(name), None)
                .await
                .unwrap();
            store.set_record_state(record.id, state, None).await.unwrap();
        }
        mission
    }

    #[tokio::test]
    async fn test_legalize_freezes_mission_and_attaches_receipt() {
        let store = Arc::new(IntakeStore::new());
        let mission = mission_with_triaged_records(&store).await;
        let gate = LegalizationGate::new(store.clone());

        let mission = gate
            .legalize(mission.id, "director-1", "data:image/png;base64,sig")
            .await
            .unwrap();
        assert_eq!(mission.batch_state, BatchState::Legalized);
        assert!(!mission.active);
        let receipt = mission.legalization_receipt.unwrap();
        assert_eq!(receipt.signed_by, "director-1");
    }

    #[tokio::test]
    async fn test_legalize_is_one_shot() {
        let store = Arc::new(IntakeStore::new());
        let mission = mission_with_triaged_records(&store).await;
        let gate = LegalizationGate::new(store.clone());

        gate.legalize(mission.id, "director-1", "sig").await.unwrap();
        let err = gate
            .legalize(mission.id, "director-1", "sig")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissionClosed(_)));
    }

    #[tokio::test]
    async fn test_legalize_requires_signature_fields() {
        let store = Arc::new(IntakeStore::new());
        let mission = mission_with_triaged_records(&store).await;
        let gate = LegalizationGate::new(store);

        assert!(gate.legalize(mission.id, "", "sig").await.is_err());
        assert!(gate.legalize(mission.id, "director-1", " ").await.is_err());
    }

    #[tokio::test]
    async fn test_expired_mission_remains_legalizable() {
        let store = Arc::new(IntakeStore::new());
        let mut mission = Mission::new("acme".into(), "Old".into(), Duration::hours(1), false);
        mission.expires_at = Utc::now() - Duration::hours(1);
        let mission = store.create_mission(mission, None).await.unwrap();
        let gate = LegalizationGate::new(store);

        // Expired, empty batch: still legalizable for what it collected.
        let mission = gate.legalize(mission.id, "director-1", "sig").await.unwrap();
        assert_eq!(mission.batch_state, BatchState::Legalized);
    }
}
