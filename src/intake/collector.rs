//! Intake collector
//!
//! Accepts anonymous public submissions bound to a Mission. All
//! preconditions are checked once, at submit time, inside the store's
//! submit transaction; nothing re-verifies them later.

use crate::candidate::{CandidatePayload, CandidateRecord, PaymentInfo};
use crate::error::AppError;
use crate::intake::IntakeLink;
use crate::store::IntakeStore;
use std::sync::Arc;
use tracing::debug;

/// Public-facing submission service
pub struct IntakeCollector {
    store: Arc<IntakeStore>,
}

impl IntakeCollector {
    pub fn new(store: Arc<IntakeStore>) -> Self {
        Self { store }
    }

    /// Accept a submission through a verified intake link.
    ///
    /// Submissions deliberately trigger no notification; bulk drives would
    /// otherwise flood the channel.
    pub async fn submit(
        &self,
        link: &IntakeLink,
        payload: CandidatePayload,
        payment: Option<PaymentInfo>,
    ) -> Result<CandidateRecord, AppError> {
        if payload.names.trim().is_empty() {
            return Err(AppError::Validation(
                "Applicant names must not be empty".to_string(),
            ));
        }

        let record = self
            .store
            .submit_record(link.mission_id, &link.tenant_id, payload, payment)
            .await?;

        debug!(
            "Collected submission {} for mission {}",
            record.id, link.mission_id
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{Applicant, RecordState};
    use crate::mission::Mission;
    use chrono::{Duration, NaiveDate};
    use uuid::Uuid;

    fn payload(name: &str) -> CandidatePayload {
        CandidatePayload {
            names: name.to_string(),
            document_id: None,
            birth_date: NaiveDate::from_ymd_opt(2012, 4, 1).unwrap(),
            applicant: Applicant::Adult,
        }
    }

    async fn collector_with_mission() -> (IntakeCollector, IntakeLink) {
        let store = Arc::new(IntakeStore::new());
        let mission = Mission::new("acme".into(), "Fall".into(), Duration::hours(1), false);
        let mission = store.create_mission(mission, None).await.unwrap();
        let link = IntakeLink {
            mission_id: mission.id,
            tenant_id: "acme".into(),
        };
        (IntakeCollector::new(store), link)
    }

    #[tokio::test]
    async fn test_submit_creates_pending_record() {
        let (collector, link) = collector_with_mission().await;
        let record = collector.submit(&link, payload("Ana López"), None).await.unwrap();
        assert_eq!(record.state, RecordState::Pending);
        assert_eq!(record.tenant_id, "acme");
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_names() {
        let (collector, link) = collector_with_mission().await;
        let err = collector
            .submit(&link, payload("   "), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_submit_unknown_mission_is_not_found() {
        let (collector, _) = collector_with_mission().await;
        let link = IntakeLink {
            mission_id: Uuid::new_v4(),
            tenant_id: "acme".into(),
        };
        let err = collector
            .submit(&link, payload("Ana"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
