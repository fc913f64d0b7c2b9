//! Injection engine
//!
//! Homologates a reviewed batch and commits it into the canonical roster as
//! one all-or-nothing write. Partial injection is unacceptable: a retry
//! after a half-applied batch would silently double-create students, so the
//! store either applies everything or nothing.

use crate::error::AppError;
use crate::injection::homologation::{homologate, HomologationDefaults};
use crate::injection::InjectionReport;
use crate::mission::BatchState;
use crate::roster::CanonicalStudent;
use crate::store::IntakeStore;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Platform-operator facade over homologation and batch commit
pub struct InjectionEngine {
    store: Arc<IntakeStore>,
    defaults: HomologationDefaults,
}

impl InjectionEngine {
    pub fn new(store: Arc<IntakeStore>, defaults: HomologationDefaults) -> Self {
        Self { store, defaults }
    }

    /// Promote the reviewed records of a legalized Mission into the roster.
    ///
    /// Safe to retry in full: records that were already Processed are
    /// re-detected at commit time and counted in `skipped`, never written
    /// twice. `created + skipped` always equals the input length.
    pub async fn inject(
        &self,
        mission_id: Uuid,
        reviewed_record_ids: Vec<Uuid>,
        actor: Option<&str>,
    ) -> Result<InjectionReport, AppError> {
        if reviewed_record_ids.is_empty() {
            return Err(AppError::Validation(
                "reviewedRecordIds must not be empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        if !reviewed_record_ids.iter().all(|id| seen.insert(*id)) {
            return Err(AppError::Validation(
                "reviewedRecordIds contains duplicates".to_string(),
            ));
        }

        let mission = self.store.get_mission(mission_id).await?;
        if mission.batch_state == BatchState::Capture {
            return Err(AppError::InvalidTransition(format!(
                "Mission {} has not been legalized",
                mission_id
            )));
        }

        // Homologation is pure; no I/O between the reads below and the
        // commit other than the commit itself, which re-checks each record.
        let mut prepared: Vec<(Uuid, CanonicalStudent)> =
            Vec::with_capacity(reviewed_record_ids.len());
        for record_id in reviewed_record_ids {
            let record = self.store.get_record(record_id).await?;
            if record.mission_id != mission_id {
                return Err(AppError::Validation(format!(
                    "Record {} does not belong to mission {}",
                    record_id, mission_id
                )));
            }
            if record.tenant_id != mission.tenant_id {
                return Err(AppError::TenantMismatch(format!(
                    "Record {} belongs to a different tenant",
                    record_id
                )));
            }
            prepared.push((record_id, homologate(&record, &self.defaults)));
        }
        debug!(
            "Homologated {} record(s) for mission {}",
            prepared.len(),
            mission_id
        );

        let report = self
            .store
            .commit_injection(mission_id, prepared, actor)
            .await?;

        info!(
            "Injection for mission {} complete: created={}, skipped={}",
            mission_id, report.created, report.skipped
        );
        Ok(report)
    }
}
