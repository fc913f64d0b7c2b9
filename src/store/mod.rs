//! Intake document store
//!
//! In-memory stand-in for the persistence collaborator. All collections
//! (missions, candidate records, canonical students) live behind a single
//! `RwLock`, so every multi-document operation below runs as one critical
//! section: the store's native transaction primitive. The scan-then-write
//! sequences of legalization and injection are therefore atomic, and the
//! submission counter is a linearizable increment rather than a
//! read-modify-write.

pub mod audit;

pub use audit::{AuditAction, AuditEntry};

use crate::candidate::{CandidatePayload, CandidateRecord, PaymentInfo, RecordState};
use crate::error::AppError;
use crate::injection::InjectionReport;
use crate::mission::{BatchState, LegalizationReceipt, Mission};
use crate::roster::CanonicalStudent;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// All persisted collections, guarded together
#[derive(Default)]
struct Collections {
    missions: HashMap<Uuid, Mission>,
    records: HashMap<Uuid, CandidateRecord>,
    students: HashMap<Uuid, CanonicalStudent>,
}

/// Thread-safe intake store
pub struct IntakeStore {
    collections: RwLock<Collections>,
    audit_log: RwLock<Vec<AuditEntry>>,
}

impl IntakeStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(Collections::default()),
            audit_log: RwLock::new(Vec::new()),
        }
    }

    // =========================================================================
    // MISSIONS
    // =========================================================================

    /// Create a Mission, enforcing "at most one active Mission per tenant"
    /// with an optimistic check.
    ///
    /// `supersedes` carries the id of the active Mission the caller observed
    /// (an expired one being replaced), or `None` if it observed no active
    /// Mission. If the tenant's current active Mission differs from that
    /// observation, a concurrent create won the race and this call fails
    /// with `Conflict`.
    pub async fn create_mission(
        &self,
        mission: Mission,
        supersedes: Option<Uuid>,
    ) -> Result<Mission, AppError> {
        let mut collections = self.collections.write().await;

        let current_active = collections
            .missions
            .values()
            .find(|m| m.tenant_id == mission.tenant_id && m.active)
            .map(|m| m.id);

        if current_active != supersedes {
            return Err(AppError::Conflict(format!(
                "Active mission for tenant '{}' changed concurrently; re-read and retry",
                mission.tenant_id
            )));
        }

        if let Some(previous_id) = supersedes {
            if let Some(previous) = collections.missions.get_mut(&previous_id) {
                previous.active = false;
            }
            self.log_audit(
                AuditEntry::new(AuditAction::MissionSuperseded, "mission", Some(previous_id))
                    .with_details(serde_json::json!({ "replacedBy": mission.id })),
            )
            .await;
        }

        let id = mission.id;
        collections.missions.insert(id, mission.clone());
        drop(collections);

        self.log_audit(
            AuditEntry::new(AuditAction::MissionCreated, "mission", Some(id)).with_details(
                serde_json::json!({
                    "tenantId": mission.tenant_id,
                    "expiresAt": mission.expires_at,
                    "requiresPayment": mission.requires_payment,
                }),
            ),
        )
        .await;

        debug!("Created mission {} for tenant '{}'", id, mission.tenant_id);
        Ok(mission)
    }

    /// Get a Mission by ID
    pub async fn get_mission(&self, id: Uuid) -> Result<Mission, AppError> {
        let collections = self.collections.read().await;
        collections
            .missions
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Mission {} not found", id)))
    }

    /// The tenant's single active Mission, if any
    pub async fn active_mission(&self, tenant_id: &str) -> Option<Mission> {
        let collections = self.collections.read().await;
        collections
            .missions
            .values()
            .find(|m| m.tenant_id == tenant_id && m.active)
            .cloned()
    }

    /// All Missions owned by a tenant, newest first
    pub async fn list_missions(&self, tenant_id: &str) -> Vec<Mission> {
        let collections = self.collections.read().await;
        let mut missions: Vec<Mission> = collections
            .missions
            .values()
            .filter(|m| m.tenant_id == tenant_id)
            .cloned()
            .collect();
        missions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        missions
    }

    // =========================================================================
    // CANDIDATE RECORDS
    // =========================================================================

    /// Accept a public submission.
    ///
    /// Gate checks, record insert, and the received-count increment all run
    /// inside one critical section, so N concurrent successful submits leave
    /// `received_count == N` exactly.
    pub async fn submit_record(
        &self,
        mission_id: Uuid,
        claimed_tenant: &str,
        payload: CandidatePayload,
        payment: Option<PaymentInfo>,
    ) -> Result<CandidateRecord, AppError> {
        let mut collections = self.collections.write().await;

        let mission = collections
            .missions
            .get(&mission_id)
            .ok_or_else(|| AppError::NotFound(format!("Mission {} not found", mission_id)))?;

        if mission.tenant_id != claimed_tenant {
            return Err(AppError::TenantMismatch(format!(
                "Mission {} does not belong to tenant '{}'",
                mission_id, claimed_tenant
            )));
        }
        if mission.is_expired(Utc::now()) {
            return Err(AppError::MissionExpired(format!(
                "Mission {} closed on {}",
                mission_id, mission.expires_at
            )));
        }
        if mission.batch_state != BatchState::Capture {
            return Err(AppError::MissionClosed(format!(
                "Mission {} is no longer capturing submissions",
                mission_id
            )));
        }

        let initial_state = if mission.requires_payment {
            RecordState::AwaitingVerification
        } else {
            RecordState::Pending
        };
        let tenant_id = mission.tenant_id.clone();

        let record = CandidateRecord::new(mission_id, tenant_id, payload, payment, initial_state);
        let record_id = record.id;
        collections.records.insert(record_id, record.clone());

        // Atomic increment; the lock is still held.
        if let Some(mission) = collections.missions.get_mut(&mission_id) {
            mission.received_count += 1;
        }
        drop(collections);

        self.log_audit(
            AuditEntry::new(AuditAction::RecordSubmitted, "candidate_record", Some(record_id))
                .with_details(serde_json::json!({ "missionId": mission_id })),
        )
        .await;

        debug!("Accepted submission {} for mission {}", record_id, mission_id);
        Ok(record)
    }

    /// Get a candidate record by ID
    pub async fn get_record(&self, id: Uuid) -> Result<CandidateRecord, AppError> {
        let collections = self.collections.read().await;
        collections
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Record {} not found", id)))
    }

    /// All candidate records under a Mission, oldest first
    pub async fn records_for_mission(&self, mission_id: Uuid) -> Vec<CandidateRecord> {
        let collections = self.collections.read().await;
        let mut records: Vec<CandidateRecord> = collections
            .records
            .values()
            .filter(|r| r.mission_id == mission_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        records
    }

    /// Apply a triage decision.
    ///
    /// Returns the record and whether its state actually changed (setting the
    /// current state again is a no-op success, so client retries are safe).
    pub async fn set_record_state(
        &self,
        record_id: Uuid,
        new_state: RecordState,
        actor: Option<&str>,
    ) -> Result<(CandidateRecord, bool), AppError> {
        let mut collections = self.collections.write().await;

        let mut record = collections
            .records
            .get(&record_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Record {} not found", record_id)))?;
        let current_state = record.state;
        let mission_id = record.mission_id;

        let mission = collections
            .missions
            .get(&mission_id)
            .ok_or_else(|| AppError::NotFound(format!("Mission {} not found", mission_id)))?;

        if mission.batch_state != BatchState::Capture {
            return Err(AppError::MissionClosed(format!(
                "Mission {} is {:?}; triage is frozen",
                mission_id, mission.batch_state
            )));
        }

        if new_state == current_state {
            return Ok((record, false));
        }

        if new_state == RecordState::Processed {
            return Err(AppError::InvalidTransition(
                "Processed is reachable only through injection".to_string(),
            ));
        }
        if !current_state.can_transition_to(new_state) {
            return Err(AppError::InvalidTransition(format!(
                "Cannot move record {} from {:?} to {:?}",
                record_id, current_state, new_state
            )));
        }

        record.state = new_state;
        collections.records.insert(record_id, record.clone());
        drop(collections);

        let mut entry =
            AuditEntry::new(AuditAction::RecordTriaged, "candidate_record", Some(record_id))
                .with_details(serde_json::json!({
                    "from": current_state,
                    "to": new_state,
                }));
        if let Some(actor) = actor {
            entry = entry.with_actor(actor);
        }
        self.log_audit(entry).await;

        Ok((record, true))
    }

    // =========================================================================
    // LEGALIZATION
    // =========================================================================

    /// Freeze a Mission's batch behind the director's signature.
    ///
    /// The terminal-state scan and the freeze write run under the same lock,
    /// so triage cannot race the precondition check.
    pub async fn legalize_mission(
        &self,
        mission_id: Uuid,
        receipt: LegalizationReceipt,
    ) -> Result<Mission, AppError> {
        let mut collections = self.collections.write().await;

        let mut mission = collections
            .missions
            .get(&mission_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Mission {} not found", mission_id)))?;

        if mission.batch_state != BatchState::Capture {
            return Err(AppError::MissionClosed(format!(
                "Mission {} is already {:?}",
                mission_id, mission.batch_state
            )));
        }

        let pending_count = collections
            .records
            .values()
            .filter(|r| r.mission_id == mission_id && !r.state.is_terminal_triage())
            .count();
        if pending_count > 0 {
            return Err(AppError::IncompleteTriage { pending_count });
        }

        let signed_by = receipt.signed_by.clone();
        mission.batch_state = BatchState::Legalized;
        mission.active = false;
        mission.legalization_receipt = Some(receipt);
        collections.missions.insert(mission_id, mission.clone());
        drop(collections);

        self.log_audit(
            AuditEntry::new(AuditAction::MissionLegalized, "mission", Some(mission_id))
                .with_actor(signed_by),
        )
        .await;

        info!("Mission {} legalized; batch frozen", mission_id);
        Ok(mission)
    }

    // =========================================================================
    // INJECTION
    // =========================================================================

    /// Commit a homologated batch into the canonical roster.
    ///
    /// Each record's current state is re-checked immediately before the
    /// write: already-Processed records are skipped (the idempotency guard);
    /// any record outside Verified/PaymentValidated/Processed rejects the
    /// whole batch with no partial effect. Student creates, record updates,
    /// and the Mission's processed flag land together or not at all.
    pub async fn commit_injection(
        &self,
        mission_id: Uuid,
        prepared: Vec<(Uuid, CanonicalStudent)>,
        actor: Option<&str>,
    ) -> Result<InjectionReport, AppError> {
        let mut collections = self.collections.write().await;

        let mission = collections
            .missions
            .get(&mission_id)
            .ok_or_else(|| AppError::NotFound(format!("Mission {} not found", mission_id)))?;
        if mission.batch_state == BatchState::Capture {
            return Err(AppError::InvalidTransition(format!(
                "Mission {} has not been legalized",
                mission_id
            )));
        }

        // Validate phase: stage every write before touching anything.
        let mut staged: Vec<(Uuid, CanonicalStudent)> = Vec::new();
        let mut skipped = 0usize;
        for (record_id, student) in prepared {
            let record = collections.records.get(&record_id).ok_or_else(|| {
                AppError::InjectionFailed(format!("Record {} vanished before commit", record_id))
            })?;
            match record.state {
                RecordState::Processed => skipped += 1,
                s if s.is_injectable() => staged.push((record_id, student)),
                s => {
                    return Err(AppError::InvalidTransition(format!(
                        "Record {} is {:?} and cannot be injected",
                        record_id, s
                    )));
                }
            }
        }

        // Apply phase: nothing below can fail.
        let created = staged.len();
        for (record_id, student) in staged {
            collections.students.insert(student.id, student);
            if let Some(record) = collections.records.get_mut(&record_id) {
                record.state = RecordState::Processed;
            }
        }
        if let Some(mission) = collections.missions.get_mut(&mission_id) {
            mission.batch_state = BatchState::Processed;
        }
        drop(collections);

        let mut entry = AuditEntry::new(AuditAction::BatchInjected, "mission", Some(mission_id))
            .with_details(serde_json::json!({
                "created": created,
                "skipped": skipped,
            }));
        if let Some(actor) = actor {
            entry = entry.with_actor(actor);
        }
        self.log_audit(entry).await;

        info!(
            "Injected batch for mission {}: {} created, {} skipped",
            mission_id, created, skipped
        );
        Ok(InjectionReport { created, skipped })
    }

    // =========================================================================
    // ROSTER
    // =========================================================================

    /// All canonical students for a tenant
    pub async fn list_students(&self, tenant_id: &str) -> Vec<CanonicalStudent> {
        let collections = self.collections.read().await;
        collections
            .students
            .values()
            .filter(|s| s.tenant_id == tenant_id)
            .cloned()
            .collect()
    }

    /// Canonical student count for a tenant
    pub async fn student_count(&self, tenant_id: &str) -> usize {
        let collections = self.collections.read().await;
        collections
            .students
            .values()
            .filter(|s| s.tenant_id == tenant_id)
            .count()
    }

    // =========================================================================
    // AUDIT LOG
    // =========================================================================

    /// Append an audit entry
    pub async fn log_audit(&self, entry: AuditEntry) {
        let mut log = self.audit_log.write().await;
        log.push(entry);
    }

    /// Query the audit log, newest first
    pub async fn audit_entries(
        &self,
        resource_type: Option<&str>,
        resource_id: Option<Uuid>,
        limit: usize,
    ) -> Vec<AuditEntry> {
        let log = self.audit_log.read().await;
        log.iter()
            .rev()
            .filter(|e| resource_type.map_or(true, |t| e.resource_type == t))
            .filter(|e| resource_id.map_or(true, |id| e.resource_id == Some(id)))
            .take(limit)
            .cloned()
            .collect()
    }
}

impl Default for IntakeStore {
    fn default() -> Self {
        Self::new()
    }
}
