//! Mission registry
//!
//! Owns Mission lifecycle. Expiration is a pure wall-clock comparison; no
//! background timer deactivates anything.

use crate::error::AppError;
use crate::mission::Mission;
use crate::store::IntakeStore;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;

/// Longest accepted intake window (10 years). Keeps `expires_at` far away
/// from the DateTime range limit, where addition panics.
const MAX_TTL_HOURS: i64 = 87_600;

pub struct MissionRegistry {
    store: Arc<IntakeStore>,
}

impl MissionRegistry {
    pub fn new(store: Arc<IntakeStore>) -> Self {
        Self { store }
    }

    /// Open a new intake window for a tenant.
    ///
    /// At most one active Mission per tenant: an unexpired active Mission
    /// blocks the create with `Conflict`; an expired-but-active one is
    /// superseded atomically, with the store's optimistic check guarding
    /// against a concurrent create.
    pub async fn create_mission(
        &self,
        tenant_id: &str,
        title: &str,
        ttl: Duration,
        requires_payment: bool,
    ) -> Result<Mission, AppError> {
        if tenant_id.trim().is_empty() {
            return Err(AppError::Validation("tenantId must not be empty".to_string()));
        }
        if title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".to_string()));
        }
        if ttl <= Duration::zero() {
            return Err(AppError::Validation("ttl must be positive".to_string()));
        }
        if ttl > Duration::hours(MAX_TTL_HOURS) {
            return Err(AppError::Validation(format!(
                "ttl must not exceed {} hours",
                MAX_TTL_HOURS
            )));
        }

        let supersedes = match self.store.active_mission(tenant_id).await {
            Some(active) if !active.is_expired(Utc::now()) => {
                return Err(AppError::Conflict(format!(
                    "Tenant '{}' already has an active mission ({})",
                    tenant_id, active.id
                )));
            }
            Some(expired) => Some(expired.id),
            None => None,
        };

        let mission = Mission::new(
            tenant_id.to_string(),
            title.trim().to_string(),
            ttl,
            requires_payment,
        );
        let mission = self.store.create_mission(mission, supersedes).await?;

        info!(
            "Opened mission {} '{}' for tenant '{}' until {}",
            mission.id, mission.title, tenant_id, mission.expires_at
        );
        Ok(mission)
    }

    /// The tenant's single active Mission
    pub async fn get_active_mission(&self, tenant_id: &str) -> Result<Mission, AppError> {
        self.store.active_mission(tenant_id).await.ok_or_else(|| {
            AppError::NotFound(format!("No active mission for tenant '{}'", tenant_id))
        })
    }

    /// Fetch a Mission by ID
    pub async fn get_mission(&self, id: uuid::Uuid) -> Result<Mission, AppError> {
        self.store.get_mission(id).await
    }

    /// All Missions owned by a tenant
    pub async fn list_missions(&self, tenant_id: &str) -> Vec<Mission> {
        self.store.list_missions(tenant_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> (MissionRegistry, Arc<IntakeStore>) {
        let store = Arc::new(IntakeStore::new());
        (MissionRegistry::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_create_mission_validates_arguments() {
        let (registry, _) = registry();
        assert!(registry
            .create_mission("", "Fall", Duration::hours(1), false)
            .await
            .is_err());
        assert!(registry
            .create_mission("acme", "", Duration::hours(1), false)
            .await
            .is_err());
        assert!(registry
            .create_mission("acme", "Fall", Duration::zero(), false)
            .await
            .is_err());
        assert!(registry
            .create_mission("acme", "Fall", Duration::hours(-1), false)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_oversized_ttl_is_rejected_not_panicking() {
        let (registry, _) = registry();
        // Large enough that now + ttl would leave the representable
        // date range if it ever reached Mission::new.
        let err = registry
            .create_mission("acme", "Fall", Duration::hours(3_000_000_000), false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = registry
            .create_mission("acme", "Fall", Duration::hours(MAX_TTL_HOURS + 1), false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert!(registry
            .create_mission("acme", "Fall", Duration::hours(MAX_TTL_HOURS), false)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_second_active_mission_conflicts() {
        let (registry, _) = registry();
        registry
            .create_mission("acme", "Fall", Duration::hours(1), false)
            .await
            .unwrap();
        let err = registry
            .create_mission("acme", "Spring", Duration::hours(1), false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_expired_active_mission_is_superseded() {
        let (registry, store) = registry();
        let mut old = Mission::new("acme".into(), "Old".into(), Duration::hours(1), false);
        old.expires_at = Utc::now() - Duration::hours(1);
        let old = store.create_mission(old, None).await.unwrap();

        let fresh = registry
            .create_mission("acme", "Fresh", Duration::hours(1), false)
            .await
            .unwrap();
        assert!(!store.get_mission(old.id).await.unwrap().active);
        assert_eq!(
            registry.get_active_mission("acme").await.unwrap().id,
            fresh.id
        );
    }

    #[tokio::test]
    async fn test_tenants_do_not_interfere() {
        let (registry, _) = registry();
        registry
            .create_mission("acme", "Fall", Duration::hours(1), false)
            .await
            .unwrap();
        registry
            .create_mission("globex", "Fall", Duration::hours(1), false)
            .await
            .unwrap();

        assert_eq!(
            registry.get_active_mission("acme").await.unwrap().tenant_id,
            "acme"
        );
        assert_eq!(
            registry.get_active_mission("globex").await.unwrap().tenant_id,
            "globex"
        );
    }

    #[tokio::test]
    async fn test_no_active_mission_is_not_found() {
        let (registry, _) = registry();
        let err = registry.get_active_mission("acme").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
