//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::config::Settings;
use crate::injection::{HomologationDefaults, InjectionEngine};
use crate::intake::{IntakeCollector, LinkSigner};
use crate::legalization::LegalizationGate;
use crate::mission::MissionRegistry;
use crate::notify::Notifier;
use crate::store::IntakeStore;
use crate::triage::TriageGate;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Intake document store (single source of truth)
    pub store: Arc<IntakeStore>,

    /// Mission lifecycle
    pub registry: MissionRegistry,

    /// Public submission intake
    pub collector: IntakeCollector,

    /// Staff triage workflow
    pub triage: TriageGate,

    /// Director batch freeze
    pub legalization: LegalizationGate,

    /// Operator homologation and roster injection
    pub injection: InjectionEngine,

    /// Signed public intake links
    pub links: LinkSigner,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        let store = Arc::new(IntakeStore::new());
        let notifier = Arc::new(Notifier::new());
        let defaults = HomologationDefaults {
            grade: settings.intake.default_grade.clone(),
            group: settings.intake.default_group.clone(),
        };

        Self {
            registry: MissionRegistry::new(store.clone()),
            collector: IntakeCollector::new(store.clone()),
            triage: TriageGate::new(store.clone(), notifier),
            legalization: LegalizationGate::new(store.clone()),
            injection: InjectionEngine::new(store.clone(), defaults),
            links: LinkSigner::new(settings.intake.link_secret.clone()),
            store,
        }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
