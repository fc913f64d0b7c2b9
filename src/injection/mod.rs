//! Homologation & injection
//!
//! Normalizes a legalized batch and atomically promotes it into the
//! canonical roster.

pub mod engine;
pub mod homologation;

pub use engine::InjectionEngine;
pub use homologation::{homologate, HomologationDefaults};

use serde::{Deserialize, Serialize};

/// Outcome of an injection run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectionReport {
    /// Records newly promoted to the canonical roster
    pub created: usize,
    /// Records that were already Processed and were excluded from the write
    pub skipped: usize,
}
