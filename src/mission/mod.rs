//! Mission domain
//!
//! A Mission is a tenant-scoped, time-boxed public intake campaign.

pub mod models;
pub mod registry;

pub use models::{BatchState, LegalizationReceipt, Mission};
pub use registry::MissionRegistry;
