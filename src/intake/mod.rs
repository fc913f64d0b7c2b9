//! Public intake
//!
//! Signed link tokens and the collector that accepts anonymous submissions.

pub mod collector;
pub mod link;

pub use collector::IntakeCollector;
pub use link::{IntakeLink, LinkSigner};
