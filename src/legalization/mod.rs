//! Legalization gate
//!
//! Director's one-shot signed freeze of a Mission's batch.

pub mod gate;

pub use gate::LegalizationGate;
