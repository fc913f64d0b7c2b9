//! Triage gate
//!
//! Staff review converting candidate records to Verified/Rejected.

pub mod gate;

pub use gate::TriageGate;
