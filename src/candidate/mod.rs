//! Candidate domain
//!
//! One CandidateRecord per prospective-student submission, carrying its
//! triage state machine and the tagged applicant payload.

pub mod models;

pub use models::{
    Applicant, CandidatePayload, CandidateRecord, GuardianInfo, PaymentInfo, RecordState,
};
