//! Per-record homologation pass
//!
//! Pure and I/O-free: normalizes free-text fields and shapes the canonical
//! student document. Safe to run in parallel over a batch.

use crate::candidate::CandidateRecord;
use crate::roster::CanonicalStudent;
use chrono::Utc;
use uuid::Uuid;

/// Defaults applied to new entrants with no placement yet
#[derive(Debug, Clone)]
pub struct HomologationDefaults {
    pub grade: String,
    pub group: String,
}

/// Trim, collapse internal whitespace, and uppercase a free-text name
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Shape a canonical student from a reviewed candidate record.
///
/// The student carries no reference back to the Mission; once created it is
/// owned by the roster store alone. The guardian sub-object exists only for
/// minor applicants.
pub fn homologate(record: &CandidateRecord, defaults: &HomologationDefaults) -> CanonicalStudent {
    CanonicalStudent {
        id: Uuid::new_v4(),
        tenant_id: record.tenant_id.clone(),
        full_name: normalize_name(&record.payload.names),
        document_id: record
            .payload
            .document_id
            .as_ref()
            .map(|d| d.trim().to_string()),
        birth_date: record.payload.birth_date,
        grade: defaults.grade.clone(),
        group: defaults.group.clone(),
        guardian: record.payload.applicant.guardian().cloned(),
        enrolled_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{Applicant, CandidatePayload, CandidateRecord, GuardianInfo, RecordState};
    use chrono::NaiveDate;

    fn defaults() -> HomologationDefaults {
        HomologationDefaults {
            grade: "1".into(),
            group: "A".into(),
        }
    }

    fn record(names: &str, applicant: Applicant) -> CandidateRecord {
        CandidateRecord::new(
            Uuid::new_v4(),
            "acme".into(),
            CandidatePayload {
                names: names.into(),
                document_id: Some("  CURP-123  ".into()),
                birth_date: NaiveDate::from_ymd_opt(2013, 9, 15).unwrap(),
                applicant,
            },
            None,
            RecordState::Verified,
        )
    }

    #[test]
    fn test_normalize_name_trims_collapses_uppercases() {
        assert_eq!(normalize_name("  ana   maría  lópez "), "ANA MARÍA LÓPEZ");
        assert_eq!(normalize_name("bob"), "BOB");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_homologate_applies_defaults_and_trims_document() {
        let student = homologate(&record(" juan  perez ", Applicant::Adult), &defaults());
        assert_eq!(student.full_name, "JUAN PEREZ");
        assert_eq!(student.grade, "1");
        assert_eq!(student.group, "A");
        assert_eq!(student.document_id.as_deref(), Some("CURP-123"));
        assert!(student.guardian.is_none());
    }

    #[test]
    fn test_homologate_builds_guardian_only_for_minors() {
        let minor = Applicant::Minor {
            guardian: GuardianInfo {
                name: "Jane Doe".into(),
                contact: None,
                relationship: Some("mother".into()),
            },
        };
        let student = homologate(&record("kid name", minor), &defaults());
        assert_eq!(student.guardian.unwrap().name, "Jane Doe");
    }
}
