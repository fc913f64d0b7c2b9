//! Public intake route handlers
//!
//! The only unauthenticated surface. Every failure, whatever its cause,
//! returns the same generic body; specifics stay in the server log.

use crate::candidate::{Applicant, CandidatePayload, PaymentInfo};
use crate::error::PublicError;
use crate::models::SuccessResponse;
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{M}' .\-]+$").unwrap());

/// Anonymous submission from the public form
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    #[validate(length(min = 1, max = 160, message = "names is required"))]
    #[validate(custom(function = "validate_person_name"))]
    pub names: String,

    pub document_id: Option<String>,

    pub birth_date: NaiveDate,

    /// `{"type": "minor", "guardian": {...}}` or `{"type": "adult"}`
    pub applicant: Applicant,

    pub payment: Option<PaymentRequest>,
}

/// Proof of payment for the payment-gated intake variant
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: f64,
    pub method: String,
    pub proof_ref: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    /// Folio the submitter can keep for follow-up
    pub record_id: Uuid,
}

fn validate_person_name(name: &str) -> Result<(), validator::ValidationError> {
    if !NAME_RE.is_match(name.trim()) {
        let mut err = validator::ValidationError::new("invalid_name");
        err.message = Some("Names may only contain letters, spaces, apostrophes, and hyphens".into());
        return Err(err);
    }
    Ok(())
}

/// Accept an anonymous submission through a signed intake link
pub async fn submit(
    State(state): State<SharedState>,
    Path(token): Path<String>,
    Json(payload): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<SuccessResponse<SubmitResponse>>), PublicError> {
    payload
        .validate()
        .map_err(|e| crate::error::validation_error(e.to_string()))?;

    let link = state.links.verify(&token)?;

    let candidate = CandidatePayload {
        names: payload.names,
        document_id: payload.document_id,
        birth_date: payload.birth_date,
        applicant: payload.applicant,
    };
    let payment = payload.payment.map(|p| PaymentInfo {
        amount: p.amount,
        method: p.method,
        proof_ref: p.proof_ref,
        paid_at: Utc::now(),
    });

    let record = state.collector.submit(&link, candidate, payment).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data(
            "Registration received",
            SubmitResponse {
                record_id: record.id,
            },
        )),
    ))
}
