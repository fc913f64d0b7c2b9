//! Triage route handlers

use crate::candidate::{CandidateRecord, RecordState};
use crate::error::ApiResult;
use crate::models::SuccessResponse;
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Staff triage decision
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStateRequest {
    pub new_state: RecordState,
    /// Staff user recorded in the audit log
    pub staff_user: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub record: CandidateRecord,
}

/// Apply a triage decision to a candidate record
pub async fn set_state(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetStateRequest>,
) -> ApiResult<Json<SuccessResponse<RecordResponse>>> {
    let record = state
        .triage
        .set_state(id, payload.new_state, payload.staff_user.as_deref())
        .await?;

    Ok(Json(SuccessResponse::with_data(
        "Triage decision applied",
        RecordResponse { record },
    )))
}

/// Get a candidate record by ID
pub async fn get_record(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse<RecordResponse>>> {
    let record = state.store.get_record(id).await?;
    Ok(Json(SuccessResponse::with_data(
        "Record retrieved",
        RecordResponse { record },
    )))
}
