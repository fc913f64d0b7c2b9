//! Injection route handlers

use crate::error::ApiResult;
use crate::injection::InjectionReport;
use crate::mission::Mission;
use crate::models::SuccessResponse;
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Platform-operator injection request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectRequest {
    pub reviewed_record_ids: Vec<Uuid>,
    /// Operator recorded in the audit log
    pub operator: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectResponse {
    pub report: InjectionReport,
    pub mission: Mission,
}

/// Homologate and atomically promote a legalized batch into the roster
pub async fn inject(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InjectRequest>,
) -> ApiResult<Json<SuccessResponse<InjectResponse>>> {
    let report = state
        .injection
        .inject(id, payload.reviewed_record_ids, payload.operator.as_deref())
        .await?;
    let mission = state.registry.get_mission(id).await?;

    Ok(Json(SuccessResponse::with_data(
        format!(
            "Injection complete: {} created, {} skipped",
            report.created, report.skipped
        ),
        InjectResponse { report, mission },
    )))
}
