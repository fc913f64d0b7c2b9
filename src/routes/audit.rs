//! Audit log route handlers

use crate::error::ApiResult;
use crate::models::SuccessResponse;
use crate::state::SharedState;
use crate::store::AuditEntry;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogQuery {
    pub resource_type: Option<String>,
    pub resource_id: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogResponse {
    pub entries: Vec<AuditEntry>,
}

pub async fn get_audit_log(
    State(state): State<SharedState>,
    Query(query): Query<AuditLogQuery>,
) -> ApiResult<Json<SuccessResponse<AuditLogResponse>>> {
    let entries = state
        .store
        .audit_entries(
            query.resource_type.as_deref(),
            query.resource_id,
            query.limit,
        )
        .await;

    Ok(Json(SuccessResponse::with_data(
        format!("Retrieved {} audit entries", entries.len()),
        AuditLogResponse { entries },
    )))
}
