//! Mission route handlers

use crate::candidate::CandidateRecord;
use crate::error::{validation_error, ApiResult, AppError};
use crate::mission::Mission;
use crate::models::SuccessResponse;
use crate::state::SharedState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request to open a new intake window
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMissionRequest {
    #[validate(length(min = 1, max = 64, message = "tenantId is required"))]
    pub tenant_id: String,

    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,

    /// Window length in hours; bounded so `now + ttl` stays inside the
    /// representable date range
    #[validate(range(min = 1, max = 87600, message = "ttlHours must be between 1 and 87600"))]
    pub ttl_hours: i64,

    /// Intake variant that gates on proof of payment
    #[serde(default)]
    pub requires_payment: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantQuery {
    pub tenant_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionResponse {
    pub mission: Mission,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionListResponse {
    pub missions: Vec<Mission>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordListResponse {
    pub records: Vec<CandidateRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeLinkResponse {
    pub token: String,
}

/// Open a new Mission for a tenant
pub async fn create_mission(
    State(state): State<SharedState>,
    Json(payload): Json<CreateMissionRequest>,
) -> ApiResult<(StatusCode, Json<SuccessResponse<MissionResponse>>)> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let mission = state
        .registry
        .create_mission(
            &payload.tenant_id,
            &payload.title,
            Duration::hours(payload.ttl_hours),
            payload.requires_payment,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data(
            "Mission created",
            MissionResponse { mission },
        )),
    ))
}

/// Get the tenant's single active Mission
pub async fn get_active_mission(
    State(state): State<SharedState>,
    Query(query): Query<TenantQuery>,
) -> ApiResult<Json<SuccessResponse<MissionResponse>>> {
    let mission = state.registry.get_active_mission(&query.tenant_id).await?;
    Ok(Json(SuccessResponse::with_data(
        "Active mission retrieved",
        MissionResponse { mission },
    )))
}

/// Get a Mission by ID
pub async fn get_mission(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse<MissionResponse>>> {
    let mission = state.registry.get_mission(id).await?;
    Ok(Json(SuccessResponse::with_data(
        "Mission retrieved",
        MissionResponse { mission },
    )))
}

/// List all Missions for a tenant
pub async fn list_missions(
    State(state): State<SharedState>,
    Query(query): Query<TenantQuery>,
) -> ApiResult<Json<SuccessResponse<MissionListResponse>>> {
    let missions = state.registry.list_missions(&query.tenant_id).await;
    Ok(Json(SuccessResponse::with_data(
        format!("Found {} missions", missions.len()),
        MissionListResponse { missions },
    )))
}

/// Staff triage listing of a Mission's candidate records
pub async fn list_records(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse<RecordListResponse>>> {
    // Confirms the Mission exists before listing
    state.registry.get_mission(id).await?;
    let records = state.store.records_for_mission(id).await;
    Ok(Json(SuccessResponse::with_data(
        format!("Found {} records", records.len()),
        RecordListResponse { records },
    )))
}

/// Issue the signed public intake link for a Mission
pub async fn issue_link(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse<IntakeLinkResponse>>> {
    let mission = state.registry.get_mission(id).await?;
    if !mission.active {
        return Err(AppError::MissionClosed(format!(
            "Mission {} is no longer active",
            id
        )));
    }

    let token = state.links.issue(mission.id, &mission.tenant_id);
    Ok(Json(SuccessResponse::with_data(
        "Intake link issued",
        IntakeLinkResponse { token },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(ttl_hours: i64) -> CreateMissionRequest {
        CreateMissionRequest {
            tenant_id: "acme".into(),
            title: "Fall intake".into(),
            ttl_hours,
            requires_payment: false,
        }
    }

    #[test]
    fn test_ttl_hours_is_bounded() {
        assert!(request(24).validate().is_ok());
        assert!(request(87_600).validate().is_ok());
        assert!(request(0).validate().is_err());
        assert!(request(-5).validate().is_err());
        // Values this size would panic in Duration::hours or in the
        // expires_at addition; the DTO stops them at the door.
        assert!(request(3_000_000_000).validate().is_err());
        assert!(request(i64::MAX).validate().is_err());
    }
}
