//! Legalization route handlers

use crate::error::{validation_error, ApiResult};
use crate::mission::Mission;
use crate::models::SuccessResponse;
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Director sign-off request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LegalizeRequest {
    #[validate(length(min = 1, max = 64, message = "directorUserId is required"))]
    pub director_user_id: String,

    /// Signature image as a data URI or storage reference
    #[validate(length(min = 1, message = "signatureImage is required"))]
    pub signature_image: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalizeResponse {
    pub mission: Mission,
}

/// Freeze a Mission's batch behind the director's signature
pub async fn legalize(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LegalizeRequest>,
) -> ApiResult<Json<SuccessResponse<LegalizeResponse>>> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let mission = state
        .legalization
        .legalize(id, &payload.director_user_id, &payload.signature_image)
        .await?;

    Ok(Json(SuccessResponse::with_data(
        "Mission legalized",
        LegalizeResponse { mission },
    )))
}
