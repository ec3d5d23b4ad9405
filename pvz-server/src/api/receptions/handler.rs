use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use shared::AppResult;
use shared::models::Reception;

use crate::api::ApiJson;
use crate::auth::Authorized;
use crate::lifecycle::CreateReception;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReceptionRequest {
    pub pvz_id: String,
}

/// Opens a reception at the given pickup point
pub async fn create(
    State(state): State<AppState>,
    auth: Authorized<CreateReception>,
    ApiJson(req): ApiJson<CreateReceptionRequest>,
) -> AppResult<(StatusCode, Json<Reception>)> {
    let reception = state
        .engine
        .create_reception(&auth.caller(), CreateReception { pvz_id: req.pvz_id })
        .await?;
    Ok((StatusCode::CREATED, Json(reception)))
}
