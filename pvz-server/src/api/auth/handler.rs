//! Authentication handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use shared::AppResult;
use shared::models::User;

use crate::api::ApiJson;
use crate::auth::Registration;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DummyLoginRequest {
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token for a synthetic user of the requested role
pub async fn dummy_login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<DummyLoginRequest>,
) -> AppResult<Json<String>> {
    let token = state.accounts.dummy_login(&req.role)?;
    Ok(Json(token))
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = state
        .accounts
        .register(Registration {
            email: req.email,
            password: req.password,
            role: req.role,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> AppResult<Json<String>> {
    let token = state.accounts.login(&req.email, &req.password).await?;
    Ok(Json(token))
}
