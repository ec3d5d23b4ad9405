//! Pickup point handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::AppResult;
use shared::models::{PickupPoint, PickupPointWithReceptions, Reception};

use crate::api::{ApiJson, ApiQuery};
use crate::auth::{Authorized, CurrentUser};
use crate::lifecycle::{
    Caller, CloseLastReception, CreatePickupPoint, DeleteLastProduct, ListWithReceptions,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePvzRequest {
    pub id: Option<String>,
    pub registration_date: Option<DateTime<Utc>>,
    pub city: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPvzQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn create(
    State(state): State<AppState>,
    auth: Authorized<CreatePickupPoint>,
    ApiJson(req): ApiJson<CreatePvzRequest>,
) -> AppResult<(StatusCode, Json<PickupPoint>)> {
    let pvz = state
        .engine
        .create_pickup_point(
            &auth.caller(),
            CreatePickupPoint {
                id: req.id,
                registration_date: req.registration_date,
                city: req.city,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(pvz)))
}

pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiQuery(query): ApiQuery<ListPvzQuery>,
) -> AppResult<Json<Vec<PickupPointWithReceptions>>> {
    let listing = state
        .engine
        .list_with_receptions(
            &Caller::from(&user),
            ListWithReceptions {
                start_date: query.start_date,
                end_date: query.end_date,
                page: query.page,
                limit: query.limit,
            },
        )
        .await?;
    Ok(Json(listing))
}

pub async fn close_last_reception(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(pvz_id): Path<String>,
) -> AppResult<Json<Reception>> {
    let reception = state
        .engine
        .close_last_reception(&Caller::from(&user), CloseLastReception { pvz_id })
        .await?;
    Ok(Json(reception))
}

pub async fn delete_last_product(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(pvz_id): Path<String>,
) -> AppResult<StatusCode> {
    state
        .engine
        .delete_last_product(&Caller::from(&user), DeleteLastProduct { pvz_id })
        .await?;
    Ok(StatusCode::OK)
}
