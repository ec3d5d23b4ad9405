use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use shared::AppResult;
use shared::models::Product;

use crate::api::ApiJson;
use crate::auth::Authorized;
use crate::lifecycle::AddProduct;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductRequest {
    #[serde(rename = "type")]
    pub product_type: String,
    pub pvz_id: String,
}

/// Adds a product to the pickup point's open reception
pub async fn create(
    State(state): State<AppState>,
    auth: Authorized<AddProduct>,
    ApiJson(req): ApiJson<AddProductRequest>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state
        .engine
        .add_product(
            &auth.caller(),
            AddProduct {
                pvz_id: req.pvz_id,
                product_type: req.product_type,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}
