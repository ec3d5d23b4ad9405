//! Pickup point routes
//!
//! | Path | Method | Role |
//! |------|--------|------|
//! | /pvz | POST | moderator |
//! | /pvz | GET | any |
//! | /pvz/{pvzId}/close_last_reception | POST | employee |
//! | /pvz/{pvzId}/delete_last_product | POST | employee |

mod handler;

use axum::{Router, routing::post};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pvz", post(handler::create).get(handler::list))
        .route(
            "/pvz/{pvzId}/close_last_reception",
            post(handler::close_last_reception),
        )
        .route(
            "/pvz/{pvzId}/delete_last_product",
            post(handler::delete_last_product),
        )
}
