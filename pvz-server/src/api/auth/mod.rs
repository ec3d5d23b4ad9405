//! Authentication routes
//!
//! All three are public; they are how a caller obtains a token.

mod handler;

use axum::{Router, routing::post};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dummyLogin", post(handler::dummy_login))
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
}
