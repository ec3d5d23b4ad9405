//! JWT Extractor
//!
//! Resolves an inbound request to the caller's identity and role.

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::AppError;
use shared::models::Role;

use super::jwt::{Claims, JwtError, JwtService};
use crate::lifecycle::{Caller, Command, ReceptionEngine};
use crate::state::AppState;

/// Authenticated caller, as carried by the access token
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: String,
    pub email: Option<String>,
    pub role: Role,
    pub dummy: bool,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = shared::models::UnknownVariant;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            role: claims.role.parse()?,
            id: claims.sub,
            email: claims.email,
            dummy: claims.dummy,
        })
    }
}

impl From<&CurrentUser> for Caller {
    fn from(user: &CurrentUser) -> Self {
        Caller::new(user.id.clone(), user.role)
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let Some(token) = auth_header.and_then(JwtService::extract_from_header) else {
            tracing::warn!(target: "security", uri = %parts.uri, "missing or malformed bearer token");
            return Err(AppError::not_authenticated());
        };

        let claims = state.jwt.validate_token(token).map_err(|e| {
            tracing::warn!(target: "security", uri = %parts.uri, error = %e, "token rejected");
            match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            }
        })?;

        let user = CurrentUser::try_from(claims)
            .map_err(|e| AppError::invalid_token(format!("Malformed token claims: {e}")))?;

        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Caller already cleared for `C`'s required role
///
/// Placed before a body extractor, this turns away a caller with the wrong
/// role before the body is read.
pub struct Authorized<C> {
    pub user: CurrentUser,
    _command: PhantomData<fn() -> C>,
}

impl<C> Authorized<C> {
    pub fn caller(&self) -> Caller {
        Caller::from(&self.user)
    }
}

impl<C: Command> FromRequestParts<AppState> for Authorized<C> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        ReceptionEngine::authorize::<C>(&Caller::from(&user))?;
        Ok(Self {
            user,
            _command: PhantomData,
        })
    }
}
