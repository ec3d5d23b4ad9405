//! Account operations: dummy login, registration and password login.

use std::sync::Arc;

use shared::models::{Role, User};
use shared::{AppError, ErrorCode};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use super::jwt::{JwtError, JwtService, TokenSubject};
use super::password::{hash_password, verify_password};
use crate::store::{NewUser, StoreError, UserStore};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unknown role: {0:?}")]
    UnknownRole(String),

    #[error("{0}")]
    Validation(String),

    #[error("email is already registered")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("token error")]
    Token(#[from] JwtError),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("storage failure")]
    Storage(#[source] StoreError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UnknownRole(role) => {
                AppError::with_message(ErrorCode::UnknownRole, format!("unknown role: {role:?}"))
                    .with_detail("role", role)
            }
            AuthError::Validation(msg) => AppError::validation(msg),
            AuthError::EmailTaken => AppError::new(ErrorCode::EmailAlreadyRegistered),
            AuthError::InvalidCredentials => AppError::invalid_credentials(),
            AuthError::Token(e) => {
                tracing::error!(error = %e, "failed to issue token");
                AppError::internal("Failed to issue token")
            }
            AuthError::Hashing(e) => {
                tracing::error!(error = %e, "password hashing failed");
                AppError::internal("Failed to process password")
            }
            AuthError::Storage(e) => {
                tracing::error!(error = ?e, "account store failure");
                AppError::database("Database error")
            }
        }
    }
}

/// Registration input
#[derive(Debug, Clone, Validate)]
pub struct Registration {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
    pub role: String,
}

pub struct AccountService {
    users: Arc<dyn UserStore>,
    jwt: Arc<JwtService>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, jwt: Arc<JwtService>) -> Self {
        Self { users, jwt }
    }

    /// Token for a synthetic user of the given role
    pub fn dummy_login(&self, role: &str) -> Result<String, AuthError> {
        let role: Role = role
            .parse()
            .map_err(|_| AuthError::UnknownRole(role.to_string()))?;
        let subject = Uuid::new_v4().to_string();

        let token = self.jwt.generate_token(TokenSubject {
            id: &subject,
            email: None,
            role,
            dummy: true,
        })?;
        tracing::info!(subject = %subject, role = %role, "dummy login");
        Ok(token)
    }

    pub async fn register(&self, registration: Registration) -> Result<User, AuthError> {
        let registration = Registration {
            email: registration.email.trim().to_lowercase(),
            ..registration
        };
        registration
            .validate()
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        let role: Role = registration
            .role
            .parse()
            .map_err(|_| AuthError::UnknownRole(registration.role.clone()))?;

        let password_hash =
            hash_password(&registration.password).map_err(|e| AuthError::Hashing(e.to_string()))?;

        let user = self
            .users
            .create(NewUser {
                id: Uuid::new_v4(),
                email: registration.email,
                password_hash,
                role,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict => AuthError::EmailTaken,
                other => AuthError::Storage(other),
            })?;

        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let email = email.trim().to_lowercase();
        let credentials = match self.users.find_by_email(&email).await {
            Ok(credentials) => credentials,
            Err(StoreError::NotFound) => return Err(AuthError::InvalidCredentials),
            Err(e) => return Err(AuthError::Storage(e)),
        };

        if !verify_password(password, &credentials.password_hash) {
            tracing::warn!(target: "security", email = %email, "login failed");
            return Err(AuthError::InvalidCredentials);
        }

        let user = credentials.user;
        let subject = user.id.to_string();
        let token = self.jwt.generate_token(TokenSubject {
            id: &subject,
            email: Some(&user.email),
            role: user.role,
            dummy: false,
        })?;
        tracing::info!(user_id = %user.id, "user logged in");
        Ok(token)
    }
}
