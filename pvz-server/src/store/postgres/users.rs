//! Account queries

use shared::models::{Role, User};
use sqlx::PgPool;
use uuid::Uuid;

use crate::store::{NewUser, StoreError, UserCredentials};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    #[sqlx(try_from = "String")]
    role: Role,
}

impl From<UserRow> for UserCredentials {
    fn from(row: UserRow) -> Self {
        Self {
            user: User {
                id: row.id,
                email: row.email,
                role: row.role,
            },
            password_hash: row.password_hash,
        }
    }
}

pub async fn insert(pool: &PgPool, user: &NewUser) -> Result<User, StoreError> {
    let row: UserRow = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id, email, password_hash, role
        "#,
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .fetch_one(pool)
    .await?;
    Ok(UserCredentials::from(row).user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<UserCredentials, StoreError> {
    let row: Option<UserRow> = sqlx::query_as(
        "SELECT id, email, password_hash, role FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    row.map(UserCredentials::from).ok_or(StoreError::NotFound)
}
