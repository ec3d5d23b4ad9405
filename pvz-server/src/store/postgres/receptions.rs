//! Reception queries

use shared::models::Reception;
use sqlx::PgPool;
use uuid::Uuid;

use crate::store::StoreError;

pub async fn find_open(pool: &PgPool, pvz_id: Uuid) -> Result<Reception, StoreError> {
    let row: Option<Reception> = sqlx::query_as(
        r#"
        SELECT id, date_time, pvz_id, status
        FROM receptions
        WHERE pvz_id = $1 AND status = 'open'
        ORDER BY date_time DESC
        LIMIT 1
        "#,
    )
    .bind(pvz_id)
    .fetch_optional(pool)
    .await?;
    row.ok_or(StoreError::NotFound)
}

/// A concurrent open reception trips `receptions_one_open_per_pvz` and comes
/// back as [`StoreError::Conflict`].
pub async fn insert(pool: &PgPool, reception: &Reception) -> Result<Reception, StoreError> {
    let row: Reception = sqlx::query_as(
        r#"
        INSERT INTO receptions (id, date_time, pvz_id, status)
        VALUES ($1, $2, $3, $4)
        RETURNING id, date_time, pvz_id, status
        "#,
    )
    .bind(reception.id)
    .bind(reception.date_time)
    .bind(reception.pvz_id)
    .bind(reception.status.as_str())
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Select-and-flip in one statement. A racing close blocks on the row lock,
/// then fails the outer `status = 'open'` re-check and matches nothing.
pub async fn close_most_recent_open(pool: &PgPool, pvz_id: Uuid) -> Result<Reception, StoreError> {
    let row: Option<Reception> = sqlx::query_as(
        r#"
        UPDATE receptions
        SET status = 'closed'
        WHERE id = (
                SELECT id FROM receptions
                WHERE pvz_id = $1 AND status = 'open'
                ORDER BY date_time DESC
                LIMIT 1
              )
          AND status = 'open'
        RETURNING id, date_time, pvz_id, status
        "#,
    )
    .bind(pvz_id)
    .fetch_optional(pool)
    .await?;
    row.ok_or(StoreError::NotFound)
}

pub async fn list_by_pickup_point(pool: &PgPool, pvz_id: Uuid) -> Result<Vec<Reception>, StoreError> {
    let rows: Vec<Reception> = sqlx::query_as(
        r#"
        SELECT id, date_time, pvz_id, status
        FROM receptions
        WHERE pvz_id = $1
        ORDER BY date_time DESC
        "#,
    )
    .bind(pvz_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
