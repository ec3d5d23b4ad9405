//! Product queries
//!
//! Both mutations take `FOR UPDATE` on the owning reception first, which
//! serializes them against a concurrent close of that reception.

use shared::models::{Product, ReceptionStatus};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::store::StoreError;

async fn lock_open_reception(conn: &mut PgConnection, reception_id: Uuid) -> Result<(), StoreError> {
    let status: Option<(String,)> =
        sqlx::query_as("SELECT status FROM receptions WHERE id = $1 FOR UPDATE")
            .bind(reception_id)
            .fetch_optional(conn)
            .await?;

    match status {
        None => Err(StoreError::ReferenceNotFound),
        Some((status,)) if status != ReceptionStatus::Open.as_str() => Err(StoreError::ReferenceClosed),
        Some(_) => Ok(()),
    }
}

pub async fn append(pool: &PgPool, product: &Product) -> Result<Product, StoreError> {
    let mut tx = pool.begin().await?;
    lock_open_reception(&mut tx, product.reception_id).await?;

    let row: Product = sqlx::query_as(
        r#"
        INSERT INTO products (id, date_time, type, reception_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id, date_time, type, reception_id
        "#,
    )
    .bind(product.id)
    .bind(product.date_time)
    .bind(product.product_type.as_str())
    .bind(product.reception_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(row)
}

/// `seq` breaks ties between products sharing a timestamp.
pub async fn delete_most_recent(pool: &PgPool, reception_id: Uuid) -> Result<Product, StoreError> {
    let mut tx = pool.begin().await?;
    lock_open_reception(&mut tx, reception_id).await?;

    let row: Option<Product> = sqlx::query_as(
        r#"
        DELETE FROM products
        WHERE id = (
            SELECT id FROM products
            WHERE reception_id = $1
            ORDER BY date_time DESC, seq DESC
            LIMIT 1
        )
        RETURNING id, date_time, type, reception_id
        "#,
    )
    .bind(reception_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(product) = row else {
        tx.rollback().await?;
        return Err(StoreError::NothingToDelete);
    };

    tx.commit().await?;
    Ok(product)
}

pub async fn list_for_reception(pool: &PgPool, reception_id: Uuid) -> Result<Vec<Product>, StoreError> {
    let rows: Vec<Product> = sqlx::query_as(
        r#"
        SELECT id, date_time, type, reception_id
        FROM products
        WHERE reception_id = $1
        ORDER BY date_time, seq
        "#,
    )
    .bind(reception_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
