//! Pickup point queries

use std::collections::HashMap;

use shared::models::{PickupPoint, PickupPointWithReceptions, Product, Reception, ReceptionWithProducts};
use sqlx::PgPool;
use uuid::Uuid;

use crate::store::{Page, ReceptionWindow, StoreError};

pub async fn insert(pool: &PgPool, pvz: &PickupPoint) -> Result<PickupPoint, StoreError> {
    let row: PickupPoint = sqlx::query_as(
        r#"
        INSERT INTO pvz (id, registration_date, city)
        VALUES ($1, $2, $3)
        RETURNING id, registration_date, city
        "#,
    )
    .bind(pvz.id)
    .bind(pvz.registration_date)
    .bind(pvz.city.as_str())
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<PickupPoint>, StoreError> {
    let rows: Vec<PickupPoint> = sqlx::query_as(
        r#"
        SELECT id, registration_date, city
        FROM pvz
        ORDER BY registration_date DESC, id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_with_receptions(
    pool: &PgPool,
    window: ReceptionWindow,
    page: Page,
) -> Result<Vec<PickupPointWithReceptions>, StoreError> {
    // One snapshot for all three reads so nested rows match the page.
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;

    let pvzs: Vec<PickupPoint> = sqlx::query_as(
        r#"
        SELECT p.id, p.registration_date, p.city
        FROM pvz p
        WHERE ($1::timestamptz IS NULL AND $2::timestamptz IS NULL)
           OR EXISTS (
                SELECT 1 FROM receptions r
                WHERE r.pvz_id = p.id
                  AND ($1::timestamptz IS NULL OR r.date_time >= $1)
                  AND ($2::timestamptz IS NULL OR r.date_time <= $2)
           )
        ORDER BY p.registration_date DESC, p.id
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(window.start)
    .bind(window.end)
    .bind(i64::from(page.limit))
    .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
    .fetch_all(&mut *tx)
    .await?;

    if pvzs.is_empty() {
        tx.commit().await?;
        return Ok(Vec::new());
    }

    let pvz_ids: Vec<Uuid> = pvzs.iter().map(|p| p.id).collect();
    let receptions: Vec<Reception> = sqlx::query_as(
        r#"
        SELECT id, date_time, pvz_id, status
        FROM receptions
        WHERE pvz_id = ANY($1)
          AND ($2::timestamptz IS NULL OR date_time >= $2)
          AND ($3::timestamptz IS NULL OR date_time <= $3)
        ORDER BY date_time DESC
        "#,
    )
    .bind(&pvz_ids)
    .bind(window.start)
    .bind(window.end)
    .fetch_all(&mut *tx)
    .await?;

    let reception_ids: Vec<Uuid> = receptions.iter().map(|r| r.id).collect();
    let products: Vec<Product> = sqlx::query_as(
        r#"
        SELECT id, date_time, type, reception_id
        FROM products
        WHERE reception_id = ANY($1)
        ORDER BY date_time, seq
        "#,
    )
    .bind(&reception_ids)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(assemble(pvzs, receptions, products))
}

/// Nest rows that arrive already sorted; grouping keeps the incoming order.
fn assemble(
    pvzs: Vec<PickupPoint>,
    receptions: Vec<Reception>,
    products: Vec<Product>,
) -> Vec<PickupPointWithReceptions> {
    let mut products_by_reception: HashMap<Uuid, Vec<Product>> = HashMap::new();
    for product in products {
        products_by_reception
            .entry(product.reception_id)
            .or_default()
            .push(product);
    }

    let mut receptions_by_pvz: HashMap<Uuid, Vec<ReceptionWithProducts>> = HashMap::new();
    for reception in receptions {
        let products = products_by_reception
            .remove(&reception.id)
            .unwrap_or_default();
        receptions_by_pvz
            .entry(reception.pvz_id)
            .or_default()
            .push(ReceptionWithProducts { reception, products });
    }

    pvzs.into_iter()
        .map(|pvz| PickupPointWithReceptions {
            receptions: receptions_by_pvz.remove(&pvz.id).unwrap_or_default(),
            pvz,
        })
        .collect()
}
