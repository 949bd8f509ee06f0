//! `PostgreSQL` order store.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::debug;

use stockroom_core::{Order, OrderDraft, OrderId, OrderStatus};

use super::records::{ORDER_COLUMNS, OrderRecord};
use crate::error::{StoreError, StoreResult};
use crate::store::{OrderStore, validate_order_draft};

/// Order store backed by the `order_c` table.
#[derive(Debug, Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    /// Create an order store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_orders(records: Vec<OrderRecord>) -> StoreResult<Vec<Order>> {
    records.into_iter().map(Order::try_from).collect()
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn get_all(&self) -> StoreResult<Vec<Order>> {
        let sql = format!(r#"SELECT {ORDER_COLUMNS} FROM order_c ORDER BY "Id_c""#);
        let records = sqlx::query_as::<_, OrderRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;
        to_orders(records)
    }

    async fn get_by_id(&self, id: OrderId) -> StoreResult<Order> {
        let sql = format!(r#"SELECT {ORDER_COLUMNS} FROM order_c WHERE "Id_c" = $1"#);
        sqlx::query_as::<_, OrderRecord>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::order_not_found(id))
            .and_then(Order::try_from)
    }

    async fn create(&self, draft: OrderDraft) -> StoreResult<Order> {
        validate_order_draft(&draft)?;
        let sql = format!(
            r#"
            INSERT INTO order_c ("items_c", "totalAmount_c", "status_c", "createdAt_c", "completedAt_c")
            VALUES ($1, $2, $3, $4, NULL)
            RETURNING {ORDER_COLUMNS}
            "#
        );
        let record = sqlx::query_as::<_, OrderRecord>(&sql)
            .bind(Json(&draft.items))
            .bind(draft.total_amount)
            .bind(OrderStatus::Pending.as_str())
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
        debug!(order_id = record.id, lines = draft.items.len(), "Order row inserted");
        Order::try_from(record)
    }

    async fn update_status(&self, id: OrderId, status: OrderStatus) -> StoreResult<Order> {
        let completed_at = (status == OrderStatus::Completed).then(Utc::now);
        let sql = format!(
            r#"
            UPDATE order_c
            SET "status_c" = $2, "completedAt_c" = COALESCE($3, "completedAt_c")
            WHERE "Id_c" = $1
            RETURNING {ORDER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, OrderRecord>(&sql)
            .bind(id.as_i32())
            .bind(status.as_str())
            .bind(completed_at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::order_not_found(id))
            .and_then(Order::try_from)
    }

    async fn delete(&self, id: OrderId) -> StoreResult<()> {
        let result = sqlx::query(r#"DELETE FROM order_c WHERE "Id_c" = $1"#)
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::order_not_found(id));
        }
        Ok(())
    }

    async fn by_status(&self, status: OrderStatus) -> StoreResult<Vec<Order>> {
        let sql = format!(
            r#"SELECT {ORDER_COLUMNS} FROM order_c WHERE "status_c" = $1 ORDER BY "Id_c""#
        );
        let records = sqlx::query_as::<_, OrderRecord>(&sql)
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await?;
        to_orders(records)
    }

    async fn recent(&self, limit: usize) -> StoreResult<Vec<Order>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let sql = format!(
            r#"
            SELECT {ORDER_COLUMNS} FROM order_c
            ORDER BY "createdAt_c" DESC, "Id_c" DESC
            LIMIT $1
            "#
        );
        let records = sqlx::query_as::<_, OrderRecord>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        to_orders(records)
    }
}
