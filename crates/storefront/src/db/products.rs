//! `PostgreSQL` product store.
//!
//! Queries are built at runtime against the hosted `product_c` table; rows are
//! decoded into [`ProductRecord`] and mapped to [`Product`].

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;

use stockroom_core::{Product, ProductDraft, ProductId};

use super::records::{PRODUCT_COLUMNS, ProductRecord, storable_count};
use crate::error::{StoreError, StoreResult};
use crate::store::{ProductStore, validate_product_draft, validate_quantity};

/// Product store backed by the `product_c` table.
#[derive(Debug, Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    /// Create a product store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_many(&self, sql: &str) -> StoreResult<Vec<Product>> {
        sqlx::query_as::<_, ProductRecord>(sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Product::try_from)
            .collect()
    }
}

fn not_found_or(record: Option<ProductRecord>, id: ProductId) -> StoreResult<Product> {
    record
        .ok_or_else(|| StoreError::product_not_found(id))
        .and_then(Product::try_from)
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn get_all(&self) -> StoreResult<Vec<Product>> {
        let sql = format!(r#"SELECT {PRODUCT_COLUMNS} FROM product_c ORDER BY "Id_c""#);
        self.fetch_many(&sql).await
    }

    async fn get_by_id(&self, id: ProductId) -> StoreResult<Product> {
        let sql = format!(r#"SELECT {PRODUCT_COLUMNS} FROM product_c WHERE "Id_c" = $1"#);
        let record = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;
        not_found_or(record, id)
    }

    async fn create(&self, draft: ProductDraft) -> StoreResult<Product> {
        validate_product_draft(&draft)?;
        let now = Utc::now();
        let sql = format!(
            r#"
            INSERT INTO product_c ("name_c", "description_c", "sku_c", "category_c", "price_c",
                                   "quantity_c", "lowStockThreshold_c", "imageUrl_c",
                                   "createdAt_c", "updatedAt_c")
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let record = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(&draft.sku)
            .bind(&draft.category)
            .bind(draft.price)
            .bind(storable_count(draft.quantity, "quantity")?)
            .bind(storable_count(draft.low_stock_threshold, "threshold")?)
            .bind(&draft.image_url)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
        debug!(product_id = record.id, sku = %record.sku, "Product created");
        Product::try_from(record)
    }

    async fn update(&self, id: ProductId, draft: ProductDraft) -> StoreResult<Product> {
        validate_product_draft(&draft)?;
        let sql = format!(
            r#"
            UPDATE product_c
            SET "name_c" = $2, "description_c" = $3, "sku_c" = $4, "category_c" = $5,
                "price_c" = $6, "quantity_c" = $7, "lowStockThreshold_c" = $8,
                "imageUrl_c" = $9, "updatedAt_c" = $10
            WHERE "Id_c" = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let record = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(id.as_i32())
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(&draft.sku)
            .bind(&draft.category)
            .bind(draft.price)
            .bind(storable_count(draft.quantity, "quantity")?)
            .bind(storable_count(draft.low_stock_threshold, "threshold")?)
            .bind(&draft.image_url)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        not_found_or(record, id)
    }

    async fn delete(&self, id: ProductId) -> StoreResult<()> {
        let result = sqlx::query(r#"DELETE FROM product_c WHERE "Id_c" = $1"#)
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::product_not_found(id));
        }
        Ok(())
    }

    async fn update_quantity(&self, id: ProductId, quantity: i64) -> StoreResult<Product> {
        let quantity = storable_count(validate_quantity(quantity)?, "quantity")?;
        let sql = format!(
            r#"
            UPDATE product_c SET "quantity_c" = $2, "updatedAt_c" = $3
            WHERE "Id_c" = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let record = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(id.as_i32())
            .bind(quantity)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        not_found_or(record, id)
    }

    async fn low_stock(&self) -> StoreResult<Vec<Product>> {
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM product_c
            WHERE "quantity_c" > 0 AND "quantity_c" <= "lowStockThreshold_c"
            ORDER BY "Id_c"
            "#
        );
        self.fetch_many(&sql).await
    }

    async fn categories(&self) -> StoreResult<Vec<String>> {
        let categories = sqlx::query_scalar::<_, String>(
            r#"SELECT DISTINCT "category_c" FROM product_c ORDER BY "category_c""#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }
}
