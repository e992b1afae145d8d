use async_trait::async_trait;
use sqlx::SqlitePool;

use business::domain::cart::model::CartItem;
use business::domain::cart::store::LocalCartStore;
use business::domain::errors::RepositoryError;
use business::domain::shared::value_objects::{CartItemId, ProductId};

use super::entity::CartItemEntity;

const SELECT_COLUMNS: &str = "SELECT id, product_id, product_name, price, sale_price, image_url, stock, quantity, created_at, updated_at FROM cart_items";

fn database_error(e: sqlx::Error) -> RepositoryError {
    tracing::error!(target: "Cart -- ", "cart store query failed: {}", e);
    RepositoryError::DatabaseError
}

pub struct CartStoreSqlite {
    pool: SqlitePool,
}

impl CartStoreSqlite {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(
        &self,
        column: &str,
        value: &str,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let entity = sqlx::query_as::<_, CartItemEntity>(&format!(
            "{} WHERE {} = ?1",
            SELECT_COLUMNS, column
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        entity.map(CartItemEntity::into_domain).transpose()
    }
}

#[async_trait]
impl LocalCartStore for CartStoreSqlite {
    async fn get_all(&self) -> Result<Vec<CartItem>, RepositoryError> {
        let entities = sqlx::query_as::<_, CartItemEntity>(&format!(
            "{} ORDER BY created_at ASC, rowid ASC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        entities.into_iter().map(|e| e.into_domain()).collect()
    }

    async fn get_by_id(&self, id: &CartItemId) -> Result<Option<CartItem>, RepositoryError> {
        self.fetch_one_by("id", id.as_str()).await
    }

    async fn find_by_product_id(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<CartItem>, RepositoryError> {
        self.fetch_one_by("product_id", product_id.as_str()).await
    }

    async fn save(&self, item: &CartItem) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO cart_items (id, product_id, product_name, price, sale_price, image_url, stock, quantity, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT (id) DO UPDATE SET
                product_name = excluded.product_name,
                price = excluded.price,
                sale_price = excluded.sale_price,
                image_url = excluded.image_url,
                stock = excluded.stock,
                quantity = excluded.quantity,
                updated_at = excluded.updated_at"#,
        )
        .bind(item.id.as_str())
        .bind(item.product.id.as_str())
        .bind(&item.product.name)
        .bind(item.product.price)
        .bind(item.product.sale_price)
        .bind(item.product.image_url.as_deref())
        .bind(item.product.stock.map(i64::from))
        .bind(i64::from(item.quantity))
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    async fn delete(&self, id: &CartItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items")
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected())
    }

    async fn item_count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(quantity), 0) FROM cart_items")
            .fetch_one(&self.pool)
            .await
            .map_err(database_error)?;

        u64::try_from(count).map_err(|_| RepositoryError::Corrupted)
    }

    async fn total_price(&self) -> Result<f64, RepositoryError> {
        let total: f64 = sqlx::query_scalar(
            "SELECT CAST(COALESCE(SUM(COALESCE(sale_price, price) * quantity), 0) AS REAL) FROM cart_items",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(total)
    }

    async fn contains_product(&self, product_id: &ProductId) -> Result<bool, RepositoryError> {
        let found: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM cart_items WHERE product_id = ?1)")
                .bind(product_id.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(database_error)?;

        Ok(found != 0)
    }
}
