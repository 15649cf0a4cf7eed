use goldapi_core::domain::product::{Product, ProductKey, ProductPayload};
use sqlx::FromRow;

use super::{ProductRepository, RepositoryError};
use crate::DbPool;

const LIST_PRODUCTS: &str =
    "SELECT product_key, product_name, category FROM report_products ORDER BY product_key ASC";
const FIND_PRODUCT: &str =
    "SELECT product_key, product_name, category FROM report_products WHERE product_key = ?";

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    product_key: i64,
    product_name: String,
    category: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            product_key: ProductKey(row.product_key),
            product_name: row.product_name,
            category: row.category,
        }
    }
}

#[async_trait::async_trait]
impl ProductRepository for SqlProductRepository {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, ProductRow>(LIST_PRODUCTS).fetch_all(&mut *conn).await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_key(&self, key: ProductKey) -> Result<Option<Product>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query_as::<_, ProductRow>(FIND_PRODUCT)
            .bind(key.0)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(row.map(Product::from))
    }

    async fn create(&self, payload: ProductPayload) -> Result<ProductKey, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let result =
            sqlx::query("INSERT INTO report_products (product_name, category) VALUES (?, ?)")
                .bind(&payload.product_name)
                .bind(&payload.category)
                .execute(&mut *tx)
                .await?;
        tx.commit().await?;

        Ok(ProductKey(result.last_insert_rowid()))
    }

    async fn update(
        &self,
        key: ProductKey,
        payload: ProductPayload,
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE report_products SET product_name = ?, category = ? WHERE product_key = ?",
        )
        .bind(&payload.product_name)
        .bind(&payload.category)
        .bind(key.0)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, key: ProductKey) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM report_products WHERE product_key = ?")
            .bind(key.0)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use goldapi_core::domain::product::{ProductKey, ProductPayload};

    use super::SqlProductRepository;
    use crate::repositories::{ProductRepository, RepositoryError};
    use crate::{connect_with_settings, migrations};

    async fn repository() -> SqlProductRepository {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        SqlProductRepository::new(pool)
    }

    #[tokio::test]
    async fn create_then_find_returns_the_stored_fields() {
        let repo = repository().await;

        let key = repo.create(ProductPayload::new("Widget", "Hardware")).await.expect("create");
        let product = repo.find_by_key(key).await.expect("find").expect("product should exist");

        assert_eq!(product.product_key, key);
        assert_eq!(product.product_name, "Widget");
        assert_eq!(product.category, "Hardware");
    }

    #[tokio::test]
    async fn list_is_ordered_by_key() {
        let repo = repository().await;
        let first = repo.create(ProductPayload::new("Bolt", "Hardware")).await.expect("create");
        let second = repo.create(ProductPayload::new("Atlas", "Maps")).await.expect("create");

        let keys = repo
            .list()
            .await
            .expect("list")
            .into_iter()
            .map(|product| product.product_key)
            .collect::<Vec<_>>();

        assert_eq!(keys, vec![first, second]);
        assert!(first < second);
    }

    #[tokio::test]
    async fn absent_key_is_none_not_an_error() {
        let repo = repository().await;

        assert!(repo.find_by_key(ProductKey(9999)).await.expect("find").is_none());
        assert!(repo.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn update_changes_fields_but_keeps_key() {
        let repo = repository().await;
        let key = repo.create(ProductPayload::new("Widget", "Hardware")).await.expect("create");

        let updated =
            repo.update(key, ProductPayload::new("Widget Pro", "Tools")).await.expect("update");
        assert!(updated);

        let product = repo.find_by_key(key).await.expect("find").expect("still present");
        assert_eq!(product.product_key, key);
        assert_eq!(product.product_name, "Widget Pro");
        assert_eq!(product.category, "Tools");
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let repo = repository().await;

        let updated = repo
            .update(ProductKey(9999), ProductPayload::new("Ghost", "None"))
            .await
            .expect("update");
        let deleted = repo.delete(ProductKey(9999)).await.expect("delete");

        assert!(!updated);
        assert!(!deleted);
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let repo = repository().await;
        let key = repo.create(ProductPayload::new("Widget", "Hardware")).await.expect("create");

        assert!(repo.delete(key).await.expect("delete"));
        assert!(repo.find_by_key(key).await.expect("find").is_none());
        assert!(!repo.delete(key).await.expect("second delete"), "second delete finds nothing");
    }

    #[tokio::test]
    async fn values_are_bound_not_interpolated() {
        let repo = repository().await;
        let hostile = "x'); DROP TABLE report_products; --";

        let key = repo.create(ProductPayload::new(hostile, "Hardware")).await.expect("create");

        let product = repo.find_by_key(key).await.expect("find").expect("present");
        assert_eq!(product.product_name, hostile);
        assert_eq!(repo.list().await.expect("table still exists").len(), 1);
    }

    #[tokio::test]
    async fn closed_pool_surfaces_database_error() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        let repo = SqlProductRepository::new(pool.clone());
        pool.close().await;

        let error = repo.list().await.expect_err("closed pool must fail");

        assert!(matches!(error, RepositoryError::Database(_)));
    }
}
