use async_trait::async_trait;
use thiserror::Error;

use goldapi_core::domain::customer::Customer;
use goldapi_core::domain::product::{Product, ProductKey, ProductPayload};

pub mod customer;
pub mod memory;
pub mod product;

pub use customer::SqlCustomerRepository;
pub use memory::{InMemoryCustomerRepository, InMemoryProductRepository};
pub use product::SqlProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Statements against the product reporting table. Every method is one
/// statement; `update` and `delete` report whether a row was affected.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;
    async fn find_by_key(&self, key: ProductKey) -> Result<Option<Product>, RepositoryError>;
    async fn create(&self, payload: ProductPayload) -> Result<ProductKey, RepositoryError>;
    async fn update(
        &self,
        key: ProductKey,
        payload: ProductPayload,
    ) -> Result<bool, RepositoryError>;
    async fn delete(&self, key: ProductKey) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn list_by_segment(&self, segment: &str) -> Result<Vec<Customer>, RepositoryError>;
}
