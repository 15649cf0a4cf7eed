use std::collections::BTreeMap;

use tokio::sync::RwLock;

use goldapi_core::domain::customer::Customer;
use goldapi_core::domain::product::{Product, ProductKey, ProductPayload};

use super::{CustomerRepository, ProductRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryProductRepository {
    table: RwLock<ProductTable>,
}

#[derive(Default)]
struct ProductTable {
    last_key: i64,
    rows: BTreeMap<ProductKey, Product>,
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn find_by_key(&self, key: ProductKey) -> Result<Option<Product>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&key).cloned())
    }

    async fn create(&self, payload: ProductPayload) -> Result<ProductKey, RepositoryError> {
        let mut table = self.table.write().await;
        table.last_key += 1;
        let key = ProductKey(table.last_key);
        table.rows.insert(key, payload.into_product(key));
        Ok(key)
    }

    async fn update(
        &self,
        key: ProductKey,
        payload: ProductPayload,
    ) -> Result<bool, RepositoryError> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&key) {
            Some(product) => {
                *product = payload.into_product(key);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, key: ProductKey) -> Result<bool, RepositoryError> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&key).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<Vec<Customer>>,
}

impl InMemoryCustomerRepository {
    pub fn with_customers(customers: Vec<Customer>) -> Self {
        Self { customers: RwLock::new(customers) }
    }
}

#[async_trait::async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn list_by_segment(&self, segment: &str) -> Result<Vec<Customer>, RepositoryError> {
        let customers = self.customers.read().await;
        let mut matching = customers
            .iter()
            .filter(|customer| customer.customer_segment == segment)
            .cloned()
            .collect::<Vec<_>>();
        matching.sort_by(|left, right| left.customer_number.cmp(&right.customer_number));
        Ok(matching)
    }
}
