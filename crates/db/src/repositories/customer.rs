use goldapi_core::domain::customer::Customer;
use sqlx::FromRow;

use super::{CustomerRepository, RepositoryError};
use crate::DbPool;

pub struct SqlCustomerRepository {
    pool: DbPool,
}

impl SqlCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CustomerRow {
    customer_number: String,
    customer_name: String,
    age_group: String,
    customer_segment: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            customer_number: row.customer_number,
            customer_name: row.customer_name,
            age_group: row.age_group,
            customer_segment: row.customer_segment,
        }
    }
}

#[async_trait::async_trait]
impl CustomerRepository for SqlCustomerRepository {
    // Exact match under the column's default BINARY collation, so `vip` != `VIP`.
    async fn list_by_segment(&self, segment: &str) -> Result<Vec<Customer>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, CustomerRow>(
            "SELECT customer_number, customer_name, age_group, customer_segment
             FROM report_customers
             WHERE customer_segment = ?
             ORDER BY customer_number ASC",
        )
        .bind(segment)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }
}
