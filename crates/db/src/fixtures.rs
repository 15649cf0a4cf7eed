use tracing::info;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// Demo rows for the two reporting tables. Loading is idempotent: products are
/// matched by name and customers by their unique number.
const SEED_PRODUCTS: &[SeedProduct] = &[
    SeedProduct { product_name: "Mountain-200 Black, 38", category: "Bikes" },
    SeedProduct { product_name: "Road-150 Red, 62", category: "Bikes" },
    SeedProduct { product_name: "Sport-100 Helmet, Blue", category: "Accessories" },
    SeedProduct { product_name: "Long-Sleeve Logo Jersey, L", category: "Clothing" },
    SeedProduct { product_name: "HL Road Frame - Black, 58", category: "Components" },
];

const SEED_CUSTOMERS: &[SeedCustomer] = &[
    SeedCustomer {
        customer_number: "AW00011000",
        customer_name: "Jon Yang",
        age_group: "50 and above",
        customer_segment: "VIP",
    },
    SeedCustomer {
        customer_number: "AW00011001",
        customer_name: "Eugene Huang",
        age_group: "50 and above",
        customer_segment: "Regular",
    },
    SeedCustomer {
        customer_number: "AW00011002",
        customer_name: "Ruben Torres",
        age_group: "40-49",
        customer_segment: "VIP",
    },
    SeedCustomer {
        customer_number: "AW00011003",
        customer_name: "Christy Zhu",
        age_group: "30-39",
        customer_segment: "New",
    },
    SeedCustomer {
        customer_number: "AW00011004",
        customer_name: "Elizabeth Johnson",
        age_group: "Below 20",
        customer_segment: "Regular",
    },
];

struct SeedProduct {
    product_name: &'static str,
    category: &'static str,
}

struct SeedCustomer {
    customer_number: &'static str,
    customer_name: &'static str,
    age_group: &'static str,
    customer_segment: &'static str,
}

pub struct GoldSeedDataset;

impl GoldSeedDataset {
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        let mut products_inserted = 0;
        let mut customers_inserted = 0;

        for product in SEED_PRODUCTS {
            let result = sqlx::query(
                "INSERT INTO report_products (product_name, category)
                 SELECT ?1, ?2
                 WHERE NOT EXISTS (SELECT 1 FROM report_products WHERE product_name = ?1)",
            )
            .bind(product.product_name)
            .bind(product.category)
            .execute(&mut *tx)
            .await?;
            products_inserted += result.rows_affected();
        }

        for customer in SEED_CUSTOMERS {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO report_customers
                    (customer_number, customer_name, age_group, customer_segment)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(customer.customer_number)
            .bind(customer.customer_name)
            .bind(customer.age_group)
            .bind(customer.customer_segment)
            .execute(&mut *tx)
            .await?;
            customers_inserted += result.rows_affected();
        }

        tx.commit().await?;

        info!(
            event_name = "db.seed.loaded",
            products_inserted,
            customers_inserted,
            "gold seed dataset loaded"
        );

        Ok(SeedResult {
            products_inserted,
            customers_inserted,
            segments: Self::segments(),
        })
    }

    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        for product in SEED_PRODUCTS {
            let exists: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM report_products
                 WHERE product_name = ?1 AND category = ?2)",
            )
            .bind(product.product_name)
            .bind(product.category)
            .fetch_one(pool)
            .await?;
            checks.push((product.product_name, exists == 1));
        }

        for customer in SEED_CUSTOMERS {
            let exists: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM report_customers
                 WHERE customer_number = ?1 AND customer_segment = ?2)",
            )
            .bind(customer.customer_number)
            .bind(customer.customer_segment)
            .fetch_one(pool)
            .await?;
            checks.push((customer.customer_number, exists == 1));
        }

        let all_present = checks.iter().all(|(_, present)| *present);
        Ok(VerificationResult { all_present, checks })
    }

    /// Distinct customer segments present in the dataset, sorted.
    pub fn segments() -> Vec<&'static str> {
        let mut segments =
            SEED_CUSTOMERS.iter().map(|customer| customer.customer_segment).collect::<Vec<_>>();
        segments.sort_unstable();
        segments.dedup();
        segments
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedResult {
    pub products_inserted: u64,
    pub customers_inserted: u64,
    pub segments: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}
