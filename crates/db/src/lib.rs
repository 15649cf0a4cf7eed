pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use connection::{connect_existing, connect_with_settings, ping, DbPool};
pub use fixtures::{GoldSeedDataset, SeedResult, VerificationResult};
pub use repositories::{
    CustomerRepository, InMemoryCustomerRepository, InMemoryProductRepository,
    ProductRepository, RepositoryError, SqlCustomerRepository, SqlProductRepository,
};
