pub mod config;
pub mod domain;
pub mod validation;

pub use domain::customer::Customer;
pub use domain::product::{Product, ProductKey, ProductPayload};
pub use validation::{FieldIssue, ValidationError};
