pub mod customer;
pub mod product;
