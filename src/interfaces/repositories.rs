pub mod annotation;
pub mod authorizer;
pub mod collection;
pub mod image;
pub mod label;
pub mod memory;
pub mod profile;
pub mod sqlx_repo;
pub mod store;
