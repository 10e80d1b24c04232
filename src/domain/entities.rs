pub mod annotation;
pub mod bounding_box;
pub mod collection;
pub mod filters;
pub mod identity;
pub mod image;
pub mod label;
pub mod profile;
