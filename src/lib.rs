pub mod cheese_listing;
pub mod config;
pub mod errors;
pub mod filter;
pub mod models;
pub mod pagination;
pub mod projection;
pub mod resource;
pub mod routes;
pub mod validation;

pub use errors::ApiError;
pub use resource::CrudResource;
