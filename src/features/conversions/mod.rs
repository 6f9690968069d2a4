pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use models::OutputFormat;
pub use routes::routes;
pub use services::{ConversionError, ConversionService};
