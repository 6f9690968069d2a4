pub mod conversion_handler;
pub mod rate_limit_handler;

pub use conversion_handler::convert_image;
pub use rate_limit_handler::get_rate_limit_status;
