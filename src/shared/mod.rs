pub mod constants;
pub mod data_uri;
#[cfg(test)]
pub mod test_helpers;
pub mod types;
