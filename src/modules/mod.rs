//! Modules layer - Infrastructure components for external capabilities
//!
//! Contains adapters over third-party libraries the features depend on.

pub mod imaging;
