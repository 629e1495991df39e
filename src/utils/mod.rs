mod constants;
mod layout_config;
pub mod errors;

pub use constants::*;
pub use layout_config::*;
pub use errors::LayoutError;

#[cfg(test)]
mod layout_config_tests;
