pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod http;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::ShippoClient;
pub use config::ShippingConfig;
pub use crate::core::engine::ShippingRateSelector;
pub use domain::model::{CartItem, PostalAddress, SelectedRate, ShippingRequest};
pub use utils::error::{Result, ShippingError};
