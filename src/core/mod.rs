pub mod address;
pub mod engine;
pub mod selector;

pub use crate::domain::model::{PostalAddress, Rate, RateQuote, SelectedRate, Shipment, ShippingRequest};
pub use crate::domain::ports::{ConfigProvider, RateProvider};
pub use crate::utils::error::Result;
