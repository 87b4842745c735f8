use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A postal address as sent to the rate aggregator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostalAddress {
    pub name: String,
    pub company: Option<String>,
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItem {
    pub quantity: u32,
}

impl CartItem {
    pub fn new(quantity: u32) -> Self {
        Self { quantity }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShippingRequest {
    pub destination: Option<PostalAddress>,
    pub items: Vec<CartItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParcelDimensions {
    pub length: Decimal,
    pub width: Decimal,
    pub height: Decimal,
    pub distance_unit: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parcel {
    pub dimensions: ParcelDimensions,
    pub weight: u32,
    pub mass_unit: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shipment {
    pub origin: PostalAddress,
    pub destination: PostalAddress,
    pub parcel: Parcel,
}

/// One carrier quote as returned by the aggregator. `amount` stays a raw
/// string until selection decides whether it is usable.
#[derive(Debug, Clone, PartialEq)]
pub struct Rate {
    pub provider: String,
    pub amount: String,
    pub currency: Option<String>,
    pub service_level: Option<String>,
    pub estimated_days: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateQuote {
    pub rates: Vec<Rate>,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedRate {
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub markup: Decimal,
    pub carrier: String,
    pub service_level: Option<String>,
    pub estimated_days: Option<u32>,
}
