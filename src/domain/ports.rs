use crate::domain::model::{ParcelDimensions, PostalAddress, RateQuote, Shipment};
use crate::utils::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Source of carrier quotes for a single shipment.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// False when the credential needed to reach the aggregator is absent.
    fn is_configured(&self) -> bool;

    async fn fetch_rates(&self, shipment: &Shipment) -> Result<RateQuote>;
}

pub trait ConfigProvider: Send + Sync {
    fn origin(&self) -> &PostalAddress;
    fn parcel_dimensions(&self) -> ParcelDimensions;
    fn mass_unit(&self) -> &str;
    fn markup(&self) -> Decimal;
    fn preferred_carrier(&self) -> &str;
    fn min_weight(&self) -> u32;
    fn weight_per_item(&self) -> u32;
}
