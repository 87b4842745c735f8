use crate::core::address::normalize_destination;
use crate::core::selector;
use crate::core::{ConfigProvider, RateProvider};
use crate::domain::model::{Parcel, SelectedRate, Shipment, ShippingRequest};
use crate::utils::error::{Result, ShippingError};

pub struct ShippingRateSelector<P: RateProvider, C: ConfigProvider> {
    provider: P,
    config: C,
}

impl<P: RateProvider, C: ConfigProvider> ShippingRateSelector<P, C> {
    pub fn new(provider: P, config: C) -> Self {
        Self { provider, config }
    }

    /// Quotes one shipping rate for the request.
    ///
    /// Makes at most one call to the rate provider and never retries; every
    /// failure is returned to the caller as-is.
    pub async fn select_shipping_rate(&self, request: &ShippingRequest) -> Result<SelectedRate> {
        let destination = request
            .destination
            .as_ref()
            .ok_or_else(|| ShippingError::validation("Shipping address and items are required"))?;
        if request.items.is_empty() {
            return Err(ShippingError::validation(
                "Shipping address and items are required",
            ));
        }

        if !self.provider.is_configured() {
            return Err(ShippingError::config(
                "Rate aggregator API key is not configured",
            ));
        }

        let quantity = selector::total_quantity(&request.items);
        let weight = selector::parcel_weight(
            quantity,
            self.config.min_weight(),
            self.config.weight_per_item(),
        );
        tracing::debug!(
            "Quoting parcel for {} item(s), weight {} {}",
            quantity,
            weight,
            self.config.mass_unit()
        );

        let shipment = Shipment {
            origin: self.config.origin().clone(),
            destination: normalize_destination(destination),
            parcel: Parcel {
                dimensions: self.config.parcel_dimensions(),
                weight,
                mass_unit: self.config.mass_unit().to_string(),
            },
        };

        let quote = self.provider.fetch_rates(&shipment).await?;
        tracing::debug!("Received {} rate(s) from aggregator", quote.rates.len());

        if quote.rates.is_empty() {
            let message = if quote.messages.is_empty() {
                "No shipping rates available for this address".to_string()
            } else {
                quote.messages.join("; ")
            };
            return Err(ShippingError::upstream(message));
        }

        let chosen = selector::select_rate(&quote.rates, self.config.preferred_carrier())?;
        let selected = selector::apply_markup(chosen, self.config.markup())?;

        tracing::info!(
            "Selected {} {} at {} (base {} + markup {})",
            selected.carrier,
            selected.service_level.as_deref().unwrap_or("service"),
            selected.shipping_cost,
            selected.base_cost,
            selected.markup
        );

        Ok(selected)
    }
}
