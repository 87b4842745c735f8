#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::{ParcelDimensions, PostalAddress};
use crate::utils::error::{Result, ShippingError};
use crate::utils::validation::{self, Validate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};

pub const DEFAULT_SHIPPO_URL: &str = "https://api.goshippo.com";
pub const DEFAULT_COUNTRY: &str = "US";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingConfig {
    pub aggregator: AggregatorConfig,
    pub origin: PostalAddress,
    pub parcel: ParcelConfig,
    pub pricing: PricingConfig,
    pub server: ServerConfig,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            aggregator: AggregatorConfig::default(),
            origin: PostalAddress {
                country: DEFAULT_COUNTRY.to_string(),
                ..Default::default()
            },
            parcel: ParcelConfig::default(),
            pricing: PricingConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_SHIPPO_URL.to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParcelConfig {
    pub length: Decimal,
    pub width: Decimal,
    pub height: Decimal,
    pub distance_unit: String,
    pub mass_unit: String,
}

impl Default for ParcelConfig {
    fn default() -> Self {
        Self {
            length: Decimal::new(8, 0),
            width: Decimal::new(6, 0),
            height: Decimal::new(4, 0),
            distance_unit: "in".to_string(),
            mass_unit: "oz".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub markup: Decimal,
    pub preferred_carrier: String,
    pub min_weight: u32,
    pub weight_per_item: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            markup: Decimal::new(250, 2),
            preferred_carrier: "usps".to_string(),
            min_weight: 8,
            weight_per_item: 16,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T::Err: Display,
{
    match raw {
        None => Ok(default),
        Some(value) => match value.parse() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(ShippingError::InvalidConfigValueError {
                field: key.to_string(),
                value,
                reason: e.to_string(),
            }),
        },
    }
}

impl ShippingConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source, falling back to
    /// the defaults for keys that are unset or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Ok(Self {
            aggregator: AggregatorConfig {
                api_key: var("SHIPPO_API_KEY"),
                base_url: var("SHIPPO_API_URL").unwrap_or(defaults.aggregator.base_url),
                timeout_seconds: parse_var(
                    "SHIPPO_TIMEOUT_SECONDS",
                    var("SHIPPO_TIMEOUT_SECONDS"),
                    defaults.aggregator.timeout_seconds,
                )?,
            },
            origin: PostalAddress {
                name: var("SHIP_FROM_NAME").unwrap_or_default(),
                company: var("SHIP_FROM_COMPANY"),
                street1: var("SHIP_FROM_STREET1").unwrap_or_default(),
                street2: var("SHIP_FROM_STREET2"),
                city: var("SHIP_FROM_CITY").unwrap_or_default(),
                state: var("SHIP_FROM_STATE").unwrap_or_default(),
                zip: var("SHIP_FROM_ZIP").unwrap_or_default(),
                country: var("SHIP_FROM_COUNTRY").unwrap_or(defaults.origin.country),
                phone: var("SHIP_FROM_PHONE"),
                email: var("SHIP_FROM_EMAIL"),
            },
            parcel: ParcelConfig {
                length: parse_var("PARCEL_LENGTH", var("PARCEL_LENGTH"), defaults.parcel.length)?,
                width: parse_var("PARCEL_WIDTH", var("PARCEL_WIDTH"), defaults.parcel.width)?,
                height: parse_var("PARCEL_HEIGHT", var("PARCEL_HEIGHT"), defaults.parcel.height)?,
                ..defaults.parcel
            },
            pricing: PricingConfig {
                markup: parse_var("SHIPPING_MARKUP", var("SHIPPING_MARKUP"), defaults.pricing.markup)?,
                preferred_carrier: var("PREFERRED_CARRIER")
                    .unwrap_or(defaults.pricing.preferred_carrier),
                min_weight: parse_var(
                    "MIN_PARCEL_WEIGHT",
                    var("MIN_PARCEL_WEIGHT"),
                    defaults.pricing.min_weight,
                )?,
                weight_per_item: parse_var(
                    "WEIGHT_PER_ITEM",
                    var("WEIGHT_PER_ITEM"),
                    defaults.pricing.weight_per_item,
                )?,
            },
            server: ServerConfig {
                host: var("HOST").unwrap_or(defaults.server.host),
                port: parse_var("PORT", var("PORT"), defaults.server.port)?,
            },
        })
    }
}

impl ConfigProvider for ShippingConfig {
    fn origin(&self) -> &PostalAddress {
        &self.origin
    }

    fn parcel_dimensions(&self) -> ParcelDimensions {
        ParcelDimensions {
            length: self.parcel.length,
            width: self.parcel.width,
            height: self.parcel.height,
            distance_unit: self.parcel.distance_unit.clone(),
        }
    }

    fn mass_unit(&self) -> &str {
        &self.parcel.mass_unit
    }

    fn markup(&self) -> Decimal {
        self.pricing.markup
    }

    fn preferred_carrier(&self) -> &str {
        &self.pricing.preferred_carrier
    }

    fn min_weight(&self) -> u32 {
        self.pricing.min_weight
    }

    fn weight_per_item(&self) -> u32 {
        self.pricing.weight_per_item
    }
}

impl Validate for ShippingConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("aggregator.base_url", &self.aggregator.base_url)?;
        validation::validate_range(
            "aggregator.timeout_seconds",
            self.aggregator.timeout_seconds,
            1,
            300,
        )?;

        validation::validate_country_code("origin.country", &self.origin.country)?;

        validation::validate_positive_decimal("parcel.length", self.parcel.length)?;
        validation::validate_positive_decimal("parcel.width", self.parcel.width)?;
        validation::validate_positive_decimal("parcel.height", self.parcel.height)?;
        validation::validate_non_empty_string("parcel.distance_unit", &self.parcel.distance_unit)?;
        validation::validate_non_empty_string("parcel.mass_unit", &self.parcel.mass_unit)?;

        validation::validate_non_negative_decimal("pricing.markup", self.pricing.markup)?;
        validation::validate_non_empty_string(
            "pricing.preferred_carrier",
            &self.pricing.preferred_carrier,
        )?;
        validation::validate_positive_number("pricing.min_weight", self.pricing.min_weight, 1)?;
        validation::validate_positive_number(
            "pricing.weight_per_item",
            self.pricing.weight_per_item,
            1,
        )?;

        // A missing key is reported per request so the server can still come up.
        if self.aggregator.api_key.is_none() {
            tracing::warn!("SHIPPO_API_KEY is not set; shipping quotes will fail");
        }
        if self.origin.street1.is_empty() || self.origin.city.is_empty() || self.origin.zip.is_empty()
        {
            tracing::warn!("Origin address is incomplete; the aggregator may reject shipments");
        }

        Ok(())
    }
}
