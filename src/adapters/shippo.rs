//! Shippo rate-aggregator client.
//!
//! Creates a shipment synchronously (`async: false`) and reads the quoted
//! rates straight from the response. Label purchase is not supported.

use crate::config::AggregatorConfig;
use crate::core::{RateProvider, RateQuote, Shipment};
use crate::domain::model::{PostalAddress, Rate};
use crate::utils::error::{Result, ShippingError};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct AddressPayload<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    company: Option<&'a str>,
    street1: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    street2: Option<&'a str>,
    city: &'a str,
    state: &'a str,
    zip: &'a str,
    country: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

impl<'a> From<&'a PostalAddress> for AddressPayload<'a> {
    fn from(address: &'a PostalAddress) -> Self {
        Self {
            name: &address.name,
            company: address.company.as_deref(),
            street1: &address.street1,
            street2: address.street2.as_deref(),
            city: &address.city,
            state: &address.state,
            zip: &address.zip,
            country: &address.country,
            phone: address.phone.as_deref(),
            email: address.email.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ParcelPayload {
    length: String,
    width: String,
    height: String,
    distance_unit: String,
    weight: String,
    mass_unit: String,
}

#[derive(Debug, Serialize)]
struct ShipmentPayload<'a> {
    address_from: AddressPayload<'a>,
    address_to: AddressPayload<'a>,
    parcels: Vec<ParcelPayload>,
    #[serde(rename = "async")]
    is_async: bool,
}

impl<'a> From<&'a Shipment> for ShipmentPayload<'a> {
    fn from(shipment: &'a Shipment) -> Self {
        let parcel = &shipment.parcel;
        Self {
            address_from: AddressPayload::from(&shipment.origin),
            address_to: AddressPayload::from(&shipment.destination),
            parcels: vec![ParcelPayload {
                length: parcel.dimensions.length.normalize().to_string(),
                width: parcel.dimensions.width.normalize().to_string(),
                height: parcel.dimensions.height.normalize().to_string(),
                distance_unit: parcel.dimensions.distance_unit.clone(),
                weight: parcel.weight.to_string(),
                mass_unit: parcel.mass_unit.clone(),
            }],
            is_async: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ShipmentResponse {
    status: Option<String>,
    #[serde(default)]
    rates: Vec<serde_json::Value>,
    #[serde(default)]
    messages: Vec<MessageResponse>,
}

/// One quoted rate. Amounts arrive as strings, but null or numeric values must
/// not sink the sibling rates, so every field is read loosely here and the
/// selector decides what is usable.
#[derive(Debug, Deserialize)]
struct RateResponse {
    provider: Option<String>,
    amount: Option<serde_json::Value>,
    currency: Option<String>,
    servicelevel: Option<ServiceLevelResponse>,
    estimated_days: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ServiceLevelResponse {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    text: Option<String>,
}

fn amount_text(amount: Option<serde_json::Value>) -> String {
    match amount {
        Some(serde_json::Value::String(text)) => text,
        Some(serde_json::Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

impl From<RateResponse> for Rate {
    fn from(rate: RateResponse) -> Self {
        Self {
            provider: rate.provider.unwrap_or_default(),
            amount: amount_text(rate.amount),
            currency: rate.currency,
            service_level: rate.servicelevel.and_then(|level| level.name),
            estimated_days: rate
                .estimated_days
                .and_then(|days| days.as_u64())
                .and_then(|days| u32::try_from(days).ok()),
        }
    }
}

fn decode_rates(raw: Vec<serde_json::Value>) -> Vec<Rate> {
    raw.into_iter()
        .filter_map(|value| match serde_json::from_value::<RateResponse>(value) {
            Ok(rate) => Some(Rate::from(rate)),
            Err(e) => {
                tracing::debug!("Skipping unreadable rate entry: {}", e);
                None
            }
        })
        .collect()
}

fn message_texts(messages: Vec<MessageResponse>) -> Vec<String> {
    messages
        .into_iter()
        .filter_map(|message| message.text)
        .filter(|text| !text.trim().is_empty())
        .collect()
}

/// Pulls a readable message out of a non-2xx body: Shippo answers with
/// `{"detail": ...}` for auth problems and `{"messages": [...]}` otherwise.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
        return Some(detail.to_string());
    }

    let texts: Vec<String> = value
        .get("messages")?
        .as_array()?
        .iter()
        .filter_map(|m| m.get("text").and_then(|t| t.as_str()))
        .map(str::to_string)
        .collect();

    if texts.is_empty() {
        None
    } else {
        Some(texts.join("; "))
    }
}

#[derive(Debug, Clone)]
pub struct ShippoClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ShippoClient {
    pub fn new(api_key: Option<String>, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn from_config(config: &AggregatorConfig) -> Result<Self> {
        Self::new(
            config.api_key.clone(),
            &config.base_url,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    fn shipments_url(&self) -> String {
        format!("{}/shipments/", self.base_url)
    }
}

#[async_trait]
impl RateProvider for ShippoClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_rates(&self, shipment: &Shipment) -> Result<RateQuote> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ShippingError::MissingConfigError {
                field: "SHIPPO_API_KEY".to_string(),
            })?;

        let url = self.shipments_url();
        tracing::debug!("Making rate request to: {}", url);

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("ShippoToken {}", api_key))
            .json(&ShipmentPayload::from(shipment))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Rate response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_detail(&body)
                .unwrap_or_else(|| format!("Rate aggregator returned {}", status));
            tracing::warn!("Rate request rejected ({}): {}", status, message);
            return Err(ShippingError::upstream(message));
        }

        let payload: ShipmentResponse = response.json().await?;
        let messages = message_texts(payload.messages);

        if payload.status.as_deref() == Some("ERROR") {
            let message = if messages.is_empty() {
                "Rate aggregator could not quote this shipment".to_string()
            } else {
                messages.join("; ")
            };
            return Err(ShippingError::upstream(message));
        }

        Ok(RateQuote {
            rates: decode_rates(payload.rates),
            messages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Parcel, ParcelDimensions};
    use httpmock::prelude::*;
    use rust_decimal::Decimal;

    fn shipment() -> Shipment {
        Shipment {
            origin: PostalAddress {
                name: "Studio".to_string(),
                street1: "10 Workshop Ln".to_string(),
                city: "Portland".to_string(),
                state: "OR".to_string(),
                zip: "97201".to_string(),
                country: "US".to_string(),
                ..Default::default()
            },
            destination: PostalAddress {
                name: "Jane Doe".to_string(),
                street1: "1 Main St".to_string(),
                city: "Austin".to_string(),
                state: "TX".to_string(),
                zip: "78701".to_string(),
                country: "US".to_string(),
                ..Default::default()
            },
            parcel: Parcel {
                dimensions: ParcelDimensions {
                    length: Decimal::new(8, 0),
                    width: Decimal::new(6, 0),
                    height: Decimal::new(4, 0),
                    distance_unit: "in".to_string(),
                },
                weight: 32,
                mass_unit: "oz".to_string(),
            },
        }
    }

    fn client(server: &MockServer) -> ShippoClient {
        ShippoClient::new(
            Some("shippo_test_key".to_string()),
            &server.base_url(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_payload_shape() {
        let shipment = shipment();
        let payload = serde_json::to_value(ShipmentPayload::from(&shipment)).unwrap();

        assert_eq!(payload["async"], false);
        assert_eq!(payload["address_to"]["zip"], "78701");
        assert!(payload["address_to"].get("street2").is_none());
        assert_eq!(payload["parcels"][0]["weight"], "32");
        assert_eq!(payload["parcels"][0]["length"], "8");
        assert_eq!(payload["parcels"][0]["mass_unit"], "oz");
    }

    #[test]
    fn test_blank_api_key_is_not_configured() {
        let client =
            ShippoClient::new(Some("  ".to_string()), "https://api.goshippo.com", Duration::from_secs(5))
                .unwrap();
        assert!(!client.is_configured());
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(
            error_detail(r#"{"detail": "Invalid token."}"#).as_deref(),
            Some("Invalid token.")
        );
        assert_eq!(
            error_detail(r#"{"messages": [{"text": "Bad zip"}, {"text": "Bad city"}]}"#).as_deref(),
            Some("Bad zip; Bad city")
        );
        assert_eq!(error_detail("<html>oops</html>"), None);
    }

    #[tokio::test]
    async fn test_fetch_rates_success() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/shipments/")
                .header("Authorization", "ShippoToken shippo_test_key")
                .body_contains("\"weight\":\"32\"");
            then.status(201)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "status": "SUCCESS",
                    "rates": [
                        {
                            "provider": "USPS",
                            "amount": "7.85",
                            "currency": "USD",
                            "servicelevel": {"name": "Ground Advantage", "token": "usps_ground_advantage"},
                            "estimated_days": 3
                        },
                        {
                            "provider": "UPS",
                            "amount": "12.10",
                            "currency": "USD",
                            "servicelevel": {"name": "Ground"},
                            "estimated_days": null
                        }
                    ],
                    "messages": []
                }));
        });

        let quote = client(&server).fetch_rates(&shipment()).await.unwrap();

        api_mock.assert();
        assert_eq!(quote.rates.len(), 2);
        assert_eq!(quote.rates[0].provider, "USPS");
        assert_eq!(quote.rates[0].service_level.as_deref(), Some("Ground Advantage"));
        assert_eq!(quote.rates[0].estimated_days, Some(3));
        assert_eq!(quote.rates[1].estimated_days, None);
    }

    #[tokio::test]
    async fn test_fetch_rates_keeps_siblings_of_malformed_rates() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/shipments/");
            then.status(201).json_body(serde_json::json!({
                "status": "SUCCESS",
                "rates": [
                    {"provider": "USPS", "amount": "7.85", "servicelevel": {"name": "Ground Advantage"}},
                    {"provider": "UPS", "amount": null, "servicelevel": {"name": "Ground"}},
                    {"provider": null, "amount": 9.4, "estimated_days": -1},
                    "not a rate"
                ]
            }));
        });

        let quote = client(&server).fetch_rates(&shipment()).await.unwrap();

        api_mock.assert();
        assert_eq!(quote.rates.len(), 3);
        assert_eq!(quote.rates[0].amount, "7.85");
        assert_eq!(quote.rates[1].provider, "UPS");
        assert_eq!(quote.rates[1].amount, "");
        assert_eq!(quote.rates[2].provider, "");
        assert_eq!(quote.rates[2].amount, "9.4");
        assert_eq!(quote.rates[2].estimated_days, None);

        let chosen = crate::core::selector::select_rate(&quote.rates, "ups").unwrap();
        assert_eq!(chosen.rate.provider, "USPS");
    }

    #[tokio::test]
    async fn test_fetch_rates_error_status() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/shipments/");
            then.status(201).json_body(serde_json::json!({
                "status": "ERROR",
                "rates": [],
                "messages": [{"source": "USPS", "text": "Address not found"}]
            }));
        });

        let err = client(&server).fetch_rates(&shipment()).await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, ShippingError::UpstreamError { .. }));
        assert_eq!(err.to_string(), "Address not found");
    }

    #[tokio::test]
    async fn test_fetch_rates_http_failure_uses_detail() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/shipments/");
            then.status(401)
                .json_body(serde_json::json!({"detail": "Invalid token."}));
        });

        let err = client(&server).fetch_rates(&shipment()).await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, ShippingError::UpstreamError { .. }));
        assert_eq!(err.to_string(), "Invalid token.");
    }

    #[tokio::test]
    async fn test_fetch_rates_without_key_makes_no_request() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/shipments/");
            then.status(201);
        });

        let client = ShippoClient::new(None, &server.base_url(), Duration::from_secs(5)).unwrap();
        let err = client.fetch_rates(&shipment()).await.unwrap_err();

        api_mock.assert_hits(0);
        assert!(matches!(err, ShippingError::MissingConfigError { .. }));
    }
}
