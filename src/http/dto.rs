use crate::domain::model::{CartItem, PostalAddress, SelectedRate, ShippingRequest};
use serde::{Deserialize, Serialize};

/// Checkout payload posted by the storefront.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingRequestBody {
    pub shipping_address: Option<AddressBody>,
    pub items: Option<Vec<ItemBody>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressBody {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemBody {
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl From<AddressBody> for PostalAddress {
    fn from(body: AddressBody) -> Self {
        Self {
            name: format!("{} {}", body.first_name.trim(), body.last_name.trim())
                .trim()
                .to_string(),
            company: None,
            street1: body.address,
            street2: body.address2,
            city: body.city,
            state: body.state,
            zip: body.zip,
            country: body.country.unwrap_or_default(),
            phone: body.phone,
            email: body.email,
        }
    }
}

impl From<ShippingRequestBody> for ShippingRequest {
    fn from(body: ShippingRequestBody) -> Self {
        Self {
            destination: body.shipping_address.map(PostalAddress::from),
            items: body
                .items
                .unwrap_or_default()
                .into_iter()
                .map(|item| CartItem::new(item.quantity.unwrap_or(1)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShippingQuoteResponse {
    pub success: bool,
    #[serde(flatten)]
    pub rate: SelectedRate,
}

impl From<SelectedRate> for ShippingQuoteResponse {
    fn from(rate: SelectedRate) -> Self {
        Self {
            success: true,
            rate,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
