use crate::core::engine::ShippingRateSelector;
use crate::core::{ConfigProvider, RateProvider};
use crate::domain::model::ShippingRequest;
use crate::http::dto::{HealthResponse, ShippingQuoteResponse, ShippingRequestBody};
use crate::utils::error::ShippingError;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

pub struct AppState<P: RateProvider, C: ConfigProvider> {
    pub selector: ShippingRateSelector<P, C>,
}

impl<P: RateProvider, C: ConfigProvider> AppState<P, C> {
    pub fn new(selector: ShippingRateSelector<P, C>) -> Arc<Self> {
        Arc::new(Self { selector })
    }
}

pub async fn calculate_shipping<P, C>(
    State(state): State<Arc<AppState<P, C>>>,
    payload: Result<Json<ShippingRequestBody>, JsonRejection>,
) -> Result<Json<ShippingQuoteResponse>, ShippingError>
where
    P: RateProvider + 'static,
    C: ConfigProvider + 'static,
{
    let Json(body) = payload?;
    let request = ShippingRequest::from(body);

    let selected = state.selector.select_shipping_rate(&request).await?;
    Ok(Json(ShippingQuoteResponse::from(selected)))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
