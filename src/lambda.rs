use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use storefront_shipping::http::dto::{ShippingQuoteResponse, ShippingRequestBody};
use storefront_shipping::utils::logger::{self, LogFormat};
use storefront_shipping::utils::validation::Validate;
use storefront_shipping::{ShippingConfig, ShippingRateSelector, ShippingRequest, ShippoClient};

type Selector = ShippingRateSelector<ShippoClient, ShippingConfig>;

async fn function_handler(
    selector: &Selector,
    event: LambdaEvent<ShippingRequestBody>,
) -> Result<ShippingQuoteResponse, Error> {
    tracing::info!(request_id = %event.context.request_id, "Quoting shipping rate");

    let request = ShippingRequest::from(event.payload);
    match selector.select_shipping_rate(&request).await {
        Ok(selected) => Ok(ShippingQuoteResponse::from(selected)),
        Err(e) => {
            tracing::error!("Shipping quote failed ({:?}): {}", e.category(), e);
            Err(Error::from(e.user_friendly_message()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_logger(LogFormat::Json, false);

    let config = ShippingConfig::from_env()?;
    config.validate()?;

    let client = ShippoClient::from_config(&config.aggregator)?;
    let selector = ShippingRateSelector::new(client, config);
    let shared = &selector;

    run(service_fn(move |event: LambdaEvent<ShippingRequestBody>| async move {
        function_handler(shared, event).await
    }))
    .await
}
