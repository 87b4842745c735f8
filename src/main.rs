use anyhow::Context;
use clap::Parser;
use std::path::Path;
use storefront_shipping::config::Command;
use storefront_shipping::http::dto::{ShippingQuoteResponse, ShippingRequestBody};
use storefront_shipping::utils::error::ErrorCategory;
use storefront_shipping::utils::logger::{self, LogFormat};
use storefront_shipping::utils::validation::Validate;
use storefront_shipping::{
    http, CliConfig, ShippingConfig, ShippingRateSelector, ShippingRequest, ShippoClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_logger(LogFormat::Compact, cli.verbose);

    tracing::info!("Starting storefront-shipping");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let mut config = match &cli.config {
        Some(path) => ShippingConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ShippingConfig::from_env().context("Failed to read configuration from environment")?,
    };

    if let Command::Serve { port: Some(port) } = &cli.command {
        config.server.port = *port;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let address = config.server.address();
    let client = ShippoClient::from_config(&config.aggregator)
        .context("Failed to create rate aggregator client")?;
    let selector = ShippingRateSelector::new(client, config);

    match &cli.command {
        Command::Serve { .. } => {
            http::serve(selector, &address)
                .await
                .context("HTTP server failed")?;
        }
        Command::Quote { request } => quote_from_file(&selector, request).await?,
    }

    Ok(())
}

async fn quote_from_file(
    selector: &ShippingRateSelector<ShippoClient, ShippingConfig>,
    path: &Path,
) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let body: ShippingRequestBody = serde_json::from_str(&content)
        .with_context(|| format!("Invalid request JSON in {}", path.display()))?;

    match selector.select_shipping_rate(&ShippingRequest::from(body)).await {
        Ok(selected) => {
            let response = ShippingQuoteResponse::from(selected);
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Quote failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = match e.category() {
                ErrorCategory::Validation | ErrorCategory::NoRates | ErrorCategory::Internal => 1,
                ErrorCategory::Upstream => 2,
                ErrorCategory::Configuration => 3,
            };
            std::process::exit(exit_code);
        }
    }
}
