//! Places one market buy using credentials from the environment.
//!
//! ```sh
//! KUCOIN_API_KEY=... KUCOIN_API_SECRET=... KUCOIN_API_PASSPHRASE=... \
//!     cargo run --example market_buy -- 0.001 btc-usdt
//! ```

use std::env;

use kucoin_order_client::KUCOIN_HOST;
use kucoin_order_client::spot::{ApiEnvelope, ClientConfig, OrderClient, RawCredentials};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = env::args().skip(1);
    let size = args.next().unwrap_or_else(|| "0.001".to_owned());
    let symbol = args.next().unwrap_or_else(|| "btc-usdt".to_owned());
    let host = env::var("KUCOIN_HOST").unwrap_or_else(|_| KUCOIN_HOST.to_owned());

    let config = ClientConfig::from_raw(&host, RawCredentials::from_env()?)?;
    let client = OrderClient::new(config)?;

    let response = client.submit_market_buy(&size, &symbol).await?;
    match ApiEnvelope::try_from(response.clone()) {
        Ok(envelope) if envelope.is_success() => {
            info!(order_id = ?envelope.order_id(), "order accepted");
        }
        _ => error!(%response, "order not accepted"),
    }

    Ok(())
}
