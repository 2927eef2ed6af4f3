use chrono::Utc;
use reqwest::Client as ReqwestClient;
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::auth::{self, Credentials};
use crate::error::Error;
use crate::json::to_canonical_string;
use crate::spot::{ClientConfig, ClientOidPolicy, MarketBuyOverrides, MarketOrder, SignedOrder};
use crate::{Result, Timestamp};

/// Order placement path; also the path covered by the signature.
pub const ORDERS_PATH: &str = "/api/v1/orders";

/// Client for signed market buys on `POST /api/v1/orders`.
///
/// Holds only immutable credentials and configuration, so a single instance
/// can be cloned and used from many tasks at once. Each call signs with its
/// own timestamp; nothing orders concurrent calls relative to each other.
#[derive(Clone, Debug)]
pub struct OrderClient {
    host: Url,
    credentials: Credentials,
    client_oid: ClientOidPolicy,
    client: ReqwestClient,
}

impl OrderClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_client(config, ReqwestClient::new())
    }

    /// Creates a client on top of a caller-configured HTTP client, e.g. one with timeouts.
    pub fn with_client(config: ClientConfig, client: ReqwestClient) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            host: config.host,
            credentials: config.credentials,
            client_oid: config.client_oid,
            client,
        })
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Places a market buy of `size` base units on `symbol`.
    ///
    /// Returns the decoded response body as-is, including exchange rejections.
    pub async fn submit_market_buy(&self, size: &str, symbol: &str) -> Result<Value> {
        self.submit_market_buy_with_overrides(size, symbol, MarketBuyOverrides::default())
            .await
    }

    /// Same as [`OrderClient::submit_market_buy`] with per-order overrides.
    ///
    /// One info event with the api key, size and symbol is emitted on entry,
    /// before local validation, so rejected attempts are logged as well.
    pub async fn submit_market_buy_with_overrides(
        &self,
        size: &str,
        symbol: &str,
        overrides: MarketBuyOverrides,
    ) -> Result<Value> {
        #[cfg(feature = "tracing")]
        tracing::info!(api_key = self.credentials.key(), size, symbol, "market buy");

        let signed = self.sign_market_buy(size, symbol, overrides)?;
        self.post_signed_order(signed).await
    }

    /// Builds, encodes and signs a market buy without sending it.
    pub fn sign_market_buy(
        &self,
        size: &str,
        symbol: &str,
        overrides: MarketBuyOverrides,
    ) -> Result<SignedOrder> {
        if size.is_empty() {
            return Err(Error::validation("size must not be empty"));
        }
        if symbol.is_empty() {
            return Err(Error::validation("symbol must not be empty"));
        }

        let timestamp = overrides.timestamp.unwrap_or_else(now_millis);
        let client_oid = overrides
            .client_oid
            .unwrap_or_else(|| self.client_oid.resolve());

        let order = MarketOrder::buy(client_oid, size, symbol);
        let body = to_canonical_string(&order)?;
        let headers =
            auth::create_headers(&self.credentials, timestamp, &Method::POST, ORDERS_PATH, &body)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(timestamp, client_oid = %order.client_oid, "signed market buy");

        Ok(SignedOrder {
            order,
            timestamp,
            body,
            headers,
        })
    }

    /// Posts an already-signed order; its body is sent byte-for-byte as signed.
    pub async fn post_signed_order(&self, signed: SignedOrder) -> Result<Value> {
        let request = self
            .client
            .request(Method::POST, self.endpoint()?)
            .body(signed.body)
            .build()?;

        crate::request::<Value>(&self.client, request, Some(signed.headers)).await
    }

    fn endpoint(&self) -> Result<Url> {
        Ok(self.host.join(ORDERS_PATH)?)
    }
}

fn now_millis() -> Timestamp {
    Utc::now().timestamp_millis()
}
