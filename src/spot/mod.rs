//! Signed market-buy flow for the KuCoin spot REST API.
//!
//! This module implements only `POST /api/v1/orders` for market buys:
//! - build the order body with the canonical JSON encoder
//! - sign it with the API-key HMAC scheme
//! - submit once and hand back whatever JSON the exchange returned
//!
//! There are no retries and no interpretation of exchange error codes;
//! [`ApiEnvelope`] is available for callers that want a typed view.

mod client;
mod config;
mod policy;
mod types;

pub use client::{ORDERS_PATH, OrderClient};
pub use config::{ClientConfig, RawCredentials};
pub use policy::{ClientOidPolicy, PLACEHOLDER_CLIENT_OID};
pub use types::{ApiEnvelope, MarketBuyOverrides, MarketOrder, OrderType, Side, SignedOrder};
