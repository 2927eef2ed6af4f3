use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::Display;

use crate::Timestamp;
use crate::auth;
use crate::spot::ORDERS_PATH;

/// Response code KuCoin uses for an accepted request.
const SUCCESS_CODE: &str = "200000";

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    Buy,
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderType {
    Market,
}

/// Body of `POST /api/v1/orders`.
///
/// Field order is the wire key order and part of the signed bytes.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOrder {
    pub client_oid: String,
    pub side: Side,
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub size: String,
}

impl MarketOrder {
    /// Market buy of `size` base units on `symbol`, which is uppercased.
    #[must_use]
    pub fn buy(client_oid: String, size: &str, symbol: &str) -> Self {
        Self {
            client_oid,
            side: Side::Buy,
            symbol: symbol.to_uppercase(),
            order_type: OrderType::Market,
            size: size.to_owned(),
        }
    }
}

/// Per-order overrides on top of the client defaults.
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct MarketBuyOverrides {
    pub timestamp: Option<Timestamp>,
    pub client_oid: Option<String>,
}

impl MarketBuyOverrides {
    /// Pins the request timestamp instead of reading the wall clock.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub fn with_client_oid<S: Into<String>>(mut self, client_oid: S) -> Self {
        self.client_oid = Some(client_oid.into());
        self
    }
}

/// A fully signed order, ready to send.
///
/// `body` is the exact byte sequence covered by the signature in `headers`.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct SignedOrder {
    pub order: MarketOrder,
    pub timestamp: Timestamp,
    pub body: String,
    pub headers: HeaderMap,
}

impl SignedOrder {
    #[must_use]
    pub fn signing_string(&self) -> String {
        auth::signing_string(self.timestamp, &Method::POST, ORDERS_PATH, &self.body)
    }
}

/// Typed view over KuCoin's `{code, msg, data}` response envelope.
///
/// The client never applies this itself; responses are passed through as
/// [`Value`] and callers may convert them when they want to branch on `code`.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ApiEnvelope {
    pub code: String,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl ApiEnvelope {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// `data.orderId` of an accepted order, if present.
    #[must_use]
    pub fn order_id(&self) -> Option<&str> {
        self.data.as_ref()?.get("orderId")?.as_str()
    }
}

impl TryFrom<Value> for ApiEnvelope {
    type Error = crate::error::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(serde_json::from_value(value)?)
    }
}
