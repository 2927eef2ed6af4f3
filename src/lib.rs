#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod auth;
pub mod error;
pub mod json;
pub mod spot;

use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Request};
use serde::de::DeserializeOwned;

use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Unix time in milliseconds, as KuCoin expects in `KC-API-TIMESTAMP`.
pub type Timestamp = i64;

/// Production REST host for KuCoin spot trading.
pub const KUCOIN_HOST: &str = "https://api.kucoin.com";

/// Sends `request` with `headers` and decodes the JSON body.
///
/// The body is read to completion before decoding on every path, so the
/// response (and its pooled connection) is released whether decoding succeeds
/// or not. A non-success status whose body is still valid JSON is returned as
/// data: KuCoin reports rejections that way and callers inspect the payload.
/// Only a non-success status without a JSON body becomes [`error::Kind::Status`].
pub(crate) async fn request<Response: DeserializeOwned>(
    client: &ReqwestClient,
    mut request: Request,
    headers: Option<HeaderMap>,
) -> Result<Response> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    if let Some(h) = headers {
        *request.headers_mut() = h;
    }

    let response = client.execute(request).await?;
    let status_code = response.status();
    let bytes = response.bytes().await?;

    match serde_json::from_slice::<Response>(&bytes) {
        Ok(decoded) => {
            #[cfg(feature = "tracing")]
            if !status_code.is_success() {
                tracing::warn!(
                    status = %status_code,
                    method = %method,
                    path = %path,
                    "request rejected, passing payload through"
                );
            }
            Ok(decoded)
        }
        Err(_) if !status_code.is_success() => {
            let message = String::from_utf8_lossy(&bytes).into_owned();
            #[cfg(feature = "tracing")]
            tracing::warn!(
                status = %status_code,
                method = %method,
                path = %path,
                message = %message,
                "request failed"
            );
            Err(Error::status(status_code, method, path, message))
        }
        Err(e) => Err(e.into()),
    }
}
