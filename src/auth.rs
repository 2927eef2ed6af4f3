//! KuCoin API-key authentication (key version 2).
//!
//! Every private request carries five headers derived from the credentials
//! and a millisecond timestamp:
//!
//! | Header | Value |
//! |--------|-------|
//! | `KC-API-KEY` | API key, verbatim |
//! | `KC-API-SIGN` | `base64(HMAC-SHA256(secret, timestamp + method + path + body))` |
//! | `KC-API-TIMESTAMP` | the same timestamp used in the signature |
//! | `KC-API-PASSPHRASE` | `base64(HMAC-SHA256(secret, passphrase))` |
//! | `KC-API-KEY-VERSION` | `2` |

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac as _};
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret as _, SecretString};
use sha2::Sha256;

use crate::error::Error;
use crate::{Result, Timestamp};

pub const KEY: &str = "kc-api-key";
pub const SIGN: &str = "kc-api-sign";
pub const TIMESTAMP: &str = "kc-api-timestamp";
pub const PASSPHRASE: &str = "kc-api-passphrase";
pub const KEY_VERSION: &str = "kc-api-key-version";

/// Passphrase hashing scheme announced in `KC-API-KEY-VERSION`.
pub const API_KEY_VERSION: &str = "2";

type HmacSha256 = Hmac<Sha256>;

/// API key triple issued by KuCoin.
///
/// The secret never leaves the process; the passphrase is only ever sent as
/// [`passphrase_digest`].
#[derive(Clone, Debug)]
pub struct Credentials {
    key: String,
    secret: SecretString,
    passphrase: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(key: String, secret: SecretString, passphrase: SecretString) -> Self {
        Self {
            key,
            secret,
            passphrase,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Rejects credentials with an empty key, secret or passphrase.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(Error::validation("api key must not be empty"));
        }
        if self.secret.expose_secret().is_empty() {
            return Err(Error::validation("api secret must not be empty"));
        }
        if self.passphrase.expose_secret().is_empty() {
            return Err(Error::validation("api passphrase must not be empty"));
        }

        Ok(())
    }

    /// Base64 HMAC of the passphrase under the secret, as sent in `KC-API-PASSPHRASE`.
    pub fn passphrase_digest(&self) -> Result<String> {
        passphrase_digest(&self.secret, &self.passphrase)
    }

    /// Base64 HMAC of `message` under the secret.
    pub fn sign(&self, message: &str) -> Result<String> {
        hmac_sha256(&self.secret, message)
    }
}

/// Concatenates the fields KuCoin signs, in the order it expects them.
#[must_use]
pub fn signing_string(timestamp: Timestamp, method: &Method, path: &str, body: &str) -> String {
    format!("{timestamp}{}{path}{body}", method.as_str())
}

pub fn passphrase_digest(secret: &SecretString, passphrase: &SecretString) -> Result<String> {
    hmac_sha256(secret, passphrase.expose_secret())
}

fn hmac_sha256(secret: &SecretString, message: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|e| Error::validation(format!("invalid signing secret: {e}")))?;
    mac.update(message.as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Builds the full authenticated header set for one request.
///
/// `timestamp` is embedded both in the signature and in `KC-API-TIMESTAMP`,
/// so the two can never disagree.
pub fn create_headers(
    credentials: &Credentials,
    timestamp: Timestamp,
    method: &Method,
    path: &str,
    body: &str,
) -> Result<HeaderMap> {
    let signature = credentials.sign(&signing_string(timestamp, method, path, body))?;
    let passphrase = credentials.passphrase_digest()?;

    let mut map = HeaderMap::with_capacity(6);
    map.insert(KEY, HeaderValue::from_str(credentials.key())?);
    map.insert(SIGN, HeaderValue::from_str(&signature)?);
    map.insert(TIMESTAMP, HeaderValue::from_str(&timestamp.to_string())?);
    map.insert(PASSPHRASE, HeaderValue::from_str(&passphrase)?);
    map.insert(KEY_VERSION, HeaderValue::from_static(API_KEY_VERSION));
    map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"clientOid": "AAA", "side": "buy", "symbol": "ETH-USDT", "type": "market", "size": "2"}"#;
    const TS: Timestamp = 1_700_000_000_000;

    fn credentials() -> Credentials {
        Credentials::new(
            "k1".to_owned(),
            SecretString::from("s1"),
            SecretString::from("p1"),
        )
    }

    #[test]
    fn hmac_known_answer() {
        let secret = SecretString::from("key");

        let mac = hmac_sha256(&secret, "The quick brown fox jumps over the lazy dog").unwrap();

        assert_eq!(
            mac, "97yD9DBThCSxMpjmqm+xQ+9NWaFJRhdZl0edvC0aPNg=",
            "RFC HMAC-SHA256 vector, base64"
        );
    }

    #[test]
    fn passphrase_digest_is_deterministic() {
        let creds = credentials();

        let first = creds.passphrase_digest().unwrap();
        let second = creds.passphrase_digest().unwrap();

        assert_eq!(
            first, "z99Y9amzHTactz7DIhYyHTwWL37SujXUqst0eV0DjPw=",
            "digest of p1 under s1"
        );
        assert_eq!(first, second, "digest does not depend on call count");
    }

    #[test]
    fn signing_string_layout() {
        let message = signing_string(TS, &Method::POST, "/api/v1/orders", BODY);

        assert_eq!(
            message,
            r#"1700000000000POST/api/v1/orders{"clientOid": "AAA", "side": "buy", "symbol": "ETH-USDT", "type": "market", "size": "2"}"#,
            "timestamp + method + path + body"
        );
    }

    #[test]
    fn signature_known_answer() {
        let message = signing_string(TS, &Method::POST, "/api/v1/orders", BODY);

        let signature = credentials().sign(&message).unwrap();

        assert_eq!(
            signature, "o7/dyYbiyYSX+GXhXJK6+kdWuExExAN7Z7sChwHmLTs=",
            "signature of the reference order"
        );
    }

    #[test]
    fn signature_changes_with_any_body_byte() {
        let creds = credentials();
        let base = creds
            .sign(&signing_string(TS, &Method::POST, "/api/v1/orders", BODY))
            .unwrap();

        for idx in 0..BODY.len() {
            let mut bytes = BODY.as_bytes().to_vec();
            bytes[idx] = if bytes[idx] == b'x' { b'y' } else { b'x' };
            let mutated = String::from_utf8(bytes).unwrap();

            let signature = creds
                .sign(&signing_string(TS, &Method::POST, "/api/v1/orders", &mutated))
                .unwrap();
            assert_ne!(signature, base, "mutating byte {idx} kept the signature");
        }
    }

    #[test]
    fn headers_share_one_timestamp() {
        let creds = credentials();

        let headers = create_headers(&creds, TS, &Method::POST, "/api/v1/orders", BODY).unwrap();

        assert_eq!(headers[KEY], "k1", "key sent verbatim");
        assert_eq!(headers[TIMESTAMP], "1700000000000", "millisecond timestamp");
        assert_eq!(
            headers[SIGN], "o7/dyYbiyYSX+GXhXJK6+kdWuExExAN7Z7sChwHmLTs=",
            "signature over the same timestamp"
        );
        assert_eq!(
            headers[PASSPHRASE], "z99Y9amzHTactz7DIhYyHTwWL37SujXUqst0eV0DjPw=",
            "passphrase sent as digest"
        );
        assert_eq!(headers[KEY_VERSION], "2", "key version");
        assert_eq!(
            headers[CONTENT_TYPE], "application/json",
            "json content type"
        );
    }

    #[test]
    fn later_timestamp_changes_signature() {
        let creds = credentials();

        let early = create_headers(&creds, TS, &Method::POST, "/api/v1/orders", BODY).unwrap();
        let late = create_headers(&creds, TS + 1, &Method::POST, "/api/v1/orders", BODY).unwrap();

        assert_ne!(early[TIMESTAMP], late[TIMESTAMP], "timestamp header moves");
        assert_eq!(
            late[SIGN], "GRE2Wuq+rdngJFIVGl5ueBZJv0w7a8VmR6n5X48rrEc=",
            "signature one millisecond later"
        );
        assert_ne!(early[SIGN], late[SIGN], "signature moves with the timestamp");
    }

    #[test]
    fn validate_rejects_empty_parts() {
        let empty = |key: &str, secret: &str, passphrase: &str| {
            Credentials::new(
                key.to_owned(),
                SecretString::from(secret),
                SecretString::from(passphrase),
            )
        };

        credentials().validate().unwrap();
        empty(" ", "s1", "p1").validate().unwrap_err();
        empty("k1", "", "p1").validate().unwrap_err();
        empty("k1", "s1", "").validate().unwrap_err();
    }

    #[test]
    fn debug_redacts_secrets() {
        let rendered = format!("{:?}", credentials());

        assert!(rendered.contains("k1"), "key is visible: {rendered}");
        assert!(!rendered.contains("s1"), "secret leaked: {rendered}");
        assert!(!rendered.contains("p1"), "passphrase leaked: {rendered}");
    }
}
