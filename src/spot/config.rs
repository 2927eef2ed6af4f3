use std::env;

use bon::Builder;
use secrecy::SecretString;
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::spot::policy::ClientOidPolicy;
use crate::{KUCOIN_HOST, Result};

pub const API_KEY_VAR: &str = "KUCOIN_API_KEY";
pub const API_SECRET_VAR: &str = "KUCOIN_API_SECRET";
pub const API_PASSPHRASE_VAR: &str = "KUCOIN_API_PASSPHRASE";

/// Raw credential strings typically passed from app-level bot config.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct RawCredentials {
    pub api_key: String,
    pub api_secret: SecretString,
    pub api_passphrase: SecretString,
}

impl RawCredentials {
    #[must_use]
    pub fn new(api_key: String, api_secret: SecretString, api_passphrase: SecretString) -> Self {
        Self {
            api_key,
            api_secret,
            api_passphrase,
        }
    }

    /// Reads `KUCOIN_API_KEY`, `KUCOIN_API_SECRET` and `KUCOIN_API_PASSPHRASE`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(
            read_var(API_KEY_VAR)?,
            SecretString::from(read_var(API_SECRET_VAR)?),
            SecretString::from(read_var(API_PASSPHRASE_VAR)?),
        ))
    }

    pub fn into_credentials(self) -> Result<Credentials> {
        let credentials = Credentials::new(self.api_key, self.api_secret, self.api_passphrase);
        credentials.validate()?;

        Ok(credentials)
    }
}

fn read_var(name: &str) -> Result<String> {
    env::var(name).map_err(|e| Error::validation(format!("{name}: {e}")))
}

/// Order client configuration.
///
/// Every construction path ends in the same validation: [`ClientConfig::new`]
/// and [`ClientConfig::from_raw`] check eagerly, builder output is checked
/// when the client is created.
#[non_exhaustive]
#[derive(Builder, Clone, Debug)]
pub struct ClientConfig {
    pub host: Url,
    pub credentials: Credentials,
    #[builder(default)]
    pub client_oid: ClientOidPolicy,
}

impl ClientConfig {
    /// Configuration against the production host with default policies.
    pub fn new(credentials: Credentials) -> Result<Self> {
        let config = Self {
            host: Url::parse(KUCOIN_HOST)?,
            credentials,
            client_oid: ClientOidPolicy::default(),
        };
        config.validate()?;

        Ok(config)
    }

    pub fn from_raw(host: &str, raw: RawCredentials) -> Result<Self> {
        let config = Self {
            host: Url::parse(host)?,
            credentials: raw.into_credentials()?,
            client_oid: ClientOidPolicy::default(),
        };
        config.validate()?;

        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !matches!(self.host.scheme(), "http" | "https") {
            return Err(Error::validation(format!(
                "host must be http or https, got `{}`",
                self.host
            )));
        }
        self.credentials.validate()?;

        self.client_oid.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;

    fn raw() -> RawCredentials {
        RawCredentials::new(
            "k1".to_owned(),
            SecretString::from("s1"),
            SecretString::from("p1"),
        )
    }

    fn local_host() -> Url {
        Url::parse("http://127.0.0.1:8080").unwrap()
    }

    #[test]
    fn from_raw_parses_host() {
        let config = ClientConfig::from_raw("https://api.kucoin.com", raw()).unwrap();

        assert_eq!(
            config.host.as_str(),
            "https://api.kucoin.com/",
            "host is normalised with a trailing slash"
        );
        assert_eq!(config.credentials.key(), "k1", "key is carried over");
        assert_eq!(
            config.client_oid,
            ClientOidPolicy::default(),
            "placeholder client oid by default"
        );
    }

    #[test]
    fn from_raw_rejects_bad_host() {
        let err = ClientConfig::from_raw("not a url", raw()).unwrap_err();
        assert_eq!(err.kind(), Kind::Validation, "unparsable host");

        let err = ClientConfig::from_raw("ftp://api.kucoin.com", raw()).unwrap_err();
        assert_eq!(err.kind(), Kind::Validation, "non-http scheme");
    }

    #[test]
    fn empty_raw_credentials_rejected() {
        let mut missing_key = raw();
        missing_key.api_key = "  ".to_owned();
        missing_key.into_credentials().unwrap_err();

        let mut missing_secret = raw();
        missing_secret.api_secret = SecretString::from("");
        missing_secret.into_credentials().unwrap_err();

        let mut missing_passphrase = raw();
        missing_passphrase.api_passphrase = SecretString::from("");
        missing_passphrase.into_credentials().unwrap_err();
    }

    #[test]
    fn new_rejects_empty_secret_and_passphrase() {
        let empty_secret = Credentials::new(
            "k1".to_owned(),
            SecretString::from(""),
            SecretString::from("p1"),
        );
        let err = ClientConfig::new(empty_secret).unwrap_err();
        assert_eq!(err.kind(), Kind::Validation, "empty secret");

        let empty_passphrase = Credentials::new(
            "k1".to_owned(),
            SecretString::from("s1"),
            SecretString::from(""),
        );
        let err = ClientConfig::new(empty_passphrase).unwrap_err();
        assert_eq!(err.kind(), Kind::Validation, "empty passphrase");
    }

    #[test]
    fn builder_output_validated_like_other_paths() {
        let config = ClientConfig::builder()
            .host(local_host())
            .credentials(Credentials::new(
                "k1".to_owned(),
                SecretString::from("s1"),
                SecretString::from(""),
            ))
            .build();

        let err = config.validate().unwrap_err();
        assert_eq!(
            err.kind(),
            Kind::Validation,
            "builder config with empty passphrase"
        );
    }

    #[test]
    fn new_targets_production() {
        let config = ClientConfig::new(raw().into_credentials().unwrap()).unwrap();

        assert_eq!(
            config.host.as_str(),
            "https://api.kucoin.com/",
            "production host"
        );
    }

    #[test]
    fn builder_defaults_policy() {
        let config = ClientConfig::builder()
            .host(local_host())
            .credentials(raw().into_credentials().unwrap())
            .build();

        assert_eq!(
            config.client_oid,
            ClientOidPolicy::default(),
            "builder falls back to placeholder policy"
        );
        config.validate().unwrap();
    }
}
