use uuid::Uuid;

use crate::Result;
use crate::error::Error;

/// Client order id sent when no per-order override is given.
///
/// Every order carries this same value unless the policy is changed, so the
/// exchange may treat repeated orders as duplicates. Kept as the default for
/// compatibility with existing deployments; opt into
/// [`ClientOidPolicy::Random`] for unique ids.
pub const PLACEHOLDER_CLIENT_OID: &str = "AAA";

/// How `clientOid` is chosen for each order.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClientOidPolicy {
    /// Send the same id on every order.
    Fixed(String),
    /// Generate a fresh v4 UUID (simple form, 32 hex chars) per order.
    Random,
}

impl Default for ClientOidPolicy {
    fn default() -> Self {
        ClientOidPolicy::Fixed(PLACEHOLDER_CLIENT_OID.to_owned())
    }
}

impl ClientOidPolicy {
    pub(crate) fn resolve(&self) -> String {
        match self {
            ClientOidPolicy::Fixed(id) => id.clone(),
            ClientOidPolicy::Random => Uuid::new_v4().simple().to_string(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            ClientOidPolicy::Fixed(id) if id.is_empty() => {
                Err(Error::validation("fixed clientOid must not be empty"))
            }
            // KuCoin caps clientOid at 40 characters.
            ClientOidPolicy::Fixed(id) if id.len() > 40 => Err(Error::validation(format!(
                "fixed clientOid `{id}` exceeds 40 characters"
            ))),
            _ => Ok(()),
        }
    }
}
