//! Credential entities - access keys and the user records that own them
//!
//! Access keys are handed to outbound connections as-is. The secret half is
//! wiped from memory on drop and never shows up in Debug output.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// An S3-style (access key id, secret) pair used to sign requests to a peer zone.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct AccessKey {
    /// Public access key id
    pub id: String,

    /// Secret key
    #[serde(rename = "secret_key", default)]
    pub secret: String,
}

impl AccessKey {
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
        }
    }

    /// True when no access key id is configured
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

impl fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKey")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Identifier of a user account in the identity service
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A user account as returned by the identity service.
///
/// Only the parts the remote registry needs are modelled: the user id (for
/// diagnostics) and the account's access keys, keyed by access key id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: UserId,

    #[serde(default)]
    pub access_keys: BTreeMap<String, AccessKey>,
}

impl UserRecord {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            access_keys: BTreeMap::new(),
        }
    }

    /// Add an access key to the record (builder pattern)
    pub fn with_key(mut self, key: AccessKey) -> Self {
        self.access_keys.insert(key.id.clone(), key);
        self
    }

    /// First access key in stored order, if the account has any
    pub fn first_key(&self) -> Option<&AccessKey> {
        self.access_keys.values().next()
    }
}
