//! Zone entity - a single storage cluster taking part in replication

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::credential::UserId;

/// Zone identifier.
///
/// An empty id is a valid value and means "unset" wherever a zone reference
/// is optional in configuration (e.g. the redirect zone).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(String);

impl ZoneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ZoneId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ZoneId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ZoneId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// REST access override for a zone.
///
/// Every field is optional. Endpoints fall back to the zone's own endpoint
/// list; the credential is picked from `access_key`/`secret` or looked up
/// through `uid`, and falls back to the system key when neither resolves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<UserId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl RestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints = Some(endpoints.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_uid(mut self, uid: impl Into<UserId>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn with_access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Override endpoints, only when configured and non-empty
    pub fn non_empty_endpoints(&self) -> Option<&[String]> {
        self.endpoints
            .as_deref()
            .filter(|endpoints| !endpoints.is_empty())
    }
}

/// Secondary ("sip") role configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SipConfig {
    #[serde(default)]
    pub rest_conf: RestConfig,
}

/// A zone as described by the topology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,

    pub name: String,

    /// Default endpoints, in preference order
    #[serde(default)]
    pub endpoints: Vec<String>,

    /// Data access override (endpoints and credential)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_access_conf: Option<RestConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sip_conf: Option<SipConfig>,
}

impl Zone {
    pub fn new(id: impl Into<ZoneId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            endpoints: Vec::new(),
            data_access_conf: None,
            sip_conf: None,
        }
    }

    pub fn with_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_data_access(mut self, conf: RestConfig) -> Self {
        self.data_access_conf = Some(conf);
        self
    }

    pub fn with_sip(mut self, rest_conf: RestConfig) -> Self {
        self.sip_conf = Some(SipConfig { rest_conf });
        self
    }
}
