//! Credential resolution for outbound zone connections
//!
//! A zone's REST override may carry an explicit key pair, just an access key,
//! or a user id. [`CredentialSource::select`] picks the tier to use, and
//! [`CredentialResolver`] turns it into an [`AccessKey`], consulting the
//! identity service when the tier needs it.

use std::sync::Arc;

use thiserror::Error;
use tracing::error;
use zonemux_core::{AccessKey, RestConfig, UserId, UserRecord, UserRepository};

/// Why no credential could be resolved
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Neither an access key nor a user id was configured
    #[error("no access key or user id configured for connection to dest={dest}")]
    HintMissing { dest: String },

    #[error("could not find user info for connection to dest={dest}")]
    UserNotFound { dest: String },

    #[error("user lookup for connection to dest={dest} failed: {reason}")]
    Lookup { dest: String, reason: String },

    #[error("user (uid={uid}) has no access keys for dest={dest}")]
    NoKeys { uid: UserId, dest: String },
}

impl CredentialError {
    /// True when resolution failed because nothing was configured, as opposed
    /// to a lookup that did not produce a key
    pub fn is_hint_missing(&self) -> bool {
        matches!(self, Self::HintMissing { .. })
    }
}

/// Credential hint tiers, highest priority first:
/// explicit key pair, then access key lookup, then user id lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource<'a> {
    /// Access key and secret both configured, used as-is
    Explicit { access_key: &'a str, secret: &'a str },
    /// Only an access key, resolved to its owner's record
    AccessKey(&'a str),
    /// A user id, resolved to its record
    User(&'a UserId),
}

impl<'a> CredentialSource<'a> {
    /// Pick the highest-priority tier the inputs allow
    pub fn select(
        uid: Option<&'a UserId>,
        access_key: Option<&'a str>,
        secret: Option<&'a str>,
    ) -> Option<Self> {
        match (access_key, secret, uid) {
            (Some(access_key), Some(secret), _) => Some(Self::Explicit { access_key, secret }),
            (Some(access_key), None, _) => Some(Self::AccessKey(access_key)),
            (None, _, Some(uid)) => Some(Self::User(uid)),
            (None, _, None) => None,
        }
    }

    pub fn from_rest_config(conf: &'a RestConfig) -> Option<Self> {
        Self::select(
            conf.uid.as_ref(),
            conf.access_key.as_deref(),
            conf.secret.as_deref(),
        )
    }
}

/// Resolves access keys through the identity service
pub struct CredentialResolver {
    user_repo: Arc<dyn UserRepository>,
}

impl CredentialResolver {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Resolve the credential for a connection to `dest_id`.
    ///
    /// With both `access_key` and `secret` the pair is returned without
    /// touching the identity service. Otherwise the owning user record is
    /// looked up and its first access key is used.
    pub fn resolve(
        &self,
        dest_id: &str,
        uid: Option<&UserId>,
        access_key: Option<&str>,
        secret: Option<&str>,
    ) -> Result<AccessKey, CredentialError> {
        let source =
            CredentialSource::select(uid, access_key, secret).ok_or_else(|| {
                CredentialError::HintMissing {
                    dest: dest_id.to_string(),
                }
            })?;
        self.resolve_source(dest_id, source)
    }

    /// Resolve the credential described by a REST override
    pub fn resolve_config(
        &self,
        dest_id: &str,
        conf: &RestConfig,
    ) -> Result<AccessKey, CredentialError> {
        let source = CredentialSource::from_rest_config(conf).ok_or_else(|| {
            CredentialError::HintMissing {
                dest: dest_id.to_string(),
            }
        })?;
        self.resolve_source(dest_id, source)
    }

    /// Resolve an already selected tier
    pub fn resolve_source(
        &self,
        dest_id: &str,
        source: CredentialSource<'_>,
    ) -> Result<AccessKey, CredentialError> {
        let lookup = match source {
            CredentialSource::Explicit { access_key, secret } => {
                return Ok(AccessKey::new(access_key, secret));
            }
            CredentialSource::AccessKey(access_key) => self.user_repo.get_by_access_key(access_key),
            CredentialSource::User(uid) => self.user_repo.get_by_uid(uid),
        };

        let user = match lookup {
            Ok(Some(user)) => user,
            Ok(None) => {
                error!(
                    "[CredentialResolver] Could not find user info for connection to dest={}",
                    dest_id
                );
                return Err(CredentialError::UserNotFound {
                    dest: dest_id.to_string(),
                });
            }
            Err(e) => {
                error!(
                    "[CredentialResolver] User lookup for connection to dest={} failed: {}",
                    dest_id, e
                );
                return Err(CredentialError::Lookup {
                    dest: dest_id.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        first_access_key(&user, dest_id)
    }
}

fn first_access_key(user: &UserRecord, dest_id: &str) -> Result<AccessKey, CredentialError> {
    match user.first_key() {
        Some(key) => Ok(key.clone()),
        None => {
            error!(
                "[CredentialResolver] User (uid={}) has no access keys for dest={}",
                user.user_id, dest_id
            );
            Err(CredentialError::NoKeys {
                uid: user.user_id.clone(),
                dest: dest_id.to_string(),
            })
        }
    }
}
