//! Remote connections - outbound REST clients bound to a peer zone
//!
//! The registry never talks to the network itself. It asks a [`Connector`]
//! for connection objects and keeps them for the controller's lifetime.
//! [`RestConnector`] is the production connector; tests plug in their own to
//! observe construction and teardown.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, warn};
use url::Url;
use zonemux_core::AccessKey;

/// Everything a connection is bound to at construction time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSpec {
    /// Remote zone id (or other remote identifier)
    pub remote_id: String,

    /// Endpoints, in preference order
    pub endpoints: Vec<String>,

    /// Credential used to sign requests
    pub key: AccessKey,

    /// Zone group of the local zone
    pub zonegroup_id: String,

    /// API group name of the remote zone, when known
    pub api_name: Option<String>,
}

/// An outbound connection to a remote zone
pub trait RemoteConnection: Send + Sync + fmt::Debug {
    /// Parameters the connection was built with
    fn spec(&self) -> &ConnectionSpec;

    /// A representative URL for the remote, `None` if none can be produced
    fn get_url(&self) -> Option<String>;

    fn remote_id(&self) -> &str {
        &self.spec().remote_id
    }

    fn endpoints(&self) -> &[String] {
        &self.spec().endpoints
    }

    fn access_key(&self) -> &AccessKey {
        &self.spec().key
    }

    fn api_name(&self) -> Option<&str> {
        self.spec().api_name.as_deref()
    }
}

/// Builds connection objects. Construction never fails; a connection with
/// unusable endpoints fails on first use instead.
pub trait Connector: Send + Sync {
    fn connect(&self, spec: ConnectionSpec) -> Box<dyn RemoteConnection>;
}

/// REST connection handle.
///
/// Hands out its endpoints round-robin from [`get_url`](RemoteConnection::get_url).
pub struct RestConn {
    spec: ConnectionSpec,
    next_endpoint: AtomicUsize,
}

impl RestConn {
    pub fn new(spec: ConnectionSpec) -> Self {
        Self {
            spec,
            next_endpoint: AtomicUsize::new(0),
        }
    }
}

impl fmt::Debug for RestConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestConn")
            .field("remote_id", &self.spec.remote_id)
            .field("endpoints", &self.spec.endpoints)
            .field("access_key", &self.spec.key.id)
            .field("api_name", &self.spec.api_name)
            .finish()
    }
}

impl RemoteConnection for RestConn {
    fn spec(&self) -> &ConnectionSpec {
        &self.spec
    }

    fn get_url(&self) -> Option<String> {
        let endpoints = &self.spec.endpoints;
        if endpoints.is_empty() {
            warn!(
                "[RestConn] No endpoints configured for remote {}",
                self.spec.remote_id
            );
            return None;
        }

        let idx = self.next_endpoint.fetch_add(1, Ordering::Relaxed) % endpoints.len();
        let endpoint = &endpoints[idx];
        match Url::parse(endpoint) {
            Ok(_) => Some(endpoint.clone()),
            Err(e) => {
                warn!(
                    "[RestConn] Invalid endpoint {} for remote {}: {}",
                    endpoint, self.spec.remote_id, e
                );
                None
            }
        }
    }
}

/// Production connector creating [`RestConn`] handles
#[derive(Debug, Default, Clone, Copy)]
pub struct RestConnector;

impl Connector for RestConnector {
    fn connect(&self, spec: ConnectionSpec) -> Box<dyn RemoteConnection> {
        debug!(
            "[RestConnector] New connection to {} ({} endpoints, access_key={})",
            spec.remote_id,
            spec.endpoints.len(),
            spec.key.id
        );
        Box::new(RestConn::new(spec))
    }
}
