//! Connection Factory - builds connection objects for remote zones
//!
//! Two shapes:
//! - [`ConnectionFactory::create_conn_from_config`] takes a zone's REST
//!   override, resolves endpoints and credential from it, and falls back to
//!   the system key when the credential cannot be resolved.
//! - [`ConnectionFactory::create_conn`] takes already resolved inputs.
//!
//! The factory does not keep what it builds; ownership goes to the caller.

use std::sync::Arc;

use tracing::{debug, warn};
use zonemux_core::{AccessKey, RestConfig, ZoneId, ZoneService};

use super::connection::{ConnectionSpec, Connector, RemoteConnection};
use super::credential::CredentialResolver;

pub struct ConnectionFactory {
    zone_svc: Arc<dyn ZoneService>,
    resolver: CredentialResolver,
    connector: Arc<dyn Connector>,
}

impl ConnectionFactory {
    pub fn new(
        zone_svc: Arc<dyn ZoneService>,
        resolver: CredentialResolver,
        connector: Arc<dyn Connector>,
    ) -> Self {
        Self {
            zone_svc,
            resolver,
            connector,
        }
    }

    /// Build a connection from a REST override.
    ///
    /// Endpoints come from `conf` when set, `def_endpoints` otherwise. A
    /// credential that cannot be resolved is replaced by the zone group's
    /// system key.
    pub fn create_conn_from_config(
        &self,
        zone_name: &str,
        zone_id: &ZoneId,
        def_endpoints: &[String],
        conf: &RestConfig,
        api_name: Option<&str>,
    ) -> Box<dyn RemoteConnection> {
        let endpoints = conf
            .endpoints
            .clone()
            .unwrap_or_else(|| def_endpoints.to_vec());

        let key = match self.resolver.resolve_config(zone_name, conf) {
            Ok(key) => key,
            Err(e) => {
                warn!(
                    "[ConnectionFactory] Using default access key for connection to zone {}: {}",
                    zone_name, e
                );
                self.zone_svc.system_key().clone()
            }
        };

        debug!(
            "[ConnectionFactory] Remote connection for zone={}: using access_key={}",
            zone_name, key.id
        );

        self.create_conn(
            zone_id.as_str(),
            endpoints,
            key,
            api_name.map(str::to_string),
        )
    }

    /// Build a connection from resolved inputs
    pub fn create_conn(
        &self,
        remote_id: &str,
        endpoints: Vec<String>,
        key: AccessKey,
        api_name: Option<String>,
    ) -> Box<dyn RemoteConnection> {
        self.connector.connect(ConnectionSpec {
            remote_id: remote_id.to_string(),
            endpoints,
            key,
            zonegroup_id: self.zone_svc.zonegroup_id().to_string(),
            api_name,
        })
    }
}
