//! Remote controller - entry point for routing, replication fan-out and
//! redirects.
//!
//! [`RemoteCtl`] compiles the topology once, on construction, and holds the
//! result. Everything it exposes afterwards is a read-only lookup, so a
//! controller can be shared across threads behind an `Arc`. Connections
//! returned by lookups borrow from the controller and cannot outlive it.

use std::sync::Arc;

use tracing::{debug, error};
use zonemux_core::{AccessKey, UserRepository, ZoneId, ZoneService};

use super::compiler::{Conns, RemoteState, ZoneConnectionCompiler};
use super::connection::{Connector, RemoteConnection, RestConnector};
use super::credential::CredentialResolver;
use super::factory::ConnectionFactory;

/// Data and sip connections of one zone
#[derive(Debug, Clone, Copy)]
pub struct ZoneConns<'a> {
    pub data: &'a dyn RemoteConnection,
    pub sip: &'a dyn RemoteConnection,
    ids: Conns,
}

impl<'a> ZoneConns<'a> {
    /// True when the zone has no dedicated sip connection
    pub fn sip_is_data(&self) -> bool {
        self.ids.sip_is_data()
    }

    pub fn ids(&self) -> Conns {
        self.ids
    }
}

pub struct RemoteCtl {
    zone_svc: Arc<dyn ZoneService>,
    factory: ConnectionFactory,
    state: RemoteState,
}

impl RemoteCtl {
    /// Compile connections for the topology served by `zone_svc`, using REST
    /// connections
    pub fn new(zone_svc: Arc<dyn ZoneService>, user_repo: Arc<dyn UserRepository>) -> Self {
        Self::with_connector(zone_svc, user_repo, Arc::new(RestConnector))
    }

    /// Same as [`RemoteCtl::new`] with a custom connector
    pub fn with_connector(
        zone_svc: Arc<dyn ZoneService>,
        user_repo: Arc<dyn UserRepository>,
        connector: Arc<dyn Connector>,
    ) -> Self {
        let factory = ConnectionFactory::new(
            Arc::clone(&zone_svc),
            CredentialResolver::new(user_repo),
            connector,
        );
        let state = ZoneConnectionCompiler::new(zone_svc.as_ref(), &factory).compile();

        Self {
            zone_svc,
            factory,
            state,
        }
    }

    /// Connections of a zone, by zone id
    pub fn zone_conns(&self, zone_id: &ZoneId) -> Option<ZoneConns<'_>> {
        let ids = self.state.conns(zone_id)?;
        Some(ZoneConns {
            data: self.state.connection(ids.data)?,
            sip: self.state.connection(ids.sip)?,
            ids,
        })
    }

    /// Connections of a zone, by zone name
    pub fn zone_conns_by_name(&self, name: &str) -> Option<ZoneConns<'_>> {
        let zone_id = self.zone_svc.find_zone_id_by_name(name)?;
        self.zone_conns(&zone_id)
    }

    /// Endpoint to forward requests to, when a redirect zone is configured
    pub fn redirect_zone_endpoint(&self) -> Option<String> {
        let redirect_zone = self.zone_svc.redirect_zone()?;

        let Some(conns) = self.zone_conns(redirect_zone) else {
            error!(
                "[RemoteCtl] Cannot find entry for redirect zone: {}",
                redirect_zone
            );
            return None;
        };

        let endpoint = conns.data.get_url();
        match &endpoint {
            Some(url) => debug!("[RemoteCtl] Redirect zone {} endpoint {}", redirect_zone, url),
            None => error!(
                "[RemoteCtl] Redirect zone {}: connection has no usable endpoint",
                redirect_zone
            ),
        }
        endpoint
    }

    /// Zones to notify about metadata changes, with their data connection
    pub fn meta_notify_targets(
        &self,
    ) -> impl Iterator<Item = (&ZoneId, &dyn RemoteConnection)> + '_ {
        self.state
            .meta_notify_targets()
            .iter()
            .filter_map(|(zone_id, id)| Some((zone_id, self.state.connection(*id)?)))
    }

    /// Zones to notify about data changes, with their data connection
    pub fn data_notify_targets(
        &self,
    ) -> impl Iterator<Item = (&ZoneId, &dyn RemoteConnection)> + '_ {
        self.state
            .data_notify_targets()
            .iter()
            .filter_map(|(zone_id, id)| Some((zone_id, self.state.connection(*id)?)))
    }

    /// Ids of all zones with connections
    pub fn zone_ids(&self) -> impl Iterator<Item = &ZoneId> {
        self.state.zone_ids()
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Build a connection outside the registry. The caller owns it.
    pub fn create_conn(
        &self,
        remote_id: &str,
        endpoints: Vec<String>,
        key: AccessKey,
        api_name: Option<String>,
    ) -> Box<dyn RemoteConnection> {
        self.factory.create_conn(remote_id, endpoints, key, api_name)
    }

    pub fn state(&self) -> &RemoteState {
        &self.state
    }
}

impl std::fmt::Debug for RemoteCtl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteCtl")
            .field("zone_id", self.zone_svc.zone_id())
            .field("zones", &self.state.len())
            .field("connections", &self.state.connection_count())
            .finish()
    }
}
