//! Zone Connection Compiler
//!
//! Turns the zone topology into a [`RemoteState`]: one data connection and
//! one sip connection per peer zone, plus the notification indices.
//!
//! Local zones are compiled first and are wired for notifications; foreign
//! zones follow and never are. The own zone is skipped, and so is any zone
//! without endpoints.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, warn};
use zonemux_core::{Zone, ZoneId, ZoneService};

use super::connection::RemoteConnection;
use super::factory::ConnectionFactory;
use super::registry::{ConnId, ConnectionRegistry};

/// Where a zone's default endpoint list comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSource {
    /// The zone's own endpoint list
    Zone,
    /// The endpoint list of the zone's data access override
    DataAccess,
}

/// Endpoint tiers, tried in order. A zone none of them covers is skipped.
pub const ENDPOINT_TIERS: [EndpointSource; 2] = [EndpointSource::Zone, EndpointSource::DataAccess];

impl EndpointSource {
    /// This tier's endpoints for `zone`, if it has a non-empty list
    pub fn endpoints(self, zone: &Zone) -> Option<&[String]> {
        match self {
            Self::Zone => Some(zone.endpoints.as_slice()).filter(|e| !e.is_empty()),
            Self::DataAccess => zone
                .data_access_conf
                .as_ref()
                .and_then(|conf| conf.non_empty_endpoints()),
        }
    }
}

/// Default endpoints of a zone and the tier that supplied them
pub fn default_endpoints(zone: &Zone) -> Option<(EndpointSource, &[String])> {
    ENDPOINT_TIERS
        .iter()
        .find_map(|source| source.endpoints(zone).map(|endpoints| (*source, endpoints)))
}

/// Connections of one zone.
///
/// `sip` equals `data` when the zone has no secondary configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conns {
    pub data: ConnId,
    pub sip: ConnId,
}

impl Conns {
    pub fn sip_is_data(&self) -> bool {
        self.data == self.sip
    }
}

/// Compiled registry: the connection arena plus the indices into it.
///
/// Built once by [`ZoneConnectionCompiler::compile`] and read-only afterwards.
#[derive(Debug, Default)]
pub struct RemoteState {
    registry: ConnectionRegistry,
    conns_by_zone: HashMap<ZoneId, Conns>,
    meta_notify_to: BTreeMap<ZoneId, ConnId>,
    data_notify_to: BTreeMap<ZoneId, ConnId>,
}

impl RemoteState {
    pub fn conns(&self, zone_id: &ZoneId) -> Option<Conns> {
        self.conns_by_zone.get(zone_id).copied()
    }

    pub fn connection(&self, id: ConnId) -> Option<&dyn RemoteConnection> {
        self.registry.get(id)
    }

    /// Zones told about metadata changes
    pub fn meta_notify_targets(&self) -> &BTreeMap<ZoneId, ConnId> {
        &self.meta_notify_to
    }

    /// Zones told about data changes; always a subset of the meta targets
    pub fn data_notify_targets(&self) -> &BTreeMap<ZoneId, ConnId> {
        &self.data_notify_to
    }

    pub fn zone_ids(&self) -> impl Iterator<Item = &ZoneId> {
        self.conns_by_zone.keys()
    }

    /// Number of zones with connections
    pub fn len(&self) -> usize {
        self.conns_by_zone.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conns_by_zone.is_empty()
    }

    /// Number of connection objects owned, shared data/sip counted once
    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }
}

pub struct ZoneConnectionCompiler<'a> {
    zone_svc: &'a dyn ZoneService,
    factory: &'a ConnectionFactory,
}

impl<'a> ZoneConnectionCompiler<'a> {
    pub fn new(zone_svc: &'a dyn ZoneService, factory: &'a ConnectionFactory) -> Self {
        Self { zone_svc, factory }
    }

    /// Build connections for every peer zone of the local zone group
    pub fn compile(&self) -> RemoteState {
        let mut state = RemoteState::default();
        let zonegroup = self.zone_svc.zonegroup();

        for zone in zonegroup.zones.values() {
            self.init_conn(&mut state, zone, true);
        }
        for zone in zonegroup.foreign_zones.values() {
            self.init_conn(&mut state, zone, false);
        }

        info!(
            "[ZoneCompiler] Compiled {} zone connections ({} objects) for zonegroup {}: {} meta notify, {} data notify",
            state.len(),
            state.connection_count(),
            zonegroup.id,
            state.meta_notify_to.len(),
            state.data_notify_to.len()
        );

        state
    }

    fn init_conn(&self, state: &mut RemoteState, zone: &Zone, need_notify: bool) {
        if zone.id == *self.zone_svc.zone_id() {
            return;
        }

        if state.conns_by_zone.contains_key(&zone.id) {
            warn!(
                "[ZoneCompiler] Zone {} ({}) listed more than once, keeping first definition",
                zone.id, zone.name
            );
            return;
        }

        let Some((source, def_endpoints)) = default_endpoints(zone) else {
            warn!(
                "[ZoneCompiler] Can't generate connection for zone {} id {}: no data endpoints defined",
                zone.name, zone.id
            );
            return;
        };

        let api_name = self
            .zone_svc
            .find_zonegroup_by_zone(&zone.id)
            .map(|zonegroup| zonegroup.api_name.as_str());

        debug!(
            "[ZoneCompiler] Generating connection object for zone {} id {} (endpoints from {:?})",
            zone.name, zone.id, source
        );

        let data = match &zone.data_access_conf {
            Some(conf) => state.registry.add(self.factory.create_conn_from_config(
                &zone.name,
                &zone.id,
                def_endpoints,
                conf,
                api_name,
            )),
            None => state.registry.add(self.factory.create_conn(
                zone.id.as_str(),
                zone.endpoints.clone(),
                self.zone_svc.system_key().clone(),
                api_name.map(str::to_string),
            )),
        };

        let sip = match &zone.sip_conf {
            Some(sip_conf) => state.registry.add(self.factory.create_conn_from_config(
                &zone.name,
                &zone.id,
                def_endpoints,
                &sip_conf.rest_conf,
                api_name,
            )),
            None => data,
        };

        state.conns_by_zone.insert(zone.id.clone(), Conns { data, sip });

        if !need_notify {
            return;
        }

        state.meta_notify_to.insert(zone.id.clone(), data);
        if self.zone_svc.zone_data_notify_set().contains(&zone.id) {
            state.data_notify_to.insert(zone.id.clone(), data);
        }
    }
}
