//! ZoneGroup entity - a set of zones sharing one namespace

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::credential::AccessKey;
use super::zone::{Zone, ZoneId};

/// A zone group and the zones it knows about.
///
/// `zones` are members of this group. `foreign_zones` belong to other zone
/// groups and are listed here for cross-group awareness only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneGroup {
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// API group name advertised to peers (e.g. an S3 region name)
    #[serde(default)]
    pub api_name: String,

    #[serde(default)]
    pub zones: BTreeMap<ZoneId, Zone>,

    #[serde(default)]
    pub foreign_zones: BTreeMap<ZoneId, Zone>,

    /// Zones that also receive data change notifications
    #[serde(default)]
    pub data_notify: BTreeSet<ZoneId>,

    /// Credential used when a zone has no credential of its own
    #[serde(default)]
    pub system_key: AccessKey,

    /// Zone that requests are forwarded to; empty means no redirect
    #[serde(default)]
    pub redirect_zone: ZoneId,
}

impl ZoneGroup {
    pub fn new(id: impl Into<String>, api_name: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            api_name: api_name.into(),
            ..Default::default()
        }
    }

    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zones.insert(zone.id.clone(), zone);
        self
    }

    pub fn with_foreign_zone(mut self, zone: Zone) -> Self {
        self.foreign_zones.insert(zone.id.clone(), zone);
        self
    }

    pub fn with_data_notify(mut self, zone_id: impl Into<ZoneId>) -> Self {
        self.data_notify.insert(zone_id.into());
        self
    }

    pub fn with_system_key(mut self, key: AccessKey) -> Self {
        self.system_key = key;
        self
    }

    pub fn with_redirect_zone(mut self, zone_id: impl Into<ZoneId>) -> Self {
        self.redirect_zone = zone_id.into();
        self
    }

    /// Whether `zone_id` is a member (not a foreign zone) of this group
    pub fn contains_zone(&self, zone_id: &ZoneId) -> bool {
        self.zones.contains_key(zone_id)
    }

    /// Local and foreign zones, local first
    pub fn all_zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values().chain(self.foreign_zones.values())
    }
}
