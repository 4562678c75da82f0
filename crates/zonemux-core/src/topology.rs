//! Static topology configuration
//!
//! Loads a zone topology from a JSON file and serves it through the
//! [`ZoneService`] and [`UserRepository`] traits. Used by hosts that do not
//! have a live configuration service, and by tests.
//!
//! ```json
//! {
//!   "zone_id": "z-local",
//!   "zonegroup": { "id": "zg1", "api_name": "us", "zones": { ... } },
//!   "other_zonegroups": [],
//!   "users": []
//! }
//! ```

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{UserId, UserRecord, ZoneGroup, ZoneId};
use crate::repository::{RepoResult, UserRepository, ZoneService};

/// Errors raised while loading or validating a topology file
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("failed to read topology file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid topology JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("zone {zone_id} is not a member of zone group {zonegroup}")]
    UnknownLocalZone { zone_id: ZoneId, zonegroup: String },

    #[error("zone group {zonegroup} lists zone {zone_id} under key {key}")]
    ZoneKeyMismatch {
        zonegroup: String,
        key: ZoneId,
        zone_id: ZoneId,
    },

    #[error("zone group {0} is defined more than once")]
    DuplicateZoneGroup(String),
}

/// Topology file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopologyConfig {
    /// Zone this process runs in
    pub zone_id: ZoneId,

    /// The local zone group
    pub zonegroup: ZoneGroup,

    /// Other zone groups of the realm, used to resolve API names of foreign zones
    #[serde(default)]
    pub other_zonegroups: Vec<ZoneGroup>,

    /// Users served by [`StaticUserRepository`]
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

impl TopologyConfig {
    /// Load and validate a topology file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TopologyError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        debug!("[Topology] Loaded {} bytes from {}", raw.len(), path.display());
        Self::from_json_str(&raw)
    }

    /// Parse and validate a topology document
    pub fn from_json_str(raw: &str) -> Result<Self, TopologyError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// All zone groups, local first
    pub fn zonegroups(&self) -> impl Iterator<Item = &ZoneGroup> {
        std::iter::once(&self.zonegroup).chain(self.other_zonegroups.iter())
    }

    /// Check the cross references a topology file can get wrong.
    ///
    /// Data notify and redirect zone ids that resolve to nothing are logged
    /// and accepted.
    pub fn validate(&self) -> Result<(), TopologyError> {
        let mut seen = BTreeSet::new();
        for zonegroup in self.zonegroups() {
            if !seen.insert(zonegroup.id.as_str()) {
                return Err(TopologyError::DuplicateZoneGroup(zonegroup.id.clone()));
            }
            for (key, zone) in zonegroup.zones.iter().chain(zonegroup.foreign_zones.iter()) {
                if *key != zone.id {
                    return Err(TopologyError::ZoneKeyMismatch {
                        zonegroup: zonegroup.id.clone(),
                        key: key.clone(),
                        zone_id: zone.id.clone(),
                    });
                }
            }
        }

        if !self.zonegroup.contains_zone(&self.zone_id) {
            return Err(TopologyError::UnknownLocalZone {
                zone_id: self.zone_id.clone(),
                zonegroup: self.zonegroup.id.clone(),
            });
        }

        // Unresolvable ids are accepted
        for zone_id in self
            .zonegroup
            .data_notify
            .iter()
            .filter(|zone_id| !self.zonegroup.contains_zone(zone_id))
        {
            warn!(
                "[Topology] Data notify zone {} is not a member of zone group {}, it will not be notified",
                zone_id, self.zonegroup.id
            );
        }

        let redirect_zone = &self.zonegroup.redirect_zone;
        if !redirect_zone.is_empty()
            && !self
                .zonegroups()
                .flat_map(|zg| zg.all_zones())
                .any(|zone| zone.id == *redirect_zone)
        {
            warn!(
                "[Topology] Redirect zone {} is not a known zone, redirects will fail",
                redirect_zone
            );
        }

        Ok(())
    }
}

/// [`ZoneService`] backed by a validated [`TopologyConfig`]
#[derive(Debug)]
pub struct StaticZoneService {
    config: TopologyConfig,
    /// zone name -> zone id, over every zone the topology mentions
    zone_names: HashMap<String, ZoneId>,
    /// member zone id -> index into `zonegroups()`
    zonegroup_by_zone: HashMap<ZoneId, usize>,
}

impl StaticZoneService {
    pub fn new(config: TopologyConfig) -> Result<Self, TopologyError> {
        config.validate()?;

        let mut zone_names = HashMap::new();
        let mut zonegroup_by_zone = HashMap::new();

        // Member zones first so that a zone's own group wins over a foreign listing
        for (idx, zonegroup) in config.zonegroups().enumerate() {
            for zone in zonegroup.zones.values() {
                zonegroup_by_zone.entry(zone.id.clone()).or_insert(idx);
                zone_names
                    .entry(zone.name.clone())
                    .or_insert_with(|| zone.id.clone());
            }
        }
        for zonegroup in config.zonegroups() {
            for zone in zonegroup.foreign_zones.values() {
                if let Some(existing) = zone_names.get(&zone.name) {
                    if *existing != zone.id {
                        warn!(
                            "[Topology] Zone name {} maps to both {} and {}, keeping {}",
                            zone.name, existing, zone.id, existing
                        );
                    }
                    continue;
                }
                zone_names.insert(zone.name.clone(), zone.id.clone());
            }
        }

        Ok(Self {
            config,
            zone_names,
            zonegroup_by_zone,
        })
    }

    /// Load a topology file and build the service from it
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TopologyError> {
        Self::new(TopologyConfig::load(path)?)
    }

    pub fn config(&self) -> &TopologyConfig {
        &self.config
    }
}

impl ZoneService for StaticZoneService {
    fn zone_id(&self) -> &ZoneId {
        &self.config.zone_id
    }

    fn zonegroup(&self) -> &ZoneGroup {
        &self.config.zonegroup
    }

    fn find_zonegroup_by_zone(&self, zone_id: &ZoneId) -> Option<&ZoneGroup> {
        let idx = *self.zonegroup_by_zone.get(zone_id)?;
        self.config.zonegroups().nth(idx)
    }

    fn find_zone_id_by_name(&self, name: &str) -> Option<ZoneId> {
        self.zone_names.get(name).cloned()
    }
}

/// [`UserRepository`] over the `users` section of a topology file
#[derive(Debug, Default)]
pub struct StaticUserRepository {
    users: HashMap<UserId, UserRecord>,
    /// access key id -> owning user
    key_owners: HashMap<String, UserId>,
}

impl StaticUserRepository {
    pub fn new(users: impl IntoIterator<Item = UserRecord>) -> Self {
        let mut repo = Self::default();
        for user in users {
            for key_id in user.access_keys.keys() {
                repo.key_owners.insert(key_id.clone(), user.user_id.clone());
            }
            repo.users.insert(user.user_id.clone(), user);
        }
        repo
    }

    pub fn from_config(config: &TopologyConfig) -> Self {
        Self::new(config.users.iter().cloned())
    }
}

impl UserRepository for StaticUserRepository {
    fn get_by_access_key(&self, access_key: &str) -> RepoResult<Option<UserRecord>> {
        Ok(self
            .key_owners
            .get(access_key)
            .and_then(|uid| self.users.get(uid))
            .cloned())
    }

    fn get_by_uid(&self, uid: &UserId) -> RepoResult<Option<UserRecord>> {
        Ok(self.users.get(uid).cloned())
    }
}
