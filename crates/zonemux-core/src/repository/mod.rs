//! Collaborator traits
//!
//! These traits define what the remote registry needs from the zone
//! configuration service and the identity service, without tying it to a
//! particular backing store (static topology file, cluster metadata, mocks).

use std::collections::BTreeSet;

use crate::domain::{AccessKey, UserId, UserRecord, ZoneGroup, ZoneId};

/// Result type for repository operations
pub type RepoResult<T> = anyhow::Result<T>;

/// Zone configuration service.
///
/// Read-only view of the topology as seen from the zone this process runs in.
pub trait ZoneService: Send + Sync {
    /// Id of the zone this process belongs to
    fn zone_id(&self) -> &ZoneId;

    /// The zone group this process belongs to
    fn zonegroup(&self) -> &ZoneGroup;

    /// Find the zone group that has `zone_id` as a member zone
    fn find_zonegroup_by_zone(&self, zone_id: &ZoneId) -> Option<&ZoneGroup>;

    /// Resolve a zone name to its id
    fn find_zone_id_by_name(&self, name: &str) -> Option<ZoneId>;

    /// Id of the local zone group
    fn zonegroup_id(&self) -> &str {
        &self.zonegroup().id
    }

    /// System-wide default credential
    fn system_key(&self) -> &AccessKey {
        &self.zonegroup().system_key
    }

    /// Zones that receive data change notifications
    fn zone_data_notify_set(&self) -> &BTreeSet<ZoneId> {
        &self.zonegroup().data_notify
    }

    /// Configured redirect zone, `None` when unset
    fn redirect_zone(&self) -> Option<&ZoneId> {
        let redirect_zone = &self.zonegroup().redirect_zone;
        (!redirect_zone.is_empty()).then_some(redirect_zone)
    }
}

/// Identity service
pub trait UserRepository: Send + Sync {
    /// Get the user owning an access key
    fn get_by_access_key(&self, access_key: &str) -> RepoResult<Option<UserRecord>>;

    /// Get a user by id
    fn get_by_uid(&self, uid: &UserId) -> RepoResult<Option<UserRecord>>;
}
