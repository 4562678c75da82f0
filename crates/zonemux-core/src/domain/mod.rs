//! Domain entities and value objects
//!
//! - Topology entities (ZoneGroup, Zone and its REST overrides)
//! - Credentials (AccessKey, UserRecord)

mod credential;
mod zone;
mod zonegroup;

pub use credential::*;
pub use zone::*;
pub use zonegroup::*;
