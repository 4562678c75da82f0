//! # zonemux Core Library
//!
//! Domain entities and collaborator interfaces for the zonemux remote-zone
//! registry.
//!
//! ## Modules
//!
//! - `domain` - Topology entities (ZoneGroup, Zone) and credentials
//! - `repository` - Zone configuration and identity service traits
//! - `topology` - JSON topology files and static implementations of the traits

pub mod domain;
pub mod repository;
pub mod topology;

// Re-export commonly used types
pub use domain::*;
pub use repository::*;
pub use topology::{StaticUserRepository, StaticZoneService, TopologyConfig, TopologyError};
