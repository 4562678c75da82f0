//! zonemux Gateway
//!
//! Request-side plumbing for a multi-site object storage gateway:
//! - Outbound connections to every peer zone of the topology
//! - Per-zone credential resolution with system key fallback
//! - Zone lookup by id or name, notification fan-out targets
//! - Redirect zone endpoint resolution

pub mod logging;
pub mod remote;

pub use logging::{init_tracing, LogConfig};
pub use remote::{
    ConnId, ConnectionFactory, ConnectionSpec, Connector, Conns, CredentialError,
    CredentialResolver, RemoteConnection, RemoteCtl, RemoteState, RestConnector, ZoneConns,
};
