//! Remote zone registry - outbound connections to peer zones
//!
//! - **CredentialResolver**: Access key tiers and identity lookups
//! - **ConnectionFactory**: Builds connections from REST overrides or resolved inputs
//! - **ConnectionRegistry**: Arena owning every connection object
//! - **ZoneConnectionCompiler**: Topology -> connections and notify indices
//! - **RemoteCtl**: Lookups by zone id/name and redirect resolution

mod compiler;
mod connection;
mod controller;
mod credential;
mod factory;
mod registry;

pub use compiler::{
    default_endpoints, Conns, EndpointSource, RemoteState, ZoneConnectionCompiler, ENDPOINT_TIERS,
};
pub use connection::{ConnectionSpec, Connector, RemoteConnection, RestConn, RestConnector};
pub use controller::{RemoteCtl, ZoneConns};
pub use credential::{CredentialError, CredentialResolver, CredentialSource};
pub use factory::ConnectionFactory;
pub use registry::{ConnId, ConnectionRegistry};
