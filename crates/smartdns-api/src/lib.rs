// smartdns-api: Async Rust client for the SmartDNS management API
//
// Covers the session login flow, the paginated client listing, client
// deletion, and upstream server statistics. Responses are returned as raw
// wire models; `smartdns-core` maps them into display records.

pub mod auth;
pub mod client;
pub mod clients;
pub mod error;
pub mod models;
pub mod transport;
pub mod upstream;

pub use client::SmartDnsClient;
pub use clients::ClientList;
pub use error::{Error, ErrorCode, error_message};
pub use models::{
    ClientEntry, ClientListResponse, UpstreamServerEntry, UpstreamServerResponse, WireTimestamp,
};
pub use transport::{TlsMode, TransportConfig};
