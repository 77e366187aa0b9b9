// ── DNS client records ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A device that has queried the DNS service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: u64,
    pub client_ip: String,
    pub mac: String,
    pub hostname: String,
    /// `None` when the server sent no timestamp or an unparseable one.
    pub last_query_timestamp: Option<DateTime<Utc>>,
}

/// One server-side page of client records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPage {
    pub client_list: Vec<ClientRecord>,
    /// Total rows matching the current filters, across all pages.
    pub total_count: u64,
}
