// ── Upstream resolver records ──

use serde::{Deserialize, Serialize};

/// A configured upstream resolver and its query statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamServerRecord {
    pub host: String,
    pub ip: String,
    pub port: u16,
    pub server_type: String,
    /// Raw status code; translated for display at render time so a
    /// language switch never needs a refetch.
    pub status: String,
    /// Percentage in `0..=100`.
    pub query_success_rate: f64,
    /// Milliseconds. Negative means unavailable.
    pub avg_time: f64,
    pub total_query_count: u64,
    pub total_query_success: u64,
}
