// Wire models for the SmartDNS management API
//
// Field names mirror the JSON the server sends. Payload fields are
// optional so a present-but-null payload can be told apart from a
// malformed body; the endpoint methods turn `None` into
// `Error::MissingPayload`.

use serde::{Deserialize, Serialize};

/// Structured error body: `{"error": "...", "code": "..."}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

/// The last-query timestamp arrives either as epoch milliseconds or as
/// an RFC 3339 string depending on server version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireTimestamp {
    EpochMillis(i64),
    Text(String),
}

/// A DNS client row from `GET /api/client`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientEntry {
    pub id: u64,
    #[serde(default)]
    pub client_ip: String,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub last_query_timestamp: Option<WireTimestamp>,
}

/// Response body of `GET /api/client`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientListResponse {
    #[serde(default)]
    pub client_list: Option<Vec<ClientEntry>>,
    #[serde(default)]
    pub total_count: u64,
}

/// An upstream resolver row from `GET /api/upstream-server`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamServerEntry {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub server_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub query_success_rate: f64,
    /// Milliseconds; negative means no measurement yet.
    #[serde(default)]
    pub avg_time: f64,
    #[serde(default)]
    pub total_query_count: u64,
    #[serde(default)]
    pub total_query_success: u64,
}

/// Response body of `GET /api/upstream-server`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamServerResponse {
    #[serde(default)]
    pub upstream_servers: Option<Vec<UpstreamServerEntry>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn client_entry_accepts_numeric_and_string_timestamps() {
        let json = r#"[
            {"id": 1, "client_ip": "10.0.0.2", "mac": "aa:bb", "hostname": "h", "last_query_timestamp": 1700000000000},
            {"id": 2, "client_ip": "10.0.0.3", "mac": "cc:dd", "hostname": "g", "last_query_timestamp": "2024-01-01T00:00:00Z"}
        ]"#;
        let entries: Vec<ClientEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(
            entries[0].last_query_timestamp,
            Some(WireTimestamp::EpochMillis(1_700_000_000_000))
        );
        assert_eq!(
            entries[1].last_query_timestamp,
            Some(WireTimestamp::Text("2024-01-01T00:00:00Z".into()))
        );
    }

    #[test]
    fn null_client_list_is_none() {
        let resp: ClientListResponse =
            serde_json::from_str(r#"{"client_list": null, "total_count": 0}"#).unwrap();
        assert!(resp.client_list.is_none());
    }

    #[test]
    fn upstream_defaults_missing_fields() {
        let resp: UpstreamServerResponse =
            serde_json::from_str(r#"{"upstream_servers": [{"host": "dns.example", "avg_time": -1}]}"#)
                .unwrap();
        let servers = resp.upstream_servers.unwrap();
        assert_eq!(servers[0].host, "dns.example");
        assert!(servers[0].avg_time < 0.0);
        assert_eq!(servers[0].total_query_count, 0);
    }
}
