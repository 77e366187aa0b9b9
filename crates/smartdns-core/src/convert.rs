// ── API-to-domain type conversions ──
//
// Bridges raw `smartdns_api` response types into `smartdns_core::model`
// records. Timestamps are normalized to `DateTime<Utc>` regardless of the
// wire representation the server chose.

use chrono::{DateTime, Utc};

use smartdns_api::models::{ClientEntry, UpstreamServerEntry, WireTimestamp};
use smartdns_api::ClientList;

use crate::model::{ClientPage, ClientRecord, UpstreamServerRecord};

// ── Helpers ────────────────────────────────────────────────────────

/// Decode a wire timestamp: epoch milliseconds, an RFC 3339 string, or
/// a numeric string holding epoch milliseconds.
pub(crate) fn parse_timestamp(raw: &WireTimestamp) -> Option<DateTime<Utc>> {
    match raw {
        WireTimestamp::EpochMillis(ms) => DateTime::from_timestamp_millis(*ms),
        WireTimestamp::Text(s) => {
            let s = s.trim();
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| s.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis))
        }
    }
}

// ── Conversions ────────────────────────────────────────────────────

impl From<ClientEntry> for ClientRecord {
    fn from(entry: ClientEntry) -> Self {
        let last_query_timestamp = entry.last_query_timestamp.as_ref().and_then(parse_timestamp);
        Self {
            id: entry.id,
            client_ip: entry.client_ip,
            mac: entry.mac,
            hostname: entry.hostname,
            last_query_timestamp,
        }
    }
}

impl From<ClientList> for ClientPage {
    fn from(list: ClientList) -> Self {
        Self {
            client_list: list.client_list.into_iter().map(ClientRecord::from).collect(),
            total_count: list.total_count,
        }
    }
}

impl From<UpstreamServerEntry> for UpstreamServerRecord {
    fn from(entry: UpstreamServerEntry) -> Self {
        Self {
            host: entry.host,
            ip: entry.ip,
            port: entry.port,
            server_type: entry.server_type,
            status: entry.status,
            query_success_rate: entry.query_success_rate,
            avg_time: entry.avg_time,
            total_query_count: entry.total_query_count,
            total_query_success: entry.total_query_success,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn epoch_millis_and_rfc3339_agree() {
        let a = parse_timestamp(&WireTimestamp::EpochMillis(1_704_067_200_000)).unwrap();
        let b = parse_timestamp(&WireTimestamp::Text("2024-01-01T00:00:00Z".into())).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn numeric_string_is_epoch_millis() {
        let ts = parse_timestamp(&WireTimestamp::Text("1704067200000".into())).unwrap();
        assert_eq!(ts.timestamp(), 1_704_067_200);
    }

    #[test]
    fn garbage_timestamp_is_none() {
        assert!(parse_timestamp(&WireTimestamp::Text("yesterday".into())).is_none());
    }

    #[test]
    fn client_entry_converts() {
        let record = ClientRecord::from(ClientEntry {
            id: 3,
            client_ip: "10.0.0.9".into(),
            mac: "aa:bb:cc:dd:ee:ff".into(),
            hostname: "nas".into(),
            last_query_timestamp: None,
        });
        assert_eq!(record.id, 3);
        assert_eq!(record.client_ip, "10.0.0.9");
        assert!(record.last_query_timestamp.is_none());
    }
}
