// ── Table column definitions ──
//
// Column ids double as query-parameter names for the clients endpoint,
// so their `snake_case` spelling is part of the wire contract.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Comparison applied to a column filter.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FilterMode {
    #[default]
    Equals,
    Contains,
}

impl FilterMode {
    /// Translation key for the mode label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Equals => "Equals",
            Self::Contains => "Contains",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Single-column sort state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec<C> {
    pub column: C,
    pub direction: SortDirection,
}

// ── Clients ──────────────────────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ClientColumn {
    Id,
    ClientIp,
    Mac,
    Hostname,
    LastQueryTimestamp,
}

impl ClientColumn {
    pub const ALL: [Self; 5] = [
        Self::Id,
        Self::ClientIp,
        Self::Mac,
        Self::Hostname,
        Self::LastQueryTimestamp,
    ];

    /// Column id, also the query-parameter name.
    pub fn id(self) -> &'static str {
        self.into()
    }

    /// Parse a column id; unknown ids yield `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        id.parse().ok()
    }

    /// Translation key for the header.
    pub fn header(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::ClientIp => "Client IP",
            Self::Mac => "Mac Address",
            Self::Hostname => "Host Name",
            Self::LastQueryTimestamp => "Last Query Time",
        }
    }

    /// Preferred width in terminal cells.
    pub fn width(self) -> u16 {
        match self {
            Self::Id => 8,
            Self::ClientIp => 40,
            Self::Mac => 20,
            Self::Hostname => 24,
            Self::LastQueryTimestamp => 24,
        }
    }

    /// Filter modes offered for this column. The first entry is the default.
    pub fn filter_modes(self) -> &'static [FilterMode] {
        match self {
            Self::ClientIp => &[FilterMode::Equals, FilterMode::Contains],
            Self::Id | Self::Mac | Self::Hostname | Self::LastQueryTimestamp => {
                &[FilterMode::Equals]
            }
        }
    }
}

// ── Upstream servers ─────────────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UpstreamColumn {
    Host,
    Ip,
    Port,
    ServerType,
    Status,
    #[strum(serialize = "query_success_rate")]
    #[serde(rename = "query_success_rate")]
    SuccessRate,
    AvgTime,
    TotalQueryCount,
    TotalQuerySuccess,
}

impl UpstreamColumn {
    pub const ALL: [Self; 9] = [
        Self::Host,
        Self::Ip,
        Self::Port,
        Self::ServerType,
        Self::Status,
        Self::SuccessRate,
        Self::AvgTime,
        Self::TotalQueryCount,
        Self::TotalQuerySuccess,
    ];

    pub fn id(self) -> &'static str {
        self.into()
    }

    pub fn header(self) -> &'static str {
        match self {
            Self::Host => "Host",
            Self::Ip => "IP",
            Self::Port => "Port",
            Self::ServerType => "Type",
            Self::Status => "Status",
            Self::SuccessRate => "Success Rate",
            Self::AvgTime => "Avg Time",
            Self::TotalQueryCount => "Total Query Count",
            Self::TotalQuerySuccess => "Total Success Number",
        }
    }

    pub fn width(self) -> u16 {
        match self {
            Self::Host => 24,
            Self::Ip => 18,
            Self::Port => 6,
            Self::ServerType => 8,
            Self::Status => 10,
            Self::SuccessRate => 14,
            Self::AvgTime => 12,
            Self::TotalQueryCount => 18,
            Self::TotalQuerySuccess => 20,
        }
    }

    pub fn sortable(self) -> bool {
        matches!(
            self,
            Self::Status
                | Self::SuccessRate
                | Self::AvgTime
                | Self::TotalQueryCount
                | Self::TotalQuerySuccess
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_column_ids_are_wire_names() {
        let ids: Vec<_> = ClientColumn::ALL.iter().map(|c| c.id()).collect();
        assert_eq!(
            ids,
            ["id", "client_ip", "mac", "hostname", "last_query_timestamp"]
        );
        assert_eq!(ClientColumn::from_id("client_ip"), Some(ClientColumn::ClientIp));
        assert_eq!(ClientColumn::from_id("bogus"), None);
    }

    #[test]
    fn only_client_ip_offers_contains() {
        for column in ClientColumn::ALL {
            let modes = column.filter_modes();
            assert_eq!(modes[0], FilterMode::Equals);
            assert_eq!(
                modes.contains(&FilterMode::Contains),
                column == ClientColumn::ClientIp
            );
        }
    }

    #[test]
    fn identity_columns_are_not_sortable() {
        assert!(!UpstreamColumn::Host.sortable());
        assert!(!UpstreamColumn::Port.sortable());
        assert!(UpstreamColumn::AvgTime.sortable());
        assert_eq!(UpstreamColumn::SuccessRate.id(), "query_success_rate");
    }
}
