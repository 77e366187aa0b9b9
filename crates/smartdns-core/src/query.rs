// ── Query parameters ──
//
// Table state is flattened into an ordered list of query pairs for the
// clients endpoint: `page_num`, `page_size`, then one pair per active
// column filter in the order the filters were added.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::columns::ClientColumn;

/// An active column filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub column: ClientColumn,
    pub value: String,
}

/// Parameters of one clients request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParameters {
    /// 1-based page number.
    pub page_num: u32,
    pub page_size: u32,
    pub filters: Vec<ColumnFilter>,
}

impl QueryParameters {
    /// Flatten into query pairs, pagination first.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 2);
        pairs.push(("page_num".to_owned(), self.page_num.to_string()));
        pairs.push(("page_size".to_owned(), self.page_size.to_string()));
        pairs.extend(
            self.filters
                .iter()
                .map(|f| (f.column.id().to_owned(), f.value.clone())),
        );
        pairs
    }
}

/// Parse column filters out of a URL query string.
///
/// Accepts a bare query (`a=1&b=2`), one with a leading `?`, or a full URL.
/// Keys that are not client column ids are ignored. Every other pair is
/// kept in order, including empty values and repeated keys, so the request
/// carries exactly what the link said.
pub fn filters_from_query(input: &str) -> Vec<ColumnFilter> {
    let input = input.trim();
    let query = if input.contains("://") {
        Url::parse(input)
            .ok()
            .and_then(|u| u.query().map(str::to_owned))
            .unwrap_or_default()
    } else {
        input.trim_start_matches('?').to_owned()
    };

    url::form_urlencoded::parse(query.as_bytes())
        .filter_map(|(key, value)| {
            ClientColumn::from_id(&key).map(|column| ColumnFilter {
                column,
                value: value.into_owned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(column: ClientColumn, value: &str) -> ColumnFilter {
        ColumnFilter {
            column,
            value: value.into(),
        }
    }

    #[test]
    fn keeps_only_known_columns() {
        let filters = filters_from_query("client_ip=10.0.0.1&foo=bar&hostname=nas");
        assert_eq!(
            filters,
            vec![
                filter(ClientColumn::ClientIp, "10.0.0.1"),
                filter(ClientColumn::Hostname, "nas"),
            ]
        );
    }

    #[test]
    fn repeated_keys_are_kept_in_order() {
        let filters = filters_from_query("?mac=aa&id=4&mac=bb");
        assert_eq!(
            filters,
            vec![
                filter(ClientColumn::Mac, "aa"),
                filter(ClientColumn::Id, "4"),
                filter(ClientColumn::Mac, "bb"),
            ]
        );
    }

    #[test]
    fn empty_values_are_kept() {
        let filters = filters_from_query("hostname=&client_ip=10.0.0.1");
        assert_eq!(
            filters,
            vec![
                filter(ClientColumn::Hostname, ""),
                filter(ClientColumn::ClientIp, "10.0.0.1"),
            ]
        );
    }

    #[test]
    fn full_url_and_percent_decoding() {
        let filters = filters_from_query("http://dns.local/clients?hostname=my%20box&page_num=3");
        assert_eq!(filters, vec![filter(ClientColumn::Hostname, "my box")]);
    }

    #[test]
    fn pairs_put_pagination_first() {
        let params = QueryParameters {
            page_num: 2,
            page_size: 10,
            filters: vec![filter(ClientColumn::ClientIp, "10.0.0.1")],
        };
        let pairs = params.to_pairs();
        assert_eq!(pairs[0], ("page_num".to_owned(), "2".to_owned()));
        assert_eq!(pairs[1], ("page_size".to_owned(), "10".to_owned()));
        assert_eq!(pairs[2], ("client_ip".to_owned(), "10.0.0.1".to_owned()));
    }
}
