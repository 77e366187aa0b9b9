// ── Upstream servers table state ──
//
// The full server list is fetched at once; filtering and sorting happen
// client-side on the retained rows. Status codes stay raw in the rows and
// are translated when cells are produced.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, warn};

use smartdns_api::error_message;

use crate::columns::{SortDirection, SortSpec, UpstreamColumn};
use crate::dispatch::{FetchTicket, RequestDispatcher};
use crate::error::CoreError;
use crate::fetch::FetchStatus;
use crate::format;
use crate::i18n::Translator;
use crate::model::UpstreamServerRecord;
use crate::session::{SessionHandler, check_session_error};

const FETCH_KEY: &str = "upstream-servers";

pub struct UpstreamServersTable {
    rows: Vec<UpstreamServerRecord>,
    status: FetchStatus,
    error: Option<CoreError>,
    global_filter: String,
    sort: Option<SortSpec<UpstreamColumn>>,
    dispatcher: RequestDispatcher,
    session: Arc<dyn SessionHandler>,
}

impl UpstreamServersTable {
    pub fn new(session: Arc<dyn SessionHandler>) -> Self {
        Self {
            rows: Vec::new(),
            status: FetchStatus::Idle,
            error: None,
            global_filter: String::new(),
            sort: None,
            dispatcher: RequestDispatcher::new(),
            session,
        }
    }

    // ── Fetching ─────────────────────────────────────────────────────

    /// Start a fetch of the full list. Always issues; a pending fetch is
    /// superseded.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        let ticket = self.dispatcher.force(&FETCH_KEY);
        self.status = FetchStatus::Loading;
        debug!(generation = ticket.generation(), "fetching upstream servers");
        ticket
    }

    /// Apply a fetch outcome. Returns `false` for a superseded ticket.
    /// On failure the previous rows stay.
    pub fn resolve(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<UpstreamServerRecord>, CoreError>,
    ) -> bool {
        if !self.dispatcher.complete(ticket) {
            return false;
        }
        match result {
            Ok(rows) => {
                self.rows = rows;
                self.status = FetchStatus::Success;
                self.error = None;
            }
            Err(err) => {
                self.status = FetchStatus::Error;
                if check_session_error(&err, self.session.as_ref()) {
                    self.error = None;
                } else {
                    warn!(error = %err, "upstream server fetch failed");
                    self.error = Some(err);
                }
            }
        }
        true
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn error(&self) -> Option<&CoreError> {
        self.error.as_ref()
    }

    /// Untranslated banner text. A missing payload reads "No data returned.".
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.as_ref().map(|e| error_message(e.code()))
    }

    pub fn rows(&self) -> &[UpstreamServerRecord] {
        &self.rows
    }

    // ── Global filter ────────────────────────────────────────────────

    pub fn global_filter(&self) -> &str {
        &self.global_filter
    }

    pub fn set_global_filter(&mut self, filter: impl Into<String>) {
        self.global_filter = filter.into();
    }

    // ── Sorting ──────────────────────────────────────────────────────

    pub fn sort(&self) -> Option<SortSpec<UpstreamColumn>> {
        self.sort
    }

    /// none → descending → ascending → none. Selecting another column
    /// starts it at descending. Non-sortable columns are ignored.
    pub fn toggle_sort(&mut self, column: UpstreamColumn) -> Option<SortSpec<UpstreamColumn>> {
        if !column.sortable() {
            return self.sort;
        }
        self.sort = match self.sort {
            Some(SortSpec {
                column: current,
                direction: SortDirection::Desc,
            }) if current == column => Some(SortSpec {
                column,
                direction: SortDirection::Asc,
            }),
            Some(SortSpec {
                column: current,
                direction: SortDirection::Asc,
            }) if current == column => None,
            _ => Some(SortSpec {
                column,
                direction: SortDirection::Desc,
            }),
        };
        self.sort
    }

    // ── Presentation ────────────────────────────────────────────────

    /// Rows after the global filter and sort, in display order.
    pub fn visible_rows(&self, tr: &Translator) -> Vec<&UpstreamServerRecord> {
        let needle = self.global_filter.trim().to_lowercase();
        let mut rows: Vec<&UpstreamServerRecord> = self
            .rows
            .iter()
            .filter(|row| {
                needle.is_empty()
                    || UpstreamColumn::ALL
                        .iter()
                        .any(|c| cell_text(row, *c, tr).to_lowercase().contains(&needle))
            })
            .collect();

        if let Some(spec) = self.sort {
            rows.sort_by(|a, b| {
                let ord = compare(a, b, spec.column, tr);
                match spec.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }
        rows
    }
}

/// Display text of one cell.
pub fn cell_text(row: &UpstreamServerRecord, column: UpstreamColumn, tr: &Translator) -> String {
    match column {
        UpstreamColumn::Host => row.host.clone(),
        UpstreamColumn::Ip => row.ip.clone(),
        UpstreamColumn::Port => row.port.to_string(),
        UpstreamColumn::ServerType => row.server_type.clone(),
        UpstreamColumn::Status => tr.status(&row.status),
        UpstreamColumn::SuccessRate => format::success_rate(row.query_success_rate),
        UpstreamColumn::AvgTime => format::avg_time(row.avg_time),
        UpstreamColumn::TotalQueryCount => row.total_query_count.to_string(),
        UpstreamColumn::TotalQuerySuccess => row.total_query_success.to_string(),
    }
}

fn compare(
    a: &UpstreamServerRecord,
    b: &UpstreamServerRecord,
    column: UpstreamColumn,
    tr: &Translator,
) -> Ordering {
    match column {
        UpstreamColumn::SuccessRate => a.query_success_rate.total_cmp(&b.query_success_rate),
        UpstreamColumn::AvgTime => a.avg_time.total_cmp(&b.avg_time),
        UpstreamColumn::TotalQueryCount => a.total_query_count.cmp(&b.total_query_count),
        UpstreamColumn::TotalQuerySuccess => a.total_query_success.cmp(&b.total_query_success),
        UpstreamColumn::Port => a.port.cmp(&b.port),
        other => cell_text(a, other, tr).cmp(&cell_text(b, other, tr)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use crate::session::tests::CountingSessionHandler;

    fn server(host: &str, status: &str, rate: f64, avg: f64, total: u64) -> UpstreamServerRecord {
        UpstreamServerRecord {
            host: host.into(),
            ip: "192.0.2.1".into(),
            port: 53,
            server_type: "udp".into(),
            status: status.into(),
            query_success_rate: rate,
            avg_time: avg,
            total_query_count: total,
            total_query_success: total,
        }
    }

    fn loaded() -> UpstreamServersTable {
        let mut t = UpstreamServersTable::new(Arc::new(CountingSessionHandler::default()));
        let ticket = t.begin_fetch();
        t.resolve(
            &ticket,
            Ok(vec![
                server("alpha", "normal", 99.0, 10.0, 300),
                server("beta", "abnormal", 50.0, -1.0, 100),
                server("gamma", "normal", 75.5, 30.0, 200),
            ]),
        );
        t
    }

    fn hosts(rows: &[&UpstreamServerRecord]) -> Vec<String> {
        rows.iter().map(|r| r.host.clone()).collect()
    }

    #[test]
    fn sort_cycles_desc_asc_none() {
        let mut t = loaded();
        let tr = Translator::new(Language::En);

        t.toggle_sort(UpstreamColumn::TotalQueryCount);
        assert_eq!(hosts(&t.visible_rows(&tr)), ["alpha", "gamma", "beta"]);

        t.toggle_sort(UpstreamColumn::TotalQueryCount);
        assert_eq!(hosts(&t.visible_rows(&tr)), ["beta", "gamma", "alpha"]);

        assert!(t.toggle_sort(UpstreamColumn::TotalQueryCount).is_none());
        assert_eq!(hosts(&t.visible_rows(&tr)), ["alpha", "beta", "gamma"]);
    }

    #[test]
    fn switching_column_starts_descending() {
        let mut t = loaded();
        t.toggle_sort(UpstreamColumn::AvgTime);
        t.toggle_sort(UpstreamColumn::AvgTime);
        let spec = t.toggle_sort(UpstreamColumn::SuccessRate).unwrap();
        assert_eq!(spec.column, UpstreamColumn::SuccessRate);
        assert_eq!(spec.direction, SortDirection::Desc);
        assert!(t.toggle_sort(UpstreamColumn::Host).is_some_and(|s| s == spec));
    }

    #[test]
    fn global_filter_matches_translated_cells() {
        let mut t = loaded();
        let zh = Translator::new(Language::ZhCn);
        t.set_global_filter("异常");
        assert_eq!(hosts(&t.visible_rows(&zh)), ["beta"]);

        let en = Translator::new(Language::En);
        t.set_global_filter("N/A");
        assert_eq!(hosts(&t.visible_rows(&en)), ["beta"]);

        t.set_global_filter("ALPHA");
        assert_eq!(hosts(&t.visible_rows(&en)), ["alpha"]);
    }

    #[test]
    fn refresh_failure_keeps_rows() {
        let mut t = loaded();
        let ticket = t.begin_fetch();
        assert!(t.is_loading());
        t.resolve(&ticket, Err(CoreError::MissingPayload));
        assert_eq!(t.rows().len(), 3);
        assert_eq!(t.error_message(), Some("No data returned."));
    }

    #[test]
    fn superseded_refresh_is_discarded() {
        let mut t = loaded();
        let first = t.begin_fetch();
        let second = t.begin_fetch();
        assert!(!t.resolve(&first, Ok(Vec::new())));
        assert_eq!(t.rows().len(), 3);
        assert!(t.resolve(&second, Ok(Vec::new())));
        assert!(t.rows().is_empty());
    }

    #[test]
    fn session_expiry_has_no_banner() {
        let handler = Arc::new(CountingSessionHandler::default());
        let mut t = UpstreamServersTable::new(handler.clone());
        let ticket = t.begin_fetch();
        t.resolve(&ticket, Err(CoreError::SessionExpired));
        assert!(t.error_message().is_none());
        assert_eq!(handler.count(), 1);
    }
}
