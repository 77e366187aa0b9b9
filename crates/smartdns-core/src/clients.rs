// ── Clients table state ──
//
// Server-side filtered and paginated view of DNS clients. Owns the filter,
// filter-mode and pagination state, turns it into `QueryParameters`, and
// reconciles fetch results through the `RequestDispatcher`. The previous
// page stays visible while a newer request is pending.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use smartdns_api::error_message;

use crate::columns::{ClientColumn, FilterMode};
use crate::dispatch::{FetchTicket, RequestDispatcher};
use crate::error::CoreError;
use crate::fetch::FetchStatus;
use crate::i18n::Translator;
use crate::model::{ClientPage, ClientRecord};
use crate::notify::Notification;
use crate::query::{ColumnFilter, QueryParameters, filters_from_query};
use crate::session::{SessionHandler, check_session_error};

pub const PAGE_SIZE_OPTIONS: [u32; 8] = [5, 10, 15, 20, 25, 30, 50, 100];
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Banner for a malformed or missing clients payload.
pub const LOAD_ERROR: &str = "Error loading data";

/// Everything that determines which page is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientsFetchKey {
    pub filter_modes: BTreeMap<ClientColumn, FilterMode>,
    pub filters: Vec<ColumnFilter>,
    pub page_index: u32,
    pub page_size: u32,
}

/// A request the caller must execute and hand back to [`ClientsTable::resolve`].
#[derive(Debug, Clone)]
pub struct ClientsRequest {
    pub ticket: FetchTicket,
    pub params: QueryParameters,
}

pub struct ClientsTable {
    filters: Vec<ColumnFilter>,
    filter_modes: BTreeMap<ClientColumn, FilterMode>,
    page_index: u32,
    page_size: u32,
    page: Option<ClientPage>,
    status: FetchStatus,
    error: Option<CoreError>,
    dispatcher: RequestDispatcher,
    session: Arc<dyn SessionHandler>,
}

impl ClientsTable {
    pub fn new(session: Arc<dyn SessionHandler>) -> Self {
        Self {
            filters: Vec::new(),
            filter_modes: ClientColumn::ALL
                .iter()
                .map(|c| (*c, FilterMode::Equals))
                .collect(),
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            page: None,
            status: FetchStatus::Idle,
            error: None,
            dispatcher: RequestDispatcher::new(),
            session,
        }
    }

    // ── Filters ──────────────────────────────────────────────────────

    /// Replace the column filters with those found in a URL query string.
    /// Returns the number of filters seeded.
    pub fn seed_from_query(&mut self, query: &str) -> usize {
        self.filters = filters_from_query(query);
        self.page_index = 0;
        debug!(count = self.filters.len(), "seeded client filters from query");
        self.filters.len()
    }

    pub fn filters(&self) -> &[ColumnFilter] {
        &self.filters
    }

    pub fn filter_value(&self, column: ClientColumn) -> Option<&str> {
        self.filters
            .iter()
            .find(|f| f.column == column)
            .map(|f| f.value.as_str())
    }

    /// Set or, for an empty value, clear a column filter. A column seeded
    /// more than once collapses to this single value. Resets to the first
    /// page when anything changed.
    pub fn set_filter(&mut self, column: ClientColumn, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() {
            return self.clear_filter(column);
        }
        let mut seen = false;
        let mut changed = false;
        self.filters.retain_mut(|f| {
            if f.column != column {
                return true;
            }
            if seen {
                changed = true;
                return false;
            }
            seen = true;
            if f.value != value {
                f.value.clone_from(&value);
                changed = true;
            }
            true
        });
        if !seen {
            self.filters.push(ColumnFilter { column, value });
            changed = true;
        }
        if changed {
            self.page_index = 0;
        }
        changed
    }

    pub fn clear_filter(&mut self, column: ClientColumn) -> bool {
        let before = self.filters.len();
        self.filters.retain(|f| f.column != column);
        let changed = self.filters.len() != before;
        if changed {
            self.page_index = 0;
        }
        changed
    }

    pub fn clear_filters(&mut self) -> bool {
        if self.filters.is_empty() {
            return false;
        }
        self.filters.clear();
        self.page_index = 0;
        true
    }

    pub fn filter_mode(&self, column: ClientColumn) -> FilterMode {
        self.filter_modes
            .get(&column)
            .copied()
            .unwrap_or_default()
    }

    /// Set a column's filter mode. Modes the column doesn't offer are
    /// rejected.
    pub fn set_filter_mode(&mut self, column: ClientColumn, mode: FilterMode) -> bool {
        if !column.filter_modes().contains(&mode) || self.filter_mode(column) == mode {
            return false;
        }
        self.filter_modes.insert(column, mode);
        self.page_index = 0;
        true
    }

    /// Advance to the column's next offered mode.
    pub fn cycle_filter_mode(&mut self, column: ClientColumn) -> FilterMode {
        let modes = column.filter_modes();
        let current = self.filter_mode(column);
        let next = modes
            .iter()
            .position(|m| *m == current)
            .and_then(|i| modes.get((i + 1) % modes.len()))
            .copied()
            .unwrap_or(current);
        self.set_filter_mode(column, next);
        next
    }

    // ── Pagination ───────────────────────────────────────────────────

    /// 0-based.
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Accepts only values from [`PAGE_SIZE_OPTIONS`]. Resets to the first page.
    pub fn set_page_size(&mut self, size: u32) -> bool {
        if !PAGE_SIZE_OPTIONS.contains(&size) || size == self.page_size {
            return false;
        }
        self.page_size = size;
        self.page_index = 0;
        true
    }

    /// Step through [`PAGE_SIZE_OPTIONS`], clamping at either end.
    pub fn step_page_size(&mut self, larger: bool) -> bool {
        let idx = PAGE_SIZE_OPTIONS
            .iter()
            .position(|s| *s == self.page_size)
            .unwrap_or(1);
        let next = if larger {
            PAGE_SIZE_OPTIONS.get(idx + 1).copied()
        } else {
            idx.checked_sub(1)
                .and_then(|i| PAGE_SIZE_OPTIONS.get(i).copied())
        };
        next.is_some_and(|size| self.set_page_size(size))
    }

    pub fn total_count(&self) -> u64 {
        self.page.as_ref().map_or(0, |p| p.total_count)
    }

    /// `ceil(total_count / page_size)`.
    pub fn page_count(&self) -> u32 {
        let pages = self.total_count().div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Pagination is disabled while a refetch is in flight.
    pub fn can_paginate(&self) -> bool {
        !self.status.is_loading()
    }

    pub fn next_page(&mut self) -> bool {
        if !self.can_paginate() || self.page_index + 1 >= self.page_count() {
            return false;
        }
        self.page_index += 1;
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.can_paginate() || self.page_index == 0 {
            return false;
        }
        self.page_index -= 1;
        true
    }

    pub fn first_page(&mut self) -> bool {
        if !self.can_paginate() || self.page_index == 0 {
            return false;
        }
        self.page_index = 0;
        true
    }

    pub fn last_page(&mut self) -> bool {
        let last = self.page_count().saturating_sub(1);
        if !self.can_paginate() || self.page_index == last {
            return false;
        }
        self.page_index = last;
        true
    }

    // ── Fetching ─────────────────────────────────────────────────────

    pub fn query_parameters(&self) -> QueryParameters {
        QueryParameters {
            page_num: self.page_index + 1,
            page_size: self.page_size,
            filters: self.filters.clone(),
        }
    }

    pub fn fetch_key(&self) -> ClientsFetchKey {
        ClientsFetchKey {
            filter_modes: self.filter_modes.clone(),
            filters: self.filters.clone(),
            page_index: self.page_index,
            page_size: self.page_size,
        }
    }

    /// Issue a request if the fetch key changed since the last one.
    pub fn request_fetch(&mut self) -> Option<ClientsRequest> {
        let ticket = self.dispatcher.begin(&self.fetch_key())?;
        Some(self.start(ticket))
    }

    /// User-triggered refetch of the current key.
    pub fn refresh(&mut self) -> ClientsRequest {
        let ticket = self.dispatcher.force(&self.fetch_key());
        self.start(ticket)
    }

    fn start(&mut self, ticket: FetchTicket) -> ClientsRequest {
        self.status = FetchStatus::Loading;
        debug!(generation = ticket.generation(), "fetching clients");
        ClientsRequest {
            ticket,
            params: self.query_parameters(),
        }
    }

    /// Apply a fetch outcome. Returns `false` when the ticket was superseded
    /// and the result discarded.
    pub fn resolve(&mut self, ticket: &FetchTicket, result: Result<ClientPage, CoreError>) -> bool {
        if !self.dispatcher.complete(ticket) {
            return false;
        }
        match result {
            Ok(page) => {
                self.page = Some(page);
                self.status = FetchStatus::Success;
                self.error = None;
            }
            Err(err) => {
                self.status = FetchStatus::Error;
                if check_session_error(&err, self.session.as_ref()) {
                    self.error = None;
                } else {
                    warn!(error = %err, "client fetch failed");
                    self.error = Some(err);
                }
            }
        }
        true
    }

    // ── Read-out ─────────────────────────────────────────────────────

    /// Rows of the last successful page.
    pub fn rows(&self) -> &[ClientRecord] {
        self.page
            .as_ref()
            .map(|p| p.client_list.as_slice())
            .unwrap_or(&[])
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

    /// Untranslated banner text for the current error, if any.
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.as_ref().map(|e| {
            if e.is_load_failure() {
                LOAD_ERROR
            } else {
                error_message(e.code())
            }
        })
    }

    /// Session expiry on a row action still goes to the session handler.
    pub fn check_action_error(&self, err: &CoreError) -> bool {
        check_session_error(err, self.session.as_ref())
    }
}

// ── Row actions ──────────────────────────────────────────────────────

/// Notification for a finished delete. The row is never removed locally.
pub fn delete_notification(
    tr: &Translator,
    id: u64,
    client_ip: &str,
    outcome: Result<(), &CoreError>,
) -> Notification {
    let id = id.to_string();
    match outcome {
        Ok(()) => Notification::success(tr.t_with(
            "Delete client {{id}} {{client_ip}} successfully.",
            &[("id", &id), ("client_ip", client_ip)],
        )),
        Err(err) => Notification::error(format!(
            "{}: {}, id: {id}",
            tr.t("Error"),
            tr.t(error_message(err.code()))
        )),
    }
}

pub fn mac_vendor_notification(tr: &Translator) -> Notification {
    Notification::info(tr.t("Not implemented yet."))
}
