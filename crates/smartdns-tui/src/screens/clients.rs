//! Clients screen: server-side filtered and paginated DNS client table.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use smartdns_core::i18n::interpolate;
use smartdns_core::{
    ClientColumn, ClientRecord, ClientsTable, Language, SessionHandler, Translator, format,
};

use crate::action::Action;
use crate::component::{Component, View};
use crate::theme::ThemeToken;
use crate::widgets::line_editor::{EditOutcome, LineEditor};

pub struct ClientsScreen {
    focused: bool,
    table: ClientsTable,
    table_state: TableState,
    /// Index into `ClientColumn::ALL` of the column the filter cursor is on.
    filter_column: usize,
    /// Open while a column filter is being typed.
    editor: Option<LineEditor>,
    throbber_state: ThrobberState,
    initial_query: Option<String>,
}

impl ClientsScreen {
    pub fn new(
        session: Arc<dyn SessionHandler>,
        page_size: u32,
        initial_query: Option<String>,
    ) -> Self {
        let mut table = ClientsTable::new(session);
        if !table.set_page_size(page_size) && page_size != table.page_size() {
            debug!(page_size, "unsupported page size, keeping default");
        }
        Self {
            focused: false,
            table,
            table_state: TableState::default().with_selected(Some(0)),
            filter_column: 0,
            editor: None,
            throbber_state: ThrobberState::default(),
            initial_query,
        }
    }

    fn current_column(&self) -> ClientColumn {
        ClientColumn::ALL
            .get(self.filter_column)
            .copied()
            .unwrap_or(ClientColumn::Id)
    }

    fn selected_row(&self) -> Option<&ClientRecord> {
        self.table.rows().get(self.table_state.selected().unwrap_or(0))
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.table.rows().len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1).min(len - 1)
        } else {
            current.saturating_sub(1)
        };
        self.table_state.select(Some(next));
    }

    fn move_filter_column(&mut self, right: bool) {
        let last = ClientColumn::ALL.len() - 1;
        self.filter_column = if right {
            (self.filter_column + 1).min(last)
        } else {
            self.filter_column.saturating_sub(1)
        };
    }

    /// After a state change, ask the table for a fetch. The table issues
    /// nothing when the fetch key is unchanged.
    fn after_change(&mut self, changed: bool) -> Option<Action> {
        if !changed {
            return None;
        }
        self.table_state.select(Some(0));
        self.table.request_fetch().map(Action::FetchClients)
    }

    fn handle_table_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(true);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(false);
                None
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.move_filter_column(false);
                None
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.move_filter_column(true);
                None
            }
            KeyCode::Char('f') | KeyCode::Enter => {
                let current = self.table.filter_value(self.current_column()).unwrap_or("");
                self.editor = Some(LineEditor::with_value(current));
                None
            }
            KeyCode::Char('m') => {
                let column = self.current_column();
                let before = self.table.filter_mode(column);
                let after = self.table.cycle_filter_mode(column);
                self.after_change(before != after)
            }
            KeyCode::Char('x') => {
                let changed = self.table.clear_filter(self.current_column());
                self.after_change(changed)
            }
            KeyCode::Char('X') => {
                let changed = self.table.clear_filters();
                self.after_change(changed)
            }
            KeyCode::Char('n') | KeyCode::PageDown => {
                let changed = self.table.next_page();
                self.after_change(changed)
            }
            KeyCode::Char('p') | KeyCode::PageUp => {
                let changed = self.table.previous_page();
                self.after_change(changed)
            }
            KeyCode::Char('g') | KeyCode::Home => {
                let changed = self.table.first_page();
                self.after_change(changed)
            }
            KeyCode::Char('G') | KeyCode::End => {
                let changed = self.table.last_page();
                self.after_change(changed)
            }
            KeyCode::Char('+' | '=') => {
                let changed = self.table.step_page_size(true);
                self.after_change(changed)
            }
            KeyCode::Char('-') => {
                let changed = self.table.step_page_size(false);
                self.after_change(changed)
            }
            KeyCode::Char('r') if !self.table.is_loading() => {
                Some(Action::FetchClients(self.table.refresh()))
            }
            KeyCode::Char('d') => self.selected_row().map(|row| Action::DeleteClient {
                id: row.id,
                client_ip: row.client_ip.clone(),
            }),
            KeyCode::Char('v') => self.selected_row().map(|row| Action::MacVendor {
                mac: row.mac.clone(),
            }),
            _ => None,
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_filter_bar(&self, frame: &mut Frame, area: Rect, view: &View) {
        let tr = &view.tr;
        let theme = &view.theme;
        let column = self.current_column();
        let mode = tr.t(self.table.filter_mode(column).label());

        if let Some(editor) = &self.editor {
            let prefix = interpolate(
                tr.table_locale().filter_by,
                &[("column", tr.t(column.header()))],
            );
            let mut spans = vec![Span::styled(
                format!(" {prefix} ({mode}): "),
                theme.fg(ThemeToken::AccentAlt),
            )];
            spans.extend(editor.line(theme).spans);
            frame.render_widget(Paragraph::new(Line::from(spans)), area);
            return;
        }

        let mut spans = vec![Span::raw(" ")];
        for (i, col) in ClientColumn::ALL.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", theme.key_hint()));
            }
            let label = match self.table.filter_value(*col) {
                Some(value) => format!("{}: {value}", tr.t(col.header())),
                None => tr.t(col.header()).to_owned(),
            };
            if i == self.filter_column {
                spans.push(Span::styled(format!("[{label}]"), theme.tab_active()));
            } else if self.table.filter_value(*col).is_some() {
                spans.push(Span::styled(label, theme.fg(ThemeToken::Accent)));
            } else {
                spans.push(Span::styled(label, theme.tab_inactive()));
            }
        }
        spans.push(Span::styled(
            format!("   {}: {mode}", tr.table_locale().filter_mode),
            theme.key_hint(),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, view: &View) {
        let tr = &view.tr;
        let theme = &view.theme;
        let language = tr.language();
        let rows = self.table.rows();

        if rows.is_empty() {
            let text = if self.table.is_loading() {
                tr.table_locale().loading
            } else {
                tr.table_locale().no_records
            };
            frame.render_widget(
                Paragraph::new(Span::styled(text, theme.key_hint()))
                    .alignment(Alignment::Center)
                    .style(theme.surface()),
                area,
            );
            return;
        }

        let header = Row::new(
            ClientColumn::ALL
                .iter()
                .map(|c| Cell::from(tr.t(c.header())).style(theme.table_header())),
        );
        let body: Vec<Row> = rows
            .iter()
            .map(|row| {
                Row::new(
                    ClientColumn::ALL
                        .iter()
                        .map(|c| Cell::from(cell_text(row, *c, language))),
                )
            })
            .collect();
        let widths = ClientColumn::ALL.iter().map(|c| Constraint::Min(c.width()));

        let table = Table::new(body, widths)
            .header(header)
            .style(theme.surface())
            .row_highlight_style(theme.table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect, view: &View) {
        let tr = &view.tr;
        let theme = &view.theme;
        let locale = tr.table_locale();

        let (from, to) = page_range(
            self.table.page_index(),
            self.table.page_size(),
            self.table.rows().len(),
            self.table.total_count(),
        );
        let range = interpolate(
            locale.range_of,
            &[
                ("from", &from.to_string()),
                ("to", &to.to_string()),
                ("count", &self.table.total_count().to_string()),
            ],
        );
        let pages = interpolate(
            locale.page_of,
            &[
                ("page", &(self.table.page_index() + 1).to_string()),
                ("pages", &self.table.page_count().max(1).to_string()),
            ],
        );
        let paging = if self.table.can_paginate() {
            theme.fg(ThemeToken::Text)
        } else {
            theme.key_hint()
        };

        let layout = Layout::horizontal([Constraint::Min(0), Constraint::Length(16)]).split(area);
        let line = Line::from(vec![
            Span::styled(format!(" {}: ", locale.rows_per_page), theme.key_hint()),
            Span::styled(self.table.page_size().to_string(), theme.fg(ThemeToken::Accent)),
            Span::styled(format!("   {range}   {pages}"), paging),
        ]);
        frame.render_widget(Paragraph::new(line), layout[0]);

        if self.table.is_loading() {
            let throbber = Throbber::default()
                .label(locale.loading)
                .style(theme.fg(ThemeToken::Accent))
                .throbber_style(theme.fg(ThemeToken::AccentAlt));
            frame.render_stateful_widget(throbber, layout[1], &mut self.throbber_state.clone());
        }
    }

    /// Key hint pairs for the bottom line, labels localized.
    fn hints(&self, tr: &Translator) -> Vec<(&'static str, String)> {
        let label = |key: &str| format!("{}  ", tr.t(key));
        if self.editor.is_some() {
            return vec![
                ("Enter ", label("apply")),
                ("Esc ", label("cancel")),
                ("Ctrl+u ", label("clear")),
            ];
        }
        let locale = tr.table_locale();
        vec![
            ("  j/k ", label("select")),
            ("h/l ", label("column")),
            ("f ", label("filter")),
            ("m ", label("mode")),
            ("x ", format!("{}  ", locale.clear_filter)),
            ("n/p ", label("page")),
            ("+/- ", label("size")),
            ("r ", label("Refresh Data")),
            ("│ ", format!("{}: ", locale.actions)),
            ("d ", label("Delete")),
            ("v ", tr.t("Mac Vendor").to_owned()),
        ]
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect, view: &View) {
        let theme = &view.theme;
        let spans: Vec<Span> = self
            .hints(&view.tr)
            .into_iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key, theme.key_hint_key()),
                    Span::styled(label, theme.key_hint()),
                ]
            })
            .collect();
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// 1-based first and last row numbers shown on a page.
pub fn page_range(page_index: u32, page_size: u32, rows: usize, total: u64) -> (u64, u64) {
    if rows == 0 || total == 0 {
        return (0, 0);
    }
    let start = u64::from(page_index) * u64::from(page_size);
    let to = start + u64::try_from(rows).unwrap_or(u64::MAX);
    (start + 1, to.min(total))
}

fn cell_text(row: &ClientRecord, column: ClientColumn, language: Language) -> String {
    match column {
        ClientColumn::Id => row.id.to_string(),
        ClientColumn::ClientIp => row.client_ip.clone(),
        ClientColumn::Mac => row.mac.clone(),
        ClientColumn::Hostname => row.hostname.clone(),
        ClientColumn::LastQueryTimestamp => {
            format::timestamp(row.last_query_timestamp.as_ref(), language)
        }
    }
}

impl Component for ClientsScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        if let Some(query) = self.initial_query.take() {
            self.table.seed_from_query(&query);
        }
        if let Some(request) = self.table.request_fetch() {
            action_tx.send(Action::FetchClients(request))?;
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let Some(editor) = self.editor.as_mut() else {
            return Ok(self.handle_table_key(key));
        };
        match editor.handle_key(key) {
            EditOutcome::Editing => Ok(None),
            EditOutcome::Cancel => {
                self.editor = None;
                Ok(None)
            }
            EditOutcome::Submit => {
                let value = self
                    .editor
                    .take()
                    .map(|e| e.value().trim().to_owned())
                    .unwrap_or_default();
                let changed = self.table.set_filter(self.current_column(), value);
                Ok(self.after_change(changed))
            }
        }
    }

    fn handle_paste(&mut self, text: &str) -> Result<Option<Action>> {
        if let Some(editor) = self.editor.as_mut() {
            editor.insert_str(text);
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::ClientsLoaded { ticket, result } => {
                if self.table.resolve(ticket, result.clone()) {
                    let len = self.table.rows().len();
                    let selected = self.table_state.selected().unwrap_or(0);
                    self.table_state
                        .select(Some(selected.min(len.saturating_sub(1))));
                }
            }
            Action::ClientDeleted {
                result: Err(err), ..
            } => {
                self.table.check_action_error(err);
            }
            Action::Refresh if !self.table.is_loading() => {
                return Ok(Some(Action::FetchClients(self.table.refresh())));
            }
            Action::Tick if self.table.is_loading() => self.throbber_state.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect, view: &View) {
        let tr = &view.tr;
        let theme = &view.theme;

        let block = Block::default()
            .title(format!(" {} ({}) ", tr.t("Clients"), self.table.total_count()))
            .title_style(theme.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border(self.focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let banner = self.table.error_message();
        let layout = Layout::vertical([
            Constraint::Length(1),                               // filter bar
            Constraint::Length(u16::from(banner.is_some())),     // error banner
            Constraint::Min(1),                                  // table
            Constraint::Length(1),                               // pagination
            Constraint::Length(1),                               // hints
        ])
        .split(inner);

        self.render_filter_bar(frame, layout[0], view);
        if let Some(message) = banner {
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" ✗ {}", tr.t(message)), theme.banner_error())),
                layout[1],
            );
        }
        self.render_table(frame, layout[2], view);
        self.render_footer(frame, layout[3], view);
        self.render_hints(frame, layout[4], view);
    }

    fn captures_input(&self) -> bool {
        self.editor.is_some()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Clients"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    use smartdns_core::{ClientPage, CoreError};

    use super::*;
    use crate::session::SessionBridge;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn record(id: u64) -> ClientRecord {
        ClientRecord {
            id,
            client_ip: format!("10.0.0.{id}"),
            mac: "aa:bb:cc:dd:ee:ff".into(),
            hostname: format!("host-{id}"),
            last_query_timestamp: None,
        }
    }

    fn mounted(query: Option<&str>) -> (ClientsScreen, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Arc::new(SessionBridge::new(tx.clone()));
        let mut screen = ClientsScreen::new(session, 10, query.map(str::to_owned));
        screen.init(tx).unwrap();
        (screen, rx)
    }

    fn load(screen: &mut ClientsScreen, request: &smartdns_core::ClientsRequest, total: u64) {
        let page = ClientPage {
            client_list: (1..=10).map(record).collect(),
            total_count: total,
        };
        screen
            .update(&Action::ClientsLoaded {
                ticket: request.ticket.clone(),
                result: Ok(page),
            })
            .unwrap();
    }

    fn initial_request(rx: &mut mpsc::UnboundedReceiver<Action>) -> smartdns_core::ClientsRequest {
        match rx.try_recv().unwrap() {
            Action::FetchClients(request) => request,
            other => panic!("expected FetchClients, got {other:?}"),
        }
    }

    #[test]
    fn mount_seeds_filters_and_fetches_once() {
        let (_screen, mut rx) = mounted(Some("?client_ip=10.0.0.1&bogus=1"));
        let request = initial_request(&mut rx);
        assert_eq!(
            request.params.to_pairs(),
            vec![
                ("page_num".to_owned(), "1".to_owned()),
                ("page_size".to_owned(), "10".to_owned()),
                ("client_ip".to_owned(), "10.0.0.1".to_owned()),
            ]
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn paging_is_blocked_while_loading() {
        let (mut screen, mut rx) = mounted(None);
        let request = initial_request(&mut rx);
        assert!(screen.handle_key_event(key('n')).unwrap().is_none());

        load(&mut screen, &request, 37);
        let Some(Action::FetchClients(next)) = screen.handle_key_event(key('n')).unwrap() else {
            panic!("expected a fetch for page 2");
        };
        assert_eq!(next.params.page_num, 2);
        assert_eq!(screen.table.page_count(), 4);
    }

    #[test]
    fn typed_filter_refetches_from_first_page() {
        let (mut screen, mut rx) = mounted(None);
        let request = initial_request(&mut rx);
        load(&mut screen, &request, 37);

        screen.handle_key_event(key('l')).unwrap();
        screen.handle_key_event(key('f')).unwrap();
        assert!(screen.captures_input());
        screen.handle_paste("192.168.1.5\n").unwrap();
        let action = screen
            .handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
            .unwrap();
        let Some(Action::FetchClients(filtered)) = action else {
            panic!("expected a filtered fetch");
        };
        assert_eq!(filtered.params.page_num, 1);
        assert_eq!(filtered.params.filters[0].value, "192.168.1.5");
        assert!(!screen.captures_input());
    }

    #[test]
    fn delete_targets_selected_row() {
        let (mut screen, mut rx) = mounted(None);
        let request = initial_request(&mut rx);
        load(&mut screen, &request, 10);
        screen.handle_key_event(key('j')).unwrap();

        let action = screen.handle_key_event(key('d')).unwrap();
        assert!(
            matches!(action, Some(Action::DeleteClient { id: 2, ref client_ip }) if client_ip == "10.0.0.2")
        );
    }

    #[test]
    fn failed_delete_with_expired_session_reaches_handler() {
        let (mut screen, mut rx) = mounted(None);
        initial_request(&mut rx);
        screen
            .update(&Action::ClientDeleted {
                id: 3,
                client_ip: "10.0.0.3".into(),
                result: Err(CoreError::SessionExpired),
            })
            .unwrap();
        assert!(matches!(rx.try_recv(), Ok(Action::SessionExpired)));
    }

    #[test]
    fn delete_outcome_leaves_rows_and_does_not_refetch() {
        let (mut screen, mut rx) = mounted(None);
        let request = initial_request(&mut rx);
        load(&mut screen, &request, 10);

        let outcomes = [
            Ok(()),
            Err(CoreError::Api {
                message: "boom".into(),
                code: smartdns_core::ErrorCode::ServerError,
                status: Some(500),
            }),
        ];
        for result in outcomes {
            let follow_up = screen
                .update(&Action::ClientDeleted {
                    id: 4,
                    client_ip: "10.0.0.4".into(),
                    result,
                })
                .unwrap();
            assert!(follow_up.is_none());
            assert_eq!(screen.table.rows().len(), 10);
            assert!(screen.table.rows().iter().any(|r| r.id == 4));
            assert!(!screen.table.is_loading());
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn hints_follow_language() {
        let (mut screen, _rx) = mounted(None);
        let zh = Translator::new(Language::ZhCn);
        let labels: Vec<String> = screen.hints(&zh).into_iter().map(|(_, l)| l).collect();
        assert!(labels.contains(&"选择  ".to_owned()));
        assert!(labels.contains(&"操作: ".to_owned()));
        assert!(!labels.iter().any(|l| l.trim() == "select"));

        screen.handle_key_event(key('f')).unwrap();
        let en = Translator::new(Language::En);
        let editing: Vec<String> = screen.hints(&en).into_iter().map(|(_, l)| l).collect();
        assert_eq!(editing, ["apply  ", "cancel  ", "clear  "]);
    }

    #[test]
    fn refresh_key_waits_for_pending_fetch() {
        let (mut screen, mut rx) = mounted(None);
        let request = initial_request(&mut rx);
        assert!(screen.handle_key_event(key('r')).unwrap().is_none());

        load(&mut screen, &request, 10);
        let Some(Action::FetchClients(again)) = screen.handle_key_event(key('r')).unwrap() else {
            panic!("expected a forced refetch");
        };
        assert_eq!(again.params, request.params);
        assert!(screen.handle_key_event(key('r')).unwrap().is_none());
    }

    #[test]
    fn page_range_bounds() {
        assert_eq!(page_range(0, 10, 10, 37), (1, 10));
        assert_eq!(page_range(3, 10, 7, 37), (31, 37));
        assert_eq!(page_range(0, 10, 0, 0), (0, 0));
    }
}
