//! Upstream servers screen: full list with client-side search and sorting.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;

use smartdns_core::upstream::cell_text;
use smartdns_core::{
    SessionHandler, SortDirection, SortSpec, Translator, UpstreamColumn, UpstreamServersTable,
};

use crate::action::Action;
use crate::component::{Component, View};
use crate::theme::ThemeToken;
use crate::widgets::line_editor::{EditOutcome, LineEditor};

pub struct UpstreamScreen {
    focused: bool,
    table: UpstreamServersTable,
    table_state: TableState,
    /// Index into `UpstreamColumn::ALL` of the column `s` sorts by.
    sort_cursor: usize,
    /// Open while the search box has the keyboard.
    search: Option<LineEditor>,
    throbber_state: ThrobberState,
}

impl UpstreamScreen {
    pub fn new(session: Arc<dyn SessionHandler>) -> Self {
        Self {
            focused: false,
            table: UpstreamServersTable::new(session),
            table_state: TableState::default().with_selected(Some(0)),
            sort_cursor: UpstreamColumn::ALL
                .iter()
                .position(|c| *c == UpstreamColumn::SuccessRate)
                .unwrap_or(0),
            search: None,
            throbber_state: ThrobberState::default(),
        }
    }

    fn cursor_column(&self) -> UpstreamColumn {
        UpstreamColumn::ALL
            .get(self.sort_cursor)
            .copied()
            .unwrap_or(UpstreamColumn::Host)
    }

    fn move_selection(&mut self, delta: isize) {
        let last = self.table.rows().len().saturating_sub(1);
        let current = self.table_state.selected().unwrap_or(0);
        self.table_state
            .select(Some(current.saturating_add_signed(delta).min(last)));
    }

    fn move_cursor(&mut self, right: bool) {
        let last = UpstreamColumn::ALL.len() - 1;
        self.sort_cursor = if right {
            (self.sort_cursor + 1).min(last)
        } else {
            self.sort_cursor.saturating_sub(1)
        };
    }

    fn handle_table_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('h') | KeyCode::Left => self.move_cursor(false),
            KeyCode::Char('l') | KeyCode::Right => self.move_cursor(true),
            KeyCode::Char('s') => {
                self.table.toggle_sort(self.cursor_column());
                self.table_state.select(Some(0));
            }
            KeyCode::Char('/') => {
                self.search = Some(LineEditor::with_value(self.table.global_filter()));
            }
            KeyCode::Char('x') => {
                self.table.set_global_filter("");
                self.table_state.select(Some(0));
            }
            KeyCode::Char('r') => return Some(Action::FetchUpstream(self.table.begin_fetch())),
            _ => {}
        }
        None
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_search(&self, frame: &mut Frame, area: Rect, view: &View) {
        let theme = &view.theme;
        let label = Span::styled(
            format!(" {}: ", view.tr.table_locale().search),
            theme.fg(ThemeToken::AccentAlt),
        );
        let line = match &self.search {
            Some(editor) => {
                let mut spans = vec![label];
                spans.extend(editor.line(theme).spans);
                Line::from(spans)
            }
            None if self.table.global_filter().is_empty() => Line::from(vec![
                label,
                Span::styled("/", theme.key_hint_key()),
            ]),
            None => Line::from(vec![
                label,
                Span::styled(self.table.global_filter().to_owned(), theme.fg(ThemeToken::Accent)),
            ]),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, view: &View) {
        let tr = &view.tr;
        let theme = &view.theme;
        let rows = self.table.visible_rows(tr);

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

        let sort = self.table.sort();
        let header = Row::new(UpstreamColumn::ALL.iter().enumerate().map(|(i, c)| {
            let mut style = theme.table_header();
            if i == self.sort_cursor {
                style = style.bg(theme.color(ThemeToken::Highlight));
            }
            Cell::from(format!("{}{}", tr.t(c.header()), sort_marker(sort, *c))).style(style)
        }));

        let body: Vec<Row> = rows
            .iter()
            .map(|row| {
                Row::new(UpstreamColumn::ALL.iter().map(|c| {
                    let cell = Cell::from(cell_text(row, *c, tr));
                    if *c == UpstreamColumn::Status {
                        cell.style(theme.fg(status_token(&row.status)))
                    } else {
                        cell
                    }
                }))
            })
            .collect();
        let widths = UpstreamColumn::ALL.iter().map(|c| Constraint::Min(c.width()));

        let table = Table::new(body, widths)
            .header(header)
            .style(theme.surface())
            .row_highlight_style(theme.table_selected());

        let mut state = self.table_state;
        if state.selected().is_some_and(|s| s >= rows.len()) {
            state.select(Some(rows.len() - 1));
        }
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect, view: &View) {
        let tr = &view.tr;
        let theme = &view.theme;
        let locale = tr.table_locale();

        let sort_text = match self.table.sort() {
            Some(spec) => {
                let direction = match spec.direction {
                    SortDirection::Asc => locale.sort_asc,
                    SortDirection::Desc => locale.sort_desc,
                };
                format!(" {direction}: {}", tr.t(spec.column.header()))
            }
            None => format!(" {}", locale.unsorted),
        };

        let layout = Layout::horizontal([Constraint::Min(0), Constraint::Length(16)]).split(area);
        frame.render_widget(
            Paragraph::new(Span::styled(sort_text, theme.fg(ThemeToken::Text))),
            layout[0],
        );

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
        if self.search.is_some() {
            return vec![
                ("  Enter ", label("done")),
                ("Esc ", tr.table_locale().clear_filter.to_owned()),
            ];
        }
        vec![
            ("  j/k ", label("select")),
            ("h/l ", label("column")),
            ("s ", label("sort")),
            ("/ ", label("search")),
            ("x ", label("clear")),
            ("r ", tr.t("Refresh Data").to_owned()),
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

fn sort_marker(sort: Option<SortSpec<UpstreamColumn>>, column: UpstreamColumn) -> &'static str {
    match sort {
        Some(spec) if spec.column == column => match spec.direction {
            SortDirection::Asc => " ▲",
            SortDirection::Desc => " ▼",
        },
        _ => "",
    }
}

fn status_token(code: &str) -> ThemeToken {
    match code.trim() {
        "normal" => ThemeToken::Success,
        "abnormal" | "failed" => ThemeToken::Error,
        _ => ThemeToken::Warning,
    }
}

impl Component for UpstreamScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        action_tx.send(Action::FetchUpstream(self.table.begin_fetch()))?;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let Some(editor) = self.search.as_mut() else {
            return Ok(self.handle_table_key(key));
        };
        match editor.handle_key(key) {
            EditOutcome::Editing => {
                let value = editor.value().to_owned();
                self.table.set_global_filter(value);
            }
            EditOutcome::Submit => self.search = None,
            EditOutcome::Cancel => {
                self.search = None;
                self.table.set_global_filter("");
            }
        }
        self.table_state.select(Some(0));
        Ok(None)
    }

    fn handle_paste(&mut self, text: &str) -> Result<Option<Action>> {
        if let Some(editor) = self.search.as_mut() {
            editor.insert_str(text);
            let value = editor.value().to_owned();
            self.table.set_global_filter(value);
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::UpstreamLoaded { ticket, result } => {
                self.table.resolve(ticket, result.clone());
            }
            Action::Refresh => return Ok(Some(Action::FetchUpstream(self.table.begin_fetch()))),
            Action::Tick if self.table.is_loading() => self.throbber_state.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect, view: &View) {
        let tr = &view.tr;
        let theme = &view.theme;

        let block = Block::default()
            .title(format!(
                " {} ({}) ",
                tr.t("Upstream Servers"),
                self.table.rows().len()
            ))
            .title_style(theme.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border(self.focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let banner = self.table.error_message();
        let layout = Layout::vertical([
            Constraint::Length(1),                           // search
            Constraint::Length(u16::from(banner.is_some())), // error banner
            Constraint::Min(1),                              // table
            Constraint::Length(1),                           // sort + loading
            Constraint::Length(1),                           // hints
        ])
        .split(inner);

        self.render_search(frame, layout[0], view);
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
        self.search.is_some()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Upstream"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    use smartdns_core::{CoreError, Language, UpstreamServerRecord};

    use super::*;
    use crate::session::SessionBridge;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn server(host: &str, rate: f64) -> UpstreamServerRecord {
        UpstreamServerRecord {
            host: host.into(),
            ip: "192.0.2.53".into(),
            port: 53,
            server_type: "udp".into(),
            status: "normal".into(),
            query_success_rate: rate,
            avg_time: 4.0,
            total_query_count: 10,
            total_query_success: 9,
        }
    }

    fn mounted() -> (UpstreamScreen, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut screen = UpstreamScreen::new(Arc::new(SessionBridge::new(tx.clone())));
        screen.init(tx).unwrap();
        (screen, rx)
    }

    fn ticket(rx: &mut mpsc::UnboundedReceiver<Action>) -> smartdns_core::FetchTicket {
        match rx.try_recv().unwrap() {
            Action::FetchUpstream(ticket) => ticket,
            other => panic!("expected FetchUpstream, got {other:?}"),
        }
    }

    fn hosts(screen: &UpstreamScreen) -> Vec<String> {
        screen
            .table
            .visible_rows(&Translator::default())
            .iter()
            .map(|r| r.host.clone())
            .collect()
    }

    #[test]
    fn sort_key_cycles_cursor_column() {
        let (mut screen, mut rx) = mounted();
        let t = ticket(&mut rx);
        screen
            .update(&Action::UpstreamLoaded {
                ticket: t,
                result: Ok(vec![server("a", 10.0), server("b", 90.0), server("c", 50.0)]),
            })
            .unwrap();

        screen.handle_key_event(key(KeyCode::Char('s'))).unwrap();
        assert_eq!(hosts(&screen), ["b", "c", "a"]);
        screen.handle_key_event(key(KeyCode::Char('s'))).unwrap();
        assert_eq!(hosts(&screen), ["a", "c", "b"]);
        screen.handle_key_event(key(KeyCode::Char('s'))).unwrap();
        assert!(screen.table.sort().is_none());
    }

    #[test]
    fn search_filters_live_and_escape_clears() {
        let (mut screen, mut rx) = mounted();
        let t = ticket(&mut rx);
        screen
            .update(&Action::UpstreamLoaded {
                ticket: t,
                result: Ok(vec![server("dns.google", 1.0), server("one.one", 2.0)]),
            })
            .unwrap();

        screen.handle_key_event(key(KeyCode::Char('/'))).unwrap();
        assert!(screen.captures_input());
        for c in "GOO".chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(hosts(&screen), ["dns.google"]);

        screen.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(!screen.captures_input());
        assert_eq!(hosts(&screen).len(), 2);
    }

    #[test]
    fn refresh_issues_new_ticket_and_failure_keeps_rows() {
        let (mut screen, mut rx) = mounted();
        let t = ticket(&mut rx);
        screen
            .update(&Action::UpstreamLoaded {
                ticket: t,
                result: Ok(vec![server("a", 1.0)]),
            })
            .unwrap();

        let Some(Action::FetchUpstream(second)) =
            screen.handle_key_event(key(KeyCode::Char('r'))).unwrap()
        else {
            panic!("expected a refetch");
        };
        screen
            .update(&Action::UpstreamLoaded {
                ticket: second,
                result: Err(CoreError::MissingPayload),
            })
            .unwrap();
        assert_eq!(hosts(&screen), ["a"]);
        assert_eq!(screen.table.error_message(), Some("No data returned."));
    }

    #[test]
    fn language_switch_retranslates_status_without_touching_rows() {
        let (mut screen, mut rx) = mounted();
        let t = ticket(&mut rx);
        screen
            .update(&Action::UpstreamLoaded {
                ticket: t,
                result: Ok(vec![server("a", 1.0), server("b", 2.0)]),
            })
            .unwrap();
        let before = screen.table.rows().to_vec();

        let en = Translator::new(Language::En);
        let zh = Translator::new(Language::ZhCn);
        assert_eq!(cell_text(&before[0], UpstreamColumn::Status, &en), "Normal");
        screen
            .update(&Action::LanguageChanged(Language::ZhCn))
            .unwrap();
        let after = screen.table.rows();
        assert_eq!(after, before.as_slice());
        assert_eq!(cell_text(&after[0], UpstreamColumn::Status, &zh), "正常");
        assert_eq!(screen.table.visible_rows(&zh).len(), 2);
        assert_eq!(en.table_locale().search, "Search");
        assert_ne!(zh.table_locale().search, en.table_locale().search);
    }

    #[test]
    fn hints_follow_language() {
        let (mut screen, _rx) = mounted();
        let zh = Translator::new(Language::ZhCn);
        let labels: Vec<String> = screen.hints(&zh).into_iter().map(|(_, l)| l).collect();
        assert!(labels.contains(&"排序  ".to_owned()));
        assert!(labels.contains(&"刷新数据".to_owned()));

        screen.handle_key_event(key(KeyCode::Char('/'))).unwrap();
        let en = Translator::new(Language::En);
        let searching: Vec<String> = screen.hints(&en).into_iter().map(|(_, l)| l).collect();
        assert_eq!(searching, ["done  ", "Clear filter"]);
    }
}
