//! Application core: event loop, screen management, action dispatch.
//!
//! Backend calls run in spawned tasks and report back as actions. Results
//! are routed to the screen that owns the request, which reconciles them
//! against its dispatcher so superseded responses are dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use smartdns_core::clients::{delete_notification, mac_vendor_notification};
use smartdns_core::{
    Backend, ClientsRequest, Credentials, ErrorCode, FetchTicket, Language, ListenerRegistry,
    Notification, NotificationQueue, SessionHandler, Subscription, Translator, error_message,
    until_cancelled,
};

use crate::action::Action;
use crate::component::{Component, View};
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::{ScreenOptions, create_screens};
use crate::session::SessionBridge;
use crate::theme::{Theme, ThemeMode, ThemeToken};
use crate::tui::Tui;
use crate::widgets::toasts;

/// Startup settings resolved from CLI flags and the config file.
pub struct AppOptions {
    /// Shown in the status bar.
    pub server_label: String,
    pub language: Language,
    pub theme: ThemeMode,
    pub page_size: u32,
    /// URL-style query seeding the client filters.
    pub client_query: Option<String>,
    /// Used to log in again after the session expires.
    pub credentials: Option<Credentials>,
    /// Write language switches back to the config file.
    pub remember_language: bool,
}

/// Top-level application state and event loop.
pub struct App<B: Backend> {
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    server_label: String,
    language: Language,
    theme: Theme,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    backend: Arc<B>,
    credentials: Option<Credentials>,
    relogin_pending: bool,
    /// Cancels delete and login tasks on exit. Fetches carry their own
    /// ticket tokens.
    tasks: CancellationToken,
    notifications: Arc<Mutex<NotificationQueue>>,
    language_listeners: ListenerRegistry<Language>,
    /// Terminal (cols, rows).
    viewport_listeners: ListenerRegistry<(u16, u16)>,
    /// Held for the app's lifetime; dropping one deregisters its listener.
    subscriptions: Vec<Subscription>,
}

impl<B: Backend> App<B> {
    pub fn new(backend: Arc<B>, options: AppOptions) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let session: Arc<dyn SessionHandler> = Arc::new(SessionBridge::new(action_tx.clone()));
        let screens: HashMap<ScreenId, Box<dyn Component>> = create_screens(
            &session,
            ScreenOptions {
                page_size: options.page_size,
                client_query: options.client_query,
            },
        )
        .into_iter()
        .collect();

        let mut app = Self {
            active_screen: ScreenId::default(),
            screens,
            running: true,
            help_visible: false,
            server_label: options.server_label,
            language: options.language,
            theme: Theme::new(options.theme),
            action_tx,
            action_rx,
            backend,
            credentials: options.credentials,
            relogin_pending: false,
            tasks: CancellationToken::new(),
            notifications: Arc::new(Mutex::new(NotificationQueue::new())),
            language_listeners: ListenerRegistry::new(),
            viewport_listeners: ListenerRegistry::new(),
            subscriptions: Vec::new(),
        };
        app.register_listeners(options.remember_language);
        app
    }

    fn register_listeners(&mut self, remember_language: bool) {
        let queue = Arc::clone(&self.notifications);
        self.subscriptions
            .push(self.viewport_listeners.subscribe(move |(cols, _rows)| {
                let anchor = lock(&queue).set_viewport_width(*cols);
                debug!(cols, ?anchor, "notification anchor");
            }));

        self.subscriptions
            .push(self.language_listeners.subscribe(|language| {
                info!(%language, "language changed");
            }));

        if remember_language {
            self.subscriptions
                .push(self.language_listeners.subscribe(|language| persist_language(*language)));
        }
    }

    fn tr(&self) -> Translator {
        Translator::new(self.language)
    }

    fn notify(&self, notification: Notification) {
        lock(&self.notifications).push(notification);
    }

    /// Initialize all screen components with the action sender.
    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        crate::tui::set_title(&format!("SmartDNS · {}", self.server_label))?;
        let (cols, rows) = tui.size().unwrap_or((80, 24));
        self.action_tx.send(Action::Resize(cols, rows))?;
        self.init_screens()?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(server = %self.server_label, "TUI event loop started");

        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event → action
            let action = match event {
                Event::Key(key) => self.handle_key_event(key)?,
                Event::Paste(text) => match self.screens.get_mut(&self.active_screen) {
                    Some(screen) => screen.handle_paste(&text)?,
                    None => None,
                },
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                Event::Tick => Some(Action::Tick),
                Event::Render => Some(Action::Render),
            };
            if let Some(action) = action {
                self.action_tx.send(action)?;
            }

            // 3. Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.tasks.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen component.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        // A text field being edited gets every other key
        let captured = self
            .screens
            .get(&self.active_screen)
            .is_some_and(|s| s.captures_input());
        if captured {
            return self.delegate_key(key);
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (_, KeyCode::Char('L')) => return Ok(Some(Action::ToggleLanguage)),
            (_, KeyCode::Char('T')) => return Ok(Some(Action::ToggleTheme)),
            (_, KeyCode::Char('R')) => return Ok(Some(Action::Refresh)),

            // Screen navigation via number keys
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let screen = c
                    .to_digit(10)
                    .and_then(|n| u8::try_from(n).ok())
                    .and_then(ScreenId::from_number);
                if let Some(screen) = screen {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }

            // Tab / Shift+Tab for screen cycling
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            _ => {}
        }

        self.delegate_key(key)
    }

    fn delegate_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.screens.get_mut(&self.active_screen) {
            Some(screen) => screen.handle_key_event(key),
            None => Ok(None),
        }
    }

    /// Hand an action to one screen and queue its follow-up.
    fn forward(&mut self, id: ScreenId, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&id) {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    /// Apply one action to app state and pass it on to the screens.
    #[allow(clippy::too_many_lines)]
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Resize(cols, rows) => {
                self.viewport_listeners.emit(&(*cols, *rows));
            }

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                        debug!(screen = screen.id(), "focused");
                    }
                }
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            // ── Preferences ──────────────────────────────────────────
            Action::ToggleLanguage => {
                self.action_tx
                    .send(Action::LanguageChanged(self.language.toggled()))?;
            }

            Action::LanguageChanged(language) => {
                if *language != self.language {
                    self.language = *language;
                    self.language_listeners.emit(language);
                }
            }

            Action::ToggleTheme => {
                self.action_tx
                    .send(Action::ThemeChanged(self.theme.mode().toggled()))?;
            }

            Action::ThemeChanged(mode) => {
                self.theme = Theme::new(*mode);
                debug!(theme = mode.label(), "theme changed");
            }

            Action::Render => {}

            Action::Tick => {
                lock(&self.notifications).prune(Instant::now());
                self.forward(self.active_screen, action)?;
            }

            // ── Backend requests ────────────────────────────────────
            Action::FetchClients(request) => self.spawn_fetch_clients(request.clone()),

            Action::FetchUpstream(ticket) => self.spawn_fetch_upstream(ticket.clone()),

            Action::DeleteClient { id, client_ip } => {
                self.spawn_delete(*id, client_ip.clone());
            }

            Action::MacVendor { mac } => {
                debug!(%mac, "mac vendor lookup requested");
                self.notify(mac_vendor_notification(&self.tr()));
            }

            // ── Backend results, routed to the owning screen ─────────
            Action::ClientsLoaded { .. } => self.forward(ScreenId::Clients, action)?,

            Action::UpstreamLoaded { .. } => self.forward(ScreenId::Upstream, action)?,

            Action::ClientDeleted {
                id,
                client_ip,
                result,
            } => {
                if let Err(err) = result {
                    warn!(id, error = %err, "client delete failed");
                }
                let outcome = result.as_ref().copied();
                self.notify(delete_notification(&self.tr(), *id, client_ip, outcome));
                self.forward(ScreenId::Clients, action)?;
            }

            Action::Refresh => {
                for id in ScreenId::ALL {
                    self.forward(id, action)?;
                }
            }

            // ── Session ─────────────────────────────────────────────
            Action::SessionExpired => self.handle_session_expired(),

            Action::ReloginResult(result) => {
                self.relogin_pending = false;
                let tr = self.tr();
                match result {
                    Ok(()) => {
                        info!("session re-established");
                        self.notify(Notification::info(
                            tr.t("Logged in again after session expiry."),
                        ));
                        self.action_tx.send(Action::Refresh)?;
                    }
                    Err(err) => {
                        warn!(error = %err, "re-login failed");
                        self.notify(Notification::error(tr.t(error_message(err.code()))));
                    }
                }
            }
        }

        Ok(())
    }

    // ── Backend tasks ────────────────────────────────────────────────

    fn spawn_fetch_clients(&self, request: ClientsRequest) {
        let backend = Arc::clone(&self.backend);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let ClientsRequest { ticket, params } = request;
            match until_cancelled(ticket.cancel_token(), backend.fetch_clients(&params)).await {
                Some(result) => {
                    let _ = tx.send(Action::ClientsLoaded { ticket, result });
                }
                None => debug!(generation = ticket.generation(), "client fetch superseded"),
            }
        });
    }

    fn spawn_fetch_upstream(&self, ticket: FetchTicket) {
        let backend = Arc::clone(&self.backend);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match until_cancelled(ticket.cancel_token(), backend.fetch_upstream_servers()).await {
                Some(result) => {
                    let _ = tx.send(Action::UpstreamLoaded { ticket, result });
                }
                None => debug!(generation = ticket.generation(), "upstream fetch superseded"),
            }
        });
    }

    fn spawn_delete(&self, id: u64, client_ip: String) {
        let backend = Arc::clone(&self.backend);
        let tx = self.action_tx.clone();
        let cancel = self.tasks.clone();
        tokio::spawn(async move {
            if let Some(result) = until_cancelled(cancel, backend.delete_client(id)).await {
                let _ = tx.send(Action::ClientDeleted {
                    id,
                    client_ip,
                    result,
                });
            }
        });
    }

    /// Log in again when credentials are known; otherwise tell the user.
    /// Concurrent expiries collapse into one attempt.
    fn handle_session_expired(&mut self) {
        if self.relogin_pending {
            return;
        }
        let Some(credentials) = self.credentials.clone() else {
            let message = self.tr().t(error_message(ErrorCode::SessionExpired));
            self.notify(Notification::error(message));
            return;
        };

        self.relogin_pending = true;
        let backend = Arc::clone(&self.backend);
        let tx = self.action_tx.clone();
        let cancel = self.tasks.clone();
        tokio::spawn(async move {
            if let Some(result) = until_cancelled(cancel, backend.authenticate(&credentials)).await {
                let _ = tx.send(Action::ReloginResult(result));
            }
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let view = View {
            tr: self.tr(),
            theme: self.theme,
        };
        let area = frame.area();
        frame.render_widget(Block::default().style(self.theme.surface()), area);

        // Layout: [screen content] [tab bar] [status bar]
        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0], &view);
        }
        self.render_tab_bar(frame, layout[1], &view);
        self.render_status_bar(frame, layout[2], &view);

        // Overlays on top (order matters: last = topmost)
        {
            let queue = lock(&self.notifications);
            toasts::render(frame, area, queue.anchor(), queue.visible(), &view);
        }

        if self.help_visible {
            render_help_overlay(frame, area, &view);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect, view: &View) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    view.theme.tab_active()
                } else {
                    view.theme.tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), view.tr.t(id.label())),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", view.theme.key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, view: &View) {
        let theme = &view.theme;
        let tr = &view.tr;

        let session = if self.relogin_pending {
            Span::styled("◐ ", theme.fg(ThemeToken::Warning))
        } else {
            Span::styled("● ", theme.fg(ThemeToken::Success))
        };

        let line = Line::from(vec![
            Span::raw(" "),
            session,
            Span::styled(self.server_label.as_str(), theme.fg(ThemeToken::Text)),
            Span::styled(
                format!("  {}: {}", tr.t("Language"), self.language.native_name()),
                theme.key_hint(),
            ),
            Span::styled(
                format!("  {}: {}", tr.t("Theme"), theme.mode().label()),
                theme.key_hint(),
            ),
            Span::styled(
                format!(
                    " │ ? {}  L {}  T {}  q {}",
                    tr.t("help"),
                    tr.t("Language"),
                    tr.t("Theme"),
                    tr.t("quit")
                ),
                theme.key_hint(),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn lock(queue: &Mutex<NotificationQueue>) -> MutexGuard<'_, NotificationQueue> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

fn persist_language(language: Language) {
    let path = smartdns_config::config_path();
    let mut cfg = match smartdns_config::load_config_from(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "cannot load config to save language");
            return;
        }
    };
    cfg.defaults.language = language;
    if let Err(e) = smartdns_config::save_config_to(&cfg, &path) {
        warn!(error = %e, "cannot save language preference");
    }
}

/// Render the help overlay centered on screen.
fn render_help_overlay(frame: &mut Frame, area: Rect, view: &View) {
    let theme = &view.theme;
    let help_width = 56u16.min(area.width.saturating_sub(4));
    let help_height = 26u16.min(area.height.saturating_sub(2));

    let x = (area.width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    let block = Block::default()
        .title(format!(" {} ", view.tr.t("Keyboard Shortcuts")))
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border(true))
        .style(theme.surface());
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);
    frame.render_widget(Paragraph::new(help_lines(view)), inner);
}

fn help_lines(view: &View) -> Vec<Line<'static>> {
    let tr = &view.tr;
    let theme = &view.theme;
    let locale = tr.table_locale();
    let section = |title: &str| {
        Line::from(Span::styled(
            format!("  {}", tr.t(title)),
            theme.fg(ThemeToken::Accent),
        ))
    };
    let entry = |keys: &'static str, what: &str| {
        Line::from(vec![
            Span::styled(format!("  {keys:<10}"), theme.key_hint_key()),
            Span::styled(what.to_owned(), theme.key_hint()),
        ])
    };

    vec![
        section("Global"),
        entry("1-2 Tab", tr.t("Switch screen")),
        entry("L", tr.t("Toggle language")),
        entry("T", tr.t("Toggle theme")),
        entry("r / R", tr.t("Refresh screen / all screens")),
        entry("? Esc", tr.t("Close this help")),
        entry("q Ctrl+c", tr.t("Quit")),
        Line::from(""),
        section("Clients"),
        entry("j/k", tr.t("Select row")),
        entry("h/l", tr.t("Select filter column")),
        entry("f Enter", tr.t("Edit column filter")),
        entry("m", tr.t("Cycle filter mode")),
        entry("x / X", tr.t("Clear filter / all filters")),
        entry("n", locale.go_to_next_page),
        entry("p", locale.go_to_previous_page),
        entry("g / G", tr.t("First / last page")),
        entry("+/-", locale.rows_per_page),
        entry("d / v", tr.t("Delete client / Mac vendor")),
        Line::from(""),
        section("Upstream Servers"),
        entry("h/l s", tr.t("Pick column / cycle sort")),
        entry("/ x", tr.t("Search / clear search")),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;
    use secrecy::SecretString;

    use smartdns_core::{
        ClientPage, CoreError, NotificationAnchor, NotificationLevel, QueryParameters,
        UpstreamServerRecord,
    };

    use super::*;

    #[derive(Default)]
    struct FakeBackend {
        fail_delete: bool,
        logins: AtomicUsize,
    }

    impl Backend for FakeBackend {
        fn fetch_clients(
            &self,
            _params: &QueryParameters,
        ) -> impl Future<Output = Result<ClientPage, CoreError>> + Send {
            async { Ok(ClientPage::default()) }
        }

        fn delete_client(&self, _id: u64) -> impl Future<Output = Result<(), CoreError>> + Send {
            let fail = self.fail_delete;
            async move {
                if fail {
                    Err(CoreError::Api {
                        message: "boom".into(),
                        code: ErrorCode::ServerError,
                        status: Some(500),
                    })
                } else {
                    Ok(())
                }
            }
        }

        fn fetch_upstream_servers(
            &self,
        ) -> impl Future<Output = Result<Vec<UpstreamServerRecord>, CoreError>> + Send {
            async { Ok(Vec::new()) }
        }

        fn authenticate(
            &self,
            _credentials: &Credentials,
        ) -> impl Future<Output = Result<(), CoreError>> + Send {
            self.logins.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        }
    }

    fn options(credentials: Option<Credentials>) -> AppOptions {
        AppOptions {
            server_label: "http://127.0.0.1:6080".into(),
            language: Language::En,
            theme: ThemeMode::Dark,
            page_size: 10,
            client_query: None,
            credentials,
            remember_language: false,
        }
    }

    fn app(backend: FakeBackend, credentials: Option<Credentials>) -> App<FakeBackend> {
        App::new(Arc::new(backend), options(credentials))
    }

    fn messages(app: &App<FakeBackend>) -> Vec<(String, NotificationLevel)> {
        lock(&app.notifications)
            .visible()
            .map(|n| (n.message.clone(), n.level))
            .collect()
    }

    /// Process queued actions until one matching `done` has been handled.
    async fn pump_until(app: &mut App<FakeBackend>, done: impl Fn(&Action) -> bool) {
        loop {
            let action = app.action_rx.recv().await.unwrap();
            app.process_action(&action).unwrap();
            if done(&action) {
                return;
            }
        }
    }

    #[tokio::test]
    async fn language_toggle_notifies_listeners() {
        let mut app = app(FakeBackend::default(), None);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sub = app
            .language_listeners
            .subscribe(move |l| sink.lock().unwrap().push(*l));

        app.process_action(&Action::ToggleLanguage).unwrap();
        pump_until(&mut app, |a| matches!(a, Action::LanguageChanged(_))).await;

        assert_eq!(app.language, Language::ZhCn);
        assert_eq!(*seen.lock().unwrap(), vec![Language::ZhCn]);

        drop(sub);
        app.process_action(&Action::LanguageChanged(Language::En)).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn resize_moves_notification_anchor() {
        let mut app = app(FakeBackend::default(), None);
        app.process_action(&Action::Resize(50, 20)).unwrap();
        assert_eq!(lock(&app.notifications).anchor(), NotificationAnchor::TopLeft);
        app.process_action(&Action::Resize(120, 40)).unwrap();
        assert_eq!(lock(&app.notifications).anchor(), NotificationAnchor::BottomLeft);
    }

    #[tokio::test]
    async fn successful_delete_notifies_with_id_and_ip() {
        let mut app = app(FakeBackend::default(), None);
        app.process_action(&Action::DeleteClient {
            id: 7,
            client_ip: "10.0.0.7".into(),
        })
        .unwrap();
        pump_until(&mut app, |a| matches!(a, Action::ClientDeleted { .. })).await;

        assert_eq!(
            messages(&app),
            vec![(
                "Delete client 7 10.0.0.7 successfully.".to_owned(),
                NotificationLevel::Success
            )]
        );
    }

    #[tokio::test]
    async fn failed_delete_notifies_with_attempted_id() {
        let backend = FakeBackend {
            fail_delete: true,
            ..FakeBackend::default()
        };
        let mut app = app(backend, None);
        app.process_action(&Action::DeleteClient {
            id: 42,
            client_ip: "10.0.0.42".into(),
        })
        .unwrap();
        pump_until(&mut app, |a| matches!(a, Action::ClientDeleted { .. })).await;

        assert_eq!(
            messages(&app),
            vec![(
                "Error: Server error., id: 42".to_owned(),
                NotificationLevel::Error
            )]
        );
    }

    #[tokio::test]
    async fn session_expiry_without_credentials_only_notifies() {
        let mut app = app(FakeBackend::default(), None);
        app.process_action(&Action::SessionExpired).unwrap();
        assert!(!app.relogin_pending);
        assert_eq!(
            messages(&app),
            vec![(
                "Session expired, please log in again.".to_owned(),
                NotificationLevel::Error
            )]
        );
    }

    #[tokio::test]
    async fn session_expiry_logs_in_again_once() {
        let credentials = Credentials {
            username: "admin".into(),
            password: SecretString::from("pw".to_owned()),
        };
        let mut app = app(FakeBackend::default(), Some(credentials));
        app.process_action(&Action::SessionExpired).unwrap();
        app.process_action(&Action::SessionExpired).unwrap();
        assert!(app.relogin_pending);

        pump_until(&mut app, |a| matches!(a, Action::ReloginResult(_))).await;

        assert!(!app.relogin_pending);
        assert_eq!(app.backend.logins.load(Ordering::SeqCst), 1);
        assert_eq!(
            messages(&app),
            vec![(
                "Logged in again after session expiry.".to_owned(),
                NotificationLevel::Info
            )]
        );
    }

    #[tokio::test]
    async fn global_keys_yield_to_text_input() {
        let mut app = app(FakeBackend::default(), None);
        let slash = KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE);
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);

        app.process_action(&Action::SwitchScreen(ScreenId::Upstream)).unwrap();
        assert!(app.handle_key_event(slash).unwrap().is_none());
        assert!(app.handle_key_event(q).unwrap().is_none());

        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        app.handle_key_event(esc).unwrap();
        assert!(matches!(app.handle_key_event(q).unwrap(), Some(Action::Quit)));
    }

    #[test]
    fn help_overlay_follows_language() {
        let text = |language| -> Vec<String> {
            let view = View {
                tr: Translator::new(language),
                theme: Theme::new(ThemeMode::Dark),
            };
            help_lines(&view).iter().map(ToString::to_string).collect()
        };
        let zh = text(Language::ZhCn);
        assert!(zh.iter().any(|line| line.contains("切换语言")));
        assert!(zh.iter().any(|line| line.contains("下一页")));
        assert!(!zh.iter().any(|line| line.contains("Toggle language")));

        let en = text(Language::En);
        assert!(en.iter().any(|line| line.trim() == "Global"));
        assert!(en.iter().any(|line| line.contains("Go to next page")));
    }
}
