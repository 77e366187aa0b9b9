//! Action enum: every state change in the TUI flows through here.

use smartdns_core::{
    ClientPage, ClientsRequest, CoreError, FetchTicket, Language, UpstreamServerRecord,
};

use crate::screen::ScreenId;
use crate::theme::ThemeMode;

/// All possible actions in the application.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ─────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Preferences ────────────────────────────────────────────────
    ToggleLanguage,
    LanguageChanged(Language),
    ToggleTheme,
    ThemeChanged(ThemeMode),

    // ── Clients ────────────────────────────────────────────────────
    FetchClients(ClientsRequest),
    ClientsLoaded {
        ticket: FetchTicket,
        result: Result<ClientPage, CoreError>,
    },
    DeleteClient {
        id: u64,
        client_ip: String,
    },
    ClientDeleted {
        id: u64,
        client_ip: String,
        result: Result<(), CoreError>,
    },
    MacVendor {
        mac: String,
    },

    // ── Upstream servers ───────────────────────────────────────────
    FetchUpstream(FetchTicket),
    UpstreamLoaded {
        ticket: FetchTicket,
        result: Result<Vec<UpstreamServerRecord>, CoreError>,
    },

    /// Refetch the data of every screen.
    Refresh,

    // ── Session ────────────────────────────────────────────────────
    SessionExpired,
    ReloginResult(Result<(), CoreError>),
}
