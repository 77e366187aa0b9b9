//! `smartdns-tui`: terminal admin console for a SmartDNS server.
//!
//! Built on [ratatui](https://ratatui.rs). Two screens, reachable with the
//! number keys: the server-filtered, paginated **Clients** table and the
//! locally sorted and searched **Upstream Servers** table.
//!
//! Logs are written to a file (default `/tmp/smartdns-tui.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app launch.

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod session;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, bail};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use smartdns_config::{Config, Profile};
use smartdns_core::{ConnectionConfig, Language};

use crate::app::{App, AppOptions};
use crate::theme::ThemeMode;

/// Terminal console for SmartDNS clients and upstream servers.
#[derive(Parser, Debug)]
#[command(name = "smartdns-tui", version, about)]
struct Cli {
    /// Server URL (e.g., http://192.168.1.1:6080). A query part such as
    /// `?client_ip=10.0.0.5` seeds the client filters.
    #[arg(short = 's', long, env = "SMARTDNS_URL")]
    server: Option<String>,

    /// Profile from the config file (defaults to `default_profile`)
    #[arg(short = 'p', long, env = "SMARTDNS_PROFILE")]
    profile: Option<String>,

    /// Login name; the password comes from SMARTDNS_PASSWORD or the keyring
    #[arg(short = 'u', long)]
    username: Option<String>,

    /// Initial client filters, e.g. `client_ip=10.0.0.5&hostname=laptop`
    #[arg(short = 'q', long)]
    query: Option<String>,

    /// UI language (en, zh-CN)
    #[arg(long)]
    language: Option<Language>,

    /// Color theme
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Client rows per page
    #[arg(long)]
    page_size: Option<u32>,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Log file path (defaults to /tmp/smartdns-tui.log)
    #[arg(long, default_value = "/tmp/smartdns-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Nothing may go to stdout or stderr, since that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "smartdns_tui={log_level},smartdns_core={log_level},smartdns_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("smartdns-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Merge CLI flags over the selected profile.
///
/// Priority: CLI flags > profile > `[defaults]`. Without a profile, `--server`
/// alone is enough to connect.
fn build_connection(cli: &Cli, cfg: &Config) -> Result<(String, ConnectionConfig)> {
    let (name, profile) = match cfg.profile(cli.profile.as_deref()) {
        Ok((name, p)) => (
            name,
            Profile {
                server: cli.server.clone().unwrap_or_else(|| p.server.clone()),
                username: cli.username.clone().or_else(|| p.username.clone()),
                password: p.password.clone(),
                password_env: p.password_env.clone(),
                ca_cert: p.ca_cert.clone(),
                insecure: if cli.insecure { Some(true) } else { p.insecure },
                timeout: p.timeout,
            },
        ),
        Err(e) if cli.profile.is_some() => return Err(e.into()),
        Err(_) => {
            let Some(server) = cli.server.clone() else {
                bail!(
                    "no server configured: pass --server or add a profile to {}",
                    smartdns_config::config_path().display()
                );
            };
            (
                "cli".to_owned(),
                Profile {
                    server,
                    username: cli.username.clone(),
                    insecure: cli.insecure.then_some(true),
                    ..Profile::default()
                },
            )
        }
    };

    let conn = smartdns_config::profile_to_connection(&profile, &name, &cfg.defaults)?;
    Ok((name, conn))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file; the guard flushes logs on exit
    let _log_guard = setup_tracing(&cli);

    let cfg = smartdns_config::load_config_or_default();
    let (profile, mut conn) = build_connection(&cli, &cfg)?;

    // A query on the URL belongs to the client filters, not the API base
    let client_query = cli
        .query
        .clone()
        .or_else(|| conn.url.query().map(str::to_owned));
    conn.url.set_query(None);

    let options = AppOptions {
        server_label: conn.url.to_string(),
        language: cli.language.unwrap_or(cfg.defaults.language),
        theme: cli
            .theme
            .or_else(|| ThemeMode::from_name(&cfg.defaults.theme))
            .unwrap_or_default(),
        page_size: cli.page_size.unwrap_or(cfg.defaults.page_size),
        client_query,
        credentials: conn.credentials.clone(),
        remember_language: smartdns_config::config_path().exists(),
    };

    info!(
        url = %conn.url,
        %profile,
        language = %options.language,
        "starting smartdns-tui"
    );

    let client = smartdns_core::connect(&conn).await?;
    let mut app = App::new(Arc::new(client), options);
    app.run().await?;

    Ok(())
}
