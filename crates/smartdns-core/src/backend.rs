// ── Backend seam ──
//
// The operations the console needs from a SmartDNS server, as a trait so
// the TUI can run against `SmartDnsClient` in production and a fake in
// tests. Futures are `Send` so callers can spawn them.

use std::future::Future;

use secrecy::ExposeSecret;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use smartdns_api::SmartDnsClient;

use crate::config::{ConnectionConfig, Credentials};
use crate::error::CoreError;
use crate::model::{ClientPage, UpstreamServerRecord};
use crate::query::QueryParameters;

pub trait Backend: Send + Sync + 'static {
    fn fetch_clients(
        &self,
        params: &QueryParameters,
    ) -> impl Future<Output = Result<ClientPage, CoreError>> + Send;

    fn delete_client(&self, id: u64) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn fetch_upstream_servers(
        &self,
    ) -> impl Future<Output = Result<Vec<UpstreamServerRecord>, CoreError>> + Send;

    /// Establish a cookie session.
    fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl Backend for SmartDnsClient {
    fn fetch_clients(
        &self,
        params: &QueryParameters,
    ) -> impl Future<Output = Result<ClientPage, CoreError>> + Send {
        let pairs = params.to_pairs();
        async move { Ok(ClientPage::from(self.get_clients(&pairs).await?)) }
    }

    fn delete_client(&self, id: u64) -> impl Future<Output = Result<(), CoreError>> + Send {
        async move { Ok(self.delete_client_by_id(id).await?) }
    }

    fn fetch_upstream_servers(
        &self,
    ) -> impl Future<Output = Result<Vec<UpstreamServerRecord>, CoreError>> + Send {
        async move {
            let servers = self.get_upstream_servers().await?;
            Ok(servers.into_iter().map(UpstreamServerRecord::from).collect())
        }
    }

    fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<(), CoreError>> + Send {
        let username = credentials.username.clone();
        let password = credentials.password.clone();
        async move { Ok(self.login(&username, &password).await?) }
    }
}

/// Build the client for `config` and, when credentials are configured,
/// establish the session.
pub async fn connect(config: &ConnectionConfig) -> Result<SmartDnsClient, CoreError> {
    let client = config.build_client()?;
    match &config.credentials {
        Some(creds) => {
            debug!(
                username = %creds.username,
                has_password = !creds.password.expose_secret().is_empty(),
                "authenticating"
            );
            client.authenticate(creds).await?;
            info!(url = %config.url, "session established");
        }
        None => info!(url = %config.url, "connecting without login"),
    }
    Ok(client)
}

/// Run `fut` until it finishes or `token` is cancelled. Returns `None`
/// when cancelled first.
pub async fn until_cancelled<T>(
    token: CancellationToken,
    fut: impl Future<Output = T>,
) -> Option<T> {
    tokio::select! {
        () = token.cancelled() => None,
        out = fut => Some(out),
    }
}
