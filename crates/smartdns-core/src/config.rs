// ── Runtime connection configuration ──
//
// Describes *how* to reach a SmartDNS server. Carries credential data and
// connection tuning, but never touches disk. The TUI builds a
// `ConnectionConfig` (usually via `smartdns-config`) and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use smartdns_api::{SmartDnsClient, TlsMode, TransportConfig};

use crate::error::CoreError;

/// Username/password for the cookie session.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single SmartDNS server.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Server URL (e.g. `http://192.168.1.1:6080`).
    pub url: Url,
    /// `None` when the session is already established out of band.
    pub credentials: Option<Credentials>,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ConnectionConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            credentials: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
            cookie_jar: None,
        }
        .with_cookie_jar()
    }

    /// Build the HTTP client for this connection.
    pub fn build_client(&self) -> Result<SmartDnsClient, CoreError> {
        Ok(SmartDnsClient::new(self.url.clone(), &self.transport())?)
    }
}
