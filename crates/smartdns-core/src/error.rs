// ── Core error types ──
//
// User-facing errors from smartdns-core. Consumers never see reqwest
// errors or JSON parse failures directly; the `From<smartdns_api::Error>`
// impl translates transport-layer errors into domain variants. The type is
// `Clone` so fetch outcomes can be held in table state and re-rendered.

use thiserror::Error;

use smartdns_api::ErrorCode;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Session expired")]
    SessionExpired,

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Backend errors ───────────────────────────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        code: ErrorCode,
        status: Option<u16>,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Response contained no data")]
    MissingPayload,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Classification used to pick a localized message.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ConnectionFailed { .. } => ErrorCode::Network,
            Self::AuthenticationFailed { .. } => ErrorCode::LoginFailed,
            Self::SessionExpired => ErrorCode::SessionExpired,
            Self::Timeout { .. } => ErrorCode::Timeout,
            Self::Api { code, .. } => *code,
            Self::InvalidResponse { .. } => ErrorCode::InvalidResponse,
            Self::MissingPayload => ErrorCode::NoData,
            Self::Config { .. } => ErrorCode::InvalidParameter,
            Self::Internal(_) => ErrorCode::Unknown,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        self.code() == ErrorCode::SessionExpired
    }

    /// Malformed or absent payload, as opposed to a backend-reported error.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::MissingPayload | Self::InvalidResponse { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<smartdns_api::Error> for CoreError {
    fn from(err: smartdns_api::Error) -> Self {
        let code = err.code();
        match err {
            smartdns_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            smartdns_api::Error::SessionExpired => CoreError::SessionExpired,
            smartdns_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                }
            }
            smartdns_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            smartdns_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            smartdns_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            smartdns_api::Error::Api {
                message, status, ..
            } => {
                if code == ErrorCode::SessionExpired {
                    CoreError::SessionExpired
                } else {
                    CoreError::Api {
                        message,
                        code,
                        status: Some(status),
                    }
                }
            }
            smartdns_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
            smartdns_api::Error::MissingPayload => CoreError::MissingPayload,
        }
    }
}
