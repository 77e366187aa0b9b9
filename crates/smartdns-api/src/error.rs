use thiserror::Error;

/// Top-level error type for the `smartdns-api` crate.
///
/// Covers every failure mode of the management API: authentication,
/// transport, structured backend errors, and payload decoding.
/// `smartdns-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, account locked, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Session cookie expired or was revoked (HTTP 401).
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Structured error returned by the management API.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: u16,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The server answered 2xx but the expected payload was absent.
    #[error("Response contained no data")]
    MissingPayload,
}

/// Backend error classification, translatable into a message via
/// [`error_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Session invalid or expired. Triggers session recovery upstream.
    SessionExpired,
    LoginFailed,
    PermissionDenied,
    NotFound,
    InvalidParameter,
    ServerError,
    Network,
    Timeout,
    InvalidResponse,
    NoData,
    Unknown,
}

impl Error {
    /// Classify this error into an [`ErrorCode`].
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::SessionExpired => ErrorCode::SessionExpired,
            Self::Authentication { .. } => ErrorCode::LoginFailed,
            Self::Transport(e) if e.is_timeout() => ErrorCode::Timeout,
            Self::Timeout { .. } => ErrorCode::Timeout,
            Self::Transport(_) | Self::Tls(_) => ErrorCode::Network,
            Self::InvalidUrl(_) => ErrorCode::InvalidParameter,
            Self::Api { status, code, .. } => classify_api(*status, code.as_deref()),
            Self::Deserialization { .. } => ErrorCode::InvalidResponse,
            Self::MissingPayload => ErrorCode::NoData,
        }
    }

    /// Returns `true` if this error indicates the session is no longer valid.
    pub fn is_session_expired(&self) -> bool {
        self.code() == ErrorCode::SessionExpired
    }
}

fn classify_api(status: u16, code: Option<&str>) -> ErrorCode {
    match code {
        Some("session_expired" | "unauthorized") => return ErrorCode::SessionExpired,
        Some("not_found") => return ErrorCode::NotFound,
        Some("invalid_parameter") => return ErrorCode::InvalidParameter,
        _ => {}
    }
    match status {
        401 => ErrorCode::SessionExpired,
        403 => ErrorCode::PermissionDenied,
        404 => ErrorCode::NotFound,
        400 | 422 => ErrorCode::InvalidParameter,
        500..=599 => ErrorCode::ServerError,
        _ => ErrorCode::Unknown,
    }
}

/// Human-readable message for an error code.
///
/// The returned string doubles as the translation key for the console's
/// locale bundles.
pub fn error_message(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::SessionExpired => "Session expired, please log in again.",
        ErrorCode::LoginFailed => "Login failed.",
        ErrorCode::PermissionDenied => "Permission denied.",
        ErrorCode::NotFound => "Resource not found.",
        ErrorCode::InvalidParameter => "Invalid parameter.",
        ErrorCode::ServerError => "Server error.",
        ErrorCode::Network => "Network error.",
        ErrorCode::Timeout => "Request timed out.",
        ErrorCode::InvalidResponse => "Invalid response from server.",
        ErrorCode::NoData => "No data returned.",
        ErrorCode::Unknown => "Unknown error.",
    }
}
