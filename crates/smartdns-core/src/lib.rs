//! Table-state layer between `smartdns-api` and the console UI.
//!
//! This crate owns the domain model and the data-table integration logic
//! for the SmartDNS console:
//!
//! - **[`ClientsTable`]**: server-side filtered, paginated client listing.
//!   Column filters and pagination become [`QueryParameters`]; fetches are
//!   deduplicated and superseded through a [`RequestDispatcher`], and the
//!   previous page stays visible while a newer request is pending.
//!
//! - **[`UpstreamServersTable`]**: the full upstream server list with
//!   client-side global filtering and single-column sorting.
//!
//! - **[`Backend`]**: the async seam to the server, implemented for
//!   [`smartdns_api::SmartDnsClient`].
//!
//! - Cross-cutting pieces: localization ([`i18n`]), cell formatting
//!   ([`format`]), session-expiry delegation ([`session`]), scoped listener
//!   registration ([`subscription`]) and transient notifications
//!   ([`notify`]).

pub mod backend;
pub mod clients;
pub mod columns;
pub mod config;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod format;
pub mod i18n;
pub mod model;
pub mod notify;
pub mod query;
pub mod session;
pub mod subscription;
pub mod upstream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::{Backend, connect, until_cancelled};
pub use clients::{ClientsRequest, ClientsTable, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
pub use columns::{ClientColumn, FilterMode, SortDirection, SortSpec, UpstreamColumn};
pub use config::{ConnectionConfig, Credentials, TlsVerification};
pub use dispatch::{FetchTicket, RequestDispatcher};
pub use error::CoreError;
pub use fetch::FetchStatus;
pub use i18n::{Language, TableLocale, Translator};
pub use model::{ClientPage, ClientRecord, UpstreamServerRecord};
pub use notify::{Notification, NotificationAnchor, NotificationLevel, NotificationQueue};
pub use query::{ColumnFilter, QueryParameters};
pub use session::{SessionHandler, check_session_error};
pub use subscription::{ListenerRegistry, Subscription};
pub use upstream::UpstreamServersTable;

pub use smartdns_api::{ErrorCode, error_message};
