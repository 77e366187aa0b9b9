// ── Domain model ──
//
// Display records the console's tables operate on, decoupled from the
// wire shapes in `smartdns_api::models`.

pub mod client;
pub mod upstream;

pub use client::{ClientPage, ClientRecord};
pub use upstream::UpstreamServerRecord;
