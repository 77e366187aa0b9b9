//! Screen implementations. Each screen is a top-level Component.

pub mod clients;
pub mod upstream;

use std::sync::Arc;

use smartdns_core::SessionHandler;

use crate::component::Component;
use crate::screen::ScreenId;

/// Everything the screens need at construction.
pub struct ScreenOptions {
    pub page_size: u32,
    /// URL-style query seeding the client filters.
    pub client_query: Option<String>,
}

/// Create screen components for the tab bar.
pub fn create_screens(
    session: &Arc<dyn SessionHandler>,
    options: ScreenOptions,
) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Clients,
            Box::new(clients::ClientsScreen::new(
                Arc::clone(session),
                options.page_size,
                options.client_query,
            )),
        ),
        (
            ScreenId::Upstream,
            Box::new(upstream::UpstreamScreen::new(Arc::clone(session))),
        ),
    ]
}
