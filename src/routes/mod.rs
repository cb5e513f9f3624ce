pub mod deals;

use crate::deal_engine::DealEngine;
use crate::session::store::SessionStore;

/// Shared by every handler: the scraping engine and the live sessions.
pub struct AppState {
    pub engine: DealEngine,
    pub sessions: SessionStore,
}
