//! Live sessions, keyed by the id `tower-sessions` issues in the session cookie
//!
//! The cookie, its id and its idle expiry are owned by `tower-sessions` over a
//! [`MemoryStore`]. The record itself only carries an action counter so it is
//! re-saved, and its expiry pushed back, on every action. The browsing state
//! lives here behind a per-session mutex that a handler holds for the whole
//! action, fetch included.

use crate::error::SessionError;
use crate::session::SessionState;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tower_sessions::cookie::SameSite;
use tower_sessions::session::Id;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};
use tracing::{debug, info};

pub const SESSION_COOKIE: &str = "deal_session";

const ACTIONS_KEY: &str = "actions";
const MAX_IDLE: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Handle to one session's state. Hold the lock for a whole action so a
/// session never runs two fetches at once.
pub type SessionHandle = Arc<Mutex<SessionState>>;

pub struct SessionStore {
    backend: MemoryStore,
    states: Mutex<HashMap<Id, SessionEntry>>,
    idle_timeout: Duration,
}

struct SessionEntry {
    state: SessionHandle,
    last_seen: Instant,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            backend: MemoryStore::default(),
            states: Mutex::new(HashMap::new()),
            idle_timeout: idle_timeout.min(MAX_IDLE),
        }
    }

    /// Cookie handling for the router. Sessions die after `idle_timeout`
    /// without an action.
    pub fn layer(&self) -> SessionManagerLayer<MemoryStore> {
        SessionManagerLayer::new(self.backend.clone())
            .with_name(SESSION_COOKIE)
            .with_secure(false)
            .with_same_site(SameSite::Lax)
            .with_expiry(self.expiry())
    }

    fn expiry(&self) -> Expiry {
        Expiry::OnInactivity(time::Duration::milliseconds(self.idle_timeout.as_millis() as i64))
    }

    /// The state behind an existing, unexpired session. Never creates one.
    pub async fn lookup(&self, session: &Session) -> Result<Option<SessionHandle>, SessionError> {
        // Loading the record drops the id when the cookie's session expired.
        if session.get::<u64>(ACTIONS_KEY).await?.is_none() {
            return Ok(None);
        }
        let Some(id) = session.id() else {
            return Ok(None);
        };

        let mut states = self.states.lock().await;
        Ok(states.get_mut(&id).map(|entry| {
            entry.last_seen = Instant::now();
            entry.state.clone()
        }))
    }

    /// The state for an action, starting a session when the caller has none.
    /// Counts the action so the cookie is refreshed.
    pub async fn open(&self, session: &Session) -> Result<SessionHandle, SessionError> {
        let actions = session.get::<u64>(ACTIONS_KEY).await?.unwrap_or_default();
        session.insert(ACTIONS_KEY, actions.wrapping_add(1)).await?;
        if session.id().is_none() {
            session.save().await?;
        }
        let id = session.id().ok_or(SessionError::MissingId)?;

        let mut states = self.states.lock().await;

        // Clean up states whose cookie has gone idle
        let now = Instant::now();
        let before = states.len();
        states.retain(|_, entry| now.duration_since(entry.last_seen) < self.idle_timeout);
        if states.len() < before {
            debug!(evicted = before - states.len(), "dropped idle sessions");
        }

        let entry = states.entry(id).or_insert_with(|| {
            info!(session = %id, "started session");
            SessionEntry {
                state: SessionHandle::default(),
                last_seen: now,
            }
        });
        entry.last_seen = now;
        Ok(entry.state.clone())
    }

    /// Tear the caller's session down and expire its cookie. Returns whether
    /// there was state to drop.
    pub async fn end(&self, session: &Session) -> Result<bool, SessionError> {
        let id = session.id();
        session.flush().await?;

        let Some(id) = id else {
            return Ok(false);
        };
        let removed = self.states.lock().await.remove(&id).is_some();
        if removed {
            info!(session = %id, "ended session");
        }
        Ok(removed)
    }
}
