//! Session Router: stable session id → singleton session actor.
//!
//! Lookups and spawns go through one DashMap entry, so two concurrent
//! resolves for the same id can never start two actors. An actor removes its
//! own entry when it goes idle; the next resolve spawns a fresh instance,
//! which rehydrates history from the store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

use crate::llm_client::TextGenerator;
use crate::session::actor::{ConnectionId, SessionActor, SessionHandle};
use crate::session::error::SessionError;
use crate::session::machine::SessionContext;
use crate::session::protocol::ServerMessage;
use crate::session::store::HistoryStore;

/// Resolve-and-connect attempts before giving up on a session that keeps
/// stopping underneath the caller.
const MAX_CONNECT_ATTEMPTS: u32 = 3;

pub(crate) type SessionRegistry = Arc<DashMap<String, SessionHandle>>;

#[derive(Clone)]
pub struct SessionRouter {
    sessions: SessionRegistry,
    llm: Arc<dyn TextGenerator>,
    store: Arc<dyn HistoryStore>,
    generation_timeout: Duration,
    next_instance: Arc<AtomicU64>,
}

impl SessionRouter {
    pub fn new(
        llm: Arc<dyn TextGenerator>,
        store: Arc<dyn HistoryStore>,
        generation_timeout: Duration,
    ) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            llm,
            store,
            generation_timeout,
            next_instance: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Returns the live actor for `session_id`, spawning one if needed.
    pub fn resolve(&self, session_id: &str) -> SessionHandle {
        match self.sessions.entry(session_id.to_string()) {
            Entry::Occupied(entry) if !entry.get().is_closed() => entry.get().clone(),
            Entry::Occupied(mut entry) => {
                let handle = self.spawn(session_id);
                entry.insert(handle.clone());
                handle
            }
            Entry::Vacant(entry) => {
                let handle = self.spawn(session_id);
                entry.insert(handle.clone());
                handle
            }
        }
    }

    /// Resolves the session and attaches `outbound` to it as its live connection.
    pub async fn connect(
        &self,
        session_id: &str,
        outbound: mpsc::Sender<ServerMessage>,
    ) -> Result<(SessionHandle, ConnectionId), SessionError> {
        for attempt in 1..=MAX_CONNECT_ATTEMPTS {
            let handle = self.resolve(session_id);
            match handle.connect(outbound.clone()).await {
                Ok(connection) => return Ok((handle, connection)),
                Err(SessionError::ActorUnavailable) => {
                    debug!(session_id, attempt, "Session actor stopped during connect; retrying");
                }
                Err(e) => return Err(e),
            }
        }
        Err(SessionError::ActorUnavailable)
    }

    /// Number of session actors currently resident.
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    fn spawn(&self, session_id: &str) -> SessionHandle {
        let instance = self.next_instance.fetch_add(1, Ordering::Relaxed);
        let ctx = SessionContext {
            session_id: session_id.to_string(),
            llm: self.llm.clone(),
            store: self.store.clone(),
            generation_timeout: self.generation_timeout,
        };
        SessionActor::spawn(ctx, instance, self.sessions.clone())
    }
}
