//! Session storage.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::session::{Session, SessionId};

/// Storage for invoice sessions.
pub trait SessionStore: Send + Sync {
    /// Store a session and return its id.
    fn create(&self, session: Session) -> SessionId;

    /// Fetch a live session.
    fn get(&self, id: &SessionId) -> Option<Session>;

    fn remove(&self, id: &SessionId);
}

struct Entry {
    session: Session,
    expires_at: Instant,
}

/// In-process session store with a fixed time-to-live.
#[derive(Clone)]
pub struct MemorySessionStore {
    inner: Arc<DashMap<SessionId, Entry>>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.inner.len();
        self.inner.retain(|_, entry| entry.expires_at > now);
        before - self.inner.len()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&self, session: Session) -> SessionId {
        let purged = self.purge_expired();
        if purged > 0 {
            tracing::debug!(purged, "Purged expired sessions");
        }

        let id = SessionId::new();
        self.inner.insert(
            id,
            Entry {
                session,
                expires_at: Instant::now() + self.ttl,
            },
        );
        id
    }

    fn get(&self, id: &SessionId) -> Option<Session> {
        let live = self
            .inner
            .get(id)
            .map(|entry| (entry.expires_at > Instant::now(), entry.session.clone()));
        match live {
            Some((true, session)) => Some(session),
            Some((false, _)) => {
                self.inner.remove(id);
                None
            }
            None => None,
        }
    }

    fn remove(&self, id: &SessionId) {
        self.inner.remove(id);
    }
}
