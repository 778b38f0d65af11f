//! Session storage.
//!
//! Sessions are addressed by the SHA-256 hash of the cookie token. The trait is
//! object safe so the in-memory store can be swapped for an external one.

use anyhow::{Context, Result};
use futures::future::BoxFuture;
use std::{
    collections::HashMap,
    fmt,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;

/// Hash of a session token; the raw token never reaches the store.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey([u8; 32]);

impl From<[u8; 32]> for SessionKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // A short prefix is enough to correlate log lines.
        write!(
            f,
            "SessionKey({:02x}{:02x}{:02x}{:02x}..)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRecord {
    pub authenticated: bool,
    pub customer_id: String,
}

impl SessionRecord {
    #[must_use]
    pub fn authenticated(customer_id: String) -> Self {
        Self {
            authenticated: true,
            customer_id,
        }
    }
}

pub trait SessionStore: Send + Sync {
    /// Return the record if present and not expired.
    fn load<'a>(&'a self, key: &'a SessionKey) -> BoxFuture<'a, Result<Option<SessionRecord>>>;

    /// Insert or replace a record; it expires `ttl` from now.
    fn save<'a>(
        &'a self,
        key: &'a SessionKey,
        record: SessionRecord,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<()>>;

    fn remove<'a>(&'a self, key: &'a SessionKey) -> BoxFuture<'a, Result<()>>;
}

struct Entry {
    record: SessionRecord,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// Process-local session store.
#[derive(Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<SessionKey, Entry>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.sessions
            .read()
            .await
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl SessionStore for MemoryStore {
    fn load<'a>(&'a self, key: &'a SessionKey) -> BoxFuture<'a, Result<Option<SessionRecord>>> {
        Box::pin(async move {
            let now = Instant::now();
            let sessions = self.sessions.read().await;
            Ok(sessions
                .get(key)
                .filter(|entry| entry.is_live(now))
                .map(|entry| entry.record.clone()))
        })
    }

    fn save<'a>(
        &'a self,
        key: &'a SessionKey,
        record: SessionRecord,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let now = Instant::now();
            let expires_at = now
                .checked_add(ttl)
                .context("session ttl overflows the clock")?;
            let mut sessions = self.sessions.write().await;
            // Expired entries are dropped whenever the map is written.
            sessions.retain(|_, entry| entry.is_live(now));
            sessions.insert(*key, Entry { record, expires_at });
            Ok(())
        })
    }

    fn remove<'a>(&'a self, key: &'a SessionKey) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.sessions.write().await.remove(key);
            Ok(())
        })
    }
}
