//! Admin session: a time-limited elevated state that permits track-list mutation.
//!
//! The session is an explicit value owned by the controller. It is persisted
//! under [`ADMIN_SESSION_KEY`] as `{"timestamp": <unix millis>, "authenticated": true}`
//! and only honoured on restore while it is younger than the session window.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{Storage, StorageError};

pub const ADMIN_SESSION_KEY: &str = "jukon-admin-session";

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    timestamp: i64,
    authenticated: bool,
}

/// The configured admin secret.
#[derive(Clone)]
pub struct AdminSecret(String);

impl AdminSecret {
    /// Empty or whitespace-only secrets disable admin access.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            None
        } else {
            Some(Self(secret))
        }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        let (a, b) = (self.0.as_bytes(), candidate.as_bytes());
        // Compare every byte so timing does not depend on the first mismatch.
        a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

impl std::fmt::Debug for AdminSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminSecret(..)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    authenticated: bool,
    established_at: Option<DateTime<Utc>>,
    window: Duration,
}

impl AdminSession {
    pub fn new(window: Duration) -> Self {
        Self {
            authenticated: false,
            established_at: None,
            window,
        }
    }

    /// Restore a persisted session, purging it from `storage` when it is stale
    /// or unreadable.
    pub fn restore(storage: &mut impl Storage, window: Duration, now: DateTime<Utc>) -> Self {
        let mut session = Self::new(window);
        let Some(text) = storage.get(ADMIN_SESSION_KEY) else {
            return session;
        };

        let established = serde_json::from_str::<StoredSession>(&text)
            .ok()
            .filter(|s| s.authenticated)
            .and_then(|s| DateTime::<Utc>::from_timestamp_millis(s.timestamp));

        match established {
            Some(at) if now.signed_duration_since(at) < window => {
                session.authenticated = true;
                session.established_at = Some(at);
                log::info!("restored admin session established at {at}");
            }
            _ => {
                log::info!("purging stale admin session");
                if let Err(e) = storage.remove(ADMIN_SESSION_KEY) {
                    log::warn!("failed to purge admin session: {e}");
                }
            }
        }
        session
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn established_at(&self) -> Option<DateTime<Utc>> {
        self.established_at
    }

    /// Mark the session authenticated as of `now` and persist it.
    pub fn establish(&mut self, storage: &mut impl Storage, now: DateTime<Utc>) -> Result<(), StorageError> {
        self.authenticated = true;
        self.established_at = Some(now);

        let stored = StoredSession {
            timestamp: now.timestamp_millis(),
            authenticated: true,
        };
        let text = serde_json::to_string(&stored).unwrap_or_default();
        storage.set(ADMIN_SESSION_KEY, text)
    }

    /// Drop elevated access and forget the persisted session.
    pub fn clear(&mut self, storage: &mut impl Storage) -> Result<(), StorageError> {
        self.authenticated = false;
        self.established_at = None;
        storage.remove(ADMIN_SESSION_KEY)
    }
}
