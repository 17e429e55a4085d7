//! The token store seam.
//!
//! The export service issues one short-lived token per session. The client
//! only ever needs a single slot for it; [`InMemorySessionStore`] is the
//! default, and embedding applications that already have a session mechanism
//! (keyed by their own session identifier) can implement [`SessionStore`]
//! on top of it instead.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

/// A cached authentication token together with its absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    /// Base64 encoding of the raw `Token` response-header value.
    pub value: String,
    /// The instant after which the token must no longer be sent.
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Whether the token may still be sent at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Storage for the single cached token of a client session.
///
/// Implementations must swap the whole value atomically; concurrent callers
/// may race to refresh an expired token and the last write wins, but a
/// reader must never observe a partially written entry.
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Return the stored token, if any. Expiry is the caller's concern.
    fn load(&self) -> Option<CachedToken>;
    /// Replace the stored token.
    fn store(&self, token: CachedToken);
    /// Remove the stored token.
    fn clear(&self);
}

/// The default process-local store: one mutex-guarded slot.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    slot: Mutex<Option<CachedToken>>,
}

impl InMemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<CachedToken>> {
        // The slot is swapped wholesale, so a poisoned lock still holds a
        // coherent value.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self) -> Option<CachedToken> {
        self.slot().clone()
    }

    fn store(&self, token: CachedToken) {
        *self.slot() = Some(token);
    }

    fn clear(&self) {
        *self.slot() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn token(value: &str, offset_secs: i64) -> CachedToken {
        CachedToken {
            value: value.to_string(),
            expires_at: Utc::now() + TimeDelta::seconds(offset_secs),
        }
    }

    #[test]
    fn store_replaces_existing_token() {
        let store = InMemorySessionStore::new();
        store.store(token("first", 3600));
        store.store(token("second", 3600));
        assert_eq!(store.load().map(|t| t.value), Some("second".into()));
    }

    #[test]
    fn clear_empties_the_slot() {
        let store = InMemorySessionStore::new();
        store.store(token("tok", 3600));
        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn validity_is_strictly_before_expiry() {
        let now = Utc::now();
        let expired = CachedToken {
            value: "tok".into(),
            expires_at: now,
        };
        assert!(!expired.is_valid_at(now));
        assert!(token("tok", 1).is_valid_at(now));
    }
}
