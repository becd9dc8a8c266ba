//! Typing presence store.
//!
//! In-memory map from identity to last activity. Timestamps come from the
//! tokio clock, so a paused runtime drives expiry deterministically.

use feed_core::Identity;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Last activity of one identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceEntry {
    pub identity: Identity,
    pub last_activity: Instant,
}

impl PresenceEntry {
    /// Time elapsed since the last activity, as of `now`
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }

    /// Whether the entry is older than `expiry` as of `now`
    pub fn is_expired(&self, now: Instant, expiry: Duration) -> bool {
        self.age(now) > expiry
    }
}

/// Shared presence map
///
/// Cheap to clone; every operation takes the lock once.
#[derive(Debug, Clone, Default)]
pub struct PresenceStore {
    entries: Arc<Mutex<HashMap<Identity, PresenceEntry>>>,
}

impl PresenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `identity` or refresh its last activity to now
    pub fn touch(&self, identity: &Identity) {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        match entries.get_mut(identity) {
            Some(entry) => entry.last_activity = now,
            None => {
                entries.insert(
                    identity.clone(),
                    PresenceEntry {
                        identity: identity.clone(),
                        last_activity: now,
                    },
                );
            }
        }
    }

    /// Remove `identity`; returns whether it was present
    pub fn remove(&self, identity: &Identity) -> bool {
        self.entries.lock().remove(identity).is_some()
    }

    /// Currently present identities, sorted
    pub fn snapshot_keys(&self) -> Vec<Identity> {
        let mut keys: Vec<Identity> = self.entries.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Remove every entry older than `expiry` and return the removed identities, sorted
    pub fn sweep_expired(&self, expiry: Duration) -> Vec<Identity> {
        let now = Instant::now();
        let mut removed = Vec::new();

        self.entries.lock().retain(|identity, entry| {
            if entry.is_expired(now, expiry) {
                removed.push(identity.clone());
                false
            } else {
                true
            }
        });

        removed.sort();
        removed
    }

    /// Get a copy of the entry for `identity`
    pub fn get(&self, identity: &Identity) -> Option<PresenceEntry> {
        self.entries.lock().get(identity).cloned()
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.entries.lock().contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
