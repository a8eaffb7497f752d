//! Server-side CSRF state tracking
//!
//! Each login attempt gets a fresh random `state`. The callback handler must
//! present it back, and it is accepted exactly once. Entries expire after a
//! TTL so abandoned logins don't accumulate.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::authorize::generate_state;

/// Default lifetime of an issued state.
pub const DEFAULT_STATE_TTL: Duration = Duration::from_secs(600);

/// In-memory set of outstanding authorization states.
pub struct StateStore {
    ttl: Duration,
    pending: Mutex<HashMap<String, Instant>>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_TTL)
    }
}

impl StateStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Generate and remember a new state value.
    pub async fn issue(&self) -> String {
        let state = generate_state();
        let mut pending = self.pending.lock().await;
        // Lazy cleanup: drop expired entries while holding the lock
        let ttl = self.ttl;
        pending.retain(|_, issued| issued.elapsed() < ttl);
        pending.insert(state.clone(), Instant::now());
        debug!(outstanding = pending.len(), "authorization state issued");
        state
    }

    /// Accept `state` if it was issued by this store and has not expired.
    ///
    /// A state is consumed on first use; replaying it returns false.
    pub async fn consume(&self, state: &str) -> bool {
        let issued = {
            let mut pending = self.pending.lock().await;
            pending.remove(state)
        };

        match issued {
            Some(issued) if issued.elapsed() < self.ttl => true,
            Some(_) => {
                warn!("authorization state expired before callback");
                false
            }
            None => {
                warn!("unknown or replayed authorization state");
                false
            }
        }
    }

    /// Number of states issued and not yet consumed (including expired ones
    /// not yet swept).
    pub async fn outstanding(&self) -> usize {
        self.pending.lock().await.len()
    }
}
