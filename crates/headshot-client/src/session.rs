//! Session-scoped refresh circuit breaker.
//!
//! Once a token refresh has failed, the session is known to be dead: every
//! later 401 is surfaced immediately instead of hitting the refresh endpoint
//! again. The flag stays tripped until the next successful authentication
//! resets it.

use std::sync::atomic::{AtomicBool, Ordering};

/// Storage for the "a refresh has failed in this session" flag.
///
/// Each [`ApiClient`](crate::ApiClient) owns one instance; swap in a custom
/// implementation to share the flag with other state or to observe it in
/// tests.
pub trait SessionState: Send + Sync + std::fmt::Debug {
    /// `true` once a refresh has failed and not been reset since.
    fn is_tripped(&self) -> bool;

    /// Record that a refresh attempt failed.
    fn trip(&self);

    /// Clear the flag after a successful authentication.
    fn reset(&self);
}

/// In-memory [`SessionState`], scoped to the lifetime of the value.
#[derive(Debug, Default)]
pub struct MemorySessionState {
    refresh_failed: AtomicBool,
}

impl MemorySessionState {
    /// A fresh session with the flag unset.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionState for MemorySessionState {
    fn is_tripped(&self) -> bool {
        self.refresh_failed.load(Ordering::Acquire)
    }

    fn trip(&self) {
        if !self.refresh_failed.swap(true, Ordering::AcqRel) {
            tracing::warn!("token refresh failed, further refresh attempts disabled for this session");
        }
    }

    fn reset(&self) {
        if self.refresh_failed.swap(false, Ordering::AcqRel) {
            tracing::debug!("refresh circuit reset");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
