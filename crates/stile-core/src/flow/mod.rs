//! Login flow controller.
//!
//! Orchestrates one login attempt: credential validity, the lockout
//! policy, the connectivity gate, and the async gateway exchange, all
//! feeding a single observable state cell.

mod state;

pub use state::{LOCKED_OUT_MESSAGE, LoginState, OFFLINE_MESSAGE};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::warn;

use crate::connectivity::ConnectivityGate;
use crate::credentials::Credentials;
use crate::gateway::AuthGateway;
use crate::lockout::LockoutPolicy;

/// Login state machine with at most one in-flight attempt.
///
/// The state cell is single-writer: only this controller publishes
/// transitions, and readers observe them in order through [`subscribe`]
/// or [`state`].
///
/// [`subscribe`]: LoginFlow::subscribe
/// [`state`]: LoginFlow::state
pub struct LoginFlow<G, C> {
    gateway: G,
    connectivity: C,
    inner: Mutex<Inner>,
    state: watch::Sender<LoginState>,
    /// Bumped by `logout()`; an in-flight attempt that no longer
    /// matches discards its result instead of publishing it.
    attempt: AtomicU64,
}

#[derive(Debug)]
struct Inner {
    credentials: Credentials,
    remember_me: bool,
    lockout: LockoutPolicy,
}

impl<G, C> LoginFlow<G, C>
where
    G: AuthGateway,
    C: ConnectivityGate,
{
    pub fn new(gateway: G, connectivity: C, lockout: LockoutPolicy) -> Self {
        Self {
            gateway,
            connectivity,
            inner: Mutex::new(Inner {
                credentials: Credentials::default(),
                remember_me: false,
                lockout,
            }),
            state: watch::Sender::new(LoginState::Idle),
            attempt: AtomicU64::new(0),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> LoginState {
        self.state.borrow().clone()
    }

    /// Change notifications for UI layers.
    pub fn subscribe(&self) -> watch::Receiver<LoginState> {
        self.state.subscribe()
    }

    pub fn set_identifier(&self, value: impl Into<String>) {
        self.lock().credentials.identifier = value.into();
    }

    pub fn set_secret(&self, value: impl Into<String>) {
        self.lock().credentials.secret = value.into();
    }

    pub fn set_remember_me(&self, enabled: bool) {
        self.lock().remember_me = enabled;
    }

    pub fn remember_me(&self) -> bool {
        self.lock().remember_me
    }

    /// Derived submit-validity of the current credentials.
    pub fn form_valid(&self) -> bool {
        self.lock().credentials.is_valid()
    }

    pub fn failure_count(&self) -> u32 {
        self.lock().lockout.failure_count()
    }

    pub fn is_locked_out(&self) -> bool {
        self.lock().lockout.is_locked_out()
    }

    /// Runs one login attempt; never fails and never panics.
    ///
    /// Guard order: form validity, in-flight check, lockout,
    /// connectivity, then the gateway call. Lockout is checked before
    /// connectivity, so a locked-out offline device still reports
    /// `LockedOut` rather than an offline error. Offline rejections do
    /// not count as credential failures.
    pub async fn submit(&self) {
        let (identifier, secret, remember_me, attempt) = {
            let inner = self.lock();
            if !inner.credentials.is_valid() {
                return;
            }
            // At most one attempt in flight per controller.
            if self.state.borrow().is_loading() {
                return;
            }
            if inner.lockout.is_locked_out() {
                self.state.send_replace(LoginState::LockedOut);
                return;
            }
            if !self.connectivity.is_connected() {
                self.state
                    .send_replace(LoginState::Error(OFFLINE_MESSAGE.to_string()));
                return;
            }
            self.state.send_replace(LoginState::Loading);
            (
                inner.credentials.identifier.clone(),
                inner.credentials.secret.clone(),
                inner.remember_me,
                self.attempt.load(Ordering::SeqCst),
            )
        };

        let result = self.gateway.authenticate(&identifier, &secret).await;

        // A logout while the call was in flight supersedes this attempt;
        // its result must not resurrect a stale state.
        if self.attempt.load(Ordering::SeqCst) != attempt {
            return;
        }

        match result {
            Ok(token) => {
                if remember_me {
                    if let Err(e) = self.gateway.save_token(&token).await {
                        warn!("failed to persist session token: {e:#}");
                    }
                    // A logout that raced the save has already cleared
                    // the store; the late save put the token back, so
                    // undo it before bowing out.
                    if self.attempt.load(Ordering::SeqCst) != attempt {
                        if let Err(e) = self.gateway.clear_saved_token().await {
                            warn!("failed to clear superseded session token: {e:#}");
                        }
                        return;
                    }
                }
                let mut inner = self.lock();
                if self.attempt.load(Ordering::SeqCst) != attempt {
                    return;
                }
                if let Err(e) = inner.lockout.record_success() {
                    warn!("failed to persist lockout record: {e:#}");
                }
                self.state.send_replace(LoginState::Success);
            }
            Err(err) => {
                let mut inner = self.lock();
                if self.attempt.load(Ordering::SeqCst) != attempt {
                    return;
                }
                if let Err(e) = inner.lockout.record_failure() {
                    warn!("failed to persist lockout record: {e:#}");
                }
                if inner.lockout.is_locked_out() {
                    self.state.send_replace(LoginState::LockedOut);
                } else {
                    self.state
                        .send_replace(LoginState::Error(err.user_message().to_string()));
                }
            }
        }
    }

    /// Clears the session and resets the flow to `Idle`.
    ///
    /// Supersedes any in-flight attempt. The lockout record is
    /// untouched.
    pub async fn logout(&self) {
        self.attempt.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.gateway.clear_saved_token().await {
            warn!("failed to clear saved session token: {e:#}");
        }
        let mut inner = self.lock();
        inner.credentials.clear();
        inner.remember_me = false;
        self.state.send_replace(LoginState::Idle);
    }

    /// Restores a remembered session without an authentication round-trip.
    ///
    /// The sole transition that bypasses validation, lockout, and
    /// connectivity: a saved, non-expired token is trusted until the
    /// gateway expires it. An absent or expired token leaves the state
    /// unchanged.
    pub async fn check_for_saved_token(&self) {
        match self.gateway.saved_token().await {
            Ok(Some(_token)) => {
                self.state.send_replace(LoginState::Success);
            }
            Ok(None) => {}
            Err(e) => warn!("failed to read saved session token: {e:#}"),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
