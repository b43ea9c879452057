//! Observable login flow state.

/// Login attempt progress, the sole externally observable signal.
///
/// Exactly one variant is active at a time; transitions happen only
/// inside [`super::LoginFlow`]. `Loading` is always transient and
/// resolves to `Success`, `Error`, or `LockedOut`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoginState {
    /// No attempt in progress.
    #[default]
    Idle,
    /// An authentication call is in flight.
    Loading,
    /// Authenticated; a session exists.
    Success,
    /// The attempt failed with a user-facing message.
    Error(String),
    /// Attempts are rejected until the lockout expiry passes.
    LockedOut,
}

impl LoginState {
    /// True while an attempt is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, LoginState::Loading)
    }
}

/// Shown when the connectivity gate reports offline.
pub const OFFLINE_MESSAGE: &str = "No internet connection";

/// Shown by UIs for the locked-out rest state.
pub const LOCKED_OUT_MESSAGE: &str = "Account locked due to too many failed attempts";
