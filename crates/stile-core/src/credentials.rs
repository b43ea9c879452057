//! User-entered credential pair and the submit-validity rule.

/// Identifier/secret pair as typed by the user.
///
/// Owned and mutated by the UI layer; the flow controller only reads it.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub identifier: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    /// Returns true when both fields are non-empty after trimming.
    ///
    /// This is the sole gate on malformed input; whitespace-only values
    /// never reach the gateway.
    pub fn is_valid(&self) -> bool {
        !self.identifier.trim().is_empty() && !self.secret.trim().is_empty()
    }

    /// Clears both fields.
    pub fn clear(&mut self) {
        self.identifier.clear();
        self.secret.clear();
    }
}
