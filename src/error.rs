/// Store error taxonomy.
///
/// Auth failures are ordinary values, not panics: the UI shows their
/// `Display` text as a status line and keeps running.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A signup field broke the rules; the message names the rule.
    #[error("{0}")]
    Validation(String),

    /// Signup with a username that already exists (case-sensitive).
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    /// Login with a username nobody registered.
    #[error("no such user '{0}'")]
    UserNotFound(String),

    /// Login with a bad password.
    #[error("wrong password")]
    WrongPassword,

    /// The snapshot file exists but cannot be understood.
    #[error("corrupt snapshot: {0}")]
    Corrupt(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
