//! Error types for message building and session operations.

/// Validation failures from [`crate::MessageBuilder::build`].
///
/// These are recoverable: the caller can construct a new builder with the
/// missing field supplied and try again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A mandatory field was never explicitly set. Carries the field name.
    #[error("mandatory field is missing: {0}")]
    MissingField(&'static str),

    /// No recipient in any of the To, Cc, or Bcc groups.
    #[error("at least one recipient is required")]
    NoRecipient,
}

/// One message that could not be delivered during a flush.
#[derive(Debug, Clone)]
pub struct SendFailure {
    /// Position of the message in the flushed batch (enqueue order).
    pub index: usize,
    /// Subject of the failed message, for diagnostics.
    pub subject: String,
    /// Why the transport rejected it.
    pub reason: String,
}

/// Failures from [`crate::MailSession`] construction and flushing.
///
/// Construction-time kinds (`Connection`, `Protocol`, `Credential`) are not
/// recoverable for the session instance; the caller must construct a new one.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Could not reach the server: refused connection, network failure, or
    /// timeout during connect or encryption upgrade.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The server answered but does not behave like a compatible mail
    /// submission endpoint (capability negotiation failed).
    #[error("capability negotiation failed: {0}")]
    Protocol(String),

    /// The server rejected the supplied credentials.
    #[error("authentication rejected: {0}")]
    Credential(String),

    /// One or more queued messages could not be sent during a flush. The
    /// remaining messages were still attempted and the queue was cleared.
    #[error("failed to send {} of {attempted} queued messages", .failures.len())]
    Send {
        /// How many messages the flush attempted.
        attempted: usize,
        /// The messages that failed, in enqueue order.
        failures: Vec<SendFailure>,
    },
}
