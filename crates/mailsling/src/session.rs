//! Authenticated mail-submission session with a send queue.

use crate::config::{Security, SessionConfig};
use crate::error::{SendFailure, SessionError};
use crate::message::{Message, MessageBuilder};
use mailsling_smtp::{AuthMechanism, Client, Error as SmtpError, connect, connect_tls};
use tracing::{debug, info, warn};

/// Hostname presented to the server in EHLO.
const EHLO_HOSTNAME: &str = "localhost";

/// A mail-submission session.
///
/// Owns one authenticated SMTP connection for its whole lifetime and a queue
/// of built messages. There is no reconnect logic: a session that loses its
/// connection will fail subsequent sends and should be discarded.
///
/// ```ignore
/// use mailsling::{MailSession, Security, SessionConfig};
///
/// let config = SessionConfig::new("smtp.example.com", Security::StartTls)
///     .with_credentials("ada@example.com", "app-password");
/// let mut session = MailSession::connect(&config, "ada@example.com", "Ada Lovelace").await?;
///
/// let message = session
///     .message_builder()
///     .to("charles@example.com")
///     .subject("Engine notes")
///     .html_body("<p>Enclosed.</p>")
///     .build()?;
/// session.enqueue(message);
/// session.flush().await?;
/// session.close().await?;
/// ```
#[derive(Debug)]
pub struct MailSession {
    client: Client,
    sender: String,
    display_name: String,
    queue: Vec<Message>,
}

impl MailSession {
    /// Connects, negotiates capabilities, upgrades encryption per the
    /// configured [`Security`] mode, and authenticates.
    ///
    /// The whole sequence runs under the config's timeout. Capabilities are
    /// re-negotiated after a STARTTLS upgrade: some servers only advertise
    /// their full set over the encrypted channel. Authentication uses
    /// AUTH PLAIN, or AUTH LOGIN when that is the only mechanism the server
    /// advertises.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Connection`]: connect refused, network failure, or
    ///   timeout anywhere in the sequence
    /// - [`SessionError::Protocol`]: the server rejected capability
    ///   negotiation or does not offer STARTTLS
    /// - [`SessionError::Credential`]: the server rejected the credentials
    pub async fn connect(
        config: &SessionConfig,
        sender: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Result<Self, SessionError> {
        let client = tokio::time::timeout(config.timeout, Self::handshake(config))
            .await
            .map_err(|_| {
                SessionError::Connection(format!(
                    "no response from {}:{} within {:?}",
                    config.host, config.port, config.timeout
                ))
            })??;

        info!(
            host = %config.host,
            port = config.port,
            security = config.security.display_name(),
            "mail session established"
        );
        Ok(Self {
            client,
            sender: sender.into(),
            display_name: display_name.into(),
            queue: Vec::new(),
        })
    }

    async fn handshake(config: &SessionConfig) -> Result<Client, SessionError> {
        let stream = match config.security {
            Security::Tls => connect_tls(&config.host, config.port, config.timeout).await,
            Security::StartTls | Security::None => {
                connect(&config.host, config.port, config.timeout).await
            }
        }
        .map_err(|e| SessionError::Connection(e.to_string()))?;

        let mut client = Client::from_stream(stream)
            .await
            .map_err(|e| SessionError::Connection(e.to_string()))?;

        client
            .ehlo(EHLO_HOSTNAME)
            .await
            .map_err(|e| classify(e, SessionError::Protocol))?;

        if config.security == Security::StartTls {
            client = client
                .starttls(&config.host)
                .await
                .map_err(|e| classify(e, SessionError::Protocol))?;
            client
                .ehlo(EHLO_HOSTNAME)
                .await
                .map_err(|e| classify(e, SessionError::Protocol))?;
        }

        // AUTH PLAIN unless the server only offers LOGIN
        let mechanisms = client.server_info().auth_mechanisms();
        let auth = if mechanisms.contains(&AuthMechanism::Login)
            && !mechanisms.contains(&AuthMechanism::Plain)
        {
            client.auth_login(&config.username, &config.password).await
        } else {
            client.auth_plain(&config.username, &config.password).await
        };
        auth.map_err(|e| classify(e, SessionError::Credential))?;

        Ok(client)
    }

    /// Returns a fresh [`MessageBuilder`] pre-seeded with the session's
    /// sender address and display name. Both can still be overridden before
    /// `build()`.
    #[must_use]
    pub fn message_builder(&self) -> MessageBuilder {
        MessageBuilder::new()
            .sender(self.sender.as_str())
            .display_name(self.display_name.as_str())
    }

    /// Appends a built message to the send queue.
    ///
    /// Queuing and sending in one batch avoids per-message connection
    /// overhead; nothing is transmitted until [`MailSession::flush`].
    pub fn enqueue(&mut self, message: Message) {
        self.queue.push(message);
        debug!(queued = self.queue.len(), "message enqueued");
    }

    /// Returns the number of queued messages.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Sends every queued message over the shared connection, in enqueue
    /// order, then clears the queue.
    ///
    /// Sends are sequential; one slow recipient delays the rest. A failed
    /// message does not stop the batch: the transaction is reset and the
    /// remaining messages are still attempted. The queue is cleared
    /// regardless of per-message outcomes, so a failed message is not
    /// retried by a later flush.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Send`] listing every message that failed,
    /// after all queued messages were attempted.
    pub async fn flush(&mut self) -> Result<usize, SessionError> {
        let batch = std::mem::take(&mut self.queue);
        let attempted = batch.len();
        let mut failures = Vec::new();

        for (index, message) in batch.iter().enumerate() {
            let raw = message.to_rfc5322();
            let recipients = message.recipients();
            match self
                .client
                .send_mail(message.sender(), &recipients, raw.as_bytes())
                .await
            {
                Ok(()) => {}
                Err(e) => {
                    warn!(index, subject = message.subject(), error = %e, "failed to send queued message");
                    failures.push(SendFailure {
                        index,
                        subject: message.subject().to_string(),
                        reason: e.to_string(),
                    });
                    self.reset_after_failure(&e).await;
                }
            }
        }

        if failures.is_empty() {
            debug!(sent = attempted, "queue flushed");
            Ok(attempted)
        } else {
            Err(SessionError::Send {
                attempted,
                failures,
            })
        }
    }

    /// Leaves the interrupted transaction behind so the next message starts
    /// clean. A connection that cannot reset will fail that next send and be
    /// reported there.
    async fn reset_after_failure(&mut self, cause: &SmtpError) {
        if matches!(cause, SmtpError::Io(_) | SmtpError::Tls(_)) {
            // Connection is gone; nothing to reset.
            return;
        }
        if let Err(e) = self.client.rset().await {
            warn!(error = %e, "failed to reset transaction after send error");
        }
    }

    /// Sends QUIT and releases the connection.
    ///
    /// Dropping the session without calling this closes the socket without
    /// the protocol goodbye.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Connection`] if the QUIT exchange fails.
    pub async fn close(self) -> Result<(), SessionError> {
        if !self.queue.is_empty() {
            warn!(queued = self.queue.len(), "closing session with unsent messages");
        }
        self.client
            .quit()
            .await
            .map_err(|e| SessionError::Connection(e.to_string()))
    }
}

/// Maps transport-level connection loss to [`SessionError::Connection`];
/// everything else gets the step-specific kind.
fn classify(error: SmtpError, kind: fn(String) -> SessionError) -> SessionError {
    match error {
        SmtpError::Io(_) | SmtpError::Tls(_) | SmtpError::Timeout => {
            SessionError::Connection(error.to_string())
        }
        other => kind(other.to_string()),
    }
}
