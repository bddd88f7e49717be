//! # mailsling
//!
//! Batch mail composition and submission over a single authenticated SMTP
//! session.
//!
//! Two pieces do the work:
//!
//! - [`MessageBuilder`]: staged, fluent message composition. `build()` is the
//!   only way to obtain a [`Message`], and it enforces the mandatory-field
//!   invariants, so nothing partially specified can ever reach a queue.
//! - [`MailSession`]: owns one authenticated connection, hands out builders
//!   pre-seeded with the session's sender identity, queues built messages,
//!   and flushes the whole batch over the shared connection.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailsling::{MailSession, Security, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SessionConfig::new("smtp.example.com", Security::StartTls)
//!         .with_credentials("ada@example.com", "app-password");
//!
//!     let mut session = MailSession::connect(&config, "ada@example.com", "Ada Lovelace").await?;
//!
//!     let message = session
//!         .message_builder()
//!         .to("charles@example.com")
//!         .cc("annabella@example.com")
//!         .subject("Engine notes")
//!         .html_body("<p>Notes enclosed.</p>")
//!         .attach("notes.txt", b"diagram".to_vec())
//!         .build()?;
//!
//!     session.enqueue(message);
//!     session.flush().await?;
//!     session.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! Sessions are independent values; run several concurrently if you need
//! parallel delivery. Within one session everything is sequential over the
//! one shared connection.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod message;
mod session;

pub use config::{Security, SessionConfig};
pub use error::{BuildError, SendFailure, SessionError};
pub use message::{Attachment, Message, MessageBuilder};
pub use session::MailSession;
