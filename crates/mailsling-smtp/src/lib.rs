//! # mailsling-smtp
//!
//! Async SMTP submission client used by the `mailsling` mail library.
//!
//! The crate covers the client side of one authenticated submission session:
//! TCP or TLS connect, server greeting, EHLO capability discovery, STARTTLS
//! upgrade, AUTH PLAIN / AUTH LOGIN, and mail transactions (MAIL FROM,
//! RCPT TO, DATA) over the shared connection.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::time::Duration;
//! use mailsling_smtp::{Client, connect};
//!
//! #[tokio::main]
//! async fn main() -> mailsling_smtp::Result<()> {
//!     let stream = connect("smtp.example.com", 587, Duration::from_secs(30)).await?;
//!     let mut client = Client::from_stream(stream).await?;
//!
//!     client.ehlo("localhost").await?;
//!     let mut client = client.starttls("smtp.example.com").await?;
//!     client.ehlo("localhost").await?;
//!     client.auth_plain("user@example.com", "password").await?;
//!
//!     let message = b"Subject: Test\r\n\r\nHello, World!\r\n";
//!     client
//!         .send_mail("user@example.com", &["recipient@example.com"], message)
//!         .await?;
//!
//!     client.quit().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`command`]: SMTP command serialization
//! - [`reply`]: Reply parsing
//! - [`stream`]: TCP/TLS stream handling

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
pub mod command;
mod error;
pub mod reply;
mod stream;

pub use client::{Client, ServerInfo};
pub use command::{AuthMechanism, Command};
pub use error::{Error, Result};
pub use reply::Reply;
pub use stream::{SmtpStream, connect, connect_tls};
