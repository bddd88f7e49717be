//! # mailsling-mime
//!
//! MIME generation primitives for outgoing email.
//!
//! This crate covers only what composing a message needs:
//!
//! - **Headers**: insertion-ordered header collection serialized with CRLF
//! - **Encoding**: Base64 (plain and 76-column wrapped), RFC 2047 encoded
//!   words, multipart boundary generation
//! - **Mailboxes**: `"Display Name" <address>` formatting
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailsling_mime::{Headers, format_mailbox, encode_base64_wrapped};
//!
//! let mut headers = Headers::new();
//! headers.push("From", format_mailbox("Ada Lovelace", "ada@example.com"));
//! headers.push("Subject", "Engine notes");
//!
//! let rendered = headers.to_string();
//! let attachment_body = encode_base64_wrapped(b"raw attachment bytes");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod encoding;
mod headers;
mod mailbox;

pub use encoding::{boundary, encode_base64, encode_base64_wrapped, encode_rfc2047};
pub use headers::{Headers, date_now};
pub use mailbox::format_mailbox;
