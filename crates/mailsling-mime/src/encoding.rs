//! MIME encoding utilities.
//!
//! Covers the encoding side only: Base64 bodies, RFC 2047 header words, and
//! multipart boundary generation.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::sync::atomic::{AtomicU64, Ordering};

/// Maximum length of an encoded body line (RFC 2045).
const MAX_LINE_LENGTH: usize = 76;

/// Encodes data as a single Base64 string.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Encodes data as Base64 wrapped to 76-column lines separated by CRLF,
/// suitable for a message body part.
#[must_use]
pub fn encode_base64_wrapped(data: &[u8]) -> String {
    let encoded = encode_base64(data);
    let mut wrapped = String::with_capacity(encoded.len() + encoded.len() / MAX_LINE_LENGTH * 2);

    let mut rest = encoded.as_str();
    while rest.len() > MAX_LINE_LENGTH {
        let (line, tail) = rest.split_at(MAX_LINE_LENGTH);
        wrapped.push_str(line);
        wrapped.push_str("\r\n");
        rest = tail;
    }
    wrapped.push_str(rest);
    wrapped
}

/// Encodes a header value as an RFC 2047 encoded word when needed.
///
/// Plain ASCII values without encoded-word markers pass through unchanged;
/// everything else becomes `=?utf-8?B?...?=`.
#[must_use]
pub fn encode_rfc2047(text: &str) -> String {
    if text.chars().all(|c| c.is_ascii() && c != '=' && c != '?') {
        return text.to_string();
    }

    format!("=?utf-8?B?{}?=", encode_base64(text.as_bytes()))
}

static BOUNDARY_SEQ: AtomicU64 = AtomicU64::new(0);

/// Generates a multipart boundary unique within this process.
#[must_use]
pub fn boundary() -> String {
    let seq = BOUNDARY_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("=_mailsling_{:08x}_{seq:08x}", std::process::id())
}
