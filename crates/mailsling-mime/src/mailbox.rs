//! Mailbox formatting for address headers.

use crate::encoding::encode_rfc2047;

/// Formats a display name and address as an RFC 5322 mailbox,
/// `"Display Name" <address>`.
///
/// ASCII names are quoted with `"` and `\` escaped; non-ASCII names are
/// RFC 2047-encoded instead, since encoded words may not appear inside a
/// quoted string.
#[must_use]
pub fn format_mailbox(display_name: &str, address: &str) -> String {
    if display_name.is_empty() {
        return format!("<{address}>");
    }

    if display_name.is_ascii() {
        let escaped = display_name.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\" <{address}>")
    } else {
        format!("{} <{address}>", encode_rfc2047(display_name))
    }
}
