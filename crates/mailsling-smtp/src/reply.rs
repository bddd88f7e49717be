//! SMTP reply parsing.

use crate::error::{Error, Result};

/// Reply code for the start of a DATA payload (`354`).
pub const START_DATA: u16 = 354;

/// Reply code for an authentication continuation challenge (`334`).
pub const AUTH_CONTINUE: u16 = 334;

/// Reply code sent by the server when closing the connection (`221`).
pub const CLOSING: u16 = 221;

/// A parsed SMTP reply.
///
/// Replies can span multiple lines; the code is shared by every line and the
/// per-line text is collected in order:
///
/// ```text
/// 250-mail.example.com greets you
/// 250-STARTTLS
/// 250 AUTH PLAIN LOGIN
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Three-digit reply code.
    pub code: u16,
    /// Text of each reply line, code and separator stripped.
    pub lines: Vec<String>,
}

impl Reply {
    /// Creates a reply from a code and its lines.
    #[must_use]
    pub const fn new(code: u16, lines: Vec<String>) -> Self {
        Self { code, lines }
    }

    /// Returns true for positive completion replies (2xx).
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.code >= 200 && self.code < 300
    }

    /// Returns the reply text with lines joined by a space.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join(" ")
    }

    /// Converts a non-2xx reply into [`Error::Smtp`].
    ///
    /// # Errors
    ///
    /// Returns the reply as an error unless it is a positive completion.
    pub fn require_positive(self) -> Result<Self> {
        if self.is_positive() {
            Ok(self)
        } else {
            Err(Error::smtp(self.code, self.text()))
        }
    }
}

/// Parses a full SMTP reply from its raw lines.
///
/// # Errors
///
/// Returns [`Error::Protocol`] if the reply is empty, too short, or does not
/// start with a numeric code.
pub fn parse_reply(raw: &[String]) -> Result<Reply> {
    let first = raw.first().ok_or_else(|| Error::Protocol("Empty reply".into()))?;
    let code = first
        .get(0..3)
        .and_then(|digits| digits.parse::<u16>().ok())
        .ok_or_else(|| Error::Protocol(format!("Invalid reply code: {first}")))?;

    let mut lines = Vec::with_capacity(raw.len());
    for line in raw {
        if line.len() == 3 {
            lines.push(String::new());
        } else if let Some(text) = line.get(4..) {
            // Skip code and separator ("250-" or "250 ")
            lines.push(text.to_string());
        } else {
            return Err(Error::Protocol(format!("Malformed reply line: {line}")));
        }
    }

    Ok(Reply::new(code, lines))
}

/// Returns true if `line` terminates a (possibly multi-line) reply.
///
/// Continuation lines separate code and text with `-`; the final line uses a
/// space.
#[must_use]
pub fn is_final_line(line: &str) -> bool {
    line.len() == 3 || (line.len() >= 4 && line.as_bytes()[3] == b' ')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_line() {
        let reply = parse_reply(&["250 OK".to_string()]).unwrap();
        assert_eq!(reply.code, 250);
        assert_eq!(reply.lines, vec!["OK"]);
        assert!(reply.is_positive());
    }

    #[test]
    fn test_parse_multi_line() {
        let raw = vec![
            "250-mail.example.com greets you".to_string(),
            "250-STARTTLS".to_string(),
            "250 AUTH PLAIN LOGIN".to_string(),
        ];
        let reply = parse_reply(&raw).unwrap();
        assert_eq!(reply.code, 250);
        assert_eq!(reply.lines.len(), 3);
        assert_eq!(reply.lines[1], "STARTTLS");
    }

    #[test]
    fn test_parse_bare_code() {
        let reply = parse_reply(&["250".to_string()]).unwrap();
        assert_eq!(reply.code, 250);
        assert_eq!(reply.lines, vec![String::new()]);
    }

    #[test]
    fn test_parse_empty_continuation_line() {
        let raw = vec!["250-".to_string(), "250 OK".to_string()];
        let reply = parse_reply(&raw).unwrap();
        assert_eq!(reply.lines, vec![String::new(), "OK".to_string()]);
    }

    #[test]
    fn test_parse_greeting() {
        let reply = parse_reply(&["220 smtp.example.com ESMTP ready".to_string()]).unwrap();
        assert_eq!(reply.code, 220);
        assert_eq!(reply.text(), "smtp.example.com ESMTP ready");
    }

    #[test]
    fn test_rejection_is_not_positive() {
        let reply = parse_reply(&["535 authentication failed".to_string()]).unwrap();
        assert!(!reply.is_positive());
        assert!(reply.require_positive().is_err());
    }

    #[test]
    fn test_is_final_line() {
        assert!(is_final_line("250 OK"));
        assert!(is_final_line("250"));
        assert!(!is_final_line("250-Continuing"));
        assert!(!is_final_line("25"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_reply(&[]).is_err());
        assert!(parse_reply(&["25".to_string()]).is_err());
        assert!(parse_reply(&["ABC OK".to_string()]).is_err());
    }
}
