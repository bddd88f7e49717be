//! Message values and the staged builder that produces them.

use crate::error::BuildError;
use mailsling_mime::{
    Headers, boundary, date_now, encode_base64_wrapped, encode_rfc2047, format_mailbox,
};
use std::fmt::Write as _;

/// A file attached to a message: a filename and its raw bytes.
///
/// Filenames are carried through as given; header-safe rendering is the MIME
/// layer's concern.
#[derive(Debug, Clone)]
pub struct Attachment {
    filename: String,
    data: Vec<u8>,
}

impl Attachment {
    /// Returns the attachment filename.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns the attachment payload.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// A fully validated, immutable email message.
///
/// Can only be produced by [`MessageBuilder::build`], so every `Message`
/// satisfies the mandatory-field invariants: sender, display name, subject,
/// and body are set, and at least one recipient exists. Once built it is
/// read-only; ownership passes to whichever session queue holds it.
#[derive(Debug, Clone)]
pub struct Message {
    sender: String,
    display_name: String,
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    subject: String,
    html_body: String,
    attachments: Vec<Attachment>,
}

impl Message {
    /// Returns the sender address.
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the sender display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the To recipients in insertion order.
    #[must_use]
    pub fn to(&self) -> &[String] {
        &self.to
    }

    /// Returns the Cc recipients in insertion order.
    #[must_use]
    pub fn cc(&self) -> &[String] {
        &self.cc
    }

    /// Returns the Bcc recipients in insertion order.
    #[must_use]
    pub fn bcc(&self) -> &[String] {
        &self.bcc
    }

    /// Returns the subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the HTML body.
    #[must_use]
    pub fn html_body(&self) -> &str {
        &self.html_body
    }

    /// Returns the attachments.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Returns the delivery-envelope recipient list: To, then Cc, then Bcc,
    /// each group in insertion order. Guaranteed non-empty.
    #[must_use]
    pub fn recipients(&self) -> Vec<&str> {
        self.to
            .iter()
            .chain(&self.cc)
            .chain(&self.bcc)
            .map(String::as_str)
            .collect()
    }

    /// Serializes the message to RFC 5322 form.
    ///
    /// Without attachments the body is a single `text/html` part; with
    /// attachments it becomes `multipart/mixed` with the HTML part first and
    /// each attachment Base64-encoded under a
    /// `Content-Disposition: attachment` header.
    #[must_use]
    pub fn to_rfc5322(&self) -> String {
        let mut headers = Headers::new();
        headers.push("From", format_mailbox(&self.display_name, &self.sender));
        if !self.to.is_empty() {
            headers.push("To", self.to.join(", "));
        }
        if !self.cc.is_empty() {
            headers.push("Cc", self.cc.join(", "));
        }
        if !self.bcc.is_empty() {
            headers.push("Bcc", self.bcc.join(", "));
        }
        headers.push("Subject", encode_rfc2047(&self.subject));
        headers.push("Date", date_now());
        headers.push("MIME-Version", "1.0");

        let mut out = String::new();

        if self.attachments.is_empty() {
            headers.push("Content-Type", "text/html; charset=utf-8");
            headers.push("Content-Transfer-Encoding", "8bit");
            let _ = write!(out, "{headers}\r\n{}\r\n", self.html_body);
            return out;
        }

        let boundary = boundary();
        headers.push(
            "Content-Type",
            format!("multipart/mixed; boundary=\"{boundary}\""),
        );
        let _ = write!(out, "{headers}\r\n");

        let _ = write!(
            out,
            "--{boundary}\r\n\
             Content-Type: text/html; charset=utf-8\r\n\
             Content-Transfer-Encoding: 8bit\r\n\
             \r\n\
             {}\r\n",
            self.html_body
        );

        for attachment in &self.attachments {
            let _ = write!(
                out,
                "--{boundary}\r\n\
                 Content-Type: application/octet-stream\r\n\
                 Content-Disposition: attachment; filename=\"{}\"\r\n\
                 Content-Transfer-Encoding: base64\r\n\
                 \r\n\
                 {}\r\n",
                attachment.filename,
                encode_base64_wrapped(&attachment.data)
            );
        }

        let _ = write!(out, "--{boundary}--\r\n");
        out
    }
}

/// Staged builder for [`Message`].
///
/// Setters and adders are fluent and may be called in any order; validation
/// happens only in [`MessageBuilder::build`], which consumes the builder so
/// each instance produces at most one message.
///
/// ```ignore
/// use mailsling::MessageBuilder;
///
/// let message = MessageBuilder::new()
///     .sender("ada@example.com")
///     .display_name("Ada Lovelace")
///     .to("charles@example.com")
///     .subject("Engine notes")
///     .html_body("<p>Enclosed.</p>")
///     .attach("notes.txt", b"diagram".to_vec())
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    sender: Option<String>,
    display_name: Option<String>,
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    subject: Option<String>,
    html_body: Option<String>,
    attachments: Vec<Attachment>,
}

impl MessageBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sender address. No address-syntax validation is performed.
    #[must_use]
    pub fn sender(mut self, address: impl Into<String>) -> Self {
        self.sender = Some(address.into());
        self
    }

    /// Sets the sender display name.
    #[must_use]
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Adds a To recipient. Call order is preserved; duplicates are kept.
    #[must_use]
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    /// Adds a Cc recipient. Call order is preserved; duplicates are kept.
    #[must_use]
    pub fn cc(mut self, address: impl Into<String>) -> Self {
        self.cc.push(address.into());
        self
    }

    /// Adds a Bcc recipient. Call order is preserved; duplicates are kept.
    #[must_use]
    pub fn bcc(mut self, address: impl Into<String>) -> Self {
        self.bcc.push(address.into());
        self
    }

    /// Sets the subject. An explicitly set empty subject is valid.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the HTML body. An explicitly set empty body is valid.
    #[must_use]
    pub fn html_body(mut self, html: impl Into<String>) -> Self {
        self.html_body = Some(html.into());
        self
    }

    /// Appends an attachment. Filenames pass through unmodified.
    #[must_use]
    pub fn attach(mut self, filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.attachments.push(Attachment {
            filename: filename.into(),
            data: data.into(),
        });
        self
    }

    /// Validates the staged fields and produces the message.
    ///
    /// Checks run in a fixed order and fail on the first violation:
    /// sender, display name, recipients (the union of To, Cc, and Bcc must be
    /// non-empty), body, subject.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingField`] naming the first unset mandatory
    /// field, or [`BuildError::NoRecipient`] when no recipient was added.
    pub fn build(self) -> Result<Message, BuildError> {
        let sender = self.sender.ok_or(BuildError::MissingField("sender"))?;
        let display_name = self
            .display_name
            .ok_or(BuildError::MissingField("display name"))?;
        if self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty() {
            return Err(BuildError::NoRecipient);
        }
        let html_body = self.html_body.ok_or(BuildError::MissingField("body"))?;
        let subject = self.subject.ok_or(BuildError::MissingField("subject"))?;

        Ok(Message {
            sender,
            display_name,
            to: self.to,
            cc: self.cc,
            bcc: self.bcc,
            subject,
            html_body,
            attachments: self.attachments,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn complete_builder() -> MessageBuilder {
        MessageBuilder::new()
            .sender("sender@example.com")
            .display_name("Test Sender")
            .to("recipient@example.com")
            .subject("Test Mail")
            .html_body("<p>Test Body</p>")
    }

    #[test]
    fn test_missing_sender() {
        let result = MessageBuilder::new()
            .display_name("Test Sender")
            .to("recipient@example.com")
            .subject("Test Mail")
            .html_body("<p>Test Body</p>")
            .build();
        assert_eq!(result.unwrap_err(), BuildError::MissingField("sender"));
    }

    #[test]
    fn test_missing_display_name() {
        let result = MessageBuilder::new()
            .sender("sender@example.com")
            .to("recipient@example.com")
            .subject("Test Mail")
            .html_body("<p>Test Body</p>")
            .build();
        assert_eq!(
            result.unwrap_err(),
            BuildError::MissingField("display name")
        );
    }

    #[test]
    fn test_missing_body() {
        let result = MessageBuilder::new()
            .sender("sender@example.com")
            .display_name("Test Sender")
            .to("recipient@example.com")
            .subject("Test Mail")
            .build();
        assert_eq!(result.unwrap_err(), BuildError::MissingField("body"));
    }

    #[test]
    fn test_missing_subject() {
        let result = MessageBuilder::new()
            .sender("sender@example.com")
            .display_name("Test Sender")
            .to("recipient@example.com")
            .html_body("<p>Test Body</p>")
            .build();
        assert_eq!(result.unwrap_err(), BuildError::MissingField("subject"));
    }

    #[test]
    fn test_no_recipients() {
        let result = MessageBuilder::new()
            .sender("sender@example.com")
            .display_name("Test Sender")
            .subject("Test Mail")
            .html_body("<p>Test Body</p>")
            .build();
        assert_eq!(result.unwrap_err(), BuildError::NoRecipient);
    }

    #[test]
    fn test_recipient_check_runs_before_body_and_subject() {
        // Fixed validation order: recipients are checked before body/subject
        let result = MessageBuilder::new()
            .sender("sender@example.com")
            .display_name("Test Sender")
            .build();
        assert_eq!(result.unwrap_err(), BuildError::NoRecipient);
    }

    #[test]
    fn test_single_group_to_only() {
        let message = complete_builder().build().unwrap();
        assert_eq!(message.recipients(), vec!["recipient@example.com"]);
    }

    #[test]
    fn test_single_group_cc_only() {
        let message = MessageBuilder::new()
            .sender("sender@example.com")
            .display_name("Test Sender")
            .cc("cc@example.com")
            .subject("Test Mail")
            .html_body("<p>Test Body</p>")
            .build()
            .unwrap();
        assert_eq!(message.recipients(), vec!["cc@example.com"]);
    }

    #[test]
    fn test_single_group_bcc_only() {
        let message = MessageBuilder::new()
            .sender("sender@example.com")
            .display_name("Test Sender")
            .bcc("bcc@example.com")
            .subject("Test Mail")
            .html_body("<p>Test Body</p>")
            .build()
            .unwrap();
        assert_eq!(message.recipients(), vec!["bcc@example.com"]);
    }

    #[test]
    fn test_merged_recipients_group_order() {
        let message = complete_builder()
            .bcc("bcc@example.com")
            .cc("cc@example.com")
            .to("second@example.com")
            .build()
            .unwrap();
        // To ++ Cc ++ Bcc regardless of call order
        assert_eq!(
            message.recipients(),
            vec![
                "recipient@example.com",
                "second@example.com",
                "cc@example.com",
                "bcc@example.com",
            ]
        );
    }

    #[test]
    fn test_duplicate_recipients_preserved() {
        let message = complete_builder()
            .to("recipient@example.com")
            .build()
            .unwrap();
        assert_eq!(
            message.recipients(),
            vec!["recipient@example.com", "recipient@example.com"]
        );
    }

    #[test]
    fn test_empty_subject_is_explicitly_set() {
        let message = complete_builder().subject("").build().unwrap();
        assert_eq!(message.subject(), "");
    }

    #[test]
    fn test_later_setter_overwrites() {
        let message = complete_builder()
            .display_name("Replacement Sender")
            .build()
            .unwrap();
        assert_eq!(message.display_name(), "Replacement Sender");
    }

    #[test]
    fn test_rfc5322_single_part() {
        let rendered = complete_builder().build().unwrap().to_rfc5322();
        assert!(rendered.starts_with("From: \"Test Sender\" <sender@example.com>\r\n"));
        assert!(rendered.contains("To: recipient@example.com\r\n"));
        assert!(rendered.contains("Subject: Test Mail\r\n"));
        assert!(rendered.contains("MIME-Version: 1.0\r\n"));
        assert!(rendered.contains("Content-Type: text/html; charset=utf-8\r\n"));
        assert!(rendered.contains("\r\n\r\n<p>Test Body</p>\r\n"));
    }

    #[test]
    fn test_rfc5322_recipient_group_headers() {
        let rendered = complete_builder()
            .to("second@example.com")
            .cc("cc@example.com")
            .bcc("bcc@example.com")
            .build()
            .unwrap()
            .to_rfc5322();
        assert!(rendered.contains("To: recipient@example.com, second@example.com\r\n"));
        assert!(rendered.contains("Cc: cc@example.com\r\n"));
        assert!(rendered.contains("Bcc: bcc@example.com\r\n"));
    }

    #[test]
    fn test_rfc5322_omits_empty_groups() {
        let rendered = complete_builder().build().unwrap().to_rfc5322();
        assert!(!rendered.contains("Cc:"));
        assert!(!rendered.contains("Bcc:"));
    }

    #[test]
    fn test_rfc5322_multipart_with_attachment() {
        let rendered = complete_builder()
            .attach("notes.txt", b"attached bytes".to_vec())
            .build()
            .unwrap()
            .to_rfc5322();

        assert!(rendered.contains("Content-Type: multipart/mixed; boundary="));
        assert!(rendered.contains("Content-Disposition: attachment; filename=\"notes.txt\"\r\n"));
        assert!(rendered.contains("Content-Transfer-Encoding: base64\r\n"));
        // base64("attached bytes")
        assert!(rendered.contains("YXR0YWNoZWQgYnl0ZXM="));
        // closing boundary marker
        assert!(rendered.trim_end().ends_with("--"));
    }

    #[test]
    fn test_non_ascii_subject_encoded() {
        let rendered = complete_builder()
            .subject("Über alles")
            .build()
            .unwrap()
            .to_rfc5322();
        assert!(rendered.contains("Subject: =?utf-8?B?"));
    }

    proptest! {
        #[test]
        fn prop_merged_list_is_group_concatenation(
            to in proptest::collection::vec("[a-z]{1,8}@example\\.com", 0..4),
            cc in proptest::collection::vec("[a-z]{1,8}@example\\.com", 0..4),
            bcc in proptest::collection::vec("[a-z]{1,8}@example\\.com", 0..4),
        ) {
            let mut builder = MessageBuilder::new()
                .sender("sender@example.com")
                .display_name("Test Sender")
                .subject("Test Mail")
                .html_body("<p>Test Body</p>");
            for addr in &to {
                builder = builder.to(addr.as_str());
            }
            for addr in &cc {
                builder = builder.cc(addr.as_str());
            }
            for addr in &bcc {
                builder = builder.bcc(addr.as_str());
            }

            if to.is_empty() && cc.is_empty() && bcc.is_empty() {
                prop_assert_eq!(builder.build().unwrap_err(), BuildError::NoRecipient);
            } else {
                let expected: Vec<&str> = to
                    .iter()
                    .chain(&cc)
                    .chain(&bcc)
                    .map(String::as_str)
                    .collect();
                let message = builder.build().unwrap();
                prop_assert_eq!(message.recipients(), expected);
            }
        }
    }
}
