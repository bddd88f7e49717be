//! SMTP submission client.
//!
//! A [`Client`] wraps one [`SmtpStream`] and walks it through the submission
//! flow: greeting, EHLO, optional STARTTLS upgrade, AUTH, then any number of
//! mail transactions over the same connection.

use crate::command::{AuthMechanism, Command};
use crate::error::{Error, Result};
use crate::reply::{self, Reply, is_final_line, parse_reply};
use crate::stream::SmtpStream;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::{debug, trace};

/// Server identity and capabilities learned from the greeting and EHLO.
#[derive(Debug, Clone, Default)]
pub struct ServerInfo {
    /// Hostname the server announced in its greeting.
    pub hostname: String,
    /// Capability lines from the last EHLO response, uppercased.
    capabilities: Vec<String>,
}

impl ServerInfo {
    /// Checks whether the server advertised a capability keyword.
    #[must_use]
    pub fn supports(&self, keyword: &str) -> bool {
        self.capabilities
            .iter()
            .any(|line| line.split_whitespace().next() == Some(keyword))
    }

    /// Checks whether STARTTLS was advertised.
    #[must_use]
    pub fn supports_starttls(&self) -> bool {
        self.supports("STARTTLS")
    }

    /// Returns the advertised authentication mechanisms.
    #[must_use]
    pub fn auth_mechanisms(&self) -> Vec<AuthMechanism> {
        let Some(line) = self
            .capabilities
            .iter()
            .find(|line| line.split_whitespace().next() == Some("AUTH"))
        else {
            return Vec::new();
        };

        line.split_whitespace()
            .skip(1)
            .filter_map(|word| match word {
                "PLAIN" => Some(AuthMechanism::Plain),
                "LOGIN" => Some(AuthMechanism::Login),
                _ => None,
            })
            .collect()
    }

    fn record_ehlo(&mut self, reply: &Reply) {
        // The first line repeats the server greeting; the rest are capabilities.
        self.capabilities = reply
            .lines
            .iter()
            .skip(1)
            .map(|line| line.to_uppercase())
            .collect();
    }
}

/// SMTP client owning one server connection.
#[derive(Debug)]
pub struct Client {
    stream: SmtpStream,
    server: ServerInfo,
}

impl Client {
    /// Creates a client from a freshly connected stream and reads the server
    /// greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the greeting fails or the server refuses
    /// the connection.
    pub async fn from_stream(mut stream: SmtpStream) -> Result<Self> {
        let greeting = Self::read_reply(&mut stream).await?;
        if greeting.code != 220 {
            return Err(Error::smtp(greeting.code, greeting.text()));
        }

        // Hostname is the first word of the greeting text
        let hostname = greeting
            .lines
            .first()
            .and_then(|line| line.split_whitespace().next())
            .unwrap_or("unknown")
            .to_string();

        debug!(server = %hostname, "received greeting");
        Ok(Self {
            stream,
            server: ServerInfo {
                hostname,
                capabilities: Vec::new(),
            },
        })
    }

    /// Returns the server identity and capabilities.
    #[must_use]
    pub const fn server_info(&self) -> &ServerInfo {
        &self.server
    }

    /// Sends EHLO and records the advertised capabilities.
    ///
    /// Must be repeated after [`Client::starttls`]: servers may only announce
    /// their full capability set over the encrypted channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the greeting.
    pub async fn ehlo(&mut self, client_hostname: &str) -> Result<()> {
        let reply = self
            .command(Command::Ehlo {
                hostname: client_hostname.to_string(),
            })
            .await?
            .require_positive()?;

        self.server.record_ehlo(&reply);
        Ok(())
    }

    /// Upgrades the connection to TLS via STARTTLS.
    ///
    /// Consumes the client because the underlying stream changes type; the
    /// upgraded client is returned on success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSupported`] if the server did not advertise
    /// STARTTLS, or an error if the command or TLS handshake fails.
    pub async fn starttls(mut self, hostname: &str) -> Result<Self> {
        if !self.server.supports_starttls() {
            return Err(Error::NotSupported("STARTTLS".into()));
        }

        self.command(Command::StartTls).await?.require_positive()?;

        debug!(hostname, "upgrading connection to TLS");
        self.stream = self.stream.upgrade_to_tls(hostname).await?;
        Ok(self)
    }

    /// Authenticates using AUTH PLAIN (RFC 4616).
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the credentials.
    pub async fn auth_plain(&mut self, username: &str, password: &str) -> Result<()> {
        let credentials = format!("\0{username}\0{password}");
        let encoded = BASE64.encode(credentials.as_bytes());

        self.command(Command::Auth {
            mechanism: AuthMechanism::Plain,
            initial_response: Some(encoded),
        })
        .await?
        .require_positive()?;

        debug!(username, "authenticated");
        Ok(())
    }

    /// Authenticates using AUTH LOGIN (challenge/response).
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects either challenge response.
    pub async fn auth_login(&mut self, username: &str, password: &str) -> Result<()> {
        let reply = self
            .command(Command::Auth {
                mechanism: AuthMechanism::Login,
                initial_response: None,
            })
            .await?;
        if reply.code != reply::AUTH_CONTINUE {
            return Err(Error::smtp(reply.code, reply.text()));
        }

        let reply = self.send_line(&BASE64.encode(username.as_bytes())).await?;
        if reply.code != reply::AUTH_CONTINUE {
            return Err(Error::smtp(reply.code, reply.text()));
        }

        self.send_line(&BASE64.encode(password.as_bytes()))
            .await?
            .require_positive()?;

        debug!(username, "authenticated");
        Ok(())
    }

    /// Runs one full mail transaction: MAIL FROM, RCPT TO for each envelope
    /// recipient, then DATA with the raw RFC 5322 message.
    ///
    /// Line endings are normalized to CRLF and leading dots are byte-stuffed;
    /// the terminating `.` line is appended automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if any step of the transaction is rejected.
    pub async fn send_mail(
        &mut self,
        from: &str,
        recipients: &[&str],
        message: &[u8],
    ) -> Result<()> {
        self.command(Command::MailFrom {
            from: from.to_string(),
        })
        .await?
        .require_positive()?;

        for recipient in recipients {
            self.command(Command::RcptTo {
                to: (*recipient).to_string(),
            })
            .await?
            .require_positive()?;
        }

        let reply = self.command(Command::Data).await?;
        if reply.code != reply::START_DATA {
            return Err(Error::smtp(reply.code, reply.text()));
        }

        for line in message.split(|&b| b == b'\n') {
            let line = line.strip_suffix(b"\r").unwrap_or(line);

            // Byte-stuff lines starting with '.'
            if line.first() == Some(&b'.') {
                self.stream.write_all(b".").await?;
            }

            self.stream.write_all(line).await?;
            self.stream.write_all(b"\r\n").await?;
        }

        self.stream.write_all(b".\r\n").await?;

        Self::read_reply(&mut self.stream).await?.require_positive()?;
        debug!(recipients = recipients.len(), "message accepted");
        Ok(())
    }

    /// Resets the current mail transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the RSET command fails.
    pub async fn rset(&mut self) -> Result<()> {
        self.command(Command::Rset).await?.require_positive()?;
        Ok(())
    }

    /// Sends QUIT and closes the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the QUIT command fails.
    pub async fn quit(mut self) -> Result<()> {
        let reply = self.command(Command::Quit).await?;
        if !reply.is_positive() && reply.code != reply::CLOSING {
            return Err(Error::smtp(reply.code, reply.text()));
        }
        Ok(())
    }

    async fn command(&mut self, cmd: Command) -> Result<Reply> {
        trace!(verb = cmd.verb(), "sending command");
        self.stream.write_all(&cmd.serialize()).await?;
        Self::read_reply(&mut self.stream).await
    }

    /// Writes one raw continuation line (used by challenge/response auth).
    async fn send_line(&mut self, line: &str) -> Result<Reply> {
        self.stream.write_all(line.as_bytes()).await?;
        self.stream.write_all(b"\r\n").await?;
        Self::read_reply(&mut self.stream).await
    }

    async fn read_reply(stream: &mut SmtpStream) -> Result<Reply> {
        let mut lines = Vec::new();
        loop {
            let line = stream.read_line().await?;
            let last = is_final_line(&line);
            lines.push(line);
            if last {
                break;
            }
        }
        parse_reply(&lines)
    }
}
