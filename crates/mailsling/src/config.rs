//! Session configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Security/encryption mode for the submission connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Security {
    /// No encryption. Only sensible for tests and trusted local relays.
    None,
    /// STARTTLS upgrade after a plaintext connect.
    #[default]
    StartTls,
    /// Implicit TLS (connect directly with TLS).
    Tls,
}

impl Security {
    /// Get display name for the security mode.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::None => "None (insecure)",
            Self::StartTls => "STARTTLS",
            Self::Tls => "SSL/TLS",
        }
    }

    /// Get the conventional submission port for the security mode.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::None => 25,
            Self::StartTls => 587,
            Self::Tls => 465,
        }
    }
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

/// SMTP submission server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Server hostname.
    pub host: String,
    /// Server port (conventionally 465 for TLS, 587 for STARTTLS).
    pub port: u16,
    /// Security mode.
    pub security: Security,
    /// Username for authentication.
    pub username: String,
    /// Password for authentication. Depending on the provider this may be an
    /// app-specific password rather than the account password.
    pub password: String,
    /// Timeout covering session construction (connect, capability handshake,
    /// encryption upgrade, and authentication).
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
}

impl SessionConfig {
    /// Creates a configuration for `host` with the conventional port for the
    /// chosen security mode and the default timeout.
    #[must_use]
    pub fn new(host: impl Into<String>, security: Security) -> Self {
        Self {
            host: host.into(),
            port: security.default_port(),
            security,
            username: String::new(),
            password: String::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the credentials used to authenticate.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Overrides the server port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Overrides the construction timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ports() {
        assert_eq!(Security::None.default_port(), 25);
        assert_eq!(Security::StartTls.default_port(), 587);
        assert_eq!(Security::Tls.default_port(), 465);
    }

    #[test]
    fn test_new_uses_conventional_port() {
        let config = SessionConfig::new("smtp.example.com", Security::Tls);
        assert_eq!(config.port, 465);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_overrides() {
        let config = SessionConfig::new("smtp.example.com", Security::StartTls)
            .with_credentials("user@example.com", "hunter2")
            .with_port(2525)
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.port, 2525);
        assert_eq!(config.username, "user@example.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
