//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Server and session configuration
//!
//! ```
//! use telshell_service::{ServerConfig, SessionConfig};
//! use std::time::Duration;
//!
//! let config = ServerConfig::from_bind_str("127.0.0.1:2323")
//!     .unwrap()
//!     .with_max_connections(64)
//!     .with_idle_timeout(Some(Duration::from_secs(600)))
//!     .with_session(SessionConfig::default().with_prompt("> "));
//! assert!(config.validate().is_ok());
//! ```

use crate::{Result, ServiceError, SockAddr};
use std::net::Ipv4Addr;
use std::time::Duration;
use telshell_terminal::{DEFAULT_MAX_LINE_LENGTH, TerminalSize};

/// Behaviour of every session created by a [`SessionManager`](crate::SessionManager)
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Sent when a session begins
    pub welcome: String,
    /// Sent when a session exits
    pub farewell: String,
    /// Sent after each submitted line has been handled
    pub prompt: String,
    /// Window size assumed until the client reports one
    pub default_window: TerminalSize,
    /// Longest input line accepted
    pub max_line_length: usize,
    /// Keep an unfinished escape sequence pending across receive batches
    ///
    /// When `false` the scanner is stopped at the end of every batch and a
    /// sequence split across two reads is abandoned.
    pub carry_partial_sequences: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            welcome: "\r\nWelcome to Telshell.\r\n$ ".to_string(),
            farewell: "Bye!".to_string(),
            prompt: "$ ".to_string(),
            default_window: TerminalSize::default(),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            carry_partial_sequences: false,
        }
    }
}

impl SessionConfig {
    pub fn with_welcome(mut self, welcome: impl Into<String>) -> Self {
        self.welcome = welcome.into();
        self
    }

    pub fn with_farewell(mut self, farewell: impl Into<String>) -> Self {
        self.farewell = farewell.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_default_window(mut self, cols: u16, rows: u16) -> Self {
        self.default_window = TerminalSize::new(cols, rows);
        self
    }

    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    pub fn with_carry_partial_sequences(mut self, carry: bool) -> Self {
        self.carry_partial_sequences = carry;
        self
    }
}

/// Telnet server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to
    pub bind_address: SockAddr,

    /// Pending connection queue length passed to `listen`
    pub listen_backlog: u32,

    /// Maximum number of concurrent connections
    pub max_connections: usize,

    /// Close connections that receive nothing for this long
    pub idle_timeout: Option<Duration>,

    /// How long shutdown waits for connection tasks to finish
    pub shutdown_timeout: Duration,

    /// Configuration handed to the session manager
    pub session: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SockAddr::ipv4(Ipv4Addr::LOCALHOST, 2323),
            listen_backlog: 128,
            max_connections: 1000,
            idle_timeout: None,
            shutdown_timeout: Duration::from_secs(5),
            session: SessionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new configuration bound to `bind_address`
    pub fn new(bind_address: SockAddr) -> Self {
        Self {
            bind_address,
            ..Default::default()
        }
    }

    /// Parses `bind` with [`SockAddr::parse`] and rejects malformed addresses.
    pub fn from_bind_str(bind: &str) -> Result<Self> {
        match SockAddr::parse(bind) {
            SockAddr::None => Err(ServiceError::InvalidAddress(bind.to_string())),
            addr => Ok(Self::new(addr)),
        }
    }

    pub fn with_listen_backlog(mut self, backlog: u32) -> Self {
        self.listen_backlog = backlog;
        self
    }

    pub fn with_max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.bind_address.is_valid() {
            return Err("bind_address must be a valid address".to_string());
        }

        if self.listen_backlog == 0 {
            return Err("listen_backlog must be greater than 0".to_string());
        }

        if self.max_connections == 0 {
            return Err("max_connections must be greater than 0".to_string());
        }

        if self.idle_timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err("idle_timeout must be greater than 0".to_string());
        }

        if self.shutdown_timeout.is_zero() {
            return Err("shutdown_timeout must be greater than 0".to_string());
        }

        if self.session.max_line_length == 0 {
            return Err("max_line_length must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:2323");
        assert_eq!(config.max_connections, 1000);
        assert!(config.idle_timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_session_config() {
        let session = SessionConfig::default();
        assert!(session.welcome.ends_with("$ "));
        assert_eq!(session.farewell, "Bye!");
        assert_eq!(session.default_window, TerminalSize::new(80, 24));
        assert!(!session.carry_partial_sequences);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ServerConfig::new(SockAddr::local("/tmp/shell.sock"))
            .with_listen_backlog(16)
            .with_max_connections(8)
            .with_idle_timeout(Some(Duration::from_secs(30)))
            .with_shutdown_timeout(Duration::from_secs(1))
            .with_session(
                SessionConfig::default()
                    .with_prompt("> ")
                    .with_max_line_length(80)
                    .with_carry_partial_sequences(true),
            );

        assert_eq!(config.listen_backlog, 16);
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.idle_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.session.prompt, "> ");
        assert_eq!(config.session.max_line_length, 80);
        assert!(config.session.carry_partial_sequences);
    }

    #[test]
    fn test_from_bind_str() {
        assert!(ServerConfig::from_bind_str("0.0.0.0:23").is_ok());
        assert!(ServerConfig::from_bind_str("/var/run/shell").is_ok());
        assert!(matches!(
            ServerConfig::from_bind_str("host:23"),
            Err(ServiceError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_validation() {
        assert!(ServerConfig::default().with_max_connections(0).validate().is_err());
        assert!(ServerConfig::default().with_listen_backlog(0).validate().is_err());
        assert!(
            ServerConfig::default()
                .with_idle_timeout(Some(Duration::ZERO))
                .validate()
                .is_err()
        );
        assert!(
            ServerConfig::default()
                .with_shutdown_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
        assert!(ServerConfig::new(SockAddr::None).validate().is_err());
        assert!(
            ServerConfig::default()
                .with_session(SessionConfig::default().with_max_line_length(0))
                .validate()
                .is_err()
        );
    }
}
