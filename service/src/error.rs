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

//! Error types for the shell service

use crate::SessionToken;
use thiserror::Error;

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Shell service error types
#[derive(Debug, Error)]
pub enum ServiceError {
    /// I/O error from the underlying socket
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Protocol error from the telnet codec
    #[error("Protocol error: {0}")]
    Codec(#[from] telshell_telnetcodec::CodecError),

    /// Token does not refer to a live session
    #[error("Session {0} not found")]
    InvalidHandle(SessionToken),

    /// Address string or value that cannot be bound
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Maximum number of connections reached
    #[error("Maximum connections ({0}) reached")]
    MaxConnectionsReached(usize),

    /// The peer or its connection task is gone
    #[error("Connection closed")]
    ConnectionClosed,

    /// Server was already started
    #[error("Server already running")]
    ServerAlreadyRunning,

    /// Server is not running
    #[error("Server not running")]
    ServerNotRunning,

    /// Server is shutting down
    #[error("Server is shutting down")]
    ServerShuttingDown,
}

impl ServiceError {
    /// Check if the error is recoverable
    ///
    /// Recoverable errors affect a single session or connection and leave
    /// the server able to carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ServiceError::InvalidHandle(_)
                | ServiceError::ConnectionClosed
                | ServiceError::MaxConnectionsReached(_)
                | ServiceError::Io(_)
                | ServiceError::Codec(_)
        )
    }

    /// Check if the error is a connection error
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            ServiceError::InvalidHandle(_) | ServiceError::ConnectionClosed | ServiceError::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NullSink, SessionConfig, SessionManager};

    fn stale_token() -> SessionToken {
        let mut manager = SessionManager::new(SessionConfig::default());
        let token = manager.new_session(Box::new(NullSink));
        manager.delete_session(token).unwrap();
        token
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(ServiceError::ConnectionClosed.is_recoverable());
        assert!(ServiceError::InvalidHandle(stale_token()).is_recoverable());
        assert!(!ServiceError::ServerNotRunning.is_recoverable());
        assert!(!ServiceError::InvalidConfig("x".into()).is_recoverable());
    }

    #[test]
    fn test_error_is_connection_error() {
        assert!(ServiceError::InvalidHandle(stale_token()).is_connection_error());
        assert!(ServiceError::ConnectionClosed.is_connection_error());
        assert!(!ServiceError::ServerShuttingDown.is_connection_error());
    }

    #[test]
    fn test_error_display() {
        let err = ServiceError::InvalidHandle(stale_token());
        assert_eq!(err.to_string(), "Session 0.0 not found");

        let err = ServiceError::MaxConnectionsReached(1000);
        assert_eq!(err.to_string(), "Maximum connections (1000) reached");
    }
}
