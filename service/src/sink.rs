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

//! Output side of a session
//!
//! A sink only delivers bytes back to the transport. It never owns the
//! connection: once the transport is gone every call reports
//! [`ServiceError::ConnectionClosed`].

use crate::{Result, ServiceError};
use bytes::Bytes;
use tokio::sync::mpsc;

/// Write-only endpoint of a session
pub trait SessionSink: Send {
    /// Queues `bytes` for the remote terminal
    fn send(&self, bytes: Bytes) -> Result<()>;

    /// Asks the transport to close the connection after pending output
    fn close(&self) -> Result<()>;
}

/// Instruction from the session layer to a connection task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Raw bytes to write, escaped by the telnet codec
    Data(Bytes),
    /// Flush and close the connection
    Close,
}

/// Sink feeding a connection task through an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<Outbound>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::UnboundedSender<Outbound>) -> Self {
        Self { sender }
    }

    /// Creates a sink together with the receiving end for the transport
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }

    /// Whether the receiving connection task has gone away
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl SessionSink for ChannelSink {
    fn send(&self, bytes: Bytes) -> Result<()> {
        self.sender
            .send(Outbound::Data(bytes))
            .map_err(|_| ServiceError::ConnectionClosed)
    }

    fn close(&self) -> Result<()> {
        self.sender
            .send(Outbound::Close)
            .map_err(|_| ServiceError::ConnectionClosed)
    }
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SessionSink for NullSink {
    fn send(&self, _bytes: Bytes) -> Result<()> {
        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (sink, mut receiver) = ChannelSink::channel();
        sink.send(Bytes::from_static(b"a")).unwrap();
        sink.send(Bytes::from_static(b"b")).unwrap();
        sink.close().unwrap();

        assert_eq!(receiver.try_recv().unwrap(), Outbound::Data(Bytes::from_static(b"a")));
        assert_eq!(receiver.try_recv().unwrap(), Outbound::Data(Bytes::from_static(b"b")));
        assert_eq!(receiver.try_recv().unwrap(), Outbound::Close);
    }

    #[test]
    fn test_channel_sink_reports_closed_transport() {
        let (sink, receiver) = ChannelSink::channel();
        drop(receiver);
        assert!(sink.is_closed());
        assert!(matches!(
            sink.send(Bytes::from_static(b"x")),
            Err(ServiceError::ConnectionClosed)
        ));
        assert!(sink.close().is_err());
    }
}
