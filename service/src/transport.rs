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

//! Notifications from connection tasks to the task owning the sessions

use crate::{ChannelSink, SessionManager, SessionToken};
use bytes::Bytes;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// Event delivered to the manager task
#[derive(Debug)]
pub enum TransportEvent {
    /// A connection was accepted; the new token is sent back on `reply`
    Connected {
        sink: ChannelSink,
        peer: String,
        reply: oneshot::Sender<SessionToken>,
    },
    /// Data bytes received on a connection
    Data { token: SessionToken, bytes: Bytes },
    /// The client reported its window size
    WindowSize {
        token: SessionToken,
        cols: u16,
        rows: u16,
    },
    /// The connection is gone or is about to close
    Disconnected { token: SessionToken },
    /// Say farewell to every session and stop
    Shutdown,
}

impl SessionManager {
    /// Processes transport events until [`TransportEvent::Shutdown`] arrives
    /// or every sender is dropped, then destroys the remaining sessions.
    ///
    /// This is the only place sessions are touched while a server runs, so
    /// events for one connection are applied strictly in arrival order.
    pub async fn run(mut self, mut events: mpsc::Receiver<TransportEvent>) -> Self {
        while let Some(event) = events.recv().await {
            match event {
                TransportEvent::Connected { sink, peer, reply } => {
                    let token = self.new_session(Box::new(sink));
                    if reply.send(token).is_err() {
                        debug!(session = %token, "Connection vanished before registration");
                        let _ = self.delete_session(token);
                        continue;
                    }
                    info!(session = %token, peer = %peer, "Session started");
                    let _ = self.on_begin(token);
                }
                TransportEvent::Data { token, bytes } => {
                    if let Err(err) = self.on_receive_bytes(token, &bytes) {
                        debug!("Dropping received data: {}", err);
                    }
                }
                TransportEvent::WindowSize { token, cols, rows } => {
                    if let Err(err) = self.on_receive_window_size(token, cols, rows) {
                        debug!("Dropping window size: {}", err);
                    }
                }
                TransportEvent::Disconnected { token } => {
                    if self.on_exit(token).is_ok() {
                        let _ = self.delete_session(token);
                        info!(session = %token, "Session ended");
                    }
                }
                TransportEvent::Shutdown => break,
            }
        }

        for token in self.tokens() {
            let _ = self.on_exit(token);
        }
        self.shutdown();
        self
    }
}
