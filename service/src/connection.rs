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

//! Per-connection task
//!
//! Decodes telnet from the socket into [`TransportEvent`]s for the manager
//! task and writes the session's output back, answering option negotiation
//! on the way.

use bytes::Bytes;
use crate::{ChannelSink, Outbound, Result, SessionToken, TransportEvent};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use telshell_telnetcodec::{TelnetCodec, TelnetEvent, TelnetFrame, TelnetOption};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, sleep_until};
use tokio_util::codec::Framed;
use tracing::{debug, instrument, trace};

/// Per-connection settings copied out of the server configuration
#[derive(Debug, Clone, Copy)]
pub(crate) struct ConnectionSettings {
    pub idle_timeout: Option<Duration>,
    pub drain_timeout: Duration,
}

/// Counts a live connection until dropped
#[derive(Debug)]
pub(crate) struct ConnectionGuard {
    active: Arc<AtomicUsize>,
}

impl ConnectionGuard {
    pub fn new(active: Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::SeqCst);
        Self { active }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

enum Exit {
    /// Peer closed or the stream failed; nothing more can be written
    Peer,
    /// We are closing; pending output is still delivered
    Local,
}

type TelnetStream<S> = Framed<S, TelnetCodec>;

#[instrument(name = "connection", skip_all, fields(peer = %peer))]
pub(crate) async fn run<S>(
    stream: S,
    peer: String,
    events: mpsc::Sender<TransportEvent>,
    mut shutdown: watch::Receiver<bool>,
    settings: ConnectionSettings,
    _guard: ConnectionGuard,
) where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let mut framed = Framed::new(stream, TelnetCodec::new());
    if let Err(err) = announce(&mut framed).await {
        debug!("Failed to announce options: {}", err);
        return;
    }

    let (sink, mut outbound) = ChannelSink::channel();
    let (reply, registered) = oneshot::channel();
    let connected = TransportEvent::Connected {
        sink,
        peer,
        reply,
    };
    if events.send(connected).await.is_err() {
        debug!("Session manager is gone");
        return;
    }
    let Ok(token) = registered.await else {
        debug!("Session manager is gone");
        return;
    };

    let exit = match serve(&mut framed, token, &events, &mut outbound, &mut shutdown, settings).await
    {
        Ok(exit) => exit,
        Err(err) => {
            debug!(session = %token, "Connection failed: {}", err);
            Exit::Peer
        }
    };

    let _ = events.send(TransportEvent::Disconnected { token }).await;
    if let Exit::Local = exit {
        // The manager answers Disconnected with the farewell and then drops
        // the sink, which ends this drain.
        let drained = tokio::time::timeout(settings.drain_timeout, async {
            while let Some(message) = outbound.recv().await {
                if let Outbound::Data(bytes) = message {
                    framed.feed(bytes).await?;
                }
            }
            SinkExt::<Bytes>::flush(&mut framed).await?;
            SinkExt::<Bytes>::close(&mut framed).await
        })
        .await;
        if !matches!(drained, Ok(Ok(()))) {
            debug!(session = %token, "Connection closed before output was drained");
        }
    }
    debug!(session = %token, "Connection task finished");
}

async fn announce<S>(framed: &mut TelnetStream<S>) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let codec = framed.codec_mut();
    let frames: Vec<TelnetFrame> = [
        codec.enable_local(TelnetOption::Echo),
        codec.enable_local(TelnetOption::SuppressGoAhead),
        codec.enable_remote(TelnetOption::NAWS),
    ]
    .into_iter()
    .flatten()
    .collect();
    for frame in frames {
        framed.feed(frame).await?;
    }
    SinkExt::<Bytes>::flush(&mut *framed).await?;
    Ok(())
}

async fn serve<S>(
    framed: &mut TelnetStream<S>,
    token: SessionToken,
    events: &mpsc::Sender<TransportEvent>,
    outbound: &mut mpsc::UnboundedReceiver<Outbound>,
    shutdown: &mut watch::Receiver<bool>,
    settings: ConnectionSettings,
) -> Result<Exit>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if *shutdown.borrow() {
        return Ok(Exit::Local);
    }
    let mut last_input = Instant::now();

    loop {
        tokio::select! {
            inbound = framed.next() => {
                let Some(event) = inbound else {
                    debug!(session = %token, "Peer closed connection");
                    return Ok(Exit::Peer);
                };
                last_input = Instant::now();
                if !forward(event?, token, events).await {
                    return Ok(Exit::Local);
                }
                let responses = framed.codec_mut().take_responses();
                if !responses.is_empty() {
                    for frame in responses {
                        framed.feed(frame).await?;
                    }
                    SinkExt::<Bytes>::flush(&mut *framed).await?;
                }
            }
            message = outbound.recv() => {
                match message {
                    Some(Outbound::Data(bytes)) => {
                        framed.feed(bytes).await?;
                        let mut closing = false;
                        while let Ok(message) = outbound.try_recv() {
                            match message {
                                Outbound::Data(more) => framed.feed(more).await?,
                                Outbound::Close => {
                                    closing = true;
                                    break;
                                }
                            }
                        }
                        SinkExt::<Bytes>::flush(&mut *framed).await?;
                        if closing {
                            return Ok(Exit::Local);
                        }
                    }
                    Some(Outbound::Close) | None => return Ok(Exit::Local),
                }
            }
            _ = shutdown.changed() => {
                debug!(session = %token, "Closing for server shutdown");
                return Ok(Exit::Local);
            }
            _ = idle(settings.idle_timeout, last_input) => {
                debug!(session = %token, "Idle timeout");
                return Ok(Exit::Local);
            }
        }
    }
}

/// Passes one decoded event on. Returns `false` once the manager is gone.
async fn forward(
    event: TelnetEvent,
    token: SessionToken,
    events: &mpsc::Sender<TransportEvent>,
) -> bool {
    let transport_event = match event {
        TelnetEvent::Data(bytes) => TransportEvent::Data { token, bytes },
        TelnetEvent::WindowSize(size) => TransportEvent::WindowSize {
            token,
            cols: size.cols,
            rows: size.rows,
        },
        TelnetEvent::OptionStatus(option, side, enabled) => {
            debug!(session = %token, %option, %side, enabled, "Option negotiated");
            return true;
        }
        other => {
            trace!(session = %token, event = ?other, "Ignoring telnet event");
            return true;
        }
    };
    events.send(transport_event).await.is_ok()
}

async fn idle(timeout: Option<Duration>, since: Instant) {
    match timeout {
        Some(timeout) => sleep_until(since + timeout).await,
        None => std::future::pending().await,
    }
}
