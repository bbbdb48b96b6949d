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

//! Telnet server implementation
//!
//! The server binds the configured [`SockAddr`], spawns one task per
//! accepted connection and a single task owning the [`SessionManager`].
//!
//! ```text
//! accept loop ──spawn──> connection task ──TransportEvent──> manager task
//!                              ^                                   │
//!                              └──────────── Outbound ─────────────┘
//! ```

use crate::connection::{self, ConnectionGuard, ConnectionSettings};
use crate::{
    LineHandler, Result, ServerConfig, ServiceError, SessionManager, SockAddr, TransportEvent,
};
use metrics::counter;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

#[cfg(unix)]
use tokio::net::{UnixListener, UnixStream};

/// Depth of the queue between connection tasks and the manager task
const EVENT_QUEUE_DEPTH: usize = 1024;

enum Listener {
    Tcp(TcpListener),
    #[cfg(unix)]
    Unix(UnixListener),
}

enum Accepted {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl Listener {
    fn bind(config: &ServerConfig) -> Result<(Listener, SockAddr)> {
        match &config.bind_address {
            SockAddr::Ipv4(addr) => {
                let socket = TcpSocket::new_v4()?;
                socket.set_reuseaddr(true)?;
                socket.bind(SocketAddr::V4(*addr))?;
                let listener = socket.listen(config.listen_backlog)?;
                let local = match listener.local_addr()? {
                    SocketAddr::V4(local) => SockAddr::Ipv4(local),
                    SocketAddr::V6(_) => config.bind_address.clone(),
                };
                Ok((Listener::Tcp(listener), local))
            }
            #[cfg(unix)]
            SockAddr::Local(path) => {
                use std::os::unix::ffi::OsStrExt;
                let path = std::path::Path::new(std::ffi::OsStr::from_bytes(path));
                let listener = UnixListener::bind(path)?;
                Ok((Listener::Unix(listener), config.bind_address.clone()))
            }
            other => Err(ServiceError::InvalidAddress(other.to_string())),
        }
    }

    async fn accept(&self) -> std::io::Result<(Accepted, String)> {
        match self {
            Listener::Tcp(listener) => {
                let (stream, peer) = listener.accept().await?;
                stream.set_nodelay(true)?;
                Ok((Accepted::Tcp(stream), peer.to_string()))
            }
            #[cfg(unix)]
            Listener::Unix(listener) => {
                let (stream, _) = listener.accept().await?;
                Ok((Accepted::Unix(stream), "local".to_string()))
            }
        }
    }
}

/// Telnet line editing shell server
///
/// # Example
///
/// ```no_run
/// use telshell_service::{NoopHandler, ServerConfig, TelnetServer};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ServerConfig::from_bind_str("127.0.0.1:2323")?;
///     let server = TelnetServer::bind(config).await?;
///     server.start(NoopHandler).await?;
///
///     tokio::signal::ctrl_c().await?;
///     server.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct TelnetServer {
    config: ServerConfig,
    local_addr: SockAddr,
    listener: Mutex<Option<Listener>>,
    running: Arc<AtomicBool>,
    connections: Arc<AtomicUsize>,
    shutdown_tx: watch::Sender<bool>,
    events_tx: Mutex<Option<mpsc::Sender<TransportEvent>>>,
    accept_handle: Mutex<Option<JoinHandle<()>>>,
    manager_handle: Mutex<Option<JoinHandle<SessionManager>>>,
}

impl TelnetServer {
    /// Validates the configuration and binds the listener.
    ///
    /// Connections are not accepted until [`start`](TelnetServer::start).
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        config.validate().map_err(ServiceError::InvalidConfig)?;
        let (listener, local_addr) = Listener::bind(&config)?;
        info!("Telnet server bound to {}", local_addr);

        let (shutdown_tx, _) = watch::channel(false);
        Ok(Self {
            config,
            local_addr,
            listener: Mutex::new(Some(listener)),
            running: Arc::new(AtomicBool::new(false)),
            connections: Arc::new(AtomicUsize::new(0)),
            shutdown_tx,
            events_tx: Mutex::new(None),
            accept_handle: Mutex::new(None),
            manager_handle: Mutex::new(None),
        })
    }

    /// Starts the manager task and the accept loop.
    pub async fn start<H>(&self, handler: H) -> Result<()>
    where
        H: LineHandler + 'static,
    {
        if self.is_running() {
            return Err(ServiceError::ServerAlreadyRunning);
        }
        // The listener is consumed by the first start.
        let Some(listener) = self.listener.lock().await.take() else {
            return Err(ServiceError::ServerShuttingDown);
        };
        self.running.store(true, Ordering::SeqCst);
        info!("Starting Telnet server on {}", self.local_addr);

        let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let manager = SessionManager::with_handler(self.config.session.clone(), handler);
        *self.manager_handle.lock().await = Some(tokio::spawn(manager.run(events_rx)));

        let accept = AcceptLoop {
            listener,
            events: events_tx.clone(),
            shutdown: self.shutdown_tx.subscribe(),
            connections: self.connections.clone(),
            max_connections: self.config.max_connections,
            settings: ConnectionSettings {
                idle_timeout: self.config.idle_timeout,
                drain_timeout: self.config.shutdown_timeout,
            },
        };
        *self.accept_handle.lock().await = Some(tokio::spawn(accept.run()));
        *self.events_tx.lock().await = Some(events_tx);
        Ok(())
    }

    /// Stops accepting, closes every connection with a farewell and tears
    /// down the session manager.
    pub async fn shutdown(&self) -> Result<()> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Err(ServiceError::ServerNotRunning);
        }
        info!("Shutting down Telnet server");
        let timeout = self.config.shutdown_timeout;

        let _ = self.shutdown_tx.send(true);
        if let Some(handle) = self.accept_handle.lock().await.take() {
            join_within(timeout, handle, "accept loop").await;
        }

        if let Some(events) = self.events_tx.lock().await.take() {
            let _ = events.send(TransportEvent::Shutdown).await;
        }
        if let Some(handle) = self.manager_handle.lock().await.take() {
            join_within(timeout, handle, "session manager").await;
        }

        // Give connection tasks the chance to drain their farewell.
        let deadline = tokio::time::Instant::now() + timeout;
        while self.connections.load(Ordering::SeqCst) > 0
            && tokio::time::Instant::now() < deadline
        {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        #[cfg(unix)]
        if let SockAddr::Local(path) = &self.local_addr {
            use std::os::unix::ffi::OsStrExt;
            let _ = std::fs::remove_file(std::ffi::OsStr::from_bytes(path));
        }

        info!("Telnet server shutdown complete");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Address actually bound, with the kernel-assigned port for port 0
    pub fn local_addr(&self) -> &SockAddr {
        &self.local_addr
    }

    /// Number of open connections
    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

impl std::fmt::Debug for TelnetServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelnetServer")
            .field("local_addr", &self.local_addr)
            .field("running", &self.is_running())
            .field("connection_count", &self.connection_count())
            .finish()
    }
}

impl Drop for TelnetServer {
    fn drop(&mut self) {
        if self.running.load(Ordering::SeqCst) {
            warn!("TelnetServer dropped while still running");
            self.running.store(false, Ordering::SeqCst);
            let _ = self.shutdown_tx.send(true);
        }
    }
}

async fn join_within<T>(timeout: Duration, handle: JoinHandle<T>, name: &str) {
    let abort = handle.abort_handle();
    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(_)) => debug!("{} stopped", name),
        Ok(Err(err)) => error!("{} failed: {}", name, err),
        Err(_) => {
            warn!("{} did not stop within {:?}, aborting", name, timeout);
            abort.abort();
        }
    }
}

/// Counts a new connection unless `max` are already open
fn admit(connections: &Arc<AtomicUsize>, max: usize) -> Result<ConnectionGuard> {
    if connections.load(Ordering::SeqCst) >= max {
        return Err(ServiceError::MaxConnectionsReached(max));
    }
    Ok(ConnectionGuard::new(connections.clone()))
}

struct AcceptLoop {
    listener: Listener,
    events: mpsc::Sender<TransportEvent>,
    shutdown: watch::Receiver<bool>,
    connections: Arc<AtomicUsize>,
    max_connections: usize,
    settings: ConnectionSettings,
}

impl AcceptLoop {
    async fn run(mut self) {
        loop {
            let accepted = tokio::select! {
                result = self.listener.accept() => result,
                _ = self.shutdown.changed() => break,
            };

            match accepted {
                Ok((stream, peer)) => match admit(&self.connections, self.max_connections) {
                    Ok(guard) => {
                        debug!("Accepted connection from {}", peer);
                        self.spawn(stream, peer, guard);
                    }
                    Err(err) => {
                        warn!("Rejecting connection from {}: {}", peer, err);
                        counter!("telshell.connections.refused").increment(1);
                        drop(stream);
                    }
                },
                Err(err) => {
                    error!("Failed to accept connection: {}", err);
                    // Back off on errors to avoid tight loop
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
        }
        info!("Accept loop terminated");
    }

    fn spawn(&self, stream: Accepted, peer: String, guard: ConnectionGuard) {
        let events = self.events.clone();
        let shutdown = self.shutdown.clone();
        let settings = self.settings;
        match stream {
            Accepted::Tcp(stream) => {
                tokio::spawn(connection::run(stream, peer, events, shutdown, settings, guard));
            }
            #[cfg(unix)]
            Accepted::Unix(stream) => {
                tokio::spawn(connection::run(stream, peer, events, shutdown, settings, guard));
            }
        }
    }
}
