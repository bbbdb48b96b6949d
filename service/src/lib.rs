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

//! # Telshell Service
//!
//! A networked line editing shell. Every telnet connection gets a
//! [`Session`] with its own line editor and key scanner; completed lines are
//! handed to a [`LineHandler`].
//!
//! The [`SessionManager`] is synchronous and can be driven directly, which is
//! how the session tests exercise it. [`TelnetServer`] runs it on a tokio
//! task fed by one task per connection.
//!
//! ```no_run
//! use telshell_service::{LineHandler, ServerConfig, SessionContext, TelnetServer};
//!
//! struct Shout;
//!
//! impl LineHandler for Shout {
//!     fn on_line(&mut self, ctx: &mut SessionContext<'_>, line: &[u8]) {
//!         let text = String::from_utf8_lossy(line).to_uppercase();
//!         ctx.send(format!("{}\r\n", text));
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = TelnetServer::bind(ServerConfig::default()).await?;
//!     server.start(Shout).await?;
//!     tokio::signal::ctrl_c().await?;
//!     server.shutdown().await?;
//!     Ok(())
//! }
//! ```

mod address;
mod config;
mod connection;
mod error;
mod handler;
mod manager;
mod server;
mod session;
mod sink;
mod transport;

pub use self::address::SockAddr;
pub use self::config::{ServerConfig, SessionConfig};
pub use self::error::{Result, ServiceError};
pub use self::handler::{LineHandler, NoopHandler, SessionContext};
pub use self::manager::SessionManager;
pub use self::server::TelnetServer;
pub use self::session::{Session, SessionToken};
pub use self::sink::{ChannelSink, NullSink, Outbound, SessionSink};
pub use self::transport::TransportEvent;
pub use telshell_terminal::TerminalSize;
