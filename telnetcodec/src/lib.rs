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

//! # Telshell Telnet Protocol Codec
//!
//! Server side framing of a telnet connection (RFC 854) for use with
//! `tokio_util::codec::Framed`.
//!
//! - **Data**: inbound data arrives as runs of bytes with commands removed,
//!   `CR LF` and `CR NUL` collapsed to `CR`. Outbound data is IAC escaped.
//! - **Negotiation**: `DO`, `DONT`, `WILL` and `WONT` are answered from an
//!   option table. By default we perform ECHO and SGA and accept NAWS and
//!   SGA from the peer; everything else is refused.
//! - **Window size**: NAWS subnegotiations decode to [`TelnetEvent::WindowSize`].
//!
//! ```rust
//! use bytes::BytesMut;
//! use telshell_telnetcodec::{TelnetCodec, TelnetEvent, TelnetFrame, TelnetOption};
//! use tokio_util::codec::Decoder;
//!
//! let mut codec = TelnetCodec::new();
//! let mut input = BytesMut::from(&b"hi\xFF\xFD\x01"[..]); // Data + DO ECHO
//! assert!(matches!(codec.decode(&mut input).unwrap(), Some(TelnetEvent::Data(_))));
//! assert!(matches!(codec.decode(&mut input).unwrap(), Some(TelnetEvent::OptionStatus(..))));
//! assert_eq!(codec.take_responses(), vec![TelnetFrame::Will(TelnetOption::Echo)]);
//! ```

pub mod consts;
pub mod naws;

mod codec;
mod event;
mod frame;
mod option;
mod options;
mod result;

pub use self::codec::TelnetCodec;
pub use self::event::TelnetEvent;
pub use self::frame::TelnetFrame;
pub use self::option::{TelnetOption, TelnetSide};
pub use self::options::{Negotiated, TelnetOptions};
pub use self::result::{CodecError, CodecResult};
