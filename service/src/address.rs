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

//! Listen address representation
//!
//! A [`SockAddr`] is either an IPv4 endpoint or a local (unix domain) path.
//! Local paths are raw bytes with an explicit length, so a path may contain
//! NUL bytes and still round-trip through the native socket structure.

use crate::ServiceError;
use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::str::FromStr;
use tracing::debug;

/// Address a listener binds to
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SockAddr {
    /// Unparseable or unset address
    #[default]
    None,
    /// IPv4 host and port
    Ipv4(SocketAddrV4),
    /// Local socket path, not NUL terminated
    Local(Vec<u8>),
}

impl SockAddr {
    /// Parses an address string.
    ///
    /// A string containing `:` is read as `ipv4:port`; anything else is a
    /// local path. A malformed host or port yields [`SockAddr::None`].
    pub fn parse(input: &str) -> SockAddr {
        match input.split_once(':') {
            Some((host, port)) => match (host.parse::<Ipv4Addr>(), port.parse::<u16>()) {
                (Ok(ip), Ok(port)) => SockAddr::Ipv4(SocketAddrV4::new(ip, port)),
                _ => {
                    debug!(address = input, "Malformed IPv4 address");
                    SockAddr::None
                }
            },
            None if input.is_empty() => SockAddr::None,
            None => SockAddr::Local(input.as_bytes().to_vec()),
        }
    }

    pub fn ipv4(ip: Ipv4Addr, port: u16) -> SockAddr {
        SockAddr::Ipv4(SocketAddrV4::new(ip, port))
    }

    pub fn local(path: impl Into<Vec<u8>>) -> SockAddr {
        SockAddr::Local(path.into())
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, SockAddr::None)
    }

    pub fn as_ipv4(&self) -> Option<SocketAddrV4> {
        match self {
            SockAddr::Ipv4(addr) => Some(*addr),
            _ => None,
        }
    }

    pub fn local_path(&self) -> Option<&[u8]> {
        match self {
            SockAddr::Local(path) => Some(path),
            _ => None,
        }
    }
}

#[cfg(unix)]
impl SockAddr {
    /// Longest local path the native structure can hold
    pub fn max_local_path() -> usize {
        std::mem::size_of::<libc::sockaddr_un>() - std::mem::offset_of!(libc::sockaddr_un, sun_path)
    }

    /// Converts to the native socket address and its length.
    ///
    /// Returns `None` for [`SockAddr::None`] and for local paths that do not
    /// fit. The length of a local address is the `sun_path` offset plus the
    /// path length, with no terminator added.
    pub fn to_native(&self) -> Option<(libc::sockaddr_storage, libc::socklen_t)> {
        // SAFETY: sockaddr_storage is plain data for which all zero bytes is valid.
        let mut storage: libc::sockaddr_storage = unsafe { std::mem::zeroed() };
        let len = match self {
            SockAddr::None => return None,
            SockAddr::Ipv4(addr) => {
                // SAFETY: sockaddr_storage is large and aligned enough for any sockaddr type.
                let sin = unsafe {
                    &mut *(&mut storage as *mut libc::sockaddr_storage).cast::<libc::sockaddr_in>()
                };
                sin.sin_family = libc::AF_INET as libc::sa_family_t;
                sin.sin_port = addr.port().to_be();
                sin.sin_addr.s_addr = u32::from_ne_bytes(addr.ip().octets());
                std::mem::size_of::<libc::sockaddr_in>()
            }
            SockAddr::Local(path) => {
                // SAFETY: as above.
                let sun = unsafe {
                    &mut *(&mut storage as *mut libc::sockaddr_storage).cast::<libc::sockaddr_un>()
                };
                if path.len() > sun.sun_path.len() {
                    return None;
                }
                sun.sun_family = libc::AF_UNIX as libc::sa_family_t;
                for (dst, &src) in sun.sun_path.iter_mut().zip(path.iter()) {
                    *dst = src as libc::c_char;
                }
                std::mem::offset_of!(libc::sockaddr_un, sun_path) + path.len()
            }
        };
        Some((storage, len as libc::socklen_t))
    }

    /// Reads a native socket address of `len` bytes.
    pub fn from_native(storage: &libc::sockaddr_storage, len: libc::socklen_t) -> SockAddr {
        let len = len as usize;
        match storage.ss_family as libc::c_int {
            libc::AF_INET if len >= std::mem::size_of::<libc::sockaddr_in>() => {
                // SAFETY: family is AF_INET and the length covers sockaddr_in.
                let sin = unsafe {
                    &*(storage as *const libc::sockaddr_storage).cast::<libc::sockaddr_in>()
                };
                let ip = Ipv4Addr::from(sin.sin_addr.s_addr.to_ne_bytes());
                SockAddr::Ipv4(SocketAddrV4::new(ip, u16::from_be(sin.sin_port)))
            }
            libc::AF_UNIX => {
                // SAFETY: family is AF_UNIX; the path read is clamped to sun_path.
                let sun = unsafe {
                    &*(storage as *const libc::sockaddr_storage).cast::<libc::sockaddr_un>()
                };
                let head = std::mem::offset_of!(libc::sockaddr_un, sun_path);
                let path_len = len.saturating_sub(head).min(sun.sun_path.len());
                SockAddr::Local(sun.sun_path[..path_len].iter().map(|&c| c as u8).collect())
            }
            _ => SockAddr::None,
        }
    }
}

impl fmt::Display for SockAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SockAddr::None => write!(f, "<none>"),
            SockAddr::Ipv4(addr) => write!(f, "{}", addr),
            SockAddr::Local(path) => write!(f, "{}", String::from_utf8_lossy(path)),
        }
    }
}

impl FromStr for SockAddr {
    type Err = ServiceError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match SockAddr::parse(input) {
            SockAddr::None => Err(ServiceError::InvalidAddress(input.to_string())),
            addr => Ok(addr),
        }
    }
}

impl From<SocketAddrV4> for SockAddr {
    fn from(addr: SocketAddrV4) -> Self {
        SockAddr::Ipv4(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ipv4() {
        let addr = SockAddr::parse("192.168.1.1:9999");
        assert_eq!(addr, SockAddr::ipv4(Ipv4Addr::new(192, 168, 1, 1), 9999));
        assert_eq!(addr.to_string(), "192.168.1.1:9999");
        assert!(addr.is_valid());
    }

    #[test]
    fn test_parse_local() {
        let addr = SockAddr::parse("/tmp/telshell.sock");
        assert_eq!(addr.local_path(), Some(&b"/tmp/telshell.sock"[..]));
        assert_eq!(addr.to_string(), "/tmp/telshell.sock");
    }

    #[test]
    fn test_parse_malformed() {
        assert_eq!(SockAddr::parse("300.1.1.1:23"), SockAddr::None);
        assert_eq!(SockAddr::parse("127.0.0.1:port"), SockAddr::None);
        assert_eq!(SockAddr::parse("127.0.0.1:70000"), SockAddr::None);
        assert_eq!(SockAddr::parse("localhost:23"), SockAddr::None);
        assert_eq!(SockAddr::parse(""), SockAddr::None);
        assert!(!SockAddr::None.is_valid());
        assert!("nope:x".parse::<SockAddr>().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_native_round_trip_ipv4() {
        let addr = SockAddr::parse("10.0.0.7:2323");
        let (storage, len) = addr.to_native().unwrap();
        assert_eq!(len as usize, std::mem::size_of::<libc::sockaddr_in>());
        assert_eq!(SockAddr::from_native(&storage, len), addr);
    }

    #[cfg(unix)]
    #[test]
    fn test_native_round_trip_local_with_nul() {
        let addr = SockAddr::local(&b"/tmp/a\0b"[..]);
        let (storage, len) = addr.to_native().unwrap();
        assert_eq!(
            len as usize,
            std::mem::offset_of!(libc::sockaddr_un, sun_path) + 8
        );
        assert_eq!(SockAddr::from_native(&storage, len), addr);
    }

    #[cfg(unix)]
    #[test]
    fn test_native_rejects_long_path() {
        let addr = SockAddr::local(vec![b'x'; SockAddr::max_local_path() + 1]);
        assert!(addr.to_native().is_none());
        assert!(SockAddr::None.to_native().is_none());
    }
}
