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

//! Negotiate About Window Size (RFC 1073)
//!

use crate::{CodecError, CodecResult, consts};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::BufMut;
use std::fmt;

/// Terminal dimensions carried by a NAWS subnegotiation.
///
/// The payload is four bytes: columns then rows, each a big-endian u16.
/// A value of zero means the client does not know that dimension.
///
/// # Example
/// ```
/// use telshell_telnetcodec::naws::WindowSize;
///
/// let size = WindowSize::decode(&[0, 80, 0, 24]).unwrap();
/// assert_eq!(size, WindowSize::new(80, 24));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowSize {
    /// The number of columns (characters) in the terminal window
    pub cols: u16,
    /// The number of rows (lines) in the terminal window
    pub rows: u16,
}

impl WindowSize {
    /// Encoded payload length in bytes
    pub const ENCODED_LEN: usize = 4;

    pub fn new(cols: u16, rows: u16) -> Self {
        WindowSize { cols, rows }
    }

    /// Decodes an unescaped subnegotiation payload.
    pub fn decode(mut payload: &[u8]) -> CodecResult<Self> {
        if payload.len() != Self::ENCODED_LEN {
            return Err(CodecError::SubnegotiationError {
                option: consts::option::NAWS,
                required: Self::ENCODED_LEN,
                available: payload.len(),
            });
        }
        let cols = payload.read_u16::<BigEndian>()?;
        let rows = payload.read_u16::<BigEndian>()?;
        Ok(WindowSize { cols, rows })
    }

    /// Writes the unescaped payload.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        let mut writer = dst.writer();
        writer.write_u16::<BigEndian>(self.cols)?;
        writer.write_u16::<BigEndian>(self.rows)?;
        Ok(Self::ENCODED_LEN)
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn test_decode() {
        let size = WindowSize::decode(&[0x01, 0x00, 0x00, 0x30]).unwrap();
        assert_eq!(size.cols, 256);
        assert_eq!(size.rows, 48);
    }

    #[test]
    fn test_decode_wrong_length() {
        let err = WindowSize::decode(&[0, 80, 0]).unwrap_err();
        assert_eq!(
            err,
            CodecError::SubnegotiationError {
                option: 31,
                required: 4,
                available: 3,
            }
        );
        assert!(WindowSize::decode(&[0, 80, 0, 24, 0]).is_err());
    }

    #[test]
    fn test_encode() {
        let mut buffer = BytesMut::new();
        let written = WindowSize::new(132, 43).encode(&mut buffer).unwrap();
        assert_eq!(written, 4);
        assert_eq!(&buffer[..], &[0, 132, 0, 43]);
    }

    #[test]
    fn test_display() {
        assert_eq!(WindowSize::new(80, 24).to_string(), "80x24");
    }
}
