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

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use telshell_keycodec::consts::{BEL, BS, CR, CURSOR_LEFT, CURSOR_RIGHT, LF};

/// Redraw bytes produced by a single key event.
///
/// Each editor operation assembles one `Echo` which the session hands to its
/// sink in a single write.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Echo {
    bytes: BytesMut,
}

impl Echo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, byte: u8) {
        self.bytes.put_u8(byte);
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Appends `count` backspace bytes, stepping the remote cursor left without erasing
    pub fn backspaces(&mut self, count: usize) {
        self.bytes.put_bytes(BS, count);
    }

    pub fn cursor_left(&mut self) {
        self.extend(CURSOR_LEFT);
    }

    pub fn cursor_right(&mut self) {
        self.extend(CURSOR_RIGHT);
    }

    pub fn bell(&mut self) {
        self.push(BEL);
    }

    pub fn newline(&mut self) {
        self.extend(&[CR, LF]);
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes.freeze()
    }
}

impl AsRef<[u8]> for Echo {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for Echo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Echo(\"{}\")", self.bytes.escape_ascii())
    }
}
