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

use enum_kinds::EnumKind;

/// Logical key classified from one or more raw input bytes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumKind)]
#[enum_kind(KeyEventKind, derive(Hash))]
pub enum KeyEvent {
    /// Printable ASCII byte
    Printable(u8),
    /// Carriage Return or Line Feed
    Enter,
    /// Backspace or Delete
    Backspace,
    /// Horizontal Tab
    Tab,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Home,
    End,
    /// Control byte or escape sequence this scanner does not know. The
    /// consumed bytes are discarded.
    Unrecognized,
}

impl KeyEvent {
    /// Returns the fieldless kind of this event
    pub fn kind(&self) -> KeyEventKind {
        KeyEventKind::from(self)
    }
}

/// Outcome of feeding a single byte to the scanner
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanStatus {
    /// More bytes are needed before a key can be classified
    Pending,
    /// A key event is ready, see [`KeyEventScanner::result`](crate::KeyEventScanner::result)
    Ensure,
}
