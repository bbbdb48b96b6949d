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

//! Byte values and sequences used when scanning and echoing terminal input

/// Escape, introduces multi-byte key sequences
pub const ESC: u8 = 0x1B;
/// Carriage Return
pub const CR: u8 = b'\r';
/// Line Feed
pub const LF: u8 = b'\n';
/// Horizontal Tab
pub const TAB: u8 = b'\t';
/// Backspace, also used to step the remote cursor one column left
pub const BS: u8 = 0x08;
/// Delete, sent by most terminals for the backspace key
pub const DEL: u8 = 0x7F;
/// Bell
pub const BEL: u8 = 0x07;
/// Second byte of a Control Sequence Introducer (`ESC [`)
pub const CSI: u8 = b'[';
/// Second byte of a Single Shift 3 sequence (`ESC O`), used by application cursor mode
pub const SS3: u8 = b'O';
/// Terminator of VT220 style editing keys (`ESC [ 1 ~`)
pub const TILDE: u8 = b'~';

/// Cursor Up (`ESC [ A`)
pub const CURSOR_UP: &[u8] = b"\x1b[A";
/// Cursor Down (`ESC [ B`)
pub const CURSOR_DOWN: &[u8] = b"\x1b[B";
/// Cursor Forward (`ESC [ C`)
pub const CURSOR_RIGHT: &[u8] = b"\x1b[C";
/// Cursor Back (`ESC [ D`)
pub const CURSOR_LEFT: &[u8] = b"\x1b[D";

/// Maximum number of bytes held for a single pending key sequence.
///
/// Sequences that grow past this are abandoned and classified as unrecognized.
pub const MAX_SEQUENCE_LENGTH: usize = 16;
