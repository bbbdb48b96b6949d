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

//! # Telshell Key Codec
//!
//! Turns the raw byte stream typed on a remote terminal into logical key
//! events. Plain bytes classify immediately; escape sequences are held in a
//! small per-session state machine until their final byte arrives.
//!
//! ```rust,ignore
//! use telshell_keycodec::{KeyEvent, KeyEventScanner, ScanStatus};
//!
//! let mut scanner = KeyEventScanner::new();
//! scanner.start();
//! assert_eq!(scanner.next(0x1B), ScanStatus::Pending);
//! assert_eq!(scanner.next(b'['), ScanStatus::Pending);
//! assert_eq!(scanner.next(b'D'), ScanStatus::Ensure);
//! assert_eq!(scanner.result(), Some(KeyEvent::MoveLeft));
//! ```

pub mod consts;
mod event;
mod scanner;

pub use self::event::{KeyEvent, KeyEventKind, ScanStatus};
pub use self::scanner::KeyEventScanner;
