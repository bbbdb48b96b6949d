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

use crate::consts::{BS, CR, CSI, DEL, ESC, LF, MAX_SEQUENCE_LENGTH, SS3, TAB, TILDE};
use crate::{KeyEvent, ScanStatus};
use tracing::{debug, trace, warn};

/// Internal states of the key event scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// No prefix pending. Plain bytes classify immediately, ESC moves to `Escape`.
    Idle,
    /// Received ESC. `[` moves to `Bracket`, `O` to `SingleShift`, anything else
    /// is unrecognized.
    Escape,
    /// Received `ESC [`, awaiting a final byte or the first parameter byte.
    Bracket,
    /// Received `ESC O`, awaiting a final byte.
    SingleShift,
    /// Inside `ESC [ <params>`, collecting parameter bytes until a final byte.
    Parameter,
}

/// Per-session state machine that classifies input bytes into [`KeyEvent`]s.
///
/// Each call to [`next`](KeyEventScanner::next) consumes exactly one byte and
/// reports whether a classification is ready. Once it is, the scanner holds the
/// result until [`start`](KeyEventScanner::start) is called again; it never
/// resets itself in the middle of a caller's loop.
pub struct KeyEventScanner {
    state: State,
    /// Parameter bytes of the pending `ESC [` sequence
    parameters: Vec<u8>,
    result: Option<KeyEvent>,
}

impl KeyEventScanner {
    /// Creates a scanner in the idle state
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            parameters: Vec::with_capacity(MAX_SEQUENCE_LENGTH),
            result: None,
        }
    }

    /// Resets the scanner so it is ready to scan the next logical key.
    pub fn start(&mut self) {
        self.state = State::Idle;
        self.parameters.clear();
        self.result = None;
    }

    /// Abandons any partially scanned escape prefix.
    ///
    /// Called at the end of a receive batch so that an incomplete sequence is
    /// not carried into unrelated later input.
    pub fn stop(&mut self) {
        if self.is_pending() {
            debug!(
                state = ?self.state,
                parameters = ?self.parameters,
                "Discarding partial key sequence"
            );
        }
        self.start();
    }

    /// Returns `true` while an escape prefix has been consumed but not yet classified
    pub fn is_pending(&self) -> bool {
        self.result.is_none() && self.state != State::Idle
    }

    /// The classification produced by the last [`ScanStatus::Ensure`], if any
    pub fn result(&self) -> Option<KeyEvent> {
        self.result
    }

    /// Feeds one byte to the scanner.
    ///
    /// Returns [`ScanStatus::Ensure`] exactly when a classification is ready.
    /// If a classification is already waiting to be collected, the byte is
    /// dropped and the existing result is kept.
    pub fn next(&mut self, byte: u8) -> ScanStatus {
        if let Some(event) = self.result {
            warn!(
                byte = byte,
                event = ?event,
                "Key event scanner not restarted after a result; dropping byte"
            );
            return ScanStatus::Ensure;
        }

        let classified = match self.state {
            State::Idle => self.scan_idle(byte),
            State::Escape => self.scan_escape(byte),
            State::Bracket => self.scan_bracket(byte),
            State::SingleShift => Some(Self::classify_final(byte)),
            State::Parameter => self.scan_parameter(byte),
        };

        match classified {
            Some(event) => {
                trace!(byte = byte, event = ?event, "Key event classified");
                self.state = State::Idle;
                self.parameters.clear();
                self.result = Some(event);
                ScanStatus::Ensure
            }
            None => ScanStatus::Pending,
        }
    }

    fn scan_idle(&mut self, byte: u8) -> Option<KeyEvent> {
        match byte {
            ESC => {
                self.state = State::Escape;
                None
            }
            CR | LF => Some(KeyEvent::Enter),
            BS | DEL => Some(KeyEvent::Backspace),
            TAB => Some(KeyEvent::Tab),
            0x20..=0x7E => Some(KeyEvent::Printable(byte)),
            _ => Some(KeyEvent::Unrecognized),
        }
    }

    fn scan_escape(&mut self, byte: u8) -> Option<KeyEvent> {
        match byte {
            CSI => {
                self.state = State::Bracket;
                None
            }
            SS3 => {
                self.state = State::SingleShift;
                None
            }
            _ => Some(KeyEvent::Unrecognized),
        }
    }

    fn scan_bracket(&mut self, byte: u8) -> Option<KeyEvent> {
        match byte {
            0x30..=0x3F => {
                self.parameters.push(byte);
                self.state = State::Parameter;
                None
            }
            _ => Some(Self::classify_final(byte)),
        }
    }

    fn scan_parameter(&mut self, byte: u8) -> Option<KeyEvent> {
        match byte {
            0x30..=0x3F if self.parameters.len() < MAX_SEQUENCE_LENGTH => {
                self.parameters.push(byte);
                None
            }
            TILDE => Some(match self.parameters.as_slice() {
                b"1" | b"7" => KeyEvent::Home,
                b"4" | b"8" => KeyEvent::End,
                _ => KeyEvent::Unrecognized,
            }),
            _ => Some(KeyEvent::Unrecognized),
        }
    }

    /// Maps the final byte of `ESC [ x` or `ESC O x`.
    fn classify_final(byte: u8) -> KeyEvent {
        match byte {
            b'A' => KeyEvent::MoveUp,
            b'B' => KeyEvent::MoveDown,
            b'C' => KeyEvent::MoveRight,
            b'D' => KeyEvent::MoveLeft,
            b'H' => KeyEvent::Home,
            b'F' => KeyEvent::End,
            _ => KeyEvent::Unrecognized,
        }
    }
}

impl Default for KeyEventScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeyEventScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyEventScanner")
            .field("state", &self.state)
            .field("result", &self.result)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feeds `bytes` one at a time, restarting after each result.
    fn scan_all(scanner: &mut KeyEventScanner, bytes: &[u8]) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        scanner.start();
        for &byte in bytes {
            if scanner.next(byte) == ScanStatus::Ensure {
                events.push(scanner.result().unwrap());
                scanner.start();
            }
        }
        events
    }

    #[test]
    fn test_printable_is_immediate() {
        let mut scanner = KeyEventScanner::new();
        assert_eq!(scanner.next(b'a'), ScanStatus::Ensure);
        assert_eq!(scanner.result(), Some(KeyEvent::Printable(b'a')));
    }

    #[test]
    fn test_control_bytes() {
        let mut scanner = KeyEventScanner::new();
        let events = scan_all(&mut scanner, b"\r\n\x08\x7f\t");
        assert_eq!(
            events,
            vec![
                KeyEvent::Enter,
                KeyEvent::Enter,
                KeyEvent::Backspace,
                KeyEvent::Backspace,
                KeyEvent::Tab,
            ]
        );
    }

    #[test]
    fn test_unknown_control_byte_is_unrecognized() {
        let mut scanner = KeyEventScanner::new();
        assert_eq!(scanner.next(0x01), ScanStatus::Ensure);
        assert_eq!(scanner.result(), Some(KeyEvent::Unrecognized));
        assert!(!scanner.is_pending());
    }

    #[test]
    fn test_high_bytes_are_unrecognized() {
        let mut scanner = KeyEventScanner::new();
        assert_eq!(scan_all(&mut scanner, &[0x80, 0xE9, 0xFF]), vec![KeyEvent::Unrecognized; 3]);
    }

    #[test]
    fn test_move_left_sequence() {
        let mut scanner = KeyEventScanner::new();
        scanner.start();
        assert_eq!(scanner.next(ESC), ScanStatus::Pending);
        assert!(scanner.is_pending());
        assert_eq!(scanner.next(b'['), ScanStatus::Pending);
        assert_eq!(scanner.next(b'D'), ScanStatus::Ensure);
        assert_eq!(scanner.result(), Some(KeyEvent::MoveLeft));
        scanner.start();
        assert!(!scanner.is_pending());
        assert_eq!(scanner.result(), None);
    }

    #[test]
    fn test_arrow_and_home_end_sequences() {
        let mut scanner = KeyEventScanner::new();
        let events = scan_all(&mut scanner, b"\x1b[A\x1b[B\x1b[C\x1b[D\x1b[H\x1b[F");
        assert_eq!(
            events,
            vec![
                KeyEvent::MoveUp,
                KeyEvent::MoveDown,
                KeyEvent::MoveRight,
                KeyEvent::MoveLeft,
                KeyEvent::Home,
                KeyEvent::End,
            ]
        );
    }

    #[test]
    fn test_vt220_home_end() {
        let mut scanner = KeyEventScanner::new();
        let events = scan_all(&mut scanner, b"\x1b[1~\x1b[4~\x1b[7~\x1b[8~");
        assert_eq!(
            events,
            vec![KeyEvent::Home, KeyEvent::End, KeyEvent::Home, KeyEvent::End]
        );
    }

    #[test]
    fn test_single_shift_sequences() {
        let mut scanner = KeyEventScanner::new();
        let events = scan_all(&mut scanner, b"\x1bOH\x1bOF\x1bOA");
        assert_eq!(
            events,
            vec![KeyEvent::Home, KeyEvent::End, KeyEvent::MoveUp]
        );
    }

    #[test]
    fn test_unknown_final_byte() {
        let mut scanner = KeyEventScanner::new();
        assert_eq!(scan_all(&mut scanner, b"\x1b[Z"), vec![KeyEvent::Unrecognized]);
        assert_eq!(scan_all(&mut scanner, b"\x1bx"), vec![KeyEvent::Unrecognized]);
        assert_eq!(scan_all(&mut scanner, b"\x1b[3~"), vec![KeyEvent::Unrecognized]);
    }

    #[test]
    fn test_modified_arrow_is_unrecognized_and_resyncs() {
        let mut scanner = KeyEventScanner::new();
        let events = scan_all(&mut scanner, b"\x1b[1;5Cx");
        assert_eq!(events, vec![KeyEvent::Unrecognized, KeyEvent::Printable(b'x')]);
    }

    #[test]
    fn test_overlong_parameters_abandoned() {
        let mut scanner = KeyEventScanner::new();
        let mut input = vec![ESC, b'['];
        input.extend(std::iter::repeat(b'1').take(MAX_SEQUENCE_LENGTH + 1));
        input.push(b'a');

        let events = scan_all(&mut scanner, &input);
        assert_eq!(events, vec![KeyEvent::Unrecognized, KeyEvent::Printable(b'a')]);
    }

    #[test]
    fn test_stop_discards_partial_prefix() {
        let mut scanner = KeyEventScanner::new();
        scanner.start();
        assert_eq!(scanner.next(ESC), ScanStatus::Pending);
        assert_eq!(scanner.next(b'['), ScanStatus::Pending);
        scanner.stop();
        assert!(!scanner.is_pending());

        assert_eq!(scan_all(&mut scanner, b"\x1b[A"), vec![KeyEvent::MoveUp]);
    }

    #[test]
    fn test_result_held_until_restart() {
        let mut scanner = KeyEventScanner::new();
        assert_eq!(scanner.next(b'q'), ScanStatus::Ensure);
        assert_eq!(scanner.next(b'r'), ScanStatus::Ensure);
        assert_eq!(scanner.result(), Some(KeyEvent::Printable(b'q')));

        scanner.start();
        assert_eq!(scanner.next(b'r'), ScanStatus::Ensure);
        assert_eq!(scanner.result(), Some(KeyEvent::Printable(b'r')));
    }

    #[test]
    fn test_debug_formatting() {
        let scanner = KeyEventScanner::default();
        let debug_str = format!("{:?}", scanner);
        assert!(debug_str.contains("KeyEventScanner"));
        assert!(debug_str.contains("Idle"));
    }
}
