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

use telshell_keycodec::consts::{CURSOR_DOWN, CURSOR_LEFT, CURSOR_RIGHT, CURSOR_UP, ESC};
use telshell_keycodec::{KeyEvent, KeyEventKind, KeyEventScanner, ScanStatus};
use tracing_test::traced_test;

/// Drives one receive batch the way a session does: restart after every
/// result, stop at the end of the batch.
fn scan_batch(scanner: &mut KeyEventScanner, batch: &[u8]) -> Vec<KeyEvent> {
    let mut events = Vec::new();
    scanner.start();
    for &byte in batch {
        if scanner.next(byte) == ScanStatus::Ensure {
            events.extend(scanner.result());
            scanner.start();
        }
    }
    scanner.stop();
    events
}

#[test]
fn test_cursor_sequences_match_constants() {
    let mut scanner = KeyEventScanner::new();
    let cases = [
        (CURSOR_UP, KeyEvent::MoveUp),
        (CURSOR_DOWN, KeyEvent::MoveDown),
        (CURSOR_RIGHT, KeyEvent::MoveRight),
        (CURSOR_LEFT, KeyEvent::MoveLeft),
    ];
    for (sequence, expected) in cases {
        assert_eq!(scan_batch(&mut scanner, sequence), vec![expected]);
    }
}

#[test]
fn test_move_left_yields_exactly_one_event_and_returns_idle() {
    let mut scanner = KeyEventScanner::new();
    scanner.start();

    let statuses: Vec<_> = CURSOR_LEFT.iter().map(|&b| scanner.next(b)).collect();
    assert_eq!(
        statuses,
        vec![ScanStatus::Pending, ScanStatus::Pending, ScanStatus::Ensure]
    );
    assert_eq!(scanner.result(), Some(KeyEvent::MoveLeft));

    scanner.start();
    assert!(!scanner.is_pending());
    assert_eq!(scanner.result(), None);
}

#[test]
fn test_mixed_typing_batch() {
    let mut scanner = KeyEventScanner::new();
    let events = scan_batch(&mut scanner, b"ls\x1b[D\x1b[D-l\x1b[F\r");
    let kinds: Vec<_> = events.iter().map(KeyEvent::kind).collect();
    assert_eq!(
        kinds,
        vec![
            KeyEventKind::Printable,
            KeyEventKind::Printable,
            KeyEventKind::MoveLeft,
            KeyEventKind::MoveLeft,
            KeyEventKind::Printable,
            KeyEventKind::Printable,
            KeyEventKind::End,
            KeyEventKind::Enter,
        ]
    );
}

#[traced_test]
#[test]
fn test_split_sequence_is_discarded_at_batch_end() {
    let mut scanner = KeyEventScanner::new();

    // The first batch ends mid-sequence; the prefix is abandoned.
    assert!(scan_batch(&mut scanner, &[ESC, b'[']).is_empty());
    assert!(logs_contain("Discarding partial key sequence"));

    // The tail then scans as a plain printable byte.
    assert_eq!(scan_batch(&mut scanner, b"A"), vec![KeyEvent::Printable(b'A')]);

    // A fresh complete sequence is unaffected by the earlier partial one.
    assert_eq!(scan_batch(&mut scanner, CURSOR_UP), vec![KeyEvent::MoveUp]);
}

#[test]
fn test_pending_state_survives_without_stop() {
    let mut scanner = KeyEventScanner::new();
    scanner.start();
    assert_eq!(scanner.next(ESC), ScanStatus::Pending);
    // No stop(): the next batch continues the same sequence.
    assert_eq!(scanner.next(b'['), ScanStatus::Pending);
    assert_eq!(scanner.next(b'C'), ScanStatus::Ensure);
    assert_eq!(scanner.result(), Some(KeyEvent::MoveRight));
}

#[test]
fn test_scanners_do_not_share_state() {
    let mut first = KeyEventScanner::new();
    let mut second = KeyEventScanner::new();
    first.start();
    second.start();

    assert_eq!(first.next(ESC), ScanStatus::Pending);
    assert_eq!(second.next(b'['), ScanStatus::Ensure);
    assert_eq!(second.result(), Some(KeyEvent::Printable(b'[')));
    assert!(first.is_pending());
}
