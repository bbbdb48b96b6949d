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

//! Replays editor echoes against a model of the remote display and checks
//! that the display always matches the editor state.

use proptest::prelude::*;
use telshell_terminal::LineEditor;

#[derive(Clone, Debug)]
enum Key {
    Char(u8),
    Backspace,
    Left,
    Right,
    Home,
    End,
    Replace(Vec<u8>),
}

fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        4 => (0x20u8..=0x7E).prop_map(Key::Char),
        2 => Just(Key::Backspace),
        2 => Just(Key::Left),
        1 => Just(Key::Right),
        1 => Just(Key::Home),
        1 => Just(Key::End),
        1 => prop::collection::vec(0x20u8..=0x7E, 0..24).prop_map(Key::Replace),
    ]
}

/// Minimal single line display understanding the echo vocabulary.
#[derive(Default)]
struct RemoteLine {
    cells: Vec<u8>,
    column: usize,
}

impl RemoteLine {
    fn apply(&mut self, bytes: &[u8]) {
        let mut index = 0;
        while index < bytes.len() {
            match bytes[index] {
                0x08 => self.column = self.column.saturating_sub(1),
                0x07 => {}
                0x1b => {
                    assert_eq!(bytes[index + 1], b'[');
                    match bytes[index + 2] {
                        b'C' => self.column += 1,
                        b'D' => self.column = self.column.saturating_sub(1),
                        other => panic!("unexpected final byte {other:#x}"),
                    }
                    index += 2;
                }
                byte => {
                    if self.column == self.cells.len() {
                        self.cells.push(byte);
                    } else {
                        self.cells[self.column] = byte;
                    }
                    self.column += 1;
                }
            }
            index += 1;
        }
    }
}

proptest! {
    #[test]
    fn display_tracks_editor(keys in prop::collection::vec(key_strategy(), 0..128)) {
        let mut editor = LineEditor::with_max_length(48);
        let mut remote = RemoteLine::default();

        for key in keys {
            let echo = match key {
                Key::Char(byte) => editor.on_printable(byte),
                Key::Backspace => editor.on_backspace(),
                Key::Left => editor.on_move_left(),
                Key::Right => editor.on_move_right(),
                Key::Home => editor.on_home(),
                Key::End => editor.on_end(),
                Key::Replace(line) => editor.replace_line(&line),
            };
            remote.apply(echo.as_bytes());

            prop_assert!(editor.cursor() <= editor.len());
            prop_assert_eq!(remote.column, editor.cursor());
            prop_assert_eq!(&remote.cells[..editor.len()], editor.buffer());
            prop_assert!(remote.cells[editor.len()..].iter().all(|&cell| cell == b' '));
        }
    }

    #[test]
    fn enter_returns_exact_buffer(text in prop::collection::vec(0x20u8..=0x7E, 0..64)) {
        let mut editor = LineEditor::new();
        for &byte in &text {
            editor.on_printable(byte);
        }
        let (echo, line) = editor.on_enter();
        prop_assert_eq!(echo.as_bytes(), b"\r\n");
        prop_assert_eq!(line, text);
        prop_assert!(editor.is_empty());
    }
}
