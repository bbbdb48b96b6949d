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

use crate::Echo;
use std::borrow::Cow;
use tracing::trace;

/// Default upper bound on the length of an input line
pub const DEFAULT_MAX_LINE_LENGTH: usize = 4096;

/// Editable input line of a single session.
///
/// Holds the bytes typed so far and a cursor into them. Every operation keeps
/// `0 <= cursor <= buffer.len()` and returns the [`Echo`] that brings the
/// remote display in line with the new state, redrawing only the part of the
/// line that moved. One byte is assumed to occupy one display column.
pub struct LineEditor {
    buffer: Vec<u8>,
    cursor: usize,
    max_length: usize,
}

impl LineEditor {
    /// Creates an empty editor with [`DEFAULT_MAX_LINE_LENGTH`]
    pub fn new() -> Self {
        Self::with_max_length(DEFAULT_MAX_LINE_LENGTH)
    }

    /// Creates an empty editor that accepts at most `max_length` bytes per line
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            buffer: Vec::new(),
            cursor: 0,
            max_length,
        }
    }

    /// Bytes of the line being edited
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// The line being edited, lossily decoded for display and logging
    pub fn line(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.buffer)
    }

    /// Cursor index into [`buffer`](LineEditor::buffer)
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Discards the line without echoing anything
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Inserts `byte` at the cursor.
    ///
    /// Echoes the byte, then the shifted tail followed by one backspace per
    /// tail byte so the remote cursor lands right after the inserted byte. A
    /// full line rings the bell instead.
    pub fn on_printable(&mut self, byte: u8) -> Echo {
        let mut echo = Echo::new();
        if self.buffer.len() >= self.max_length {
            trace!(max_length = self.max_length, "Line full, rejecting input");
            echo.bell();
            return echo;
        }

        if self.cursor == self.buffer.len() {
            self.buffer.push(byte);
        } else {
            self.buffer.insert(self.cursor, byte);
        }
        self.cursor += 1;

        let tail = &self.buffer[self.cursor..];
        echo.push(byte);
        echo.extend(tail);
        echo.backspaces(tail.len());

        self.check_cursor();
        trace!(line = %self.line(), cursor = self.cursor, "Inserted byte");
        echo
    }

    /// Removes the byte before the cursor.
    ///
    /// Echoes a backspace, the tail shifted one column left, a space over the
    /// now stale last column, then backspaces back to the cursor.
    pub fn on_backspace(&mut self) -> Echo {
        let mut echo = Echo::new();
        if self.cursor == 0 {
            return echo;
        }

        if self.cursor == self.buffer.len() {
            self.buffer.pop();
        } else {
            self.buffer.remove(self.cursor - 1);
        }
        self.cursor -= 1;

        let tail = &self.buffer[self.cursor..];
        echo.backspaces(1);
        echo.extend(tail);
        echo.push(b' ');
        echo.backspaces(tail.len() + 1);

        self.check_cursor();
        trace!(line = %self.line(), cursor = self.cursor, "Erased byte");
        echo
    }

    pub fn on_move_left(&mut self) -> Echo {
        let mut echo = Echo::new();
        if self.cursor == 0 {
            return echo;
        }
        self.cursor -= 1;
        echo.cursor_left();
        self.check_cursor();
        echo
    }

    pub fn on_move_right(&mut self) -> Echo {
        let mut echo = Echo::new();
        if self.cursor >= self.buffer.len() {
            return echo;
        }
        self.cursor += 1;
        echo.cursor_right();
        self.check_cursor();
        echo
    }

    /// Walks the cursor to column zero one step at a time.
    ///
    /// Emits a single cursor-left sequence per step, for terminals without
    /// absolute column positioning.
    pub fn on_home(&mut self) -> Echo {
        let mut echo = Echo::new();
        while self.cursor != 0 {
            echo.cursor_left();
            self.cursor -= 1;
        }
        self.check_cursor();
        echo
    }

    /// Walks the cursor to the end of the line one step at a time.
    pub fn on_end(&mut self) -> Echo {
        let mut echo = Echo::new();
        while self.cursor < self.buffer.len() {
            echo.cursor_right();
            self.cursor += 1;
        }
        self.check_cursor();
        echo
    }

    /// Completes the line.
    ///
    /// Returns the newline echo together with the submitted bytes and leaves
    /// the editor empty for the next line.
    pub fn on_enter(&mut self) -> (Echo, Vec<u8>) {
        let mut echo = Echo::new();
        echo.newline();
        let line = std::mem::take(&mut self.buffer);
        self.cursor = 0;
        trace!(line = %String::from_utf8_lossy(&line), "Line submitted");
        (echo, line)
    }

    /// Replaces the whole line, leaving the cursor at its end.
    ///
    /// Used for history recall. Bytes beyond `max_length` are dropped.
    pub fn replace_line(&mut self, line: &[u8]) -> Echo {
        let mut echo = Echo::new();
        let line = &line[..line.len().min(self.max_length)];
        let old_len = self.buffer.len();

        echo.backspaces(self.cursor);
        echo.extend(line);
        if old_len > line.len() {
            let stale = old_len - line.len();
            for _ in 0..stale {
                echo.push(b' ');
            }
            echo.backspaces(stale);
        }

        self.buffer.clear();
        self.buffer.extend_from_slice(line);
        self.cursor = self.buffer.len();
        self.check_cursor();
        echo
    }

    /// Inserts `text` at the cursor as if each byte had been typed.
    pub fn insert(&mut self, text: &[u8]) -> Echo {
        let mut echo = Echo::new();
        for &byte in text {
            echo.extend(self.on_printable(byte).as_bytes());
        }
        echo
    }

    // Completion and history belong to the line handler; the editor itself
    // neither changes state nor echoes for these keys.

    pub fn on_tab(&mut self) -> Echo {
        Echo::new()
    }

    pub fn on_move_up(&mut self) -> Echo {
        Echo::new()
    }

    pub fn on_move_down(&mut self) -> Echo {
        Echo::new()
    }

    fn check_cursor(&self) {
        debug_assert!(
            self.cursor <= self.buffer.len(),
            "cursor {} outside line of length {}",
            self.cursor,
            self.buffer.len()
        );
    }
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LineEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineEditor")
            .field("line", &self.line())
            .field("cursor", &self.cursor)
            .field("max_length", &self.max_length)
            .finish()
    }
}
