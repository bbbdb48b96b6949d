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

//! Collaborator receiving completed lines and editor hooks

use crate::{Result, Session, SessionToken};
use bytes::Bytes;
use telshell_terminal::TerminalSize;

/// Receives submitted lines and the keys the editor leaves to its owner.
///
/// Every callback runs on the task that owns the
/// [`SessionManager`](crate::SessionManager), after the editor has applied
/// the key and queued its echo.
pub trait LineHandler: Send {
    /// A line was submitted with Enter. The prompt follows unless the
    /// handler closed the session.
    fn on_line(&mut self, ctx: &mut SessionContext<'_>, line: &[u8]);

    /// Tab was pressed
    fn on_tab(&mut self, _ctx: &mut SessionContext<'_>) {}

    /// Up arrow was pressed
    fn on_history_up(&mut self, _ctx: &mut SessionContext<'_>) {}

    /// Down arrow was pressed
    fn on_history_down(&mut self, _ctx: &mut SessionContext<'_>) {}
}

/// Handler that accepts lines and does nothing with them
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandler;

impl LineHandler for NoopHandler {
    fn on_line(&mut self, _ctx: &mut SessionContext<'_>, _line: &[u8]) {}
}

/// Access to the session a callback was raised for
pub struct SessionContext<'a> {
    session: &'a mut Session,
}

impl<'a> SessionContext<'a> {
    pub(crate) fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    pub fn token(&self) -> SessionToken {
        self.session.token
    }

    pub fn window_size(&self) -> TerminalSize {
        self.session.window
    }

    /// The line being edited (empty inside [`LineHandler::on_line`])
    pub fn line(&self) -> &[u8] {
        self.session.editor.buffer()
    }

    pub fn cursor(&self) -> usize {
        self.session.editor.cursor()
    }

    /// Writes raw bytes to the terminal
    pub fn send(&mut self, bytes: impl Into<Bytes>) -> Result<()> {
        self.session.send(bytes)
    }

    /// Replaces the line being edited and redraws it
    pub fn replace_line(&mut self, line: &[u8]) {
        let echo = self.session.editor.replace_line(line);
        self.session.send_echo(echo);
    }

    /// Inserts text at the cursor and redraws the tail
    pub fn insert(&mut self, text: &[u8]) {
        let echo = self.session.editor.insert(text);
        self.session.send_echo(echo);
    }

    /// Asks the transport to close the connection. Input still queued for
    /// the session is discarded and the session is removed once the
    /// transport reports the disconnect.
    pub fn close(&mut self) -> Result<()> {
        self.session.closing = true;
        self.session.sink.close()
    }

    pub(crate) fn is_closing(&self) -> bool {
        self.session.closing
    }
}
