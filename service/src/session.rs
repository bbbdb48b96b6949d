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

use crate::{Result, SessionConfig, SessionSink};
use bytes::Bytes;
use telshell_keycodec::KeyEventScanner;
use telshell_registry::Token;
use telshell_terminal::{Echo, LineEditor, TerminalSize};
use tracing::debug;

/// Token identifying a live [`Session`] in a [`SessionManager`](crate::SessionManager)
pub type SessionToken = Token<Session>;

/// State of one connected terminal.
///
/// Each session owns its scanner so an escape sequence in progress on one
/// connection never affects another.
pub struct Session {
    pub(crate) token: SessionToken,
    pub(crate) sink: Box<dyn SessionSink>,
    pub(crate) editor: LineEditor,
    pub(crate) scanner: KeyEventScanner,
    pub(crate) window: TerminalSize,
    /// Set once a handler asked to close; further input is ignored.
    pub(crate) closing: bool,
}

impl Session {
    pub(crate) fn new(
        token: SessionToken,
        sink: Box<dyn SessionSink>,
        config: &SessionConfig,
    ) -> Self {
        Self {
            token,
            sink,
            editor: LineEditor::with_max_length(config.max_line_length),
            scanner: KeyEventScanner::new(),
            window: config.default_window,
            closing: false,
        }
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    /// The line currently being edited
    pub fn line(&self) -> &[u8] {
        self.editor.buffer()
    }

    pub fn cursor(&self) -> usize {
        self.editor.cursor()
    }

    pub fn window_size(&self) -> TerminalSize {
        self.window
    }

    /// Whether a handler has closed this session
    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Whether the scanner holds an unfinished escape sequence
    pub fn is_scan_pending(&self) -> bool {
        self.scanner.is_pending()
    }

    /// Sends raw bytes to the remote terminal.
    pub fn send(&self, bytes: impl Into<Bytes>) -> Result<()> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Ok(());
        }
        self.sink.send(bytes)
    }

    /// Hands an echo to the sink in one write. A vanished transport is
    /// logged; its disconnect notification removes the session.
    pub(crate) fn send_echo(&self, echo: Echo) {
        if echo.is_empty() {
            return;
        }
        if let Err(err) = self.sink.send(echo.into_bytes()) {
            debug!(session = %self.token, "Dropping echo: {}", err);
        }
    }

    /// Best effort text write used for welcome, farewell and prompt.
    pub(crate) fn send_text(&self, text: &str) {
        if let Err(err) = self.send(Bytes::copy_from_slice(text.as_bytes())) {
            debug!(session = %self.token, "Dropping output: {}", err);
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token)
            .field("editor", &self.editor)
            .field("window", &self.window)
            .field("closing", &self.closing)
            .finish()
    }
}
