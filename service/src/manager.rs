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

//! Session manager
//!
//! Owns every [`Session`] and routes transport notifications to them. All
//! methods are synchronous and expect to be called from a single task, the
//! way [`TelnetServer`](crate::TelnetServer) drives it.

use crate::{
    LineHandler, NoopHandler, Result, ServiceError, Session, SessionConfig, SessionContext,
    SessionSink, SessionToken,
};
use metrics::{counter, gauge};
use telshell_keycodec::{KeyEvent, ScanStatus};
use telshell_registry::HandleRegistry;
use telshell_terminal::TerminalSize;
use tracing::{debug, trace};

/// Registry of sessions plus the line handler they share
pub struct SessionManager {
    config: SessionConfig,
    sessions: HandleRegistry<Session>,
    handler: Box<dyn LineHandler>,
}

impl SessionManager {
    /// Creates a manager whose submitted lines go to [`NoopHandler`]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_handler(config, NoopHandler)
    }

    pub fn with_handler<H>(config: SessionConfig, handler: H) -> Self
    where
        H: LineHandler + 'static,
    {
        Self {
            config,
            sessions: HandleRegistry::new(),
            handler: Box::new(handler),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Registers a new session writing to `sink`
    pub fn new_session(&mut self, sink: Box<dyn SessionSink>) -> SessionToken {
        let config = &self.config;
        let token = self
            .sessions
            .insert_with(|token| Session::new(token, sink, config));
        counter!("telshell.sessions.total").increment(1);
        gauge!("telshell.sessions.active").increment(1.0);
        debug!(session = %token, "Session created");
        token
    }

    /// Destroys the session. `token` is invalid once this returns.
    pub fn delete_session(&mut self, token: SessionToken) -> Result<()> {
        let session = self
            .sessions
            .remove(token)
            .ok_or(ServiceError::InvalidHandle(token))?;
        gauge!("telshell.sessions.active").decrement(1.0);
        debug!(session = %token, "Session deleted");
        drop(session);
        Ok(())
    }

    /// Sends the welcome text
    pub fn on_begin(&mut self, token: SessionToken) -> Result<()> {
        let session = self
            .sessions
            .get(token)
            .ok_or(ServiceError::InvalidHandle(token))?;
        session.send_text(&self.config.welcome);
        Ok(())
    }

    /// Sends the farewell text
    pub fn on_exit(&mut self, token: SessionToken) -> Result<()> {
        let session = self
            .sessions
            .get(token)
            .ok_or(ServiceError::InvalidHandle(token))?;
        session.send_text(&self.config.farewell);
        Ok(())
    }

    /// Feeds a batch of received bytes through the session's scanner and
    /// applies every completed key to its editor, in arrival order.
    pub fn on_receive_bytes(&mut self, token: SessionToken, bytes: &[u8]) -> Result<()> {
        let session = self
            .sessions
            .get_mut(token)
            .ok_or(ServiceError::InvalidHandle(token))?;
        counter!("telshell.bytes.received").increment(bytes.len() as u64);

        for (offset, &byte) in bytes.iter().enumerate() {
            if session.closing {
                trace!(
                    session = %token,
                    discarded = bytes.len() - offset,
                    "Session closing, discarding input"
                );
                break;
            }
            if session.scanner.next(byte) == ScanStatus::Ensure {
                if let Some(event) = session.scanner.result() {
                    dispatch(self.handler.as_mut(), &self.config, session, event);
                }
                session.scanner.start();
            }
        }

        if !self.config.carry_partial_sequences {
            session.scanner.stop();
        }
        Ok(())
    }

    /// Records the window size reported by the terminal
    pub fn on_receive_window_size(
        &mut self,
        token: SessionToken,
        cols: u16,
        rows: u16,
    ) -> Result<()> {
        let session = self.session_mut(token)?;
        session.window = TerminalSize::new(cols, rows);
        debug!(session = %token, window = %session.window, "Window size changed");
        Ok(())
    }

    /// Destroys every remaining session and returns how many there were.
    pub fn shutdown(&mut self) -> usize {
        let drained = self.sessions.drain();
        let count = drained.len();
        for (token, session) in drained {
            trace!(session = %token, "Session destroyed at shutdown");
            drop(session);
        }
        gauge!("telshell.sessions.active").decrement(count as f64);
        debug!(count, "Session manager shut down");
        count
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn contains(&self, token: SessionToken) -> bool {
        self.sessions.contains(token)
    }

    /// Tokens of all live sessions
    pub fn tokens(&self) -> Vec<SessionToken> {
        self.sessions.iter().map(|(token, _)| token).collect()
    }

    pub fn session(&self, token: SessionToken) -> Option<&Session> {
        self.sessions.get(token)
    }

    pub fn line(&self, token: SessionToken) -> Option<&[u8]> {
        self.session(token).map(Session::line)
    }

    pub fn cursor(&self, token: SessionToken) -> Option<usize> {
        self.session(token).map(Session::cursor)
    }

    pub fn window_size(&self, token: SessionToken) -> Option<TerminalSize> {
        self.session(token).map(Session::window_size)
    }

    fn session_mut(&mut self, token: SessionToken) -> Result<&mut Session> {
        self.sessions
            .get_mut(token)
            .ok_or(ServiceError::InvalidHandle(token))
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("sessions", &self.sessions.len())
            .field("config", &self.config)
            .finish()
    }
}

fn dispatch(
    handler: &mut dyn LineHandler,
    config: &SessionConfig,
    session: &mut Session,
    event: KeyEvent,
) {
    trace!(session = %session.token, ?event, "Key event");
    let echo = match event {
        KeyEvent::Printable(byte) => session.editor.on_printable(byte),
        KeyEvent::Backspace => session.editor.on_backspace(),
        KeyEvent::MoveLeft => session.editor.on_move_left(),
        KeyEvent::MoveRight => session.editor.on_move_right(),
        KeyEvent::Home => session.editor.on_home(),
        KeyEvent::End => session.editor.on_end(),
        KeyEvent::Enter => {
            let (echo, line) = session.editor.on_enter();
            session.send_echo(echo);
            let mut ctx = SessionContext::new(session);
            handler.on_line(&mut ctx, &line);
            if !ctx.is_closing() {
                session.send_text(&config.prompt);
            }
            return;
        }
        KeyEvent::Tab => {
            let echo = session.editor.on_tab();
            session.send_echo(echo);
            handler.on_tab(&mut SessionContext::new(session));
            return;
        }
        KeyEvent::MoveUp => {
            let echo = session.editor.on_move_up();
            session.send_echo(echo);
            handler.on_history_up(&mut SessionContext::new(session));
            return;
        }
        KeyEvent::MoveDown => {
            let echo = session.editor.on_move_down();
            session.send_echo(echo);
            handler.on_history_down(&mut SessionContext::new(session));
            return;
        }
        KeyEvent::Unrecognized => return,
    };
    session.send_echo(echo);
}
