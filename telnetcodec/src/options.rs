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

//! Option negotiation state, a reduced form of the RFC 1143 Q method.
//!
//! Each option has an independent state per side. A request is only sent
//! from a settled state and a received command in a settled state that
//! agrees with it is never answered, so two conforming peers cannot loop.

use crate::{TelnetFrame, TelnetOption, TelnetSide};

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum QState {
    #[default]
    No,
    WantYes,
    Yes,
    WantNo,
}

impl QState {
    fn is_enabled(self) -> bool {
        matches!(self, QState::Yes | QState::WantNo)
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct OptionState {
    local: QState,
    remote: QState,
}

#[derive(Clone, Copy, Debug, Default)]
struct SupportState {
    local: bool,
    remote: bool,
}

/// Outcome of processing one received negotiation command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Negotiated {
    /// Reply to send to the peer, if any
    pub reply: Option<TelnetFrame>,
    /// New enabled state if the command changed it
    pub changed: Option<bool>,
}

/// Per-connection table of option support and negotiation state.
#[derive(Clone, Debug)]
pub struct TelnetOptions {
    support: [SupportState; 256],
    state: [OptionState; 256],
}

impl TelnetOptions {
    /// Table accepting nothing; every request from the peer is refused.
    pub fn none() -> Self {
        TelnetOptions {
            support: [SupportState::default(); 256],
            state: [OptionState::default(); 256],
        }
    }

    /// Table for a line-editing server: we echo and suppress go-ahead, the
    /// peer may report its window size and suppress go-ahead.
    pub fn server() -> Self {
        let mut options = Self::none();
        options.support_local(TelnetOption::Echo);
        options.support_local(TelnetOption::SuppressGoAhead);
        options.support_remote(TelnetOption::NAWS);
        options.support_remote(TelnetOption::SuppressGoAhead);
        options
    }

    pub fn support_local(&mut self, option: TelnetOption) {
        self.support[usize::from(option.to_u8())].local = true;
    }

    pub fn support_remote(&mut self, option: TelnetOption) {
        self.support[usize::from(option.to_u8())].remote = true;
    }

    pub fn is_supported(&self, option: TelnetOption, side: TelnetSide) -> bool {
        let support = self.support[usize::from(option.to_u8())];
        match side {
            TelnetSide::Local => support.local,
            TelnetSide::Remote => support.remote,
        }
    }

    pub fn is_enabled(&self, option: TelnetOption, side: TelnetSide) -> bool {
        self.qstate(option, side).is_enabled()
    }

    pub(crate) fn qstate(&self, option: TelnetOption, side: TelnetSide) -> QState {
        let state = self.state[usize::from(option.to_u8())];
        match side {
            TelnetSide::Local => state.local,
            TelnetSide::Remote => state.remote,
        }
    }

    fn qstate_mut(&mut self, option: TelnetOption, side: TelnetSide) -> &mut QState {
        let state = &mut self.state[usize::from(option.to_u8())];
        match side {
            TelnetSide::Local => &mut state.local,
            TelnetSide::Remote => &mut state.remote,
        }
    }

    /// Asks to enable `option` on `side`. Returns the frame to send, or
    /// `None` when the option is unsupported, enabled, or already requested.
    pub fn request_enable(&mut self, option: TelnetOption, side: TelnetSide) -> Option<TelnetFrame> {
        if !self.is_supported(option, side) {
            return None;
        }
        let state = self.qstate_mut(option, side);
        match *state {
            QState::No => {
                *state = QState::WantYes;
                Some(agree(option, side))
            }
            QState::Yes | QState::WantYes | QState::WantNo => None,
        }
    }

    /// Asks to disable `option` on `side`.
    pub fn request_disable(&mut self, option: TelnetOption, side: TelnetSide) -> Option<TelnetFrame> {
        let state = self.qstate_mut(option, side);
        match *state {
            QState::Yes => {
                *state = QState::WantNo;
                Some(refuse(option, side))
            }
            QState::No | QState::WantYes | QState::WantNo => None,
        }
    }

    /// Processes a peer request to enable (`DO` for local, `WILL` for remote).
    pub fn received_enable(&mut self, option: TelnetOption, side: TelnetSide) -> Negotiated {
        let supported = self.is_supported(option, side);
        let state = self.qstate_mut(option, side);
        let before = state.is_enabled();
        let reply = match *state {
            QState::No if supported => {
                *state = QState::Yes;
                Some(agree(option, side))
            }
            QState::No => Some(refuse(option, side)),
            QState::WantYes => {
                *state = QState::Yes;
                None
            }
            QState::Yes => None,
            // Peer answered our disable with enable; it is in error, settle on No.
            QState::WantNo => {
                *state = QState::No;
                None
            }
        };
        let after = state.is_enabled();
        Negotiated {
            reply,
            changed: (before != after).then_some(after),
        }
    }

    /// Processes a peer request to disable (`DONT` for local, `WONT` for remote).
    pub fn received_disable(&mut self, option: TelnetOption, side: TelnetSide) -> Negotiated {
        let state = self.qstate_mut(option, side);
        let before = state.is_enabled();
        let reply = match *state {
            QState::Yes => {
                *state = QState::No;
                Some(refuse(option, side))
            }
            QState::WantYes | QState::WantNo => {
                *state = QState::No;
                None
            }
            QState::No => None,
        };
        let after = state.is_enabled();
        Negotiated {
            reply,
            changed: (before != after).then_some(after),
        }
    }
}

impl Default for TelnetOptions {
    fn default() -> Self {
        Self::server()
    }
}

fn agree(option: TelnetOption, side: TelnetSide) -> TelnetFrame {
    match side {
        TelnetSide::Local => TelnetFrame::Will(option),
        TelnetSide::Remote => TelnetFrame::Do(option),
    }
}

fn refuse(option: TelnetOption, side: TelnetSide) -> TelnetFrame {
    match side {
        TelnetSide::Local => TelnetFrame::Wont(option),
        TelnetSide::Remote => TelnetFrame::Dont(option),
    }
}
