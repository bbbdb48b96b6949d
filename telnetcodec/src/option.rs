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

use crate::consts::option;
use std::fmt;

/// Telnet options known by name. Every other code is carried as `Unknown`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum TelnetOption {
    /// Binary Transmission (RFC 856)
    TransmitBinary,
    /// Echo (RFC 857)
    Echo,
    /// Suppress Go Ahead (RFC 858)
    SuppressGoAhead,
    /// Status (RFC 859)
    Status,
    /// Timing Mark (RFC 860)
    TimingMark,
    /// Terminal Type (RFC 1091)
    TerminalType,
    /// Negotiate About Window Size (RFC 1073)
    NAWS,
    /// Terminal Speed (RFC 1079)
    TerminalSpeed,
    /// Line Mode (RFC 1184)
    LineMode,
    /// Any other option code
    Unknown(u8),
}

impl TelnetOption {
    pub fn to_u8(self) -> u8 {
        match self {
            TelnetOption::TransmitBinary => option::BINARY,
            TelnetOption::Echo => option::ECHO,
            TelnetOption::SuppressGoAhead => option::SGA,
            TelnetOption::Status => option::STATUS,
            TelnetOption::TimingMark => option::TIMING_MARK,
            TelnetOption::TerminalType => option::TTYPE,
            TelnetOption::NAWS => option::NAWS,
            TelnetOption::TerminalSpeed => option::TSPEED,
            TelnetOption::LineMode => option::LINEMODE,
            TelnetOption::Unknown(code) => code,
        }
    }

    pub fn from_u8(byte: u8) -> Self {
        match byte {
            option::BINARY => TelnetOption::TransmitBinary,
            option::ECHO => TelnetOption::Echo,
            option::SGA => TelnetOption::SuppressGoAhead,
            option::STATUS => TelnetOption::Status,
            option::TIMING_MARK => TelnetOption::TimingMark,
            option::TTYPE => TelnetOption::TerminalType,
            option::NAWS => TelnetOption::NAWS,
            option::TSPEED => TelnetOption::TerminalSpeed,
            option::LINEMODE => TelnetOption::LineMode,
            code => TelnetOption::Unknown(code),
        }
    }
}

impl fmt::Display for TelnetOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelnetOption::TransmitBinary => write!(f, "TransmitBinary"),
            TelnetOption::Echo => write!(f, "Echo"),
            TelnetOption::SuppressGoAhead => write!(f, "SuppressGoAhead"),
            TelnetOption::Status => write!(f, "Status"),
            TelnetOption::TimingMark => write!(f, "TimingMark"),
            TelnetOption::TerminalType => write!(f, "TerminalType"),
            TelnetOption::NAWS => write!(f, "NAWS"),
            TelnetOption::TerminalSpeed => write!(f, "TerminalSpeed"),
            TelnetOption::LineMode => write!(f, "LineMode"),
            TelnetOption::Unknown(code) => write!(f, "Unknown({})", code),
        }
    }
}

impl From<u8> for TelnetOption {
    fn from(byte: u8) -> Self {
        TelnetOption::from_u8(byte)
    }
}

impl From<TelnetOption> for u8 {
    fn from(option: TelnetOption) -> Self {
        option.to_u8()
    }
}

/// Which end of the connection an option applies to.
///
/// `Local` options are performed by this side (we send WILL), `Remote`
/// options by the peer (we send DO).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TelnetSide {
    Local,
    Remote,
}

impl fmt::Display for TelnetSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelnetSide::Local => write!(f, "Local"),
            TelnetSide::Remote => write!(f, "Remote"),
        }
    }
}
