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

//! Telnet command and option bytes (RFC 854, RFC 855)

pub const NUL: u8 = 0x00;
pub const LF: u8 = 0x0A;
pub const CR: u8 = 0x0D;

/// End of subnegotiation parameters
pub const SE: u8 = 240;
/// No operation
pub const NOP: u8 = 241;
/// Data mark, the data stream portion of a Synch
pub const DM: u8 = 242;
/// Break
pub const BRK: u8 = 243;
/// Interrupt process
pub const IP: u8 = 244;
/// Abort output
pub const AO: u8 = 245;
/// Are you there
pub const AYT: u8 = 246;
/// Erase character
pub const EC: u8 = 247;
/// Erase line
pub const EL: u8 = 248;
/// Go ahead
pub const GA: u8 = 249;
/// Start of subnegotiation
pub const SB: u8 = 250;
pub const WILL: u8 = 251;
pub const WONT: u8 = 252;
pub const DO: u8 = 253;
pub const DONT: u8 = 254;
/// Interpret as command
pub const IAC: u8 = 255;

/// Option codes
pub mod option {
    pub const BINARY: u8 = 0;
    pub const ECHO: u8 = 1;
    pub const SGA: u8 = 3;
    pub const STATUS: u8 = 5;
    pub const TIMING_MARK: u8 = 6;
    pub const TTYPE: u8 = 24;
    pub const NAWS: u8 = 31;
    pub const TSPEED: u8 = 32;
    pub const LINEMODE: u8 = 34;
}

/// Longest subnegotiation payload the decoder buffers before abandoning it
pub const MAX_SUBNEGOTIATION_LENGTH: usize = 1024;
