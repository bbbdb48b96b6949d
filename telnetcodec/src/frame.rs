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

use crate::TelnetOption;
use bytes::Bytes;

/// Wire-level unit written by the encoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelnetFrame {
    /// Data bytes, IAC escaped on the wire
    Data(Bytes),
    /// No Operation
    NoOperation,
    /// Go Ahead
    GoAhead,
    /// Request the peer to enable an option on its side
    Do(TelnetOption),
    /// Request the peer to disable an option on its side
    Dont(TelnetOption),
    /// Offer to enable an option on our side
    Will(TelnetOption),
    /// Refuse or disable an option on our side
    Wont(TelnetOption),
    /// Subnegotiation payload, IAC escaped on the wire
    Subnegotiate(TelnetOption, Bytes),
}

impl TelnetFrame {
    /// Upper bound of the encoded length, used to reserve buffer space.
    pub fn encoded_len_hint(&self) -> usize {
        match self {
            TelnetFrame::Data(data) => data.len() * 2,
            TelnetFrame::NoOperation | TelnetFrame::GoAhead => 2,
            TelnetFrame::Do(_)
            | TelnetFrame::Dont(_)
            | TelnetFrame::Will(_)
            | TelnetFrame::Wont(_) => 3,
            TelnetFrame::Subnegotiate(_, payload) => 5 + payload.len() * 2,
        }
    }
}
