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

use crate::naws::WindowSize;
use crate::{TelnetOption, TelnetSide};
use bytes::Bytes;

///
/// `TelnetEvent` represents what the decoder found in the inbound stream.
/// Negotiation commands are absorbed by the codec and surface only as
/// `OptionStatus` when an option's state actually changes.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelnetEvent {
    /// Run of data bytes with commands removed and CR LF / CR NUL collapsed
    Data(Bytes),
    /// No Operation
    NoOperation,
    /// End of urgent Data Stream
    DataMark,
    /// Operator pressed the Break key or the Attention key.
    Break,
    /// Interrupt current process.
    InterruptProcess,
    /// Cancel output from the current process.
    AbortOutput,
    /// Request acknowledgment.
    AreYouThere,
    /// Request that the operator erase the previous character.
    EraseCharacter,
    /// Request that the operator erase the previous line.
    EraseLine,
    /// End of input for half-duplex connections.
    GoAhead,
    /// Completed negotiation: (option, side, enabled)
    OptionStatus(TelnetOption, TelnetSide, bool),
    /// Window size reported by the peer through NAWS
    WindowSize(WindowSize),
    /// Subnegotiation payload for an option without a dedicated decoder
    Subnegotiate(TelnetOption, Bytes),
}
