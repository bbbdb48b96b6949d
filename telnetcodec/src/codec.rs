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
use crate::options::TelnetOptions;
use crate::{CodecError, TelnetEvent, TelnetFrame, TelnetOption, TelnetSide, consts};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{trace, warn};

/// Server side telnet codec.
///
/// Decoding strips commands out of the inbound stream and yields one
/// [`TelnetEvent::Data`] per contiguous run of data bytes. Negotiation is
/// answered through the option table and the replies are queued until the
/// owner collects them with [`take_responses`](TelnetCodec::take_responses).
///
/// Encoding accepts raw [`Bytes`], escaped as data, and [`TelnetFrame`]s.
pub struct TelnetCodec {
    decoder_state: DecoderState,
    subnegotiation: BytesMut,
    options: TelnetOptions,
    responses: Vec<TelnetFrame>,
    pending_cr: bool,
}

impl TelnetCodec {
    /// Creates a codec with the [`TelnetOptions::server`] option table.
    pub fn new() -> TelnetCodec {
        TelnetCodec::with_options(TelnetOptions::server())
    }

    pub fn with_options(options: TelnetOptions) -> TelnetCodec {
        TelnetCodec {
            decoder_state: DecoderState::NormalData,
            subnegotiation: BytesMut::new(),
            options,
            responses: Vec::new(),
            pending_cr: false,
        }
    }

    pub fn options(&self) -> &TelnetOptions {
        &self.options
    }

    pub fn is_enabled_local(&self, option: TelnetOption) -> bool {
        self.options.is_enabled(option, TelnetSide::Local)
    }

    pub fn is_enabled_remote(&self, option: TelnetOption) -> bool {
        self.options.is_enabled(option, TelnetSide::Remote)
    }

    /// Starts enabling `option` on our side. Returns the `WILL` to send.
    pub fn enable_local(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        self.options.request_enable(option, TelnetSide::Local)
    }

    /// Starts enabling `option` on the peer. Returns the `DO` to send.
    pub fn enable_remote(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        self.options.request_enable(option, TelnetSide::Remote)
    }

    pub fn disable_local(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        self.options.request_disable(option, TelnetSide::Local)
    }

    pub fn disable_remote(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        self.options.request_disable(option, TelnetSide::Remote)
    }

    /// Whether negotiation replies are waiting to be sent
    pub fn has_responses(&self) -> bool {
        !self.responses.is_empty()
    }

    /// Takes the queued negotiation replies in the order they were produced.
    pub fn take_responses(&mut self) -> Vec<TelnetFrame> {
        std::mem::take(&mut self.responses)
    }

    fn negotiate(&mut self, option: u8, side: TelnetSide, enable: bool) -> Option<TelnetEvent> {
        let option = TelnetOption::from_u8(option);
        let outcome = if enable {
            self.options.received_enable(option, side)
        } else {
            self.options.received_disable(option, side)
        };
        trace!(%option, %side, enable, reply = ?outcome.reply, "Negotiation received");
        let replied = outcome.reply.is_some();
        if let Some(reply) = outcome.reply {
            self.responses.push(reply);
        }
        match outcome.changed {
            Some(enabled) => Some(TelnetEvent::OptionStatus(option, side, enabled)),
            // A refusal changes nothing but still has to reach the wire.
            None if replied => Some(TelnetEvent::NoOperation),
            None => None,
        }
    }

    fn finish_subnegotiation(&mut self, option: u8) -> TelnetEvent {
        let payload = self.subnegotiation.split().freeze();
        let option = TelnetOption::from_u8(option);
        match option {
            TelnetOption::NAWS => match WindowSize::decode(&payload) {
                Ok(size) => {
                    trace!(%size, "Window size received");
                    TelnetEvent::WindowSize(size)
                }
                Err(err) => {
                    warn!("Discarding malformed NAWS payload: {}", err);
                    TelnetEvent::NoOperation
                }
            },
            _ => TelnetEvent::Subnegotiate(option, payload),
        }
    }

    fn push_data(&mut self, byte: u8, data: &mut BytesMut) {
        // RFC 854: CR is sent as CR LF or CR NUL; both reach the terminal as one CR.
        if self.pending_cr && (byte == consts::LF || byte == consts::NUL) {
            self.pending_cr = false;
            return;
        }
        self.pending_cr = byte == consts::CR;
        data.put_u8(byte);
    }
}

impl Default for TelnetCodec {
    fn default() -> Self {
        TelnetCodec::new()
    }
}

impl Decoder for TelnetCodec {
    type Item = TelnetEvent;
    type Error = CodecError;

    /// Decodes the next event from `src`.
    ///
    /// Data bytes accumulate until a command starts or the buffer runs dry.
    /// A command that completes returns immediately. Negotiation that
    /// queues a reply always yields an event so the caller flushes it;
    /// negotiation that needs no reply is absorbed and decoding continues. Partial commands
    /// leave their state in the codec and resume on the next call.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<TelnetEvent>, Self::Error> {
        let mut data = BytesMut::new();
        while let Some(&byte) = src.first() {
            if matches!(self.decoder_state, DecoderState::NormalData)
                && byte == consts::IAC
                && !data.is_empty()
            {
                break;
            }
            src.advance(1);

            match (self.decoder_state, byte) {
                (DecoderState::NormalData, consts::IAC) => {
                    self.decoder_state = DecoderState::InterpretAsCommand;
                }
                (DecoderState::NormalData, _) => {
                    self.push_data(byte, &mut data);
                }
                (DecoderState::InterpretAsCommand, consts::IAC) => {
                    self.decoder_state = DecoderState::NormalData;
                    self.push_data(consts::IAC, &mut data);
                }
                (DecoderState::InterpretAsCommand, consts::DO) => {
                    self.decoder_state = DecoderState::Negotiate(TelnetSide::Local, true);
                }
                (DecoderState::InterpretAsCommand, consts::DONT) => {
                    self.decoder_state = DecoderState::Negotiate(TelnetSide::Local, false);
                }
                (DecoderState::InterpretAsCommand, consts::WILL) => {
                    self.decoder_state = DecoderState::Negotiate(TelnetSide::Remote, true);
                }
                (DecoderState::InterpretAsCommand, consts::WONT) => {
                    self.decoder_state = DecoderState::Negotiate(TelnetSide::Remote, false);
                }
                (DecoderState::InterpretAsCommand, consts::SB) => {
                    self.decoder_state = DecoderState::Subnegotiate;
                }
                (DecoderState::InterpretAsCommand, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    let event = match byte {
                        consts::NOP => TelnetEvent::NoOperation,
                        consts::DM => TelnetEvent::DataMark,
                        consts::BRK => TelnetEvent::Break,
                        consts::IP => TelnetEvent::InterruptProcess,
                        consts::AO => TelnetEvent::AbortOutput,
                        consts::AYT => TelnetEvent::AreYouThere,
                        consts::EC => TelnetEvent::EraseCharacter,
                        consts::EL => TelnetEvent::EraseLine,
                        consts::GA => TelnetEvent::GoAhead,
                        _ => {
                            warn!("Received Unknown Command {:#X}", byte);
                            TelnetEvent::NoOperation
                        }
                    };
                    return Ok(Some(event));
                }
                (DecoderState::Negotiate(side, enable), _) => {
                    self.decoder_state = DecoderState::NormalData;
                    if let Some(event) = self.negotiate(byte, side, enable) {
                        return Ok(Some(event));
                    }
                }
                (DecoderState::Subnegotiate, _) => {
                    self.decoder_state = DecoderState::SubnegotiateArgument(byte);
                }
                (DecoderState::SubnegotiateArgument(option), consts::IAC) => {
                    self.decoder_state = DecoderState::SubnegotiateArgumentIAC(option);
                }
                (DecoderState::SubnegotiateArgument(option), _) => {
                    if self.subnegotiation.len() >= consts::MAX_SUBNEGOTIATION_LENGTH {
                        warn!(option, "Subnegotiation payload too long. Aborting");
                        self.subnegotiation.clear();
                        self.decoder_state = DecoderState::SubnegotiateDiscard;
                    } else {
                        self.subnegotiation.put_u8(byte);
                    }
                }
                (DecoderState::SubnegotiateArgumentIAC(option), consts::IAC) => {
                    self.decoder_state = DecoderState::SubnegotiateArgument(option);
                    self.subnegotiation.put_u8(consts::IAC);
                }
                (DecoderState::SubnegotiateArgumentIAC(option), consts::SE) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(self.finish_subnegotiation(option)));
                }
                (DecoderState::SubnegotiateArgumentIAC(_), _) => {
                    self.decoder_state = DecoderState::NormalData;
                    self.subnegotiation.clear();
                    warn!(
                        "Received Unknown or invalid Command during Subnegotiation {:#X}. Aborting",
                        byte
                    );
                    return Ok(Some(TelnetEvent::NoOperation));
                }
                (DecoderState::SubnegotiateDiscard, consts::IAC) => {
                    self.decoder_state = DecoderState::SubnegotiateDiscardIAC;
                }
                (DecoderState::SubnegotiateDiscard, _) => {}
                (DecoderState::SubnegotiateDiscardIAC, consts::SE) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::NoOperation));
                }
                (DecoderState::SubnegotiateDiscardIAC, _) => {
                    self.decoder_state = DecoderState::SubnegotiateDiscard;
                }
            }
        }

        if data.is_empty() {
            Ok(None)
        } else {
            Ok(Some(TelnetEvent::Data(data.freeze())))
        }
    }
}

impl Encoder<Bytes> for TelnetCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        put_escaped(&item, dst);
        Ok(())
    }
}

impl Encoder<&str> for TelnetCodec {
    type Error = CodecError;

    fn encode(&mut self, item: &str, dst: &mut BytesMut) -> Result<(), Self::Error> {
        put_escaped(item.as_bytes(), dst);
        Ok(())
    }
}

impl Encoder<TelnetFrame> for TelnetCodec {
    type Error = CodecError;

    fn encode(&mut self, item: TelnetFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.encoded_len_hint());
        match item {
            TelnetFrame::Data(data) => put_escaped(&data, dst),
            TelnetFrame::NoOperation => dst.put_slice(&[consts::IAC, consts::NOP]),
            TelnetFrame::GoAhead => dst.put_slice(&[consts::IAC, consts::GA]),
            TelnetFrame::Do(option) => dst.put_slice(&[consts::IAC, consts::DO, option.to_u8()]),
            TelnetFrame::Dont(option) => {
                dst.put_slice(&[consts::IAC, consts::DONT, option.to_u8()])
            }
            TelnetFrame::Will(option) => {
                dst.put_slice(&[consts::IAC, consts::WILL, option.to_u8()])
            }
            TelnetFrame::Wont(option) => {
                dst.put_slice(&[consts::IAC, consts::WONT, option.to_u8()])
            }
            TelnetFrame::Subnegotiate(option, payload) => {
                dst.put_slice(&[consts::IAC, consts::SB, option.to_u8()]);
                put_escaped(&payload, dst);
                dst.put_slice(&[consts::IAC, consts::SE]);
            }
        }
        Ok(())
    }
}

fn put_escaped(data: &[u8], dst: &mut BytesMut) {
    dst.reserve(data.len());
    for chunk in data.split_inclusive(|&byte| byte == consts::IAC) {
        dst.put_slice(chunk);
        if chunk.last() == Some(&consts::IAC) {
            dst.put_u8(consts::IAC);
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum DecoderState {
    /// Normal Data
    NormalData,
    /// Received IAC, Next byte is Command
    InterpretAsCommand,
    /// Received DO/DONT (local) or WILL/WONT (remote), Next Byte is the option
    Negotiate(TelnetSide, bool),
    /// Received Subnegotiate Command, Next Byte is the option
    Subnegotiate,
    /// Received Subnegotiate Option, Next Bytes are arguments
    SubnegotiateArgument(u8),
    /// Received IAC during Subnegotiation, Next Byte is command
    SubnegotiateArgumentIAC(u8),
    /// Oversized subnegotiation, skipping to IAC SE
    SubnegotiateDiscard,
    SubnegotiateDiscardIAC,
}
