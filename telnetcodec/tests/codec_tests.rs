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

use bytes::{Bytes, BytesMut};
use telshell_telnetcodec::consts::{self, option};
use telshell_telnetcodec::naws::WindowSize;
use telshell_telnetcodec::{TelnetCodec, TelnetEvent, TelnetFrame, TelnetOption, TelnetSide};
use tokio_util::codec::{Decoder, Encoder};
use tracing_test::traced_test;

fn decode_all(codec: &mut TelnetCodec, buffer: &mut BytesMut) -> Vec<TelnetEvent> {
    let mut events = Vec::new();
    while let Some(event) = codec.decode(buffer).unwrap() {
        events.push(event);
    }
    events
}

fn encode_frames(codec: &mut TelnetCodec, frames: Vec<TelnetFrame>) -> BytesMut {
    let mut buffer = BytesMut::new();
    for frame in frames {
        codec.encode(frame, &mut buffer).unwrap();
    }
    buffer
}

/// Replays a typical client answering the server's opening announcements.
#[test]
fn server_announcement_handshake() {
    let mut server = TelnetCodec::new();
    let announcements: Vec<TelnetFrame> = [
        server.enable_local(TelnetOption::Echo),
        server.enable_local(TelnetOption::SuppressGoAhead),
        server.enable_remote(TelnetOption::NAWS),
    ]
    .into_iter()
    .flatten()
    .collect();
    assert_eq!(announcements.len(), 3);

    let mut wire = encode_frames(&mut server, announcements);
    assert_eq!(
        &wire[..],
        &[
            consts::IAC, consts::WILL, option::ECHO,
            consts::IAC, consts::WILL, option::SGA,
            consts::IAC, consts::DO, option::NAWS,
        ]
    );
    wire.clear();

    // Client: DO ECHO, DO SGA, WILL NAWS, then its window size and a key.
    let mut reply = BytesMut::from(
        &[
            consts::IAC, consts::DO, option::ECHO,
            consts::IAC, consts::DO, option::SGA,
            consts::IAC, consts::WILL, option::NAWS,
            consts::IAC, consts::SB, option::NAWS, 0, 80, 0, 24, consts::IAC, consts::SE,
            b'a',
        ][..],
    );
    let events = decode_all(&mut server, &mut reply);
    assert_eq!(
        events,
        vec![
            TelnetEvent::OptionStatus(TelnetOption::Echo, TelnetSide::Local, true),
            TelnetEvent::OptionStatus(TelnetOption::SuppressGoAhead, TelnetSide::Local, true),
            TelnetEvent::OptionStatus(TelnetOption::NAWS, TelnetSide::Remote, true),
            TelnetEvent::WindowSize(WindowSize::new(80, 24)),
            TelnetEvent::Data(Bytes::from_static(b"a")),
        ]
    );
    assert!(!server.has_responses());
    assert!(server.is_enabled_local(TelnetOption::Echo));
    assert!(server.is_enabled_remote(TelnetOption::NAWS));
}

/// Two codecs answering each other settle without an endless exchange.
#[test]
fn negotiation_terminates_between_codecs() {
    let mut server = TelnetCodec::new();
    let mut client = TelnetCodec::new();

    let mut to_client = BytesMut::new();
    if let Some(frame) = server.enable_local(TelnetOption::Echo) {
        server.encode(frame, &mut to_client).unwrap();
    }

    let mut rounds = 0;
    loop {
        rounds += 1;
        assert!(rounds < 8, "negotiation did not settle");

        decode_all(&mut client, &mut to_client);
        let replies = client.take_responses();
        let mut to_server = encode_frames(&mut client, replies);
        decode_all(&mut server, &mut to_server);
        let responses = server.take_responses();
        if responses.is_empty() {
            break;
        }
        to_client = encode_frames(&mut server, responses);
    }
}

#[test]
fn escaped_output_decodes_back() {
    let mut codec = TelnetCodec::new();
    let mut wire = BytesMut::new();
    codec
        .encode(Bytes::from_static(&[b'x', 0xFF, b'y']), &mut wire)
        .unwrap();
    let events = decode_all(&mut codec, &mut wire);
    assert_eq!(
        events,
        vec![TelnetEvent::Data(Bytes::from_static(&[b'x', 0xFF, b'y']))]
    );
}

#[traced_test]
#[test]
fn unknown_command_is_logged() {
    let mut codec = TelnetCodec::new();
    let mut input = BytesMut::from(&[consts::IAC, 0x10, b'q'][..]);
    let events = decode_all(&mut codec, &mut input);
    assert_eq!(
        events,
        vec![
            TelnetEvent::NoOperation,
            TelnetEvent::Data(Bytes::from_static(b"q"))
        ]
    );
    assert!(logs_contain("Received Unknown Command"));
}

#[traced_test]
#[test]
fn malformed_naws_is_logged_and_dropped() {
    let mut codec = TelnetCodec::new();
    let mut input = BytesMut::from(
        &[consts::IAC, consts::SB, option::NAWS, 0, 80, consts::IAC, consts::SE][..],
    );
    let events = decode_all(&mut codec, &mut input);
    assert_eq!(events, vec![TelnetEvent::NoOperation]);
    assert!(logs_contain("Discarding malformed NAWS payload"));
}
