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
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use telshell_telnetcodec::TelnetCodec;
use tokio_util::codec::{Decoder, Encoder};

fn bench_decode_data(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_data");

    for size in [16usize, 256, 4096].iter() {
        let input: Vec<u8> = (0..*size).map(|i| b'a' + (i % 26) as u8).collect();
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| {
                let mut codec = TelnetCodec::new();
                let mut src = BytesMut::from(&input[..]);
                while let Some(event) = codec.decode(&mut src).unwrap() {
                    black_box(event);
                }
            });
        });
    }

    group.finish();
}

fn bench_decode_negotiation(c: &mut Criterion) {
    let input: &[u8] = &[
        0xFF, 0xFD, 0x01, 0xFF, 0xFD, 0x03, 0xFF, 0xFB, 0x1F, 0xFF, 0xFA, 0x1F, 0x00, 0x50, 0x00,
        0x18, 0xFF, 0xF0,
    ];
    c.bench_function("decode_negotiation", |b| {
        b.iter(|| {
            let mut codec = TelnetCodec::new();
            let mut src = BytesMut::from(input);
            while let Some(event) = codec.decode(&mut src).unwrap() {
                black_box(event);
            }
            black_box(codec.take_responses());
        });
    });
}

fn bench_encode_escaped(c: &mut Criterion) {
    let payload = Bytes::from(vec![0xFFu8; 1024]);
    c.bench_function("encode_escaped_1k", |b| {
        b.iter(|| {
            let mut codec = TelnetCodec::new();
            let mut dst = BytesMut::new();
            codec.encode(black_box(payload.clone()), &mut dst).unwrap();
            black_box(dst);
        });
    });
}

criterion_group!(
    benches,
    bench_decode_data,
    bench_decode_negotiation,
    bench_encode_escaped
);
criterion_main!(benches);
