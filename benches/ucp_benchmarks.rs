// ABOUTME: Benchmark suite for UCP frame handling and message preparation
// ABOUTME: Measures frame encoding, decoding, checksums, segmentation and GSM conversion

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;
use ucp::charset::{decode_7bit, encode_7bit};
use ucp::codec::{checksum, decode_frame, encode_frame, verify_checksum};
use ucp::datatypes::{MessageType, Operation, Submit, xser};
use ucp::segment::segment;

const SUBMIT_RESPONSE: &[u8] = b"\x0202/00041/R/51/A//09495696599:120917113002/83\x03";

fn sample_submit(text: &str) -> Operation {
    let message_type = MessageType::classify(text);
    let submit = Submit::new(
        "Voyager",
        "09495696599",
        text,
        message_type,
        xser::build("ACME", message_type, 42, 1, 1),
    )
    .unwrap();
    Operation::Submit(Box::new(submit))
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    let submit = sample_submit("Hello world");
    group.bench_function("submit", |b| {
        b.iter(|| encode_frame(black_box("01"), black_box(&submit)))
    });

    group.bench_function("submit_with_conversion", |b| {
        b.iter(|| encode_frame("01", &sample_submit(black_box("Hello world"))))
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    group.bench_function("submit_response", |b| {
        b.iter(|| decode_frame(black_box(SUBMIT_RESPONSE)).unwrap())
    });

    group.bench_function("verify_checksum", |b| {
        b.iter(|| verify_checksum(black_box(SUBMIT_RESPONSE)).unwrap())
    });

    let submit = encode_frame("01", &sample_submit(&"A".repeat(160)));
    group.bench_function("checksum_full_submit", |b| {
        b.iter(|| checksum(black_box(&submit)))
    });

    group.finish();
}

fn bench_message_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_sizes");
    group.measurement_time(Duration::from_secs(10));

    for &size in &[10, 70, 160, 161, 459, 1000] {
        let gsm = "A".repeat(size);
        group.bench_with_input(BenchmarkId::new("segment_gsm", size), &gsm, |b, text| {
            b.iter(|| segment(black_box(text)))
        });

        let ucs2 = "日".repeat(size);
        group.bench_with_input(BenchmarkId::new("segment_ucs2", size), &ucs2, |b, text| {
            b.iter(|| segment(black_box(text)))
        });
    }

    group.finish();
}

fn bench_gsm_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("gsm");
    let text = "Did you ever hear the tragedy of Darth Plagueis The Wise? {€}";

    group.bench_function("encode_7bit", |b| {
        b.iter(|| encode_7bit(black_box(text)).unwrap())
    });

    let septets = encode_7bit(text).unwrap();
    group.bench_function("decode_7bit", |b| b.iter(|| decode_7bit(black_box(&septets))));

    group.finish();
}

criterion_group!(
    benches,
    bench_encode,
    bench_decode,
    bench_message_sizes,
    bench_gsm_conversion
);
criterion_main!(benches);
