use criterion::{criterion_group, criterion_main, Criterion};
use http_msgsig::input;
use std::hint::black_box;

const SIGNATURE_INPUT_1: &str = r#"("@method" "@path" "@query" "digest");alg="hmac-sha256";created=1618884475;keyid="test-key""#;
const SIGNATURE_INPUT_2: &str = r#"("@method" "@path" "@query" "@authority" "digest" "content-type" "content-length" "date");alg="rsa-pss-sha512";created=1618884475;expires=1618884775;keyid="https://example.com/users/test#main-key";nonce="b3k2pp5k7z-50gnwp.yemd""#;

fn input1(c: &mut Criterion) {
    c.bench_function("parse_signature_input1", |b| {
        b.iter(|| {
            let _ = black_box(input::parse(black_box(SIGNATURE_INPUT_1)));
        });
    });
}

fn input2(c: &mut Criterion) {
    c.bench_function("parse_signature_input2", |b| {
        b.iter(|| {
            let _ = black_box(input::parse(black_box(SIGNATURE_INPUT_2)));
        });
    });
}

criterion_group!(parse_signature_input, input1, input2);
criterion_main!(parse_signature_input);
