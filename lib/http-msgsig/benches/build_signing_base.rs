use criterion::{criterion_group, criterion_main, Criterion};
use http::{Method, Request, Uri};
use http_msgsig::{component, input};
use std::hint::black_box;

const SIGNATURE_INPUT: &str = r#"("@method" "@path" "@query" "@authority" "digest" "content-type" "content-length");alg="rsa-pss-sha512";created=1618884475;keyid="test-key""#;

fn build_signing_base(c: &mut Criterion) {
    let params = input::parse(SIGNATURE_INPUT).unwrap();
    let request = Request::builder()
        .method(Method::POST)
        .uri(Uri::from_static("https://example.com/foo?param=value&pet=dog"))
        .header("Content-Type", "application/json")
        .header(
            "Digest",
            "id-sha-256=:X48E9qOokqqrvdts8nOJRJN3OWDUoyWxBf7kbu9DBPE=:",
        )
        .header("Content-Length", "18")
        .body(())
        .unwrap();

    c.bench_function("build_signing_base", |b| {
        b.iter(|| {
            component::signing_base(
                black_box(params.components.iter().copied()),
                black_box(SIGNATURE_INPUT),
                black_box(&request),
            )
        });
    });
}

criterion_group!(signing_base, build_signing_base);
criterion_main!(signing_base);
