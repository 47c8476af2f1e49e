use axum::http::{header, HeaderMap, HeaderValue};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use tutorit::auth::{Authenticator, RequestGate, Role, TokenCodec};

fn bench_issue(c: &mut Criterion) {
    let codec = TokenCodec::generate();

    c.bench_function("token_issue", |b| {
        b.iter(|| codec.issue(black_box("bench@example.com"), Role::Tutor))
    });
}

fn bench_verify(c: &mut Criterion) {
    let codec = TokenCodec::generate();
    let token = codec.issue("bench@example.com", Role::Tutor).unwrap();

    c.bench_function("token_verify", |b| b.iter(|| codec.verify(black_box(&token))));

    c.bench_function("token_verify_malformed", |b| {
        b.iter(|| codec.verify(black_box("not.a.token")))
    });
}

fn bench_gate(c: &mut Criterion) {
    let codec = TokenCodec::generate();
    let token = codec.issue("bench@example.com", Role::Student).unwrap();
    let gate = RequestGate::new(Authenticator::new(codec), ["/api/auth"]);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        HeaderValue::from_str(&format!("theme=dark; jwt={}", token)).unwrap(),
    );

    c.bench_function("gate_protected_with_cookie", |b| {
        b.iter(|| gate.evaluate(black_box("/api/tutors"), black_box(&headers)))
    });

    let empty = HeaderMap::new();
    c.bench_function("gate_exempt", |b| {
        b.iter(|| gate.evaluate(black_box("/api/auth/login"), black_box(&empty)))
    });
}

criterion_group!(benches, bench_issue, bench_verify, bench_gate);
criterion_main!(benches);
