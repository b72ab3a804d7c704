//! Lexer benchmarks.
//!
//! Run with: `cargo bench --package fax-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fax_lex::{Lexer, TokenKind};

fn lexer_token_count(source: &str) -> usize {
    let mut lexer = Lexer::new(source);
    let mut count = 0;
    loop {
        let tok = lexer.next().expect("benchmark source is well-formed");
        if tok.kind == TokenKind::Eof {
            break;
        }
        count += 1;
    }
    count
}

fn bench_lexer_keywords(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let source = "let x = 42; func main() { let y = x + 1; return y; }";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("simple_let", |b| {
        b.iter(|| lexer_token_count(black_box("let x = 42;")))
    });

    group.bench_function("function_with_body", |b| {
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_complex");

    let source = r#"
        module Shapes {
            interface Drawable {
                func draw() -> String;
            }

            class Point {
                let x: Int;
                let y: Int;

                init(x: Int, y: Int) {
                    self.x = x;
                    self.y = y;
                }
            }

            enum Color {
                case Red
                case Green
                case Blue
                case Custom(Int, Int, Int)
            }

            extension Point: Drawable {
                func draw() -> String {
                    return "point";
                }
            }
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("complex_source", |b| {
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_strings");

    group.bench_function("short_string", |b| {
        b.iter(|| lexer_token_count(black_box("let s = \"hello\";")))
    });

    group.bench_function("long_string", |b| {
        let source = "let s = \"This is a longer string that contains some text for benchmarking purposes.\";";
        b.iter(|| {
            lexer_token_count(black_box(source))
        })
    });

    group.finish();
}

fn bench_lexer_numbers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_numbers");

    group.bench_function("integer", |b| {
        b.iter(|| lexer_token_count(black_box("let x = 123456;")))
    });

    group.bench_function("large_integer", |b| {
        b.iter(|| lexer_token_count(black_box("let x = 9223372036854775807;")))
    });

    group.finish();
}

fn bench_lexer_identifiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_identifiers");

    group.bench_function("short_ident", |b| {
        b.iter(|| lexer_token_count(black_box("let x = 42;")))
    });

    group.bench_function("long_ident", |b| {
        b.iter(|| lexer_token_count(black_box("let very_long_variable_name = 42;")))
    });

    group.bench_function("many_ident", |b| {
        b.iter(|| {
            lexer_token_count(black_box(
                "let a = 1; let b = 2; let c = 3; let d = 4; let e = 5;",
            ))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_lexer_keywords,
    bench_lexer_complex,
    bench_lexer_strings,
    bench_lexer_numbers,
    bench_lexer_identifiers
);
criterion_main!(benches);
