//! Parser benchmarks.
//!
//! Run with: `cargo bench --package fax-par`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fax_par::Parser;

fn parse_source(source: &str) {
    let mut parser = Parser::new(source);
    parser.parse_package("bench").expect("benchmark source is well-formed");
}

fn bench_parser_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_simple");

    let source = "let x = 42;";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("let_statement", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_functions");

    let source = r#"
        func main() -> Int {
            let x = 42;
            let y = x + 1;
            return y;
        }

        func fib(n: Int) -> Int {
            if n <= 1 {
                return n;
            }
            return fib(n - 1) + fib(n - 2);
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("functions", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_classes(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_classes");

    let source = r#"
        class Point {
            let x: Int = 0;
            let y: Int = 0;

            init(x: Int, y: Int) {
                self.x = x;
                self.y = y;
            }

            func distance_to(other: Point) -> Int {
                let dx = self.x - other.x;
                let dy = self.y - other.y;
                return dx * dx + dy * dy;
            }
        }

        class Rectangle {
            let width: Int = 0;
            let height: Int = 0;
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("classes_inits", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_enums(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_enums");

    let source = r#"
        enum Color {
            case Red
            case Green
            case Blue
            case Custom(Int, Int, Int)
        }

        enum Option<T> {
            case Some(T)
            case None
        }

        enum Result<T, E> {
            case Ok(T)
            case Err(E)
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("enums", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_control_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_control_flow");

    let source = r#"
        func process(n: Int) -> Int {
            if n < 0 {
                return 0 - 1;
            } else if n == 0 {
                return 0;
            } else {
                switch n {
                case 1: return 1;
                case 2: return 2;
                default:
                    let mut sum = 0;
                    let mut i = 0;
                    while i < n {
                        sum = sum + i;
                        i = i + 1;
                    }
                    return sum;
                }
            }
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("control_flow", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_complex");

    let source = r#"
        interface Drawable {
            func draw() -> String;
            func bounding_box() -> Rectangle;
        }

        class Point {
            let x: Int;
            let y: Int;

            init(x: Int, y: Int) {
                self.x = x;
                self.y = y;
            }
        }

        class Rectangle {
            let x: Int;
            let y: Int;
            let width: Int;
            let height: Int;
        }

        extension Point: Drawable {
            func draw() -> String {
                return "point";
            }

            func bounding_box() -> Rectangle {
                return Rectangle(self.x, self.y, 1, 1);
            }
        }

        func main() -> Int {
            let p = Point(10, 20);
            p.draw();
            0
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("complex_source", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

criterion_group!(
    benches,
    bench_parser_simple,
    bench_parser_functions,
    bench_parser_classes,
    bench_parser_enums,
    bench_parser_control_flow,
    bench_parser_complex
);
criterion_main!(benches);
