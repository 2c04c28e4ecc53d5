//! Parser benchmarks.
//! Run with: `cargo bench --package faxc-par`

use std::cell::RefCell;
use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use faxc_par::Parser;
use faxc_util::{Handler, PrecedenceTable};

fn parse_source(source: &str) -> usize {
    let precedence = Rc::new(RefCell::new(PrecedenceTable::new()));
    let mut handler = Handler::new();
    let functions = Parser::parse_source(source, precedence, &mut handler);
    functions.len()
}

fn bench_parser_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_simple");

    let source = "1 + 2 * 3 - 4 / 5";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("arithmetic_expr", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_functions");

    let source = "fn fib(n) if n < 2 then n else fib(n - 1) + fib(n - 2)\nfib(10)";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("recursive_function", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_user_operator(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_user_operator");

    let source = "fn binary: 1 (x y) 0\nfn unary!(x) 0\n1 : 2 + 3";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("binary_and_unary_decls", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_recovery(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_recovery");

    let source = ")) ; fn ok() 1 ; )) ; fn also_ok() 2";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("malformed_items", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

criterion_group!(
    benches,
    bench_parser_simple,
    bench_parser_functions,
    bench_parser_user_operator,
    bench_parser_recovery
);
criterion_main!(benches);
