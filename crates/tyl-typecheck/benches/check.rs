//! Checking benchmarks: reading plus checking representative programs.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tyl_syntax::read;
use tyl_typecheck::Checker;

const FACT: &str = "(def fact ((n number)) -> number (if (== n 0) 1 (* n (fact (- n 1)))))";

const CLASSES: &str = r#"
(class Point null
  (begin
    (var x 0)
    (var y 0)
    (def constructor ((self Point) (x number) (y number)) -> Point
      (begin (set (prop self x) x) (set (prop self y) y) self))
    (def calc ((self Point)) -> number (+ (prop self x) (prop self y)))))
(class Point3D Point
  (begin
    (var z 0)
    (def constructor ((self Point3D) (x number) (y number) (z number)) -> Point3D
      (begin ((prop (super Point3D) constructor) self x y) (set (prop self z) z) self))))
(var p (new Point3D 1 2 3))
((prop p calc) p)
"#;

/// A program with `count` independent function declarations.
fn many_functions(count: usize) -> String {
    (0..count)
        .map(|i| format!("(def f{i} ((a number) (b number)) -> number (+ (* a b) {i}))\n"))
        .collect()
}

fn bench_fact(c: &mut Criterion) {
    let program = read(FACT).unwrap();
    c.bench_function("check_fact", |b| {
        b.iter(|| {
            let mut checker = Checker::new();
            black_box(checker.check_program(black_box(&program)).unwrap());
        });
    });
}

fn bench_classes(c: &mut Criterion) {
    let program = read(CLASSES).unwrap();
    c.bench_function("check_classes", |b| {
        b.iter(|| {
            let mut checker = Checker::new();
            black_box(checker.check_program(black_box(&program)).unwrap());
        });
    });
}

fn bench_generic_instances(c: &mut Criterion) {
    let mut checker = Checker::new();
    checker.check_source("(def id <T> ((x T)) -> T x)").unwrap();
    let call = read("(id <number> 5)").unwrap();

    // every call after the first hits the instantiation cache
    c.bench_function("check_generic_cached", |b| {
        b.iter(|| black_box(checker.check_program(black_box(&call)).unwrap()));
    });
}

fn bench_many_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_functions");

    for size in [10, 100, 500].iter() {
        let program = read(&many_functions(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &program, |b, program| {
            b.iter(|| {
                let mut checker = Checker::new();
                black_box(checker.check_program(program).unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_fact,
    bench_classes,
    bench_generic_instances,
    bench_many_functions
);
criterion_main!(benches);
