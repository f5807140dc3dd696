use blueprint_parser::{parse, Lexer};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn module_file(modules: usize) -> String {
    let mut source = String::from("COMMON_CFLAGS = [\"-Wall\", \"-Werror\"]\n\n");
    for i in 0..modules {
        source.push_str(&format!(
            r#"cc_library {{
    name: "lib{i}",
    srcs: ["a{i}.cpp", "b{i}.cpp"],
    cflags: COMMON_CFLAGS + ["-DLIB{i}"],
    shared_libs: [":lib{prev}"],
    target: {{
        android: {{ enabled: true }},
        host: {{ enabled: false }},
    }},
    version: {i},
}}

"#,
            prev = i.saturating_sub(1),
        ));
    }
    source
}

fn bench_lexer(c: &mut Criterion) {
    let mut group = c.benchmark_group("lex");

    for modules in [1, 10, 100, 1000] {
        let source = module_file(modules);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("modules", modules), &source, |b, source| {
            b.iter(|| Lexer::new(black_box(source)).tokenize());
        });
    }

    group.finish();
}

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for modules in [1, 10, 100, 1000] {
        let source = module_file(modules);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("modules", modules), &source, |b, source| {
            b.iter(|| parse(black_box(source)));
        });
    }

    group.finish();
}

fn bench_recovery(c: &mut Criterion) {
    // Every module is missing a separator and a closing bracket
    let source = "m { a = [1 2, b = \"x\" c = 3 }\n".repeat(500);

    c.bench_function("parse_broken", |b| {
        b.iter(|| parse(black_box(&source)));
    });
}

fn bench_deep_nesting(c: &mut Criterion) {
    let mut group = c.benchmark_group("nesting");

    for depth in [8, 32, 64] {
        let source = format!("m {{ a = {}{} }}", "{ b = ".repeat(depth), "} ".repeat(depth));
        group.bench_with_input(BenchmarkId::new("objects", depth), &source, |b, source| {
            b.iter(|| parse(black_box(source)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lexer, bench_parser, bench_recovery, bench_deep_nesting);
criterion_main!(benches);
