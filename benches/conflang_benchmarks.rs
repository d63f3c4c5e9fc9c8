use conflang::{lexer::Lexer, parse, parser::recognize, resolver::resolve};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// ============================================================================
// Test Data
// ============================================================================

const TINY_CONF: &str = "struct { value = 42 }";

const SMALL_CONF: &str = "
port is 8080;
struct {
    name = 'test',
    ratio = 0.5,
    port = #(port)
}";

const MEDIUM_CONF: &str = "
max_conn is 1000;
timeout is 30;
region is 'eu_west';
retry is struct { attempts = 3, backoff = 1.5 };

struct {
    server = struct {
        host = 'localhost',
        port = 8080,
        limits = struct {
            max = #(max_conn),
            timeout = #(timeout)
        },
        retry = #(retry)
    },
    worker = struct {
        region = #(region),
        retry = #(retry),
        queue = 'jobs'
    }
}";

/// `count` constants, each folded into its own field of one structure.
fn generate_wide_conf(count: usize) -> String {
    let mut source = String::new();
    for i in 0..count {
        let name = field_name(i);
        source.push_str(&format!("{name} is {i};\n"));
    }
    source.push_str("struct {\n");
    for i in 0..count {
        let name = field_name(i);
        if i > 0 {
            source.push_str(",\n");
        }
        source.push_str(&format!("    {name} = struct {{ value = #({name}), label = '{name}' }}"));
    }
    source.push_str("\n}\n");
    source
}

/// Identifiers cannot contain digits, so encode the index in letters.
fn field_name(mut index: usize) -> String {
    let mut name = String::from("f_");
    loop {
        name.push((b'a' + (index % 26) as u8) as char);
        index /= 26;
        if index == 0 {
            break name;
        }
    }
}

// ============================================================================
// Lexer Benchmarks
// ============================================================================

fn bench_lexer_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_by_size");

    for (name, source) in [("tiny", TINY_CONF), ("small", SMALL_CONF), ("medium", MEDIUM_CONF)] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, src| {
            b.iter(|| Lexer::new(black_box(src)).lex())
        });
    }

    group.finish();
}

// ============================================================================
// Recognizer / Resolver Benchmarks
// ============================================================================

fn bench_recognize_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("recognize_scaling");

    for size in [10, 100, 1000] {
        let source = generate_wide_conf(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, src| {
            b.iter(|| recognize(black_box(src)))
        });
    }

    group.finish();
}

fn bench_resolve_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_scaling");

    for size in [10, 100, 1000] {
        let program = recognize(&generate_wide_conf(size)).unwrap();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &program, |b, prog| {
            b.iter(|| resolve(black_box(prog.clone())))
        });
    }

    group.finish();
}

// ============================================================================
// End-to-End Benchmarks
// ============================================================================

fn bench_e2e(c: &mut Criterion) {
    let mut group = c.benchmark_group("e2e_parse");

    for (name, source) in [("tiny", TINY_CONF), ("small", SMALL_CONF), ("medium", MEDIUM_CONF)] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, src| {
            b.iter(|| parse(black_box(src)))
        });
    }

    group.finish();
}

fn bench_e2e_with_yaml(c: &mut Criterion) {
    c.bench_function("e2e_medium_to_yaml", |b| {
        b.iter(|| parse(black_box(MEDIUM_CONF)).unwrap().to_yaml())
    });
}

criterion_group!(lexer_benches, bench_lexer_sizes);

criterion_group!(pipeline_benches, bench_recognize_scaling, bench_resolve_scaling);

criterion_group!(e2e_benches, bench_e2e, bench_e2e_with_yaml);

criterion_main!(lexer_benches, pipeline_benches, e2e_benches);
