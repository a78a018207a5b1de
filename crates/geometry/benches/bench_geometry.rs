use std::hint::black_box;
use std::time::Instant;

use roomview_geometry::{build_edges, build_prism, merge_border_mesh};

fn bench_prism(iterations: usize) {
    let start = Instant::now();
    for i in 0..iterations {
        let l = 1.0 + (i % 50) as f32;
        black_box(build_prism(black_box(l), 8.0, 10.0));
    }
    let elapsed = start.elapsed();
    println!(
        "build_prism: {iterations} iterations in {:.2?} ({:.0} ns/iter)",
        elapsed,
        elapsed.as_nanos() as f64 / iterations as f64
    );
}

fn bench_edges(iterations: usize) {
    let start = Instant::now();
    for _ in 0..iterations {
        let prisms = build_edges(black_box(10.0), 8.0, 10.0, 0.05);
        black_box(merge_border_mesh(&prisms));
    }
    let elapsed = start.elapsed();
    println!(
        "build_edges + merge: {iterations} iterations in {:.2?} ({:.0} ns/iter)",
        elapsed,
        elapsed.as_nanos() as f64 / iterations as f64
    );
}

fn main() {
    println!("=== Geometry Benchmarks ===\n");
    bench_prism(100_000);
    bench_edges(10_000);
}
