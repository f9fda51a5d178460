use std::fs::File;
use std::io::Write;
use std::time::Instant;

use bmssp_core::{dijkstra, generators, Bmssp};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn run_one(n: usize, degree: usize, seed: u64) -> serde_json::Value {
    let g = generators::random(n, degree, 1.0, 5.0, seed).expect("graph");
    let source = generators::sample_sources(&g, 1, seed).first().copied().unwrap_or(0);

    let t0 = Instant::now();
    let base = dijkstra(&g, source).expect("baseline");
    let dt_base = t0.elapsed().as_secs_f64() * 1000.0;

    let mut solver = Bmssp::from_env(&g, source).expect("solver");
    let params = solver.params();
    let t1 = Instant::now();
    let (dist, stats) = solver.run_with_stats();
    let dt_bmssp = t1.elapsed().as_secs_f64() * 1000.0;

    for (i, (a, b)) in base.distance.iter().zip(&dist).enumerate() {
        assert!(a == b || (a - b).abs() < 1e-9, "parity fail at {i}: {a} vs {b}");
    }
    json!({
        "n": n,
        "m": g.edge_count(),
        "out_degree": degree,
        "source": source,
        "k": params.k,
        "t": params.t,
        "baseline_ms": dt_base,
        "bmssp_ms": dt_bmssp,
        "speedup": dt_base / dt_bmssp.max(1e-9),
        "baseline": base.stats,
        "bmssp": stats,
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help") {
        eprintln!("Usage: bench_bmssp --sizes 10000,20000 --degrees 2,4,8 --seed 42 --out benchmarks/bmssp.json");
        return;
    }
    let arg = |name: &str| args.iter().position(|a| a == name).and_then(|i| args.get(i + 1)).cloned();
    let sizes: Vec<usize> = arg("--sizes")
        .unwrap_or_else(|| "10000,20000".into())
        .split(',')
        .filter_map(|s| s.parse().ok())
        .collect();
    let degrees: Vec<usize> = arg("--degrees")
        .unwrap_or_else(|| "4".into())
        .split(',')
        .filter_map(|s| s.parse().ok())
        .collect();
    let seed: u64 = arg("--seed").and_then(|v| v.parse().ok()).unwrap_or(42);
    let out_path = arg("--out").unwrap_or_else(|| "benchmarks/bmssp.json".into());

    let mut results = Vec::new();
    for &n in &sizes {
        for &d in &degrees {
            results.push(run_one(n, d, seed));
        }
    }
    if let Some(dir) = std::path::Path::new(&out_path).parent() {
        std::fs::create_dir_all(dir).ok();
    }
    let mut f = File::create(&out_path).expect("create out");
    let json = serde_json::to_string_pretty(&results).expect("serialise");
    f.write_all(json.as_bytes()).expect("write");
    eprintln!("wrote {out_path}");
}
