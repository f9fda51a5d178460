use std::time::Instant;

use bmssp_core::{dijkstra, generators, Bmssp};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 5 {
        eprintln!("usage: run_one <n> <out_degree> <seed> <mode: baseline|bmssp>");
        std::process::exit(1);
    }
    let n: usize = args[1].parse().expect("n");
    let degree: usize = args[2].parse().expect("out_degree");
    let seed: u64 = args[3].parse().expect("seed");
    let mode = args[4].as_str();

    let g = generators::random(n, degree, 1.0, 4.0, seed).expect("graph");
    let t0 = Instant::now();
    let (dist, summary) = match mode {
        "baseline" => {
            let sp = dijkstra(&g, 0).expect("baseline");
            let s = sp.stats;
            let line = format!(
                "relax={} settled={} heap_pushes={} heap_pops={} heap_max={}",
                s.relaxations, s.settled, s.heap.pushes, s.heap.pops, s.heap.max_size
            );
            (sp.distance, line)
        }
        "bmssp" => {
            let mut solver = Bmssp::from_env(&g, 0).expect("solver");
            let p = solver.params();
            let (dist, s) = solver.run_with_stats();
            let line = format!(
                "k={} t={} relax={} settled={} pulls={} base_cases={} pivot_bailouts={} frames={}",
                p.k, p.t, s.relaxations, s.settled, s.pulls, s.base_cases, s.pivot_bailouts, s.frames
            );
            (dist, line)
        }
        _ => {
            eprintln!("bad mode");
            return;
        }
    };
    let ms = t0.elapsed().as_secs_f64() * 1000.0;
    let reached = dist.iter().filter(|d| d.is_finite()).count();
    println!("mode={mode} n={n} m={} reached={reached} ms={ms:.3} {summary}", g.edge_count());
}
