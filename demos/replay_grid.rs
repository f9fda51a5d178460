//! Records every observer frame of a BMSSP run on a unit grid and writes
//! them as a JSON array, one object per frame.

use std::fs::File;
use std::io::BufWriter;

use bmssp_core::{dijkstra_observed, generators, Bmssp, Recorder};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("usage: replay_grid <side> <out.json> [--baseline]");
        std::process::exit(1);
    }
    let side: usize = args[1].parse().expect("side");
    let out_path = &args[2];
    let baseline = args.iter().any(|a| a == "--baseline");

    let g = generators::grid(side, side, 1.0).expect("grid");
    let mut rec = Recorder::new();
    if baseline {
        dijkstra_observed(&g, 0, &mut rec).expect("baseline");
    } else {
        Bmssp::new(&g, 0).expect("solver").with_observer(&mut rec).run();
    }

    let out = BufWriter::new(File::create(out_path).expect("create out"));
    rec.write_json(out).expect("write frames");
    eprintln!("wrote {} frames to {out_path}", rec.frames().len());
}
