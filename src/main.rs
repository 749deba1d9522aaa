//! Benchmark driver: solves a batch of DIMACS instances and writes a CSV
//! report.

use clique_tabu::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

fn main() {
    let mut starts: Option<usize> = None;
    let mut swaps: Option<usize> = None;
    let mut randomization: Option<usize> = None;
    let mut seed: Option<u64> = None;
    let mut minimal = false;
    let mut saturation = false;
    let mut data_dir = PathBuf::from("data");
    let mut report_path = PathBuf::from("clique_tabu.csv");
    let mut instances: Vec<String> = Vec::new();

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--starts" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                starts = Some(v.parse().unwrap_or_else(|_| usage_and_exit(2)));
                i += 2;
            }
            "--swaps" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                swaps = Some(v.parse().unwrap_or_else(|_| usage_and_exit(2)));
                i += 2;
            }
            "--randomization" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                let r: usize = v.parse().unwrap_or_else(|_| usage_and_exit(2));
                if r == 0 {
                    usage_and_exit(2);
                }
                randomization = Some(r);
                i += 2;
            }
            "--seed" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                seed = Some(v.parse().unwrap_or_else(|_| usage_and_exit(2)));
                i += 2;
            }
            "--minimal" => {
                minimal = true;
                i += 1;
            }
            "--saturation" => {
                saturation = true;
                i += 1;
            }
            "--data" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                data_dir = PathBuf::from(v);
                i += 2;
            }
            "--out" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                report_path = PathBuf::from(v);
                i += 2;
            }
            "--help" | "-h" => usage_and_exit(0),
            flag if flag.starts_with("--") => usage_and_exit(2),
            name => {
                instances.push(name.to_string());
                i += 1;
            }
        }
    }

    let mut cfg = if minimal {
        SearchConfig::minimal()
    } else {
        SearchConfig::default()
    };
    if let Some(v) = starts {
        cfg.starts = v;
    }
    if let Some(v) = swaps {
        cfg.max_swaps = v;
    }
    if let Some(v) = randomization {
        cfg.randomization = v;
    }
    cfg.seed = seed;
    if saturation {
        cfg.strategy = ConstructionStrategy::SaturationGuided;
    }

    if instances.is_empty() {
        instances = scan_data_dir(&data_dir);
        if instances.is_empty() {
            eprintln!(
                "No instances given and no *.clq files found in {}.",
                data_dir.display()
            );
            std::process::exit(2);
        }
    }

    let mut report = match std::fs::File::create(&report_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Cannot create {}: {e}", report_path.display());
            std::process::exit(2);
        }
    };
    let _ = writeln!(report, "File; Clique; Time (sec)");

    println!("{:>20}{:>10}{:>15}", "Instance", "Clique", "Time, sec");

    for name in &instances {
        let path = resolve_instance(&data_dir, name);
        let graph = match Graph::parse_dimacs_file(&path) {
            Ok(g) => g,
            Err(e) => {
                eprintln!("{name}: {e}");
                continue;
            }
        };

        let start = Instant::now();
        let result = run_search(&graph, &cfg);
        let seconds = start.elapsed().as_secs_f64();
        let seconds = (seconds * 1000.0).round() / 1000.0;

        if !result.verified {
            println!("*** WARNING: incorrect clique ***");
            let _ = writeln!(report, "*** WARNING: incorrect clique ***");
        }

        let _ = writeln!(report, "{name}; {}; {seconds}", result.size);
        println!("{name:>20}{:>10}{seconds:>15}", result.size);
    }
}

/// Lists `*.clq` files in the data directory, sorted by name.
fn scan_data_dir(dir: &Path) -> Vec<String> {
    let mut names = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".clq") {
                names.push(name);
            }
        }
    }
    names.sort();
    names
}

/// Instance names resolve against the data directory unless they already
/// point at a file.
fn resolve_instance(data_dir: &Path, name: &str) -> PathBuf {
    let direct = PathBuf::from(name);
    if direct.is_file() {
        direct
    } else {
        data_dir.join(name)
    }
}

fn usage_and_exit(code: i32) -> ! {
    eprintln!(
        "Usage:\n  clique-tabu [OPTIONS] [INSTANCE...]\n\nSolves each DIMACS .clq instance with multi-start tabu search and writes\na CSV report. Without explicit instances, every *.clq file in the data\ndirectory is processed in sorted order.\n\nOptions:\n  --starts N          Number of restarts (default: 300)\n  --swaps N           Swap budget per restart (default: 300)\n  --randomization N   Randomized-prefix width of the greedy construction (default: 3)\n  --seed SEED         Deterministic seed (optional; runs are otherwise non-reproducible)\n  --minimal           Simple variant: first-feasible moves, no 1-to-2 swap, no perturbation\n  --saturation        Seed restarts with the DSATUR-guided construction\n  --data DIR          Instance directory (default: data)\n  --out FILE          CSV report path (default: clique_tabu.csv)\n  --help              Show this message\n"
    );
    std::process::exit(code)
}
