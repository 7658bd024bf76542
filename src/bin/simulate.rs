//! Battle balance simulator CLI.
//!
//! Run Monte Carlo simulations of random walks and encounters.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                      # Default: 1000 runs, 3 heroes
//!   cargo run --bin simulate -- -n 100 --size 12  # 100 runs on 12x12 maps
//!   cargo run --bin simulate -- --seed 42         # Reproducible run

use legends::simulator::{run_simulation, SimConfig};
use legends::templates::TemplateCatalog;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let (config, catalog_path, save_json) = parse_args(&args);

    let catalog = match catalog_path {
        Some(path) => TemplateCatalog::from_path(&path),
        None => TemplateCatalog::builtin(),
    };
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Failed to load catalog: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              LEGENDS BATTLE SIMULATOR                         ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Map Size:       {}x{}", config.map_size, config.map_size);
    println!("  Moves per Run:  {}", config.moves_per_run);
    let names: Vec<&str> = config
        .party
        .iter()
        .filter_map(|&i| catalog.heroes.get(i).map(|h| h.name.as_str()))
        .collect();
    println!("  Party:          {}", names.join(", "));
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = match run_simulation(&config, &catalog) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("{}", report.to_text());

    if save_json {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        if let Err(e) = std::fs::write(&filename, report.to_json()) {
            eprintln!("Failed to write JSON report: {}", e);
            return ExitCode::FAILURE;
        }
        println!("JSON report saved to: {}", filename);
    }

    ExitCode::SUCCESS
}

fn parse_args(args: &[String]) -> (SimConfig, Option<PathBuf>, bool) {
    let mut config = SimConfig::default();
    let mut catalog = None;
    let mut save_json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.num_runs = args[i + 1].parse().unwrap_or(1000);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--size" => {
                if i + 1 < args.len() {
                    config.map_size = args[i + 1].parse().unwrap_or(config.map_size);
                    i += 1;
                }
            }
            "-m" | "--moves" => {
                if i + 1 < args.len() {
                    config.moves_per_run = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "-p" | "--party" => {
                if i + 1 < args.len() {
                    // 1-based, comma separated: "1,3,5"
                    let picks: Vec<usize> = args[i + 1]
                        .split(',')
                        .filter_map(|s| s.trim().parse::<usize>().ok())
                        .filter(|&n| n >= 1)
                        .map(|n| n - 1)
                        .collect();
                    if !picks.is_empty() {
                        config.party = picks;
                    }
                    i += 1;
                }
            }
            "--solo" => {
                if i + 1 < args.len() {
                    // 1-based hero number
                    if let Some(n) = args[i + 1].parse::<usize>().ok().filter(|&n| n >= 1) {
                        config = SimConfig {
                            num_runs: config.num_runs,
                            seed: config.seed,
                            verbosity: config.verbosity,
                            ..SimConfig::solo(n - 1)
                        };
                    }
                    i += 1;
                }
            }
            "--catalog" => {
                if i + 1 < args.len() {
                    catalog = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--json" => {
                save_json = true;
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "--quick" => {
                config = SimConfig::quick();
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    (config, catalog, save_json)
}

fn print_help() {
    println!("Legends Battle Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>       Number of simulation runs (default: 1000)");
    println!("    -s, --seed <S>       Random seed for reproducibility");
    println!("    --size <N>           Map side length, 5-15 (default: 8)");
    println!("    -m, --moves <N>      Moves per run (default: 200)");
    println!("    -p, --party <LIST>   Hero numbers, e.g. 1,3,5 (default)");
    println!("    --solo <N>           A single hero, to compare classes");
    println!("    --catalog <PATH>     Load templates from a JSON catalog");
    println!("    -v, --verbose        Print every run");
    println!("    --json               Save JSON report");
    println!("    --quick              Quick test (100 runs, 100 moves)");
    println!("    -h, --help           Show this help");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("simulate")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_args_defaults() {
        let (config, catalog, json) = parse_args(&args(&[]));
        assert_eq!(config.num_runs, 1000);
        assert!(catalog.is_none());
        assert!(!json);
    }

    #[test]
    fn test_parse_args_party_and_seed() {
        let (config, _, json) = parse_args(&args(&["--party", "2,4", "--seed", "7", "--json"]));
        assert_eq!(config.party, vec![1, 3]);
        assert_eq!(config.seed, Some(7));
        assert!(json);
    }

    #[test]
    fn test_parse_args_solo_keeps_run_settings() {
        let (config, _, _) = parse_args(&args(&["-n", "50", "--seed", "3", "--solo", "4"]));
        assert_eq!(config.party, vec![3]);
        assert_eq!(config.num_runs, 50);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.moves_per_run, 200);
    }
}
