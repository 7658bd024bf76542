//! Simulation configuration.

use crate::core::constants::DEFAULT_MAP_SIZE;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulation runs to perform
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Square map side length
    pub map_size: usize,

    /// Zero-based indices into the catalog's hero list
    pub party: Vec<usize>,

    /// Movement attempts per run before it is counted as survived
    pub moves_per_run: u32,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per run)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 1000,
            seed: None,
            map_size: DEFAULT_MAP_SIZE,
            party: vec![0, 2, 4],
            moves_per_run: 200,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Quick sanity check: 100 short runs.
    pub fn quick() -> Self {
        Self {
            num_runs: 100,
            moves_per_run: 100,
            ..Default::default()
        }
    }

    /// One hero alone, to compare classes.
    pub fn solo(hero: usize) -> Self {
        Self {
            party: vec![hero],
            ..Default::default()
        }
    }
}
