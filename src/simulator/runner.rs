//! Main simulation runner. Every run drives a real [`Session`], so results
//! match what the console game would produce.

use super::autopilot::AutoPilot;
use super::config::SimConfig;
use super::report::{RunStats, SimReport};
use crate::core::config::GameConfig;
use crate::core::error::GameError;
use crate::items::{market, Item};
use crate::map::{generate_map, Direction};
use crate::session::Session;
use crate::templates::TemplateCatalog;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig, catalog: &TemplateCatalog) -> Result<SimReport, GameError> {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(run_idx as u64)),
            None => ChaCha8Rng::from_entropy(),
        };

        let stats = simulate_single_run(config, catalog, &mut rng)?;
        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - Level {}, Encounters {}, Victories {}, Gold {}, {}",
                run_idx + 1,
                config.num_runs,
                stats.final_level,
                stats.encounters,
                stats.victories,
                stats.final_gold,
                if stats.survived { "survived" } else { "defeated" }
            );
        }
        all_runs.push(stats);
    }

    Ok(SimReport::from_runs(all_runs))
}

/// Simulate one party from a fresh map until defeat or the move budget runs out.
pub fn simulate_single_run(
    config: &SimConfig,
    catalog: &TemplateCatalog,
    rng: &mut ChaCha8Rng,
) -> Result<RunStats, GameError> {
    let game_config = GameConfig::with_map_size(config.map_size);
    game_config.validate()?;

    let mut party = catalog.select_party(&config.party, game_config.max_party_size)?;
    if let Some(potion) = catalog.potions.iter().find(|p| p.restores_health()) {
        let potion = Item::Potion(potion.clone());
        for hero in party.iter_mut() {
            // Heroes who cannot afford it simply go without.
            if let Err(error) = market::buy(hero, &potion) {
                debug!(hero = %hero.name, %error, "starting potion not bought");
            }
        }
    }

    let map = generate_map(game_config.map_size, game_config.map_size, &game_config, rng)?;
    let mut session = Session::new(map, party, catalog.clone(), game_config);
    let mut pilot = AutoPilot::new();
    let mut stats = RunStats::default();

    let directions = Direction::all();
    for _ in 0..config.moves_per_run {
        if session.is_over() {
            break;
        }
        let direction = directions[rng.gen_range(0..directions.len())];
        session.on_move(direction, rng, &mut pilot, &mut stats)?;
        stats.moves += 1;
    }

    stats.final_level = session.party().iter().map(|h| h.level).max().unwrap_or(1);
    stats.final_gold = session.party().iter().map(|h| h.gold).sum();
    stats.survived = !session.is_over();
    debug!(
        moves = stats.moves,
        encounters = stats.encounters,
        survived = stats.survived,
        "simulated run finished"
    );
    Ok(stats)
}
