mod ui;

use legends::build_info;
use legends::core::GameConfig;
use legends::items::Item;
use legends::map::Direction;
use legends::session::Session;
use legends::templates::TemplateCatalog;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use ui::{ConsoleIo, EventPrinter};

type Console = ConsoleIo<std::io::StdinLock<'static>, std::io::Stdout>;

struct Args {
    seed: Option<u64>,
    config: Option<PathBuf>,
    catalog: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            eprintln!("Run 'legends --help' for usage.");
            return ExitCode::FAILURE;
        }
    };

    let config = match &args.config {
        Some(path) => match GameConfig::from_path(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };
    let catalog = match &args.catalog {
        Some(path) => TemplateCatalog::from_path(path),
        None => TemplateCatalog::builtin(),
    };
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Failed to load catalog: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut console = ConsoleIo::stdio();
    let mut printer = EventPrinter::stdout();

    console.say("Welcome to Legends: Monsters and Heroes!");
    loop {
        console.say("");
        console.say("1. Start game");
        console.say("2. How to play");
        console.say("3. Quit");
        match console.prompt_in_range("> ", 1..=3) {
            Some(1) => play(&mut console, &mut printer, &config, &catalog, &mut rng),
            Some(2) => print_how_to_play(&mut console),
            _ => break,
        }
    }
    console.say("Farewell.");
    ExitCode::SUCCESS
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args {
        seed: None,
        config: None,
        catalog: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--version" | "-V" => {
                println!("{}", build_info::version_line());
                std::process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--seed" | "-s" => {
                let value = args.get(i + 1).ok_or("--seed needs a value")?;
                parsed.seed = Some(value.parse().map_err(|_| format!("Bad seed: {}", value))?);
                i += 1;
            }
            "--config" => {
                let value = args.get(i + 1).ok_or("--config needs a path")?;
                parsed.config = Some(PathBuf::from(value));
                i += 1;
            }
            "--catalog" => {
                let value = args.get(i + 1).ok_or("--catalog needs a path")?;
                parsed.catalog = Some(PathBuf::from(value));
                i += 1;
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
        i += 1;
    }
    Ok(parsed)
}

fn print_help() {
    println!("Legends - Monsters and Heroes\n");
    println!("Usage: legends [options]\n");
    println!("Options:");
    println!("  --seed <N>        Reproducible maps and battles");
    println!("  --config <PATH>   Game rules from a JSON file");
    println!("  --catalog <PATH>  Heroes, monsters and items from a JSON file");
    println!("  --version         Show version information");
    println!("  --help            Show this help message");
}

fn print_how_to_play(console: &mut Console) {
    console.say("Lead a party of up to three heroes across the map.");
    console.say("  W/A/S/D  move up/left/down/right");
    console.say("  I        show the party");
    console.say("  M        trade while standing on a market (M)");
    console.say("  Q        quit to the main menu");
    console.say("X tiles cannot be entered. Open land may hide monsters.");
    console.say("Battles are fought in rounds: every hero acts, then every monster.");
    console.say("Win to earn experience and gold; fainted heroes return after a victory.");
}

fn play(
    console: &mut Console,
    printer: &mut EventPrinter<std::io::Stdout>,
    base: &GameConfig,
    catalog: &TemplateCatalog,
    rng: &mut ChaCha8Rng,
) {
    let Some(size) = console.prompt_in_range("Map size (5-15): ", 5..=15) else {
        return;
    };
    let Some(party) = choose_party(console, catalog, base.max_party_size) else {
        return;
    };
    let config = GameConfig {
        map_size: size as usize,
        ..base.clone()
    };

    let mut session = match Session::new_game(config, catalog.clone(), &party, rng) {
        Ok(session) => session,
        Err(e) => {
            console.say_bad(&format!("Could not start the game: {}", e));
            return;
        }
    };

    loop {
        console.say(&session.render());
        let Some(command) = console.prompt("W/A/S/D, I, M, Q > ") else {
            return;
        };
        let key = command.chars().next().map(|c| c.to_ascii_uppercase());
        match key {
            Some('Q') => return,
            Some('I') => {
                for hero in session.party() {
                    console.say(&hero.summary());
                }
            }
            Some('M') => market(console, printer, &mut session),
            Some(c) => match Direction::from_key(c) {
                Some(direction) => {
                    if let Err(e) = session.on_move(direction, rng, console, printer) {
                        console.say_bad(&e.to_string());
                    }
                    if session.is_over() {
                        console.say_bad("GAME OVER");
                        return;
                    }
                }
                None => console.say_bad("Unknown command."),
            },
            None => {}
        }
    }
}

/// Returns zero-based template indices.
fn choose_party(console: &mut Console, catalog: &TemplateCatalog, max: usize) -> Option<Vec<usize>> {
    let max = max.min(catalog.heroes.len());
    let count = console.prompt_in_range(&format!("Party size (1-{}): ", max), 1..=max as i64)?;
    console.say("Heroes:");
    for (i, template) in catalog.heroes.iter().enumerate() {
        console.say(&format!(
            "  {}. {} ({}, MP:{}, Str:{}, Dex:{}, Agi:{}, Gold:{})",
            i + 1,
            template.name,
            template.class.name(),
            template.mana,
            template.strength,
            template.dexterity,
            template.agility,
            template.gold
        ));
    }

    let mut picks = Vec::new();
    while picks.len() < count as usize {
        let n = console.prompt_in_range(
            &format!("Hero #{}: ", picks.len() + 1),
            1..=catalog.heroes.len() as i64,
        )?;
        let index = n as usize - 1;
        if picks.contains(&index) {
            console.say_bad("That hero is already in the party.");
        } else {
            picks.push(index);
        }
    }
    Some(picks)
}

fn market(console: &mut Console, printer: &mut EventPrinter<std::io::Stdout>, session: &mut Session) {
    if let Err(e) = session.can_trade() {
        console.say_bad(&format!("Can't trade here: {}.", e));
        return;
    }

    loop {
        console.say("Market: 1. Buy  2. Sell  0. Leave");
        let action = match console.prompt_in_range("> ", 0..=2) {
            Some(action @ 1..=2) => action,
            _ => return,
        };
        let Some(hero) = choose_hero(console, session) else {
            continue;
        };

        let result = if action == 1 {
            let stock = session.market_stock();
            match choose_item(console, &stock) {
                Some(index) => session.buy(hero, &stock[index], printer).map(|_| ()),
                None => continue,
            }
        } else {
            let inventory = session.party()[hero].inventory.clone();
            if inventory.is_empty() {
                console.say_bad("Nothing to sell.");
                continue;
            }
            match choose_item(console, &inventory) {
                Some(index) => session.sell(hero, index, printer).map(|_| ()),
                None => continue,
            }
        };
        if let Err(e) = result {
            console.say_bad(&format!("Can't do that: {}.", e));
        }
    }
}

fn choose_hero(console: &mut Console, session: &Session) -> Option<usize> {
    let party = session.party();
    if party.len() == 1 {
        return Some(0);
    }
    for (i, hero) in party.iter().enumerate() {
        console.say(&format!("  {}. {}", i + 1, hero.short_stats()));
    }
    match console.prompt_in_range("Which hero (0 to go back)? ", 0..=party.len() as i64)? {
        0 => None,
        n => Some(n as usize - 1),
    }
}

fn choose_item(console: &mut Console, items: &[Item]) -> Option<usize> {
    for (i, item) in items.iter().enumerate() {
        console.say(&format!("  {:>2}. {}", i + 1, item.describe()));
    }
    match console.prompt_in_range("Which item (0 to go back)? ", 0..=items.len() as i64)? {
        0 => None,
        n => Some(n as usize - 1),
    }
}
