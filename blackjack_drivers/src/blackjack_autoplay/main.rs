mod session;

use blackjack::RoundEngine;
use blackjack_drivers::{parse_config_from_file, Config, ConfigError};
use clap::Parser;
use session::TableLog;
use std::process;

const DEFAULT_CONFIG_PATH: &str = "~/.blackjack.yml";

#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,

    /// Number of rounds to play, overriding the config file
    #[arg(short, long)]
    rounds: Option<u32>,

    /// Shuffle seed, overriding the config file
    #[arg(short, long)]
    seed: Option<u64>,
}

/// Loads the config. A missing file at the default location means default settings.
fn load_config(path: &str) -> Result<Config, ConfigError> {
    if path != DEFAULT_CONFIG_PATH {
        return parse_config_from_file(path);
    }
    match home::home_dir().map(|dir| dir.join(".blackjack.yml")) {
        Some(file) if file.is_file() => parse_config_from_file(&file.to_string_lossy()),
        _ => {
            log::info!("No config at {}, using defaults", DEFAULT_CONFIG_PATH);
            Ok(Config::default())
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CommandLineArgs::parse();

    let mut config = match load_config(&args.config) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{}", err);
            process::exit(1);
        }
    };
    if args.seed.is_some() {
        config.table.seed = args.seed;
    }
    let rounds = args.rounds.unwrap_or(config.autoplay.rounds);
    // Already validated while parsing.
    let fixed_decision = config.autoplay.fixed_decision().unwrap_or_default();

    let mut engine = RoundEngine::with_handler(config.table, TableLog::default());
    if let Err(err) = session::play(&mut engine, &config.autoplay, fixed_decision, rounds) {
        log::error!("Round aborted: {}", err);
        process::exit(1);
    }

    let log = engine.handler();
    let stats = engine.stats();
    let level = engine.progression().level();
    println!("Rounds played: {}", log.rounds);
    println!(
        "Wins / losses / pushes: {} / {} / {}",
        stats.wins, stats.losses, stats.pushes
    );
    println!("Splits: {}, doubles: {}", log.splits, log.doubles);
    println!("Best win: {}", stats.best_win);
    println!("Bankroll: {} ({:+})", engine.bankroll(), log.net);
    println!(
        "Level {} {} ({} XP)",
        level.level,
        level.rank,
        engine.progression().total_xp()
    );
}
