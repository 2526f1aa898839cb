mod auto;

use anyhow::{Context, Result};
use auto::MemoryBot;
use flip_core::{
    Card, Event, EventBus, KeyValueStore, MemoryStore, RoundConfig, RoundEngine, RoundError,
    RoundPhase,
};
use flip_cui::persistence::{default_state_path, FileStore};
use flip_data::{load_cards, load_round_config};
use serde::Serialize;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const DEFAULT_AUTO_SEED: u64 = 0xF11C_A4D5;
const AUTO_PLAYER: &str = "autoplay";
const MAX_AUTO_TURNS: usize = 1_000;

#[derive(Debug, Clone)]
struct CliOptions {
    auto: bool,
    cui: bool,
    json: bool,
    verbose: bool,
    seed: Option<u64>,
    assets: PathBuf,
    state: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct AutoSummary {
    seed: u64,
    pairs: usize,
    moves: u32,
    hits: u32,
    misses: u32,
    best_score: Option<u32>,
}

fn parse_cli_options(args: &[String]) -> CliOptions {
    let mut options = CliOptions {
        auto: false,
        cui: false,
        json: false,
        verbose: false,
        seed: None,
        assets: PathBuf::from("assets"),
        state: None,
    };
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--auto" => options.auto = true,
            "--cui" => options.cui = true,
            "--json" => options.json = true,
            "--verbose" | "-v" => options.verbose = true,
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    options.seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--assets" => {
                if let Some(value) = args.get(idx + 1) {
                    options.assets = PathBuf::from(value);
                    idx += 1;
                }
            }
            "--state" => {
                if let Some(value) = args.get(idx + 1) {
                    options.state = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    options
}

fn cui_launch_options(options: &CliOptions) -> flip_cui::LaunchOptions {
    flip_cui::LaunchOptions {
        seed: options.seed,
        assets_dir: Some(options.assets.clone()),
        state_path: options.state.clone(),
        log_file: std::env::var_os("FLIP_LOG").map(PathBuf::from),
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args);
    if options.cui {
        if let Err(err) = flip_cui::run(cui_launch_options(&options)) {
            eprintln!("cui launch error: {err:#}");
            std::process::exit(1);
        }
        return;
    }
    init_logger(options.verbose);
    let result = if options.auto {
        run_auto(&options)
    } else {
        run_repl(&options)
    };
    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn load_content(options: &CliOptions) -> Result<(RoundConfig, Result<Vec<Card>>)> {
    let config = load_round_config(&options.assets).context("load round config")?;
    let cards = load_cards(&options.assets, config.per_page)
        .with_context(|| format!("load cards from {}", options.assets.display()));
    Ok((config, cards))
}

fn start_engine(engine: &mut RoundEngine, cards: Result<Vec<Card>>, events: &mut EventBus) {
    match cards {
        Ok(cards) => {
            if let Err(err) = engine.load_deck(cards, events) {
                engine.content_failed(err.to_string(), events);
            }
        }
        Err(err) => engine.content_failed(format!("{err:#}"), events),
    }
}

fn run_auto(options: &CliOptions) -> Result<()> {
    let seed = options.seed.unwrap_or(DEFAULT_AUTO_SEED);
    let (config, cards) = load_content(options)?;
    let mut engine = RoundEngine::new(config, Box::new(MemoryStore::new()), seed);
    let mut events = EventBus::default();
    start_engine(&mut engine, cards, &mut events);
    engine.set_player_name(AUTO_PLAYER, &mut events)?;
    print_events(&mut events, options.json);
    if engine.phase() == RoundPhase::Idle {
        anyhow::bail!("no playable deck");
    }

    let mut bot = MemoryBot::new();
    let mut turns = 0usize;
    while bot.play_turn(&mut engine, &mut events) {
        print_events(&mut events, options.json);
        turns += 1;
        if turns >= MAX_AUTO_TURNS {
            anyhow::bail!("autoplay stalled after {turns} turns");
        }
    }
    print_events(&mut events, options.json);

    let summary = AutoSummary {
        seed: engine.seed(),
        pairs: engine.unique_pairs().len(),
        moves: engine.moves(),
        hits: engine.hits(),
        misses: engine.misses(),
        best_score: engine.best_score(),
    };
    if options.json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!(
            "seed {} | {} pairs | moves {} (hits {}, misses {}) | best {}",
            summary.seed,
            summary.pairs,
            summary.moves,
            summary.hits,
            summary.misses,
            summary
                .best_score
                .map(|best| best.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    }
    Ok(())
}

fn run_repl(options: &CliOptions) -> Result<()> {
    let seed = options.seed.unwrap_or_else(flip_cui::clock_seed);
    let (config, cards) = load_content(options)?;
    let store: Box<dyn KeyValueStore> = match options.state.clone().or_else(default_state_path) {
        Some(path) => {
            let store = FileStore::open(path);
            log::info!("profile stored at {}", store.path().display());
            Box::new(store)
        }
        None => Box::new(MemoryStore::new()),
    };
    let mut engine = RoundEngine::new(config, store, seed);
    let mut events = EventBus::default();
    start_engine(&mut engine, cards, &mut events);
    print_events(&mut events, options.json);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    if engine.needs_player_name() && !prompt_player_name(&mut engine, &mut events, &mut lines)? {
        return Ok(());
    }
    print_events(&mut events, options.json);
    print_help();
    print_board(&engine);

    let mut last_input = Instant::now();
    loop {
        print!("flip> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let now = Instant::now();
        engine.advance(now.duration_since(last_input), &mut events);
        last_input = now;
        print_events(&mut events, options.json);

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();
        match cmd {
            "help" | "h" | "?" => print_help(),
            "quit" | "exit" | "q" => break,
            "show" | "board" | "ls" => print_board(&engine),
            "score" | "s" => print_score(&engine),
            "reveal" | "r" => {
                let Some(position) = args.first().and_then(|raw| raw.parse::<usize>().ok())
                else {
                    println!("usage: reveal <position>");
                    continue;
                };
                report(engine.reveal_card(position, &mut events));
            }
            "wait" | "w" => {
                let elapsed = match args.first() {
                    Some(raw) => match raw.parse::<u64>() {
                        Ok(ms) => Duration::from_millis(ms),
                        Err(_) => {
                            println!("usage: wait [ms]");
                            continue;
                        }
                    },
                    None => engine.time_until_pending().unwrap_or_default(),
                };
                engine.advance(elapsed, &mut events);
            }
            "restart" | "new" => report(engine.restart(&mut events)),
            "name" => {
                if args.is_empty() {
                    println!("usage: name <text>");
                    continue;
                }
                report(engine.set_player_name(&args.join(" "), &mut events));
            }
            _ => println!("unknown command: {cmd} (try help)"),
        }
        print_events(&mut events, options.json);
        if matches!(
            engine.phase(),
            RoundPhase::OneRevealed | RoundPhase::Evaluating | RoundPhase::Mismatch
        ) || matches!(cmd, "restart" | "new")
        {
            print_board(&engine);
        }
    }
    Ok(())
}

/// Returns false when input ends before a name is given.
fn prompt_player_name(
    engine: &mut RoundEngine,
    events: &mut EventBus,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<bool> {
    println!("Type your name");
    loop {
        print!("Please, type your name before playing: ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(false);
        };
        match engine.set_player_name(&line?, events) {
            Ok(()) => return Ok(true),
            Err(RoundError::InvalidName) => continue,
            Err(err) => return Err(err.into()),
        }
    }
}

fn report(result: Result<(), RoundError>) {
    if let Err(err) = result {
        println!("{err}");
    }
}

fn print_events(events: &mut EventBus, json: bool) {
    for event in events.drain() {
        if json {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(err) => log::warn!("event encode failed: {err}"),
            }
            continue;
        }
        if matches!(event, Event::StateChanged { .. }) {
            continue;
        }
        println!("* {}", flip_cui::format_event(&event));
        if let Event::RoundComplete {
            moves,
            best_score,
            player_name,
        } = &event
        {
            println!(
                "Hurray!!! You completed the challenge {}",
                player_name.as_deref().unwrap_or("")
            );
            println!(
                "You completed the game in {moves} moves. Your best score is {best_score} moves."
            );
            println!("type `restart` to play again");
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  help|h|?                 show help");
    println!("  show|board|ls            print the card grid");
    println!("  reveal|r <position>      turn a card face-up");
    println!("  wait|w [ms]              let pending checks run");
    println!("  restart|new              shuffle and start over");
    println!("  name <text>              change player name");
    println!("  score|s                  moves, hits, misses, best");
    println!("  quit|exit|q              exit");
}

fn print_score(engine: &RoundEngine) {
    let score = engine.score();
    println!(
        "player {} | moves {} | hits {} | misses {}",
        engine.player_name().unwrap_or("-"),
        score.moves(),
        score.hits,
        score.misses
    );
    if let Some(best) = engine.best_score() {
        println!("best score {best}");
    }
}

fn print_board(engine: &RoundEngine) {
    let deck = engine.deck();
    if deck.is_empty() {
        println!("(no cards loaded)");
        return;
    }
    println!("phase: {}", engine.phase().label());
    let columns = 8;
    for row in 0..deck.len().div_ceil(columns) {
        let cells: Vec<String> = (row * columns..deck.len().min((row + 1) * columns))
            .map(|position| {
                let label = match engine.face_up(position) {
                    Some(card) if engine.is_cleared(&card.pair_id) => {
                        format!("({})", card.pair_id)
                    }
                    Some(card) => format!("[{}]", card.pair_id),
                    None => "??".to_string(),
                };
                format!("{position:>2}:{label:<12}")
            })
            .collect();
        println!("{}", cells.join(" "));
    }
    for line in face_lines(engine) {
        println!("{line}");
    }
}

/// One line per face-up, uncleared card with the artifact it shows.
fn face_lines(engine: &RoundEngine) -> Vec<String> {
    engine
        .revealed()
        .iter()
        .filter_map(|position| {
            engine
                .face_up(*position)
                .map(|card| format!("  #{position} {}: {}", card.pair_id, card.artifact.as_str()))
        })
        .collect()
}
