//! Tile Tapper entry point
//!
//! Headless runner: drives the engine at a fixed tick with the autoplay bot,
//! then records the final score on the local leaderboard.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;

use tile_tapper::consts::SIM_DT;
use tile_tapper::highscores::{TOP_SCORES_LIMIT, format_date};
use tile_tapper::sim::{Autoplay, FixedStep, GameEngine, TickInput, tick};
use tile_tapper::{DeviceFeedback, LocalScoreStore, ScoreStore, Settings, Tuning, now_millis};

/// Tile Tapper: tap the lowest tile before it falls off the screen
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// RNG seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Play area height in pixels
    #[arg(long, default_value_t = 1600.0)]
    height: f32,

    /// Chance (0-1) that the bot taps the wrong column
    #[arg(long, default_value_t = 0.002)]
    miss_chance: f32,

    /// Stop after this many ticks even if the game is still running
    #[arg(long, default_value_t = 36_000)]
    max_ticks: u32,

    /// Run at 60 Hz wall-clock instead of as fast as possible
    #[arg(long)]
    realtime: bool,

    /// JSON file overriding engine tuning
    #[arg(long, value_name = "PATH")]
    tuning: Option<PathBuf>,

    /// Leaderboard file
    #[arg(long, value_name = "PATH", default_value = "tile_tapper_scores.json")]
    scores: PathBuf,

    /// Name recorded with the score
    #[arg(long, default_value = "")]
    name: String,

    /// Skip the leaderboard entirely
    #[arg(long)]
    no_save: bool,

    /// Disable vibration feedback
    #[arg(long)]
    no_vibration: bool,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let tuning = match &cli.tuning {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading tuning file {}", path.display()))?;
            Tuning::from_json(&json).context("invalid tuning file")?
        }
        None => Tuning::default(),
    };

    let settings = Settings {
        vibration_enabled: !cli.no_vibration,
        player_name: cli.name.clone(),
        ..Default::default()
    };

    let seed = cli.seed.unwrap_or_else(|| now_millis() as u64);
    let feedback = DeviceFeedback::from_settings(&settings);
    let mut engine = GameEngine::with_tuning(tuning, seed, feedback)?;
    let mut bot = Autoplay::new(seed.wrapping_add(1), cli.miss_chance);

    let mut last_score = 0;
    engine.subscribe(move |state| {
        if state.score != last_score && state.score % 25 == 0 {
            log::info!("Score {} (speed {:.2} px/tick)", state.score, state.speed);
        }
        last_score = state.score;
    });

    log::info!(
        "Tile Tapper (headless) starting: seed {}, play area {} px, {} columns",
        seed,
        cli.height,
        tuning.column_count
    );
    engine.start();

    let mut step = FixedStep::new();
    let mut input = TickInput::default();
    let mut ticks: u32 = 0;
    let mut last_frame = Instant::now();

    while !engine.state().game_over && ticks < cli.max_ticks {
        let dt = if cli.realtime {
            thread::sleep(Duration::from_secs_f32(SIM_DT));
            let now = Instant::now();
            let dt = (now - last_frame).as_secs_f32();
            last_frame = now;
            dt
        } else {
            SIM_DT
        };

        for _ in 0..step.advance(dt) {
            input.tap = bot.decide(engine.state(), engine.tuning(), cli.height);
            tick(&mut engine, &input, cli.height);
            input.clear();
            ticks += 1;
        }
    }

    let state = engine.snapshot();
    if state.game_over {
        log::info!("Game over after {} ticks", ticks);
    } else {
        log::info!("Tick limit reached, pausing");
        engine.pause_game();
    }
    println!(
        "Score: {}  (ticks: {}, final speed: {:.2} px/tick)",
        state.score, ticks, state.speed
    );

    if !cli.no_save {
        let mut store = LocalScoreStore::open(&cli.scores)
            .with_context(|| format!("opening leaderboard {}", cli.scores.display()))?;
        let new_high = store.is_new_high_score(state.score);
        let rank = store.submit(&settings.display_name(), state.score)?;
        if new_high {
            println!("New high score!");
        } else {
            println!("Rank #{}", rank);
        }

        let now = now_millis();
        println!("\nTop scores:");
        for (i, entry) in store.top_scores(TOP_SCORES_LIMIT).iter().enumerate() {
            println!(
                "{:>2}. {:<16} {:>6}  {}",
                i + 1,
                entry.player_name,
                entry.score,
                format_date(entry.timestamp, now)
            );
        }
    }

    engine.reset();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run(Cli::parse())
}
