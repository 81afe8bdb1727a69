use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use console_2048::autoplay::{self, AutoplayConfig};
use console_2048::engine::{self as GameEngine, Direction};
use console_2048::game::Game;
use console_2048::trace;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::{rngs::StdRng, SeedableRng};

#[derive(Parser, Debug)]
#[command(name = "console-2048", version, about = "2048 engine: self-check, scripted play, autoplay and traces")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the line-slide regression table
    Selftest,
    /// Apply a scripted move list to a seeded game, printing each step
    Play {
        /// RNG seed for tile spawns (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Comma-separated moves: up/right/down/left or w/a/s/d, h/j/k/l
        #[arg(long, value_delimiter = ',')]
        moves: Vec<Direction>,
    },
    /// Play many random-move games in parallel and report statistics
    Autoplay {
        /// TOML file with games/seed/max_moves/threads; flags override it
        #[arg(short = 'c', long, value_name = "FILE")]
        config: Option<PathBuf>,
        #[arg(long)]
        games: Option<u64>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        max_moves: Option<u64>,
        #[arg(long)]
        threads: Option<usize>,
        /// Print the full report as JSON on stdout
        #[arg(long)]
        json: bool,
        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },
    /// Play one random-move game and write its trace
    Record {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 100_000)]
        max_moves: u64,
        /// Output trace file
        #[arg(short = 'o', long = "out", value_name = "FILE")]
        out: PathBuf,
    },
    /// Re-simulate a trace and check every recorded state
    Replay {
        /// Trace file written by `record`
        input: PathBuf,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match cli.cmd {
        Command::Selftest => match GameEngine::self_check() {
            Ok(n) => println!("All {n} tests executed successfully"),
            Err(failure) => {
                println!("{failure}");
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Play { seed, moves } => run_play(seed, &moves)?,
        Command::Autoplay { config, games, seed, max_moves, threads, json, quiet } => {
            let mut cfg = match config {
                Some(path) => AutoplayConfig::from_toml(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => AutoplayConfig::default(),
            };
            cfg.games = games.unwrap_or(cfg.games);
            cfg.seed = seed.unwrap_or(cfg.seed);
            cfg.max_moves = max_moves.unwrap_or(cfg.max_moves);
            cfg.threads = threads.or(cfg.threads);
            run_autoplay(&cfg, json, quiet)?;
        }
        Command::Record { seed, max_moves, out } => {
            let (summary, run) = trace::record_random_game(seed, max_moves);
            trace::write_run_to_path(&out, &run)?;
            info!(
                "recorded seed {} ({} steps, score {}, highest tile {}) to {}",
                seed,
                run.meta.steps,
                summary.score,
                summary.highest_tile,
                out.display()
            );
        }
        Command::Replay { input } => {
            let run = trace::parse_run_file(&input).with_context(|| format!("reading {}", input.display()))?;
            let game = trace::replay(&run)?;
            println!("{}", game.grid());
            println!(
                "replayed {} steps: score {}, ended {}",
                run.meta.steps,
                game.score(),
                game.is_ended()
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_play(seed: Option<u64>, moves: &[Direction]) -> Result<()> {
    if moves.is_empty() {
        bail!("no moves given; pass e.g. --moves left,up,right");
    }
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let mut game = Game::new(&mut rng);
    println!("{}", game.grid());
    for &direction in moves {
        let outcome = game.apply_move(direction, &mut rng)?;
        println!(
            "{direction}: changed={} +{} score={}",
            outcome.changed,
            outcome.score_delta,
            game.score()
        );
        println!("{}", game.grid());
        if outcome.ended {
            println!("GAME OVER");
            break;
        }
    }
    Ok(())
}

fn run_autoplay(cfg: &AutoplayConfig, json: bool, quiet: bool) -> Result<()> {
    let pb = if quiet { ProgressBar::hidden() } else { ProgressBar::new(cfg.games) };
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} games ({eta})")?
            .progress_chars("=>-"),
    );
    let report = autoplay::run_batch(cfg, |_| pb.inc(1))?;
    pb.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("games: {} ({} finished)", report.games, report.finished);
        println!("moves: {}", report.total_moves);
        println!("best score: {}", report.best_score);
        println!("mean score: {:.1}", report.mean_score);
        for (tile, count) in &report.highest_tiles {
            println!("highest tile {tile}: {count}");
        }
    }
    Ok(())
}
