//! Flappy AI entry point (evolutionary mode)
//!
//! Evolves a population of feed-forward networks to fly the bird, or replays
//! a saved winner with `--watch`.

use std::io;
use std::path::{Path, PathBuf};
use std::process;

use flappy_evo::evolution::{Episode, Generation, Population, evaluate_genomes};
use flappy_evo::persistence::{SavedGenome, load_winner, save_winner};
use flappy_evo::platform::{FrameLimiter, TerminalSession};
use flappy_evo::renderer::sink_for;
use flappy_evo::settings::{RenderMode, Settings};

/// Command line options
#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    fast: bool,
    generations: Option<u32>,
    seed: Option<u64>,
    watch: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            print_usage(&args[0]);
            process::exit(2);
        }
    };

    let mut settings = match &options.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    if options.fast {
        settings = settings.headless();
    }
    if let Some(generations) = options.generations {
        settings.evolution.generations = generations;
    }
    let seed = options
        .seed
        .or(settings.seed)
        .unwrap_or_else(rand::random::<u64>);

    // Terminal drawing gets its own screen; keys are not read here
    let mut session = match settings.render {
        RenderMode::Ascii => Some(TerminalSession::enter(false)?),
        _ => None,
    };
    let result = match &options.watch {
        Some(path) => watch(path, &settings, seed),
        None => train(&settings, seed),
    };
    if let Some(session) = session.as_mut() {
        session.restore()?;
    }
    result
}

/// Evolve for the configured number of generations
fn train(settings: &Settings, seed: u64) -> io::Result<()> {
    let evolution = &settings.evolution;
    log::info!(
        "Evolving {} genomes for up to {} generations (seed {})",
        evolution.population_size,
        evolution.generations,
        seed
    );

    let mut population = Population::new(evolution, seed);
    let mut sink = sink_for(settings.render, settings.tick_rate());
    let mut limiter = settings
        .frame_limit
        .then(|| FrameLimiter::new(settings.tick_rate()));

    let winner = population.run(
        |genomes, generation| {
            let report = evaluate_genomes(
                genomes,
                generation,
                evolution,
                seed,
                sink.as_mut(),
                limiter.as_mut(),
            );
            log::info!(
                "Generation {} flew {} ticks, score {}",
                report.generation,
                report.ticks,
                report.score
            );
        },
        evolution.generations,
    );

    let Some(winner) = winner else {
        log::warn!("No generation was evaluated");
        return Ok(());
    };
    let generation = population
        .best_generation()
        .unwrap_or_else(Generation::first)
        .index();
    log::info!(
        "Best genome {} from generation {}: fitness {:.2}",
        winner.id,
        generation,
        winner.fitness
    );

    if let Some(path) = &evolution.winner_path {
        save_winner(path, &SavedGenome::new(winner, population.shape(), generation))?;
    }
    Ok(())
}

/// Replay a saved genome until its bird crashes
fn watch(path: &Path, settings: &Settings, seed: u64) -> io::Result<()> {
    let saved = load_winner(path)?;
    let mut genomes = vec![saved.genome];

    let mut sink = sink_for(settings.render, settings.tick_rate());
    let mut limiter = settings
        .frame_limit
        .then(|| FrameLimiter::new(settings.tick_rate()));

    let mut episode = Episode::new(
        &mut genomes,
        saved.shape,
        &settings.evolution,
        Generation::from_index(saved.generation),
        seed,
    );
    while episode.is_running() {
        if let Some(limiter) = limiter.as_mut() {
            limiter.wait();
        }
        episode.step();
        sink.present(&episode.frame());
    }

    let report = episode.report();
    log::info!(
        "Replay finished: score {} after {} ticks, fitness {:.2}",
        report.score,
        report.ticks,
        report.best_fitness
    );
    Ok(())
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = iter.next().ok_or("--config requires a path")?;
                options.config = Some(PathBuf::from(path));
            }
            "--fast" | "-f" => options.fast = true,
            "--generations" | "-g" => {
                let value = iter.next().ok_or("--generations requires a number")?;
                let generations = value
                    .parse()
                    .map_err(|_| format!("invalid generation count: {}", value))?;
                options.generations = Some(generations);
            }
            "--seed" | "-s" => {
                let value = iter.next().ok_or("--seed requires a number")?;
                let seed = value
                    .parse()
                    .map_err(|_| format!("invalid seed: {}", value))?;
                options.seed = Some(seed);
            }
            "--watch" | "-w" => {
                let path = iter.next().ok_or("--watch requires a path")?;
                options.watch = Some(PathBuf::from(path));
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
    }

    Ok(options)
}

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} [--config PATH] [--fast] [--generations N] [--seed N] [--watch PATH]",
        program
    );
    eprintln!();
    eprintln!("  --fast          no frame limit, log output only");
    eprintln!("  --watch PATH    replay a saved winner instead of training");
}
