//! Flappy entry point (manual mode)
//!
//! Plays in the terminal: Space, Up or Enter flaps, `q` or Esc quits.

use std::io;
use std::path::PathBuf;
use std::process;

use flappy_evo::derive_seed;
use flappy_evo::platform::{FrameLimiter, InputEvent, KeyboardInput, TerminalSession, show_message};
use flappy_evo::renderer::{Frame, MESSAGE_ROW, RenderSink, sink_for};
use flappy_evo::settings::Settings;
use flappy_evo::sim::{GameState, TickInput, tick};

/// Command line options
#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    seed: Option<u64>,
}

/// How a round ended
enum RoundEnd {
    GameOver { score: u64, ticks: u64 },
    Quit,
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

    let settings = match &options.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let seed = options
        .seed
        .or(settings.seed)
        .unwrap_or_else(rand::random::<u64>);
    log::info!("Flappy starting (seed {})", seed);

    let mut session = TerminalSession::enter(true)?;
    let result = play(&settings, seed);
    session.restore()?;

    let best = result?;
    log::info!("Bye (best score {})", best);
    println!("Best score: {}", best);
    Ok(())
}

/// Start prompt, rounds and game-over screens until the player quits.
/// Returns the best score.
fn play(settings: &Settings, seed: u64) -> io::Result<u64> {
    let mut out = io::stdout();
    let mut input = KeyboardInput::new();
    let mut sink = sink_for(settings.render, settings.tick_rate());
    let mut limiter = FrameLimiter::new(settings.tick_rate());
    let mut best = 0;
    let mut banner = vec!["Flappy".to_string()];

    for round in 0.. {
        banner.push("Space to start, q to quit".to_string());
        show_message(&mut out, MESSAGE_ROW, &banner)?;
        if input.wait()? == InputEvent::Quit {
            break;
        }
        // Drop keys pressed while the prompt was up
        input.poll()?;
        show_message(&mut out, MESSAGE_ROW, &[String::new(), String::new()])?;
        limiter.reset();

        let pacing = settings.frame_limit.then_some(&mut limiter);
        match play_round(derive_seed(seed, round), &mut input, sink.as_mut(), pacing)? {
            RoundEnd::GameOver { score, ticks } => {
                best = best.max(score);
                log::info!("Round {} over: score {} after {} ticks", round + 1, score, ticks);
                banner = vec![format!("Game over! Score: {} (best {})", score, best)];
            }
            RoundEnd::Quit => break,
        }
    }

    Ok(best)
}

/// Fly one bird until it crashes or the player quits
fn play_round(
    seed: u64,
    input: &mut KeyboardInput,
    sink: &mut dyn RenderSink,
    mut limiter: Option<&mut FrameLimiter>,
) -> io::Result<RoundEnd> {
    let mut state = GameState::with_birds(seed, 1);
    sink.present(&Frame::plain(&state));

    while state.is_running() {
        if let Some(limiter) = limiter.as_mut() {
            limiter.wait();
        }

        let mut tick_input = TickInput::default();
        for event in input.poll()? {
            match event {
                InputEvent::Flap => tick_input.flap = true,
                InputEvent::Quit => return Ok(RoundEnd::Quit),
            }
        }

        tick(&mut state, &tick_input);
        sink.present(&Frame::plain(&state));
    }

    Ok(RoundEnd::GameOver {
        score: state.score,
        ticks: state.time_ticks,
    })
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
            "--seed" | "-s" => {
                let value = iter.next().ok_or("--seed requires a number")?;
                let seed = value
                    .parse()
                    .map_err(|_| format!("invalid seed: {}", value))?;
                options.seed = Some(seed);
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
    eprintln!("Usage: {} [--config PATH] [--seed N]", program);
    eprintln!();
    eprintln!("  Space, Up or Enter flaps; q or Esc quits");
    eprintln!("  Logs go to stderr; redirect them (2>flappy.log) to keep the screen clean");
}
