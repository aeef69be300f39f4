//! Chess Console - play a game of chess in the terminal.
//!
//! Reads one command per line from stdin. Logs go to stderr and are
//! filtered with `RUST_LOG` (default `info`).

use chess_console::command::Command;
use chess_console::config::ConsoleConfig;
use chess_console::render;
use chess_engine::{GameController, GameMode, MoveOutcome};
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
Commands:
  e2e4 | e2 e4 | e7e8q   move a piece (optional promotion letter)
  promote q|r|b|n        answer a pending promotion
  moves e2               list legal destinations of a piece
  resign                 resign for the side to move
  reset                  start over in the current mode
  new [local|online|ai]  start a new game
  board | history | clocks
  quit";

/// Chess Console - play chess in the terminal.
#[derive(Parser)]
#[command(name = "chess-console")]
#[command(about = "Play a game of chess in the terminal")]
struct Args {
    /// Path to a TOML config file (defaults to chess.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Game mode: local, online or ai
    #[arg(long)]
    mode: Option<GameMode>,

    /// Seconds on each clock at the start of a game
    #[arg(long)]
    initial_secs: Option<u32>,

    /// Clock tick interval in milliseconds
    #[arg(long)]
    tick_millis: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut config = ConsoleConfig::load(args.config.as_deref())?;
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(secs) = args.initial_secs {
        config.clock.initial_secs = secs;
    }
    if let Some(millis) = args.tick_millis {
        config.clock.tick_millis = millis;
    }
    tracing::info!(
        mode = %config.mode,
        initial_secs = config.clock.initial_secs,
        tick_millis = config.clock.tick_millis,
        "starting chess-console"
    );

    let mut controller = GameController::new(config.clock);
    controller.create_room(config.mode);
    println!("{}", HELP);
    print_state(&controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => run(&mut controller, command),
            Err(err) => println!("{}", err),
        }
    }

    tracing::info!("chess-console exiting");
    Ok(())
}

fn run(controller: &mut GameController, command: Command) {
    if let Err(err) = controller.with_state(|state| command.validate(state)) {
        println!("{}", err);
        return;
    }
    match command {
        Command::Move {
            from,
            to,
            promotion,
        } => match controller.try_make_move(from, to) {
            Ok(MoveOutcome::PromotionPending) => match promotion {
                Some(choice) => {
                    controller.promote_pawn(choice);
                    print_last_move(controller);
                    print_state(controller);
                }
                None => println!("{}", controller.with_state(render::status_line)),
            },
            Ok(MoveOutcome::Executed) => {
                print_last_move(controller);
                print_state(controller);
            }
            Err(err) => println!("{}", err),
        },
        Command::Promote(choice) => match controller.try_promote_pawn(choice) {
            Ok(()) => {
                print_last_move(controller);
                print_state(controller);
            }
            Err(err) => println!("{}", err),
        },
        Command::Moves(from) => {
            let moves = controller.legal_moves(from);
            println!("{}: {}", from, render::destinations(&moves));
        }
        Command::Resign => match controller.resign() {
            Ok(()) => println!("{}", controller.with_state(render::status_line)),
            Err(err) => println!("{}", err),
        },
        Command::Reset => {
            controller.reset_game();
            print_state(controller);
        }
        Command::New(mode) => {
            controller.create_room(mode);
            print_state(controller);
        }
        Command::Board => print_state(controller),
        Command::History => {
            let text = controller.with_state(|state| render::history(state.history()));
            if text.is_empty() {
                println!("No moves yet.");
            } else {
                print!("{}", text);
            }
        }
        Command::Clocks => {
            let line = controller
                .with_state(|state| render::clocks_line(state.clocks(), state.active_clock()));
            println!("{}", line);
        }
        Command::Help => println!("{}", HELP),
        Command::Quit | Command::Empty => {}
    }
}

fn print_last_move(controller: &GameController) {
    if let Some(line) = controller.with_state(|state| state.last_move().map(render::move_line)) {
        println!("{}", line);
    }
}

fn print_state(controller: &GameController) {
    controller.with_state(|state| {
        println!();
        println!("{}", state.board());
        println!(
            "{}",
            render::clocks_line(state.clocks(), state.active_clock())
        );
        println!("{}", render::status_line(state));
    });
}
