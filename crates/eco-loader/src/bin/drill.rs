//! Drill one opening line from the terminal.
//!
//! Usage: cargo run --bin drill -- [opening-id] [--black]
//!
//! Enter moves as square pairs (`e2e4`). Commands: `flip`, `arrows`,
//! `restart`, `quit`. An unknown id falls back to the first opening.

use eco_loader::{load_tree, SourceConfig};
use opening_core::driller::{DrillEvent, Driller, Side};
use opening_core::engine::ShakmatyEngine;
use opening_core::opening_tree::CollisionPolicy;
use std::env;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Pause before a finished line starts over.
const RESTART_DELAY: Duration = Duration::from_millis(1000);

fn print_events(events: &[DrillEvent]) {
    for event in events {
        match event {
            DrillEvent::Restarted => println!("-- new game --"),
            DrillEvent::Played { mv, by, feedback, game_over } => {
                println!("{:?} plays {} ({:?})", by, mv, feedback);
                if *game_over {
                    println!("Game over");
                }
            }
            DrillEvent::Rejected { attempted, .. } => println!("{} is not the book move, try again", attempted),
            DrillEvent::LineComplete => println!("Line complete!"),
        }
    }
}

fn print_board(driller: &Driller<ShakmatyEngine>) {
    println!("{}", driller.position_token());
    if let Some(hint) = driller.hint() {
        println!("hint: {}", hint);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let side = if args.iter().any(|a| a == "--black") { Side::Black } else { Side::White };
    let id = args.iter().find(|a| !a.starts_with("--")).cloned().unwrap_or_default();

    let config = SourceConfig::from_env();
    let (tree, _report) = load_tree(&config, CollisionPolicy::default()).await?;

    let node = tree
        .select_or_default(&id)
        .ok_or_else(|| anyhow::anyhow!("No openings loaded"))?;
    println!("Drilling {} ({} moves) as {:?}", node.name, node.moves.len(), side);

    let mut driller = Driller::new(ShakmatyEngine::new(), node.moves.clone(), side);
    print_events(&driller.restart()?);
    print_board(&driller);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();

        let events = match input {
            "" => continue,
            "quit" => break,
            "flip" => driller.switch_side()?,
            "restart" => driller.restart()?,
            "arrows" => {
                println!("arrows {}", if driller.toggle_arrows() { "on" } else { "off" });
                continue;
            }
            mv if mv.len() == 4 && mv.is_ascii() => match driller.player_move(&mv[..2], &mv[2..]) {
                Ok(events) => events,
                Err(e) => {
                    println!("{e}");
                    continue;
                }
            },
            _ => {
                println!("enter a move like e2e4, or flip / arrows / restart / quit");
                continue;
            }
        };

        print_events(&events);
        if events.contains(&DrillEvent::LineComplete) {
            tokio::time::sleep(RESTART_DELAY).await;
            print_events(&driller.restart()?);
        }
        print_board(&driller);
        io::stdout().flush()?;
    }

    Ok(())
}
