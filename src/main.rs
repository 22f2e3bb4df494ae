use std::io::{self, IsTerminal};

use battleship_adt::{init_logging, Console};
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(author, version, about = "Record and replay Battleship match history", long_about = None)]
struct Cli {
    #[arg(long, help = "Fix RNG seed for reproducible match ids (e.g., --seed 12345)")]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let rng = if let Some(s) = cli.seed {
        log::info!("using fixed seed {}", s);
        SmallRng::seed_from_u64(s)
    } else {
        let mut seed_rng = rand::rng();
        SmallRng::from_rng(&mut seed_rng)
    };

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    if interactive {
        println!("Battleship history console. Type 'help' for the list of commands.");
    }

    let mut console = Console::new(rng).with_prompt(interactive);
    let mut stdout = io::stdout().lock();
    console.run(stdin.lock(), &mut stdout)
}
