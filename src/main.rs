mod config;
mod coord;
mod field;
mod game;
mod input;
mod render;
mod snake;
mod snapshot;
mod terminal;

use clap::Parser;
use config::Cli;
use game::{Game, GameState};
use input::KeyReader;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::{Config, WriteLogger};
use snapshot::SnapshotWriter;
use std::fs::File;
use std::io;
use std::thread;
use std::time::Duration;
use terminal::TerminalScreen;

// How long the final frame stays up before the terminal is handed back
const GAME_OVER_PAUSE: Duration = Duration::from_millis(1500);

fn main() -> Result<(), io::Error> {
    let cli = Cli::parse();

    // Set up logging before anything else
    WriteLogger::init(cli.log_level, Config::default(), File::create(&cli.log_file)?)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    info!("Starting snekgrid");

    let config = cli.game_config();
    let rng = match cli.seed {
        Some(seed) => {
            info!("Using seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let snapshots = match &cli.snapshot_file {
        Some(path) => Some(SnapshotWriter::new(File::create(path)?)),
        None => None,
    };

    let mut game = Game::new(config, rng);
    let mut screen = TerminalScreen::enter(snapshots)?;
    let mut keys = KeyReader::spawn();

    let result = game.run(&mut keys, &mut screen);
    if matches!(result, Ok(GameState::Dead)) {
        thread::sleep(GAME_OVER_PAUSE);
    }

    // Cleanup terminal
    screen.restore()?;
    let state = result?;

    print!("{}", game.text());
    println!("{}", terminal::end_message(&game));
    info!("Exiting with {:?}, score {}", state, game.score());

    Ok(())
}
