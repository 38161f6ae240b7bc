use crate::coord::{Coord, Direction};
use clap::Parser;
use simplelog::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

/// Timing, scoring and layout for one game. Built once and never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub snake_head: Coord,
    pub snake_length: u16,
    pub snake_direction: Direction,
    pub initial_apples: Vec<Coord>,
    pub tick_interval: Duration,
    pub input_timeout: Duration,
    pub fastest_interval: Duration,
    pub speed_step: Duration,
    pub apples_per_speedup: u32,
    pub apple_spawn_every: u64,
    pub score_per_tick: u64,
    pub apple_bonus: u64,
    pub bordered: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: 30,
            height: 30,
            snake_head: Coord::new(2, 2),
            snake_length: 3,
            snake_direction: Direction::Right,
            initial_apples: vec![Coord::new(5, 5), Coord::new(7, 7), Coord::new(9, 9)],
            tick_interval: Duration::from_millis(200),
            input_timeout: Duration::from_millis(50),
            fastest_interval: Duration::from_millis(60),
            speed_step: Duration::from_millis(20),
            apples_per_speedup: 7,
            apple_spawn_every: 15,
            score_per_tick: 1,
            apple_bonus: 1,
            bordered: true,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Snake on a bounded grid in the terminal")]
pub struct Cli {
    /// Number of columns in the field.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u16).range(3..=200))]
    pub width: u16,
    /// Number of rows in the field.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u16).range(3..=200))]
    pub height: u16,
    /// Starting delay between ticks.
    #[arg(long = "tick-ms", value_name = "MILLISECONDS", default_value_t = 200)]
    pub tick_ms: u64,
    /// How long each tick waits for a key press.
    #[arg(long = "input-timeout-ms", value_name = "MILLISECONDS", default_value_t = 50)]
    pub input_timeout_ms: u64,
    /// Lower bound for the tick delay as the game speeds up.
    #[arg(long = "fastest-ms", value_name = "MILLISECONDS", default_value_t = 60)]
    pub fastest_ms: u64,
    /// Amount the tick delay shrinks at each speedup.
    #[arg(long = "speed-step-ms", value_name = "MILLISECONDS", default_value_t = 20)]
    pub speed_step_ms: u64,
    /// Apples to eat between speedups.
    #[arg(
        long = "apples-per-speedup",
        default_value_t = 7,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub apples_per_speedup: u32,
    /// Ticks between apple spawn attempts.
    #[arg(
        long = "spawn-every",
        value_name = "TICKS",
        default_value_t = 15,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub spawn_every: u64,
    /// Points awarded for every tick survived.
    #[arg(long = "score-per-tick", default_value_t = 1)]
    pub score_per_tick: u64,
    /// Extra points per tick for each apple eaten so far.
    #[arg(long = "apple-bonus", default_value_t = 1)]
    pub apple_bonus: u64,
    /// Draw the field without the surrounding frame.
    #[arg(long = "no-border")]
    pub no_border: bool,
    /// Append one JSON snapshot of the game state per tick to this file.
    #[arg(long = "snapshot-file", value_name = "PATH")]
    pub snapshot_file: Option<PathBuf>,
    /// Where log output goes.
    #[arg(long = "log-file", value_name = "PATH", default_value = "snake.log")]
    pub log_file: PathBuf,
    /// One of off, error, warn, info, debug, trace.
    #[arg(long = "log-level", default_value = "info", value_parser = parse_level)]
    pub log_level: LevelFilter,
    /// Seed for apple placement, for reproducible games.
    #[arg(long)]
    pub seed: Option<u64>,
}

fn parse_level(value: &str) -> Result<LevelFilter, String> {
    value
        .parse()
        .map_err(|_| format!("unknown log level '{}'", value))
}

impl Cli {
    pub fn game_config(&self) -> GameConfig {
        let defaults = GameConfig::default();
        let fits = |c: &Coord| c.x < self.width as i32 && c.y < self.height as i32;

        GameConfig {
            width: self.width,
            height: self.height,
            initial_apples: defaults.initial_apples.iter().copied().filter(fits).collect(),
            tick_interval: Duration::from_millis(self.tick_ms),
            input_timeout: Duration::from_millis(self.input_timeout_ms),
            fastest_interval: Duration::from_millis(self.fastest_ms.min(self.tick_ms)),
            speed_step: Duration::from_millis(self.speed_step_ms),
            apples_per_speedup: self.apples_per_speedup,
            apple_spawn_every: self.spawn_every,
            score_per_tick: self.score_per_tick,
            apple_bonus: self.apple_bonus,
            bordered: !self.no_border,
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_game_config() {
        let cli = Cli::parse_from(["snekgrid"]);
        assert_eq!(cli.game_config(), GameConfig::default());
        assert_eq!(cli.log_level, LevelFilter::Info);
        assert!(cli.snapshot_file.is_none());
    }

    #[test]
    fn test_small_field_drops_unreachable_apples() {
        let cli = Cli::parse_from(["snekgrid", "--width", "6", "--height", "8"]);
        let config = cli.game_config();
        assert_eq!(config.initial_apples, vec![Coord::new(5, 5)]);
    }

    #[test]
    fn test_fastest_never_above_starting_speed() {
        let cli = Cli::parse_from(["snekgrid", "--tick-ms", "40", "--fastest-ms", "60"]);
        let config = cli.game_config();
        assert_eq!(config.fastest_interval, Duration::from_millis(40));
    }

    #[test]
    fn test_rejects_tiny_field() {
        assert!(Cli::try_parse_from(["snekgrid", "--width", "2"]).is_err());
        assert!(Cli::try_parse_from(["snekgrid", "--spawn-every", "0"]).is_err());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "snekgrid",
            "--no-border",
            "--snapshot-file",
            "ticks.jsonl",
            "--log-level",
            "debug",
            "--seed",
            "42",
        ]);
        assert!(!cli.game_config().bordered);
        assert_eq!(cli.snapshot_file, Some(PathBuf::from("ticks.jsonl")));
        assert_eq!(cli.log_level, LevelFilter::Debug);
        assert_eq!(cli.seed, Some(42));
    }
}
