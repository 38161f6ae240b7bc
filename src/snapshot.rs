use crate::coord::{Coord, Direction};
use crate::field::Tile;
use crate::game::Game;
use log::error;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct Member {
    x: i32,
    y: i32,
    tile: Tile,
}

#[derive(Debug, Serialize)]
pub struct FieldSnapshot {
    width: i32,
    height: i32,
    members: Vec<Member>,
}

/// Full game state for one tick, as consumed by external tools.
#[derive(Debug, Serialize)]
pub struct Snapshot {
    tick: u64,
    snake: Vec<Coord>,
    direction: Direction,
    field: FieldSnapshot,
    score: u64,
    apples: Vec<Coord>,
    num_apples_eaten: u32,
    tick_interval_ms: u64,
}

impl Snapshot {
    pub fn capture(game: &Game) -> Self {
        let field = game.field();
        Snapshot {
            tick: game.ticks(),
            snake: game.snake().body().collect(),
            direction: game.direction(),
            field: FieldSnapshot {
                width: field.width(),
                height: field.height(),
                members: field
                    .members()
                    .map(|(pos, tile)| Member {
                        x: pos.x,
                        y: pos.y,
                        tile,
                    })
                    .collect(),
            },
            score: game.score(),
            apples: field.apples().collect(),
            num_apples_eaten: game.apples_eaten(),
            tick_interval_ms: game.tick_interval().as_millis() as u64,
        }
    }
}

/// Writes one JSON object per line. Failures are logged and otherwise ignored
/// so a broken sink never stops the game.
pub struct SnapshotWriter<W: Write> {
    out: W,
}

impl<W: Write> SnapshotWriter<W> {
    pub fn new(out: W) -> Self {
        SnapshotWriter { out }
    }

    pub fn emit(&mut self, game: &Game) {
        let snapshot = Snapshot::capture(game);
        let result = serde_json::to_writer(&mut self.out, &snapshot)
            .map_err(std::io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"))
            .and_then(|_| self.out.flush());

        if let Err(e) = result {
            error!("Error writing snapshot for tick {}: {}", snapshot.tick, e);
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::Value;
    use std::io;

    fn small_game() -> Game {
        let config = GameConfig {
            width: 10,
            height: 10,
            initial_apples: vec![Coord::new(3, 2)],
            ..GameConfig::default()
        };
        Game::new(config, StdRng::seed_from_u64(1))
    }

    #[test]
    fn test_snapshot_lines() {
        let mut game = small_game();
        let mut writer = SnapshotWriter::new(Vec::new());

        writer.emit(&game);
        game.step(None);
        writer.emit(&game);

        let out = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<Value> = out
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);

        let first = &lines[0];
        assert_eq!(first["snake"][0], serde_json::json!({"x": 2, "y": 2}));
        assert_eq!(first["snake"].as_array().unwrap().len(), 3);
        assert_eq!(first["direction"], "right");
        assert_eq!(first["field"]["width"], 10);
        assert_eq!(first["apples"], serde_json::json!([{"x": 3, "y": 2}]));
        assert_eq!(first["num_apples_eaten"], 0);
        assert_eq!(first["tick_interval_ms"], 200);

        let second = &lines[1];
        assert_eq!(second["snake"][0], serde_json::json!({"x": 3, "y": 2}));
        assert_eq!(second["num_apples_eaten"], 1);
        assert!(second["field"]["members"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!({"x": 3, "y": 2, "tile": "head"})));
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_not_fatal() {
        let game = small_game();
        let mut writer = SnapshotWriter::new(BrokenSink);
        writer.emit(&game);
        writer.emit(&game);
    }
}
