use crate::config::GameConfig;
use crate::coord::Direction;
use crate::field::Field;
use crate::input::{Command, InputSource};
use crate::render;
use crate::snake::{MoveOutcome, Snake};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use std::io;
use std::thread;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Running,
    Dead,
    Quit,
}

/// Where frames go. Called once before the first tick, once after every
/// tick, and once more when the game ends.
pub trait Screen {
    fn draw(&mut self, game: &Game) -> io::Result<()>;
    fn game_over(&mut self, game: &Game) -> io::Result<()>;
}

pub struct Game {
    config: GameConfig,
    field: Field,
    snake: Snake,
    rng: StdRng,
    direction: Direction,
    score: u64,
    apples_eaten: u32,
    tick_interval: Duration,
    ticks: u64,
    state: GameState,
}

impl Game {
    pub fn new(config: GameConfig, rng: StdRng) -> Self {
        let mut field = Field::new(config.width, config.height);
        let snake = Snake::new(config.snake_head, config.snake_length, config.snake_direction);
        snake.stamp(&mut field);

        for &pos in &config.initial_apples {
            if field.contains(pos) && field.get(pos).is_none() {
                field.place_apple(pos);
            } else {
                warn!("Skipping initial apple at {}, cell is taken or off the field", pos);
            }
        }

        Game {
            direction: config.snake_direction,
            tick_interval: config.tick_interval,
            field,
            snake,
            rng,
            score: 0,
            apples_eaten: 0,
            ticks: 0,
            state: GameState::Running,
            config,
        }
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn apples_eaten(&self) -> u32 {
        self.apples_eaten
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn text(&self) -> String {
        render::frame_text(&self.field, self.score, self.apples_eaten, self.config.bordered)
    }

    /// Runs ticks until the snake dies or the player quits.
    pub fn run(
        &mut self,
        input: &mut impl InputSource,
        screen: &mut impl Screen,
    ) -> io::Result<GameState> {
        info!(
            "Starting game on a {}x{} field, tick {:?}",
            self.config.width, self.config.height, self.tick_interval
        );
        screen.draw(self)?;

        while self.state == GameState::Running {
            let byte = match input.poll_byte(self.config.input_timeout) {
                Ok(byte) => byte,
                Err(e) => {
                    error!("Error reading input: {}", e);
                    None
                }
            };

            let state = self.step(byte);
            screen.draw(self)?;

            if state == GameState::Running {
                thread::sleep(self.tick_interval);
            }
        }

        screen.game_over(self)?;
        Ok(self.state)
    }

    /// One tick: maybe spawn an apple, apply the key (if any), move, score.
    pub fn step(&mut self, input: Option<u8>) -> GameState {
        if self.state != GameState::Running {
            return self.state;
        }

        self.ticks += 1;
        if self.ticks % self.config.apple_spawn_every.max(1) == 0 {
            self.spawn_apple();
        }

        match input.and_then(Command::from_byte) {
            Some(Command::Quit) => {
                info!("Player quit at tick {} with score {}", self.ticks, self.score);
                self.state = GameState::Quit;
                return self.state;
            }
            Some(Command::Turn(direction)) => self.direction = direction,
            None => {}
        }

        match self.snake.move_snake(self.direction, &mut self.field) {
            MoveOutcome::Dying => {
                info!(
                    "Snake died at tick {}: length {}, score {}, {} apples",
                    self.ticks,
                    self.snake.len(),
                    self.score,
                    self.apples_eaten
                );
                self.state = GameState::Dead;
            }
            MoveOutcome::Growing => {
                self.apples_eaten += 1;
                self.speed_up_if_due();
                self.award_tick();
            }
            MoveOutcome::Moving => self.award_tick(),
        }

        self.state
    }

    fn spawn_apple(&mut self) {
        match self.field.find_random_empty_space(&mut self.rng) {
            Some(pos) => {
                debug!("Spawning apple at {}", pos);
                self.field.place_apple(pos);
            }
            None => debug!("No room for an apple this cycle"),
        }
    }

    fn speed_up_if_due(&mut self) {
        if self.apples_eaten % self.config.apples_per_speedup.max(1) != 0 {
            return;
        }

        let faster = self
            .tick_interval
            .saturating_sub(self.config.speed_step)
            .max(self.config.fastest_interval)
            .min(self.tick_interval);
        if faster != self.tick_interval {
            info!("Speeding up: tick {:?} -> {:?}", self.tick_interval, faster);
            self.tick_interval = faster;
        }
    }

    fn award_tick(&mut self) {
        self.score +=
            self.config.score_per_tick + self.config.apple_bonus * self.apples_eaten as u64;
    }
}
