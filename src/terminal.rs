use crate::game::{Game, GameState, Screen};
use crate::snapshot::SnapshotWriter;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::error;
use ratatui::{
    prelude::*,
    style::{Style, Stylize},
    widgets::*,
};
use std::fs::File;
use std::io::{self, Stdout};

const HELP: &str = "SNAKE    w/a/s/d or arrows to steer, q to quit";

/// Raw-mode alternate screen that shows each frame, plus the optional
/// snapshot sink. Restores the terminal on drop if `restore` was never called.
pub struct TerminalScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    snapshots: Option<SnapshotWriter<File>>,
    restored: bool,
}

impl TerminalScreen {
    pub fn enter(snapshots: Option<SnapshotWriter<File>>) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        Ok(TerminalScreen {
            terminal,
            snapshots,
            restored: false,
        })
    }

    pub fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn show(&mut self, game: &Game, message: Option<String>) -> io::Result<()> {
        let text = game.text();
        self.terminal.draw(|frame| {
            let layout = Layout::default()
                .direction(layout::Direction::Vertical)
                .constraints([
                    Constraint::Length(1), // Title + keys
                    Constraint::Min(0),    // Field and status line
                    Constraint::Length(1), // Game over message
                ])
                .split(frame.area());

            frame.render_widget(Paragraph::new(HELP).style(Style::default().bold()), layout[0]);
            frame.render_widget(Paragraph::new(text), layout[1]);
            if let Some(message) = message {
                frame.render_widget(
                    Paragraph::new(message).style(Style::default().fg(Color::LightRed).bold()),
                    layout[2],
                );
            }
        })?;
        Ok(())
    }
}

impl Screen for TerminalScreen {
    fn draw(&mut self, game: &Game) -> io::Result<()> {
        if let Some(snapshots) = self.snapshots.as_mut() {
            snapshots.emit(game);
        }
        self.show(game, None)
    }

    fn game_over(&mut self, game: &Game) -> io::Result<()> {
        self.show(game, Some(end_message(game)))
    }
}

impl Drop for TerminalScreen {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            error!("Error restoring terminal: {}", e);
        }
    }
}

pub fn end_message(game: &Game) -> String {
    match game.state() {
        GameState::Dead => format!(
            "GAME OVER    Final score: {}    Apples: {}",
            game.score(),
            game.apples_eaten()
        ),
        GameState::Quit => format!("Quit    Final score: {}", game.score()),
        GameState::Running => String::new(),
    }
}
