use crate::coord::Direction;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, error, info};
use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

const CTRL_C: u8 = 0x03;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    Quit,
}

impl Command {
    pub fn from_byte(byte: u8) -> Option<Command> {
        match byte {
            b'a' => Some(Command::Turn(Direction::Left)),
            b's' => Some(Command::Turn(Direction::Down)),
            b'w' => Some(Command::Turn(Direction::Up)),
            b'd' => Some(Command::Turn(Direction::Right)),
            b'q' | CTRL_C => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Something the game loop can ask for at most one key byte per tick.
pub trait InputSource {
    /// Waits up to `timeout` for a byte. `Ok(None)` means the timeout won.
    fn poll_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>>;
}

/// Reads terminal key events on a background thread and hands them over as
/// bytes through a channel.
///
/// A key pressed after the previous poll resolved (typically while the loop
/// was sleeping) belongs to the next tick: the newest such key answers the
/// poll at once. Older keys in that backlog are superseded. A tick that
/// already timed out is never revisited. The reader thread is never
/// cancelled; it exits once the receiving side goes away.
pub struct KeyReader {
    rx: Receiver<io::Result<u8>>,
}

impl KeyReader {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || loop {
            let msg = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => match key_to_byte(key) {
                    Some(byte) => Ok(byte),
                    None => continue,
                },
                Ok(_) => continue,
                Err(e) => Err(e),
            };

            let failed = msg.is_err();
            if tx.send(msg).is_err() {
                info!("Key reader stopping, game loop is gone");
                break;
            }
            if failed {
                // Avoid spinning on a terminal that keeps erroring
                thread::sleep(Duration::from_millis(100));
            }
        });

        KeyReader { rx }
    }

    /// Drains the backlog, keeping only the newest key.
    fn latest_pending(&self) -> Option<u8> {
        let mut latest = None;
        let mut superseded = 0;
        for msg in self.rx.try_iter() {
            match msg {
                Ok(byte) => {
                    if latest.replace(byte).is_some() {
                        superseded += 1;
                    }
                }
                Err(e) => error!("Error reading key: {}", e),
            }
        }
        if superseded > 0 {
            debug!("Dropped {} superseded key reads", superseded);
        }
        latest
    }
}

impl InputSource for KeyReader {
    fn poll_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        if let Some(byte) = self.latest_pending() {
            return Ok(Some(byte));
        }

        match self.rx.recv_timeout(timeout) {
            Ok(Ok(byte)) => Ok(Some(byte)),
            Ok(Err(e)) => Err(e),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "key reader thread has stopped",
            )),
        }
    }
}

/// Arrow keys are folded onto their wasd bytes.
fn key_to_byte(key: KeyEvent) -> Option<u8> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(CTRL_C),
        KeyCode::Char(c) if c.is_ascii() => Some(c as u8),
        KeyCode::Up => Some(b'w'),
        KeyCode::Left => Some(b'a'),
        KeyCode::Down => Some(b's'),
        KeyCode::Right => Some(b'd'),
        KeyCode::Esc => Some(b'q'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_mapping() {
        assert_eq!(Command::from_byte(b'a'), Some(Command::Turn(Direction::Left)));
        assert_eq!(Command::from_byte(b's'), Some(Command::Turn(Direction::Down)));
        assert_eq!(Command::from_byte(b'w'), Some(Command::Turn(Direction::Up)));
        assert_eq!(Command::from_byte(b'd'), Some(Command::Turn(Direction::Right)));
        assert_eq!(Command::from_byte(b'q'), Some(Command::Quit));
        assert_eq!(Command::from_byte(CTRL_C), Some(Command::Quit));
        assert_eq!(Command::from_byte(b'x'), None);
        assert_eq!(Command::from_byte(b'W'), None);
    }

    #[test]
    fn test_key_to_byte() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(key_to_byte(key(KeyCode::Char('d'))), Some(b'd'));
        assert_eq!(key_to_byte(key(KeyCode::Up)), Some(b'w'));
        assert_eq!(key_to_byte(key(KeyCode::Left)), Some(b'a'));
        assert_eq!(key_to_byte(key(KeyCode::Down)), Some(b's'));
        assert_eq!(key_to_byte(key(KeyCode::Right)), Some(b'd'));
        assert_eq!(key_to_byte(key(KeyCode::Char('é'))), None);
        assert_eq!(key_to_byte(key(KeyCode::F(1))), None);
        assert_eq!(
            key_to_byte(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(CTRL_C)
        );
    }

    #[test]
    fn test_newest_pending_key_wins() {
        let (tx, rx) = mpsc::channel();
        let mut reader = KeyReader { rx };

        // Pressed while the loop slept: the newest one answers the next poll
        tx.send(Ok(b'w')).unwrap();
        tx.send(Err(io::Error::new(io::ErrorKind::Other, "glitch"))).unwrap();
        tx.send(Ok(b'a')).unwrap();
        assert_eq!(reader.poll_byte(Duration::from_millis(5)).unwrap(), Some(b'a'));

        // The backlog is spent, so the following tick times out
        assert_eq!(reader.poll_byte(Duration::from_millis(5)).unwrap(), None);

        let sender = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            tx.send(Ok(b'd')).unwrap();
            tx
        });
        assert_eq!(reader.poll_byte(Duration::from_secs(5)).unwrap(), Some(b'd'));

        drop(sender.join().unwrap());
        assert!(reader.poll_byte(Duration::from_millis(5)).is_err());
    }
}
