use crate::coord::{Coord, Direction};
use crate::field::{Field, Tile};
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Moving,  // Plain step into an empty cell
    Growing, // Ate an apple
    Dying,   // Hit itself or left the field
}

/// Snake body, head at the front.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Coord>,
    vacated: Option<Coord>,
}

impl Snake {
    /// Lays out `length` segments starting at `head` and trailing away from
    /// `direction`.
    pub fn new(head: Coord, length: u16, direction: Direction) -> Self {
        let back = direction.opposite().into();
        let mut body = VecDeque::new();
        let mut pos = head;
        for _ in 0..length.max(1) {
            body.push_back(pos);
            pos = pos.offset(back);
        }

        Snake {
            body,
            vacated: None,
        }
    }

    #[cfg(test)]
    pub fn from_body(body: impl IntoIterator<Item = Coord>) -> Self {
        let body: VecDeque<Coord> = body.into_iter().collect();
        assert!(!body.is_empty(), "Snake needs at least one segment");
        Snake {
            body,
            vacated: None,
        }
    }

    pub fn head(&self) -> Coord {
        self.body[0]
    }

    pub fn tail(&self) -> Coord {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn body(&self) -> impl Iterator<Item = Coord> + '_ {
        self.body.iter().copied()
    }

    /// Tags every segment on `field`.
    pub fn stamp(&self, field: &mut Field) {
        for (i, pos) in self.body.iter().enumerate() {
            field.set(*pos, if i == 0 { Tile::Head } else { Tile::Body });
        }
    }

    /// Advances one cell in `direction`, updating the tags on `field`.
    ///
    /// The destination is inspected before anything is written this tick. The
    /// cell the tail is leaving still carries a body tag at that point, but it
    /// counts as free: the head may follow straight into it. On `Dying` neither
    /// the snake nor the field is touched.
    pub fn move_snake(&mut self, direction: Direction, field: &mut Field) -> MoveOutcome {
        let old_head = self.head();
        let old_tail = self.tail();
        let new_head = old_head.offset(direction.into());

        if !field.contains(new_head) {
            return MoveOutcome::Dying;
        }

        let outcome = match field.get(new_head) {
            Some(Tile::Apple) => MoveOutcome::Growing,
            Some(Tile::Body) | Some(Tile::Head) => {
                if self.body.len() >= 2 && new_head == old_tail {
                    MoveOutcome::Moving
                } else {
                    MoveOutcome::Dying
                }
            }
            None => MoveOutcome::Moving,
        };

        if outcome == MoveOutcome::Dying {
            return outcome;
        }

        self.vacated = self.body.pop_back();
        if outcome == MoveOutcome::Growing {
            self.grow();
        } else {
            field.clear(old_tail);
        }

        if let Some(neck) = self.body.front() {
            field.set(*neck, Tile::Body);
        }
        self.body.push_front(new_head);
        field.set(new_head, Tile::Head);

        outcome
    }

    // Takes back the cell the tail just left as the new last segment. Its body
    // tag was never cleared, so the field needs no update.
    fn grow(&mut self) {
        if let Some(pos) = self.vacated.take() {
            self.body.push_back(pos);
        }
    }
}
