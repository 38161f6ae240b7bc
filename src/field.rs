use crate::coord::Coord;
use log::{debug, warn};
use rand::Rng;
use serde::Serialize;

/// Number of random draws before giving up on finding an empty cell.
pub const EMPTY_SPACE_ATTEMPTS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tile {
    Apple,
    Body,
    Head,
}

impl Tile {
    pub fn symbol(&self) -> char {
        match self {
            Tile::Apple => '@',
            Tile::Body => '*',
            Tile::Head => 'O',
        }
    }
}

pub const EMPTY_SYMBOL: char = '.';

/// The playing grid. Cells outside `[0, width) x [0, height)` are never
/// stored; every accessor checks bounds before indexing.
#[derive(Clone, Debug)]
pub struct Field {
    width: i32,
    height: i32,
    cells: Vec<Option<Tile>>,
}

impl Field {
    pub fn new(width: u16, height: u16) -> Self {
        Field {
            width: width as i32,
            height: height as i32,
            cells: vec![None; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, pos: Coord) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    fn index(&self, pos: Coord) -> Option<usize> {
        if self.contains(pos) {
            Some((pos.y * self.width + pos.x) as usize)
        } else {
            None
        }
    }

    /// Tile at `pos`; out-of-range positions read as empty.
    pub fn get(&self, pos: Coord) -> Option<Tile> {
        self.index(pos).and_then(|i| self.cells[i])
    }

    pub fn set(&mut self, pos: Coord, tile: Tile) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.cells[i] = Some(tile);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self, pos: Coord) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = None;
        }
    }

    /// Tags `pos` as an apple, whatever was there. Refuses positions outside
    /// the grid.
    pub fn place_apple(&mut self, pos: Coord) -> bool {
        let placed = self.set(pos, Tile::Apple);
        if !placed {
            warn!("Refusing to place apple outside the field at {}", pos);
        }
        placed
    }

    /// Draws up to [`EMPTY_SPACE_ATTEMPTS`] random cells and returns the first
    /// empty one, or `None` if every draw landed on an occupied cell.
    pub fn find_random_empty_space(&self, rng: &mut impl Rng) -> Option<Coord> {
        if self.cells.is_empty() {
            return None;
        }

        for _ in 0..EMPTY_SPACE_ATTEMPTS {
            let pos = Coord::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height));
            if self.get(pos).is_none() {
                return Some(pos);
            }
        }

        debug!("No empty space found after {} attempts", EMPTY_SPACE_ATTEMPTS);
        None
    }

    /// All tagged cells in row-major order.
    pub fn members(&self) -> impl Iterator<Item = (Coord, Tile)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().filter_map(move |(i, tile)| {
            tile.map(|tile| {
                let i = i as i32;
                (Coord::new(i % width, i / width), tile)
            })
        })
    }

    pub fn apples(&self) -> impl Iterator<Item = Coord> + '_ {
        self.members()
            .filter(|(_, tile)| *tile == Tile::Apple)
            .map(|(pos, _)| pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_out_of_range_reads_as_empty() {
        let field = Field::new(10, 10);

        assert_eq!(field.get(Coord::new(-1, 0)), None);
        assert_eq!(field.get(Coord::new(10, 0)), None);
        assert_eq!(field.get(Coord::new(0, -1)), None);
        assert_eq!(field.get(Coord::new(0, 10)), None);
        assert!(!field.contains(Coord::new(10, 9)));
        assert!(field.contains(Coord::new(9, 9)));
    }

    #[test]
    fn test_place_apple() {
        let mut field = Field::new(10, 10);

        assert!(field.place_apple(Coord::new(3, 4)));
        assert_eq!(field.get(Coord::new(3, 4)), Some(Tile::Apple));

        // Overwrites unconditionally inside the grid
        field.set(Coord::new(1, 1), Tile::Body);
        assert!(field.place_apple(Coord::new(1, 1)));
        assert_eq!(field.get(Coord::new(1, 1)), Some(Tile::Apple));

        assert!(!field.place_apple(Coord::new(10, 3)));
        assert!(!field.place_apple(Coord::new(-1, -1)));
        assert_eq!(field.apples().count(), 2);
    }

    #[test]
    fn test_non_square_indexing() {
        let mut field = Field::new(8, 3);
        field.set(Coord::new(7, 0), Tile::Head);
        field.set(Coord::new(0, 1), Tile::Body);

        assert_eq!(field.get(Coord::new(7, 0)), Some(Tile::Head));
        assert_eq!(field.get(Coord::new(0, 1)), Some(Tile::Body));
        assert_eq!(
            field.members().collect::<Vec<_>>(),
            vec![(Coord::new(7, 0), Tile::Head), (Coord::new(0, 1), Tile::Body)]
        );

        field.clear(Coord::new(7, 0));
        assert_eq!(field.get(Coord::new(7, 0)), None);
    }

    #[test]
    fn test_find_random_empty_space() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut field = Field::new(4, 4);
        field.set(Coord::new(0, 0), Tile::Body);

        for _ in 0..50 {
            let pos = field.find_random_empty_space(&mut rng).unwrap();
            assert!(field.contains(pos));
            assert_eq!(field.get(pos), None);
        }
    }

    #[test]
    fn test_find_random_empty_space_on_full_field() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut field = Field::new(3, 2);
        for y in 0..2 {
            for x in 0..3 {
                field.set(Coord::new(x, y), Tile::Body);
            }
        }

        assert_eq!(field.find_random_empty_space(&mut rng), None);
        assert_eq!(Field::new(0, 0).find_random_empty_space(&mut rng), None);
    }
}
