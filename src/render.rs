use crate::coord::Coord;
use crate::field::{Field, EMPTY_SYMBOL};

pub fn status_line(score: u64, apples_eaten: u32) -> String {
    format!("Score: {}  Apples: {}", score, apples_eaten)
}

/// One character per cell, one line per row, then the status line.
pub fn frame_text(field: &Field, score: u64, apples_eaten: u32, bordered: bool) -> String {
    let width = field.width().max(0) as usize;
    let mut out = String::with_capacity((width + 3) * (field.height().max(0) as usize + 3));
    let edge = format!("+{}+\n", "-".repeat(width));

    if bordered {
        out.push_str(&edge);
    }
    for y in 0..field.height() {
        if bordered {
            out.push('|');
        }
        for x in 0..field.width() {
            let tile = field.get(Coord::new(x, y));
            out.push(tile.map_or(EMPTY_SYMBOL, |t| t.symbol()));
        }
        if bordered {
            out.push('|');
        }
        out.push('\n');
    }
    if bordered {
        out.push_str(&edge);
    }

    out.push_str(&status_line(score, apples_eaten));
    out.push('\n');
    out
}
