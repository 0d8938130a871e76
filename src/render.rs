use crate::projection::Grid;

pub const HEAVY: char = '▓';
pub const MEDIUM: char = '▒';
pub const LIGHT: char = '░';
pub const BLANK: char = ' ';

/// Shade for one normalised depth value.
pub fn glyph(value: f32) -> char {
    let level = value * 4.0;
    if level > 3.0 {
        HEAVY
    } else if level > 1.5 {
        MEDIUM
    } else if level > 0.0 {
        LIGHT
    } else {
        BLANK
    }
}

/// Draws a grid one character per cell, each row terminated by a newline.
pub fn render(grid: &Grid) -> String {
    let mut out = String::with_capacity(grid.row_count() * (grid.column_count() * 3 + 1));
    for row in grid.rows() {
        out.extend(row.iter().map(|&value| glyph(value)));
        out.push('\n');
    }
    out
}
