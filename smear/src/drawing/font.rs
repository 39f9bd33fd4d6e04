//! 5x7 bitmap glyphs for overlay labels.
//!
//! Labels are running cell counts, so only digits are needed. Other
//! characters advance the pen without drawing.

pub(crate) const GLYPH_WIDTH: u32 = 5;
pub(crate) const GLYPH_HEIGHT: u32 = 7;
/// Horizontal pen advance per character, including one column of spacing.
pub(crate) const GLYPH_ADVANCE: u32 = GLYPH_WIDTH + 1;

// Each row is 5 bits wide, MSB is the leftmost column.
const DIGITS: [[u8; GLYPH_HEIGHT as usize]; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110], // 0
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // 1
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111], // 2
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110], // 3
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010], // 4
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110], // 5
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110], // 6
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000], // 7
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110], // 8
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100], // 9
];

/// Rows of the glyph for `ch`, or `None` for characters without a glyph.
pub(crate) fn glyph(ch: char) -> Option<&'static [u8; GLYPH_HEIGHT as usize]> {
    ch.to_digit(10).map(|d| &DIGITS[d as usize])
}

/// Lit cells of a glyph as (column, row), row 0 at the top.
pub(crate) fn lit_cells(rows: &[u8; GLYPH_HEIGHT as usize]) -> impl Iterator<Item = (u32, u32)> + '_ {
    rows.iter().enumerate().flat_map(|(row, bits)| {
        (0..GLYPH_WIDTH).filter_map(move |col| {
            let mask = 1u8 << (GLYPH_WIDTH - 1 - col);
            (bits & mask != 0).then_some((col, row as u32))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_digit_has_a_glyph() {
        for ch in '0'..='9' {
            let rows = glyph(ch).unwrap();
            assert!(lit_cells(rows).count() > 0, "digit {ch} is blank");
        }
        assert!(glyph('x').is_none());
        assert!(glyph(' ').is_none());
    }

    #[test]
    fn test_one_is_centered_column() {
        let cells: Vec<_> = lit_cells(glyph('1').unwrap()).collect();
        // Stem of "1" sits in the middle column on every row.
        for row in 0..GLYPH_HEIGHT {
            assert!(cells.contains(&(2, row)));
        }
    }
}
