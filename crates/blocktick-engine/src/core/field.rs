use std::fmt;

use arrayvec::ArrayVec;

use super::{
    piece::{Piece, PieceKind},
    point::Point,
};
use crate::PlacementError;

/// The grid of locked cells.
///
/// Cells are stored row by row starting from the bottom row, each holding
/// `0` for empty or the locking piece's occupant id. Above the `height`
/// visible rows sit `hidden_rows` extra rows that pieces may occupy but
/// adapters do not draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    width: u16,
    height: u16,
    hidden_rows: u16,
    cells: Vec<u8>,
}

impl Default for Field {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }
}

impl Field {
    pub const DEFAULT_WIDTH: u16 = 10;
    pub const DEFAULT_HEIGHT: u16 = 20;
    pub const DEFAULT_HIDDEN_ROWS: u16 = 4;
    /// Narrowest field that can hold a horizontal I piece.
    pub const MIN_WIDTH: u16 = 4;
    /// Column of the spawn anchor.
    pub const SPAWN_X: i32 = 3;

    /// Creates an empty field with [`Field::DEFAULT_HIDDEN_ROWS`] hidden rows.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_hidden_rows(width, height, Self::DEFAULT_HIDDEN_ROWS)
    }

    #[must_use]
    pub fn with_hidden_rows(width: u16, height: u16, hidden_rows: u16) -> Self {
        assert!(
            width >= Self::MIN_WIDTH,
            "field width must be at least {}",
            Self::MIN_WIDTH
        );
        assert!(height > 0, "field height must be positive");
        let rows = usize::from(height) + usize::from(hidden_rows);
        Self {
            width,
            height,
            hidden_rows,
            cells: vec![0; usize::from(width) * rows],
        }
    }

    /// Builds a field from a picture, top line first.
    ///
    /// `.` is an empty cell and a piece letter (`IOTSZJL`) is a cell locked
    /// by that kind. The result has no hidden rows.
    ///
    /// # Example
    ///
    /// ```
    /// use blocktick_engine::{Field, PieceKind};
    ///
    /// let field = Field::from_ascii(
    ///     "
    ///     ....
    ///     T...
    ///     ",
    /// );
    /// assert_eq!(field.occupant(0, 0), Some(PieceKind::T));
    /// assert_eq!(field.occupant(0, 1), None);
    /// ```
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        let width = lines
            .first()
            .map_or(0, |line| u16::try_from(line.chars().count()).unwrap_or(u16::MAX));
        let mut field = Self::with_hidden_rows(width, height, 0);
        for (y, line) in lines.iter().rev().enumerate() {
            assert_eq!(
                line.chars().count(),
                usize::from(width),
                "every line must have the same width"
            );
            for (x, c) in line.chars().enumerate() {
                let id = match c {
                    '.' => 0,
                    c => PieceKind::from_char(c)
                        .unwrap_or_else(|| panic!("unexpected cell character {c:?}"))
                        .occupant_id(),
                };
                let index = field.index(x, y);
                field.cells[index] = id;
            }
        }
        field
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Number of visible rows.
    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub fn hidden_rows(&self) -> u16 {
        self.hidden_rows
    }

    /// Number of stored rows, visible and hidden.
    #[must_use]
    pub fn total_height(&self) -> usize {
        usize::from(self.height) + usize::from(self.hidden_rows)
    }

    /// Origin at which new pieces appear.
    #[must_use]
    pub fn spawn_origin(&self) -> Point {
        Self::spawn_origin_for(self.height)
    }

    pub(crate) const fn spawn_origin_for(height: u16) -> Point {
        Point::new(Self::SPAWN_X, height as i32 - 3)
    }

    /// Returns the cell value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the stored rows.
    #[must_use]
    pub fn at(&self, x: usize, y: usize) -> u8 {
        assert!(
            x < usize::from(self.width) && y < self.total_height(),
            "cell ({x}, {y}) is outside the field"
        );
        self.cells[self.index(x, y)]
    }

    /// Returns the cell value at `(x, y)`, or `None` outside the stored rows.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        let (x, y) = self.checked_coords(x, y)?;
        Some(self.cells[self.index(x, y)])
    }

    #[must_use]
    pub fn occupant(&self, x: i32, y: i32) -> Option<PieceKind> {
        self.get(x, y).and_then(PieceKind::from_occupant_id)
    }

    /// Whether `(x, y)` holds a locked cell.
    ///
    /// Coordinates outside the stored rows read as empty; wall and floor
    /// checks belong to the caller.
    #[must_use]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(|id| id != 0)
    }

    #[must_use]
    pub fn row(&self, y: usize) -> &[u8] {
        let width = usize::from(self.width);
        &self.cells[y * width..][..width]
    }

    /// Stored rows from the bottom up, hidden rows included.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[u8]> + '_ {
        self.cells.chunks_exact(usize::from(self.width))
    }

    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y).iter().all(|&id| id != 0)
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&id| id != 0).count()
    }

    /// Writes the piece's cells into the grid.
    ///
    /// Nothing is written unless every cell lies inside the stored rows.
    pub fn place_piece(&mut self, piece: &Piece) -> Result<(), PlacementError> {
        let mut indices = ArrayVec::<usize, 4>::new();
        for Point { x, y } in piece.cells() {
            let (cx, cy) = self
                .checked_coords(x, y)
                .ok_or(PlacementError { x, y })?;
            indices.push(self.index(cx, cy));
        }
        let id = piece.kind().occupant_id();
        for index in indices {
            debug_assert_eq!(self.cells[index], 0, "placing over a locked cell");
            self.cells[index] = id;
        }
        Ok(())
    }

    /// Removes every full row and returns how many were removed.
    ///
    /// Rows above a cleared row shift down by one and an empty row enters at
    /// the top. The shifted row is examined again at the same index, so
    /// adjacent full rows are all caught in a single call.
    pub fn clear_lines(&mut self) -> usize {
        let width = usize::from(self.width);
        let mut cleared = 0;
        let mut y = 0;
        while y < self.total_height() {
            if self.is_row_full(y) {
                let start = y * width;
                self.cells.copy_within(start + width.., start);
                let top = self.cells.len() - width;
                self.cells[top..].fill(0);
                cleared += 1;
            } else {
                y += 1;
            }
        }
        cleared
    }

    fn index(&self, x: usize, y: usize) -> usize {
        x + usize::from(self.width) * y
    }

    fn checked_coords(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < usize::from(self.width) && y < self.total_height()).then_some((x, y))
    }
}

impl fmt::Display for Field {
    /// Draws the stored rows top line first, in the format read by
    /// [`Field::from_ascii`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows().rev() {
            for &id in row {
                let c = PieceKind::from_occupant_id(id).map_or('.', PieceKind::as_char);
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::piece::PieceRotation;

    #[test]
    fn test_new_field_is_empty() {
        let field = Field::new(10, 20);
        assert_eq!(field.width(), 10);
        assert_eq!(field.height(), 20);
        assert_eq!(field.hidden_rows(), 4);
        assert_eq!(field.total_height(), 24);
        assert_eq!(field.occupied_count(), 0);
        assert_eq!(field.spawn_origin(), Point::new(3, 17));
        assert_eq!(field, Field::default());
    }

    #[test]
    fn test_accessors_out_of_range() {
        let field = Field::new(10, 20);
        assert_eq!(field.get(-1, 0), None);
        assert_eq!(field.get(10, 0), None);
        assert_eq!(field.get(0, 24), None);
        assert_eq!(field.get(9, 23), Some(0));
        assert!(!field.is_occupied(0, 100));
        assert!(!field.is_occupied(-3, -3));
    }

    #[test]
    #[should_panic(expected = "outside the field")]
    fn test_at_out_of_range_panics() {
        let field = Field::new(10, 20);
        let _ = field.at(10, 0);
    }

    #[test]
    #[should_panic(expected = "field width")]
    fn test_too_narrow_panics() {
        let _ = Field::new(3, 20);
    }

    #[test]
    fn test_place_piece_writes_occupant_id() {
        let mut field = Field::new(10, 20);
        let piece = Piece::with_placement(PieceKind::O, PieceRotation::SPAWN, Point::new(3, -1));
        field.place_piece(&piece).unwrap();
        assert_eq!(field.occupied_count(), 4);
        for (x, y) in [(4, 0), (5, 0), (4, 1), (5, 1)] {
            assert_eq!(field.at(x, y), PieceKind::O.occupant_id());
        }
        assert_eq!(field.occupant(4, 0), Some(PieceKind::O));
    }

    #[test]
    fn test_place_piece_outside_writes_nothing() {
        let mut field = Field::new(10, 20);
        // Top row of the O sits one row above the hidden rows.
        let piece = Piece::with_placement(PieceKind::O, PieceRotation::SPAWN, Point::new(0, 22));
        let err = field.place_piece(&piece).unwrap_err();
        assert_eq!(err, PlacementError { x: 1, y: 24 });
        assert_eq!(field.occupied_count(), 0);
    }

    #[test]
    fn test_clear_lines_with_gap() {
        // Rows 2 and 4 are full.
        let mut field = Field::from_ascii(
            "
            ..S.
            IIII
            .T..
            JJJJ
            .L..
            O...
            ",
        );
        assert_eq!(field.clear_lines(), 2);
        assert_eq!(field.to_string(), "....\n....\n..S.\n.T..\n.L..\nO...\n");
    }

    #[test]
    fn test_clear_adjacent_lines() {
        let mut field = Field::from_ascii(
            "
            ..S.
            TTTT
            IIII
            ZZZZ
            O...
            ",
        );
        assert_eq!(field.clear_lines(), 3);
        assert_eq!(field.to_string(), "....\n....\n....\n..S.\nO...\n");
    }

    #[test]
    fn test_clear_without_full_rows() {
        let mut field = Field::from_ascii(
            "
            .TT.
            T.TT
            ",
        );
        let before = field.clone();
        assert_eq!(field.clear_lines(), 0);
        assert_eq!(field, before);
    }

    #[test]
    fn test_display_round_trips_ascii() {
        let art = "L...\n.SS.\nIIIO\n";
        assert_eq!(Field::from_ascii(art).to_string(), art);
    }
}
