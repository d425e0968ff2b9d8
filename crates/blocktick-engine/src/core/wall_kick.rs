use std::fmt;

use super::{
    piece::{PieceKind, PieceRotation},
    point::Point,
};

/// Source of rotation offsets to try when a plain rotation collides.
///
/// `rotation` is always the state the piece is in *before* rotating, and
/// candidate `test` indices run from `0` to `count(kind) - 1` in priority
/// order.
pub trait WallKick: fmt::Debug {
    fn count(&self, kind: PieceKind) -> usize;
    fn right(&self, kind: PieceKind, rotation: PieceRotation, test: usize) -> Point;
    fn left(&self, kind: PieceKind, rotation: PieceRotation, test: usize) -> Point;
}

/// Super Rotation System kick tables.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Srs;

impl Srs {
    pub const TESTS: usize = 5;
}

type KickTable = [[Point; Srs::TESTS]; 4];

const fn p(x: i32, y: i32) -> Point {
    Point::new(x, y)
}

// Rows are indexed by the rotation state before the turn.
const JLSTZ_RIGHT: KickTable = [
    [p(0, 0), p(-1, 0), p(-1, 1), p(0, -2), p(-1, -2)], // 0 -> R
    [p(0, 0), p(1, 0), p(1, -1), p(0, 2), p(1, 2)],     // R -> 2
    [p(0, 0), p(1, 0), p(1, 1), p(0, -2), p(1, -2)],    // 2 -> L
    [p(0, 0), p(-1, 0), p(-1, -1), p(0, 2), p(-1, 2)],  // L -> 0
];

const JLSTZ_LEFT: KickTable = [
    [p(0, 0), p(1, 0), p(1, 1), p(0, -2), p(1, -2)],    // 0 -> L
    [p(0, 0), p(1, 0), p(1, -1), p(0, 2), p(1, 2)],     // R -> 0
    [p(0, 0), p(-1, 0), p(-1, 1), p(0, -2), p(-1, -2)], // 2 -> R
    [p(0, 0), p(-1, 0), p(-1, -1), p(0, 2), p(-1, 2)],  // L -> 2
];

const I_RIGHT: KickTable = [
    [p(0, 0), p(-2, 0), p(1, 0), p(-2, -1), p(1, 2)], // 0 -> R
    [p(0, 0), p(-1, 0), p(2, 0), p(-1, 2), p(2, -1)], // R -> 2
    [p(0, 0), p(2, 0), p(-1, 0), p(2, 1), p(-1, -2)], // 2 -> L
    [p(0, 0), p(1, 0), p(-2, 0), p(1, -2), p(-2, 1)], // L -> 0
];

const I_LEFT: KickTable = [
    [p(0, 0), p(-1, 0), p(2, 0), p(-1, 2), p(2, -1)], // 0 -> L
    [p(0, 0), p(2, 0), p(-1, 0), p(2, 1), p(-1, -2)], // R -> 0
    [p(0, 0), p(1, 0), p(-2, 0), p(1, -2), p(-2, 1)], // 2 -> R
    [p(0, 0), p(-2, 0), p(1, 0), p(-2, -1), p(1, 2)], // L -> 2
];

const O_KICKS: [Point; 1] = [Point::ZERO];

impl WallKick for Srs {
    fn count(&self, kind: PieceKind) -> usize {
        match kind {
            PieceKind::O => O_KICKS.len(),
            _ => Self::TESTS,
        }
    }

    fn right(&self, kind: PieceKind, rotation: PieceRotation, test: usize) -> Point {
        match kind {
            PieceKind::O => O_KICKS[test],
            PieceKind::I => I_RIGHT[rotation.index()][test],
            _ => JLSTZ_RIGHT[rotation.index()][test],
        }
    }

    fn left(&self, kind: PieceKind, rotation: PieceRotation, test: usize) -> Point {
        match kind {
            PieceKind::O => O_KICKS[test],
            PieceKind::I => I_LEFT[rotation.index()][test],
            _ => JLSTZ_LEFT[rotation.index()][test],
        }
    }
}
