use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{field::Field, point::Point, wall_kick::WallKick};

/// The falling (or held) tetromino.
///
/// A piece is a small `Copy` value: its kind, rotation state, anchor on the
/// field, and two flags tracking hold and lock bookkeeping. Every movement
/// and rotation is all-or-nothing: a transform that would collide leaves the
/// piece exactly as it was and reports `false`.
///
/// # Example
///
/// ```
/// use blocktick_engine::{Field, Piece, PieceKind};
///
/// let field = Field::new(10, 20);
/// let mut piece = Piece::spawn(PieceKind::T, &field);
/// assert!(piece.move_left(&field));
/// piece.hard_drop(&field);
/// assert!(!piece.move_down(&field));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: PieceRotation,
    origin: Point,
    can_be_held: bool,
    locked: bool,
}

impl Piece {
    /// Anchor used by [`Piece::new`]: the spawn origin of a default-sized field.
    pub const SPAWN_POSITION: Point = Field::spawn_origin_for(Field::DEFAULT_HEIGHT);

    /// Creates a piece in its spawn rotation at the default field's spawn anchor.
    #[must_use]
    pub const fn new(kind: PieceKind) -> Self {
        Self::with_placement(kind, PieceRotation::SPAWN, Self::SPAWN_POSITION)
    }

    /// Creates a piece in its spawn rotation at `field`'s spawn anchor.
    #[must_use]
    pub fn spawn(kind: PieceKind, field: &Field) -> Self {
        Self::with_placement(kind, PieceRotation::SPAWN, field.spawn_origin())
    }

    #[must_use]
    pub const fn with_placement(kind: PieceKind, rotation: PieceRotation, origin: Point) -> Self {
        Self {
            kind,
            rotation,
            origin,
            can_be_held: true,
            locked: false,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Offsets of the occupied cells relative to the origin.
    #[must_use]
    pub fn cell_offsets(&self) -> &'static PieceCells {
        self.kind.cell_offsets(self.rotation)
    }

    /// Absolute field coordinates of the occupied cells.
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        self.cell_offsets().iter().map(|&offset| self.origin + offset)
    }

    #[must_use]
    pub fn can_be_held(&self) -> bool {
        self.can_be_held
    }

    pub(crate) fn forbid_hold(&mut self) {
        self.can_be_held = false;
    }

    /// Whether a hard drop has finished and the piece is waiting to be placed.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Checks the piece against the field walls, floor and locked cells.
    ///
    /// There is no ceiling: cells above the stored rows never collide.
    #[must_use]
    pub fn collides_with(&self, field: &Field) -> bool {
        let width = i32::from(field.width());
        self.cells()
            .any(|Point { x, y }| x < 0 || x >= width || y < 0 || field.is_occupied(x, y))
    }

    #[must_use]
    pub fn occupies_cell(&self, x: i32, y: i32) -> bool {
        self.cells().any(|cell| cell == Point::new(x, y))
    }

    pub fn move_left(&mut self, field: &Field) -> bool {
        self.move_by(field, -1, 0)
    }

    pub fn move_right(&mut self, field: &Field) -> bool {
        self.move_by(field, 1, 0)
    }

    pub fn move_down(&mut self, field: &Field) -> bool {
        self.move_by(field, 0, -1)
    }

    pub fn move_by(&mut self, field: &Field, dx: i32, dy: i32) -> bool {
        self.commit_if_free(field, self.moved_by(Point::new(dx, dy)))
    }

    /// Rotates clockwise and shifts by `offset`, without any kick search.
    pub fn rotate_right_by(&mut self, field: &Field, offset: Point) -> bool {
        self.commit_if_free(field, self.rotated_right().moved_by(offset))
    }

    /// Rotates counter-clockwise and shifts by `offset`, without any kick search.
    pub fn rotate_left_by(&mut self, field: &Field, offset: Point) -> bool {
        self.commit_if_free(field, self.rotated_left().moved_by(offset))
    }

    /// Rotates clockwise, trying each kick candidate in order.
    ///
    /// The first candidate that does not collide is committed. When every
    /// candidate collides the piece is left untouched.
    pub fn rotate_right<K>(&mut self, field: &Field, kicks: &K) -> bool
    where
        K: WallKick + ?Sized,
    {
        for test in 0..kicks.count(self.kind) {
            let offset = kicks.right(self.kind, self.rotation, test);
            if self.rotate_right_by(field, offset) {
                return true;
            }
        }
        false
    }

    /// Rotates counter-clockwise, trying each kick candidate in order.
    pub fn rotate_left<K>(&mut self, field: &Field, kicks: &K) -> bool
    where
        K: WallKick + ?Sized,
    {
        for test in 0..kicks.count(self.kind) {
            let offset = kicks.left(self.kind, self.rotation, test);
            if self.rotate_left_by(field, offset) {
                return true;
            }
        }
        false
    }

    /// Drops the piece as far as it goes and marks it ready to be placed.
    pub fn hard_drop(&mut self, field: &Field) {
        while self.move_down(field) {}
        self.locked = true;
    }

    /// Returns the landing position of this piece, leaving `self` untouched.
    #[must_use]
    pub fn ghost(&self, field: &Field) -> Self {
        let mut ghost = *self;
        ghost.hard_drop(field);
        ghost
    }

    fn commit_if_free(&mut self, field: &Field, candidate: Self) -> bool {
        if candidate.collides_with(field) {
            return false;
        }
        *self = candidate;
        true
    }

    fn moved_by(self, offset: Point) -> Self {
        Self {
            origin: self.origin + offset,
            ..self
        }
    }

    fn rotated_right(self) -> Self {
        Self {
            rotation: self.rotation.rotated_right(),
            ..self
        }
    }

    fn rotated_left(self) -> Self {
        Self {
            rotation: self.rotation.rotated_left(),
            ..self
        }
    }
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise ("R")
/// - `2`: 180°
/// - `3`: 270° clockwise ("L")
///
/// Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceRotation(u8);

impl PieceRotation {
    pub const SPAWN: Self = Self(0);

    #[must_use]
    pub const fn new(value: u8) -> Self {
        assert!(value < 4, "rotation state must be in 0..4");
        Self(value)
    }

    #[must_use]
    pub const fn rotated_right(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    #[must_use]
    pub const fn rotated_left(self) -> Self {
        Self((self.0 + 3) % 4)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The seven tetromino shapes.
///
/// The discriminant doubles as the type id; a locked cell stores
/// `type id + 1` so that `0` can mean "empty".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    I = 0,
    T = 1,
    L = 2,
    J = 3,
    S = 4,
    Z = 5,
    O = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::O,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::LEN {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Value written into a field cell when a piece of this kind locks.
    #[must_use]
    pub const fn occupant_id(self) -> u8 {
        self as u8 + 1
    }

    #[must_use]
    pub const fn from_occupant_id(id: u8) -> Option<Self> {
        match id {
            0 => None,
            id => Self::from_index(id as usize - 1),
        }
    }

    #[must_use]
    pub fn cell_offsets(self, rotation: PieceRotation) -> &'static PieceCells {
        &PIECE_SHAPES[self.index()][rotation.index()]
    }

    /// # Examples
    ///
    /// ```
    /// use blocktick_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::T => 'T',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::O => 'O',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'T' => Some(PieceKind::T),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'O' => Some(PieceKind::O),
            _ => None,
        }
    }
}

/// Occupied cells of one piece in one rotation, relative to the piece origin.
pub type PieceCells = [Point; 4];

/// Generates the four rotation states by rotating the spawn cells 90°
/// clockwise inside a `size`×`size` box (y pointing up).
const fn rotations(size: i32, spawn: PieceCells) -> [PieceCells; 4] {
    let mut rotates = [spawn; 4];
    let mut i = 1;
    while i < 4 {
        let mut cell = 0;
        while cell < spawn.len() {
            let Point { x, y } = rotates[i - 1][cell];
            rotates[i][cell] = Point::new(y, size - 1 - x);
            cell += 1;
        }
        i += 1;
    }
    rotates
}

const PIECE_SHAPES: [[PieceCells; 4]; PieceKind::LEN] = {
    const fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }
    [
        // I-piece
        rotations(4, [p(0, 2), p(1, 2), p(2, 2), p(3, 2)]),
        // T-piece
        rotations(3, [p(0, 1), p(1, 1), p(2, 1), p(1, 2)]),
        // L-piece
        rotations(3, [p(0, 1), p(1, 1), p(2, 1), p(2, 2)]),
        // J-piece
        rotations(3, [p(0, 1), p(1, 1), p(2, 1), p(0, 2)]),
        // S-piece
        rotations(3, [p(0, 1), p(1, 1), p(1, 2), p(2, 2)]),
        // Z-piece
        rotations(3, [p(1, 1), p(2, 1), p(0, 2), p(1, 2)]),
        // O-piece: the same cells in every state
        [[p(1, 1), p(2, 1), p(1, 2), p(2, 2)]; 4],
    ]
};
