pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece collides at its spawn position")]
pub struct PieceCollisionError;

/// A piece cell fell outside the stored rows when locking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece cell ({x}, {y}) lies outside the field")]
pub struct PlacementError {
    pub x: i32,
    pub y: i32,
}

/// Why a new piece could not enter the field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum TopOutError {
    #[display("block out: {_0}")]
    BlockOut(PieceCollisionError),
    #[display("lock out: {_0}")]
    LockOut(PlacementError),
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("field width {width} is below the minimum of {min}")]
    FieldTooNarrow { width: u16, min: u16 },
    #[display("field height {height} is below the minimum of {min}")]
    FieldTooShort { height: u16, min: u16 },
    #[display("line race goal must be at least one line")]
    ZeroGoal,
    #[display("preview of {count} pieces exceeds the maximum of {max}")]
    PreviewTooLong { count: usize, max: usize },
}
