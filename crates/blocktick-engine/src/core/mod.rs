pub use self::{field::*, piece::*, point::*, wall_kick::*};

pub(crate) mod field;
pub(crate) mod piece;
pub(crate) mod point;
pub(crate) mod wall_kick;
