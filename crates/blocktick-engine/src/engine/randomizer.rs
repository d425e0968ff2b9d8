use std::fmt;

use arrayvec::ArrayVec;
use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

const BAG_SIZE: usize = PieceKind::LEN;

/// Longest preview a randomizer may expose.
pub const MAX_PREVIEW: usize = PieceKind::LEN;

/// Upcoming piece kinds, nearest first.
pub type Preview = ArrayVec<PieceKind, MAX_PREVIEW>;

/// Source of the piece sequence.
///
/// A randomizer owns its own random state. [`Randomizer::preview_pieces`]
/// must not advance that state: the pieces it returns are exactly the ones
/// the next calls to [`Randomizer::pop_next`] will produce.
///
/// A preview holds at most [`MAX_PREVIEW`] kinds. [`Engine`](super::Engine)
/// rejects randomizers whose [`Randomizer::preview_count`] exceeds it.
pub trait Randomizer: fmt::Debug {
    /// Draws the next piece kind and advances the sequence.
    fn pop_next(&mut self) -> PieceKind;

    /// Number of upcoming pieces exposed by [`Randomizer::preview_pieces`],
    /// at most [`MAX_PREVIEW`].
    fn preview_count(&self) -> usize;

    fn preview_pieces(&self) -> Preview;
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the randomizer's PCG generator. The same seed always
/// yields the same piece sequence, which makes games reproducible for
/// debugging and testing. Serialized as a 32-character hex string.
///
/// # Example
///
/// ```
/// use blocktick_engine::{BagRandomizer, PieceSeed, Randomizer as _};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let mut a = BagRandomizer::with_seed(seed);
/// let mut b = BagRandomizer::with_seed(seed);
/// assert_eq!(a.pop_next(), b.pop_next());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    fn rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        serializer.serialize_str(&format!("{num:032x}"))
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// 7-bag randomizer with a double-length buffer.
///
/// The buffer holds two bags of seven, each a shuffled permutation of every
/// piece kind. A cursor walks the buffer circularly; whenever it crosses a
/// bag boundary the bag it just finished is refilled and reshuffled. The
/// other bag stays untouched until the cursor has walked through it, so a
/// seven-piece preview never straddles a reshuffle.
///
/// Every draw window aligned to a multiple of seven contains each kind
/// exactly once.
#[derive(Debug, Clone)]
pub struct BagRandomizer {
    rng: Pcg32,
    bag: [PieceKind; 2 * BAG_SIZE],
    cursor: usize,
}

impl Default for BagRandomizer {
    fn default() -> Self {
        Self::new()
    }
}

impl BagRandomizer {
    pub const BAG_SIZE: usize = BAG_SIZE;

    /// Creates a bag randomizer seeded from the thread-local generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let mut this = Self {
            rng: seed.rng(),
            bag: [PieceKind::I; 2 * Self::BAG_SIZE],
            cursor: 0,
        };
        this.shuffle_half(0);
        this.shuffle_half(1);
        this
    }

    /// Refills bag `half` with a fresh permutation of all kinds.
    ///
    /// # Panics
    ///
    /// Panics if `half` is not `0` or `1`.
    pub fn shuffle_half(&mut self, half: usize) {
        assert!(half < 2, "bag half must be 0 or 1, got {half}");
        let slot = &mut self.bag[half * Self::BAG_SIZE..][..Self::BAG_SIZE];
        slot.copy_from_slice(&PieceKind::ALL);
        slot.shuffle(&mut self.rng);
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Randomizer for BagRandomizer {
    fn pop_next(&mut self) -> PieceKind {
        let kind = self.bag[self.cursor];
        self.cursor = (self.cursor + 1) % self.bag.len();
        if self.cursor % Self::BAG_SIZE == 0 {
            let finished = (self.cursor / Self::BAG_SIZE + 1) % 2;
            self.shuffle_half(finished);
        }
        kind
    }

    fn preview_count(&self) -> usize {
        Self::BAG_SIZE
    }

    fn preview_pieces(&self) -> Preview {
        (0..self.preview_count())
            .map(|i| self.bag[(self.cursor + i) % self.bag.len()])
            .collect()
    }
}

/// Uniform randomizer: every draw is independent.
///
/// It has nothing to show ahead of time, so its preview is empty.
#[derive(Debug, Clone)]
pub struct MemorylessRandomizer {
    rng: Pcg32,
}

impl Default for MemorylessRandomizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorylessRandomizer {
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self { rng: seed.rng() }
    }
}

impl Randomizer for MemorylessRandomizer {
    fn pop_next(&mut self) -> PieceKind {
        self.rng.random()
    }

    fn preview_count(&self) -> usize {
        0
    }

    fn preview_pieces(&self) -> Preview {
        Preview::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const SEED: PieceSeed = PieceSeed::from_bytes([
        0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
        0x88,
    ]);

    #[test]
    fn test_bag_windows_are_permutations() {
        let mut bag = BagRandomizer::with_seed(SEED);
        for window in 0..10 {
            let kinds: HashSet<_> = (0..7).map(|_| bag.pop_next()).collect();
            assert_eq!(kinds.len(), 7, "window {window}");
        }
    }

    #[test]
    fn test_bag_preview_matches_draws() {
        let mut bag = BagRandomizer::with_seed(SEED);
        for _ in 0..30 {
            let preview = bag.preview_pieces();
            assert_eq!(preview.len(), 7);
            let again = bag.preview_pieces();
            assert_eq!(preview, again);
            let drawn: Preview = {
                let mut copy = bag.clone();
                (0..7).map(|_| copy.pop_next()).collect()
            };
            assert_eq!(preview, drawn);
            bag.pop_next();
        }
    }

    #[test]
    fn test_bag_cursor_wraps() {
        let mut bag = BagRandomizer::with_seed(SEED);
        for _ in 0..14 {
            bag.pop_next();
        }
        assert_eq!(bag.cursor(), 0);
        bag.pop_next();
        assert_eq!(bag.cursor(), 1);
    }

    #[test]
    #[should_panic(expected = "bag half")]
    fn test_shuffle_half_out_of_range() {
        BagRandomizer::with_seed(SEED).shuffle_half(2);
    }

    #[test]
    fn test_memoryless_has_no_preview() {
        let mut randomizer = MemorylessRandomizer::with_seed(SEED);
        assert_eq!(randomizer.preview_count(), 0);
        assert!(randomizer.preview_pieces().is_empty());
        let mut other = MemorylessRandomizer::with_seed(SEED);
        for _ in 0..50 {
            assert_eq!(randomizer.pop_next(), other.pop_next());
        }
    }

    mod piece_seed_serialization {
        use super::*;

        #[test]
        fn test_roundtrip_random_seed() {
            let seed: PieceSeed = rand::rng().random();
            let serialized = serde_json::to_string(&seed).unwrap();
            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(seed, deserialized);
        }

        #[test]
        fn test_known_value_all_zeros() {
            let seed = PieceSeed::from_bytes([0u8; 16]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"00000000000000000000000000000000\"");
        }

        #[test]
        fn test_known_value_sequential_bytes() {
            // Big-endian: bytes appear in order as hex pairs
            let seed = PieceSeed::from_bytes([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");

            let upper: PieceSeed =
                serde_json::from_str("\"0123456789ABCDEFFEDCBA9876543210\"").unwrap();
            assert_eq!(upper, seed);
        }

        #[test]
        fn test_error_invalid_hex() {
            for json in [
                "\"ghijklmnopqrstuvwxyzghijklmnopqr\"",
                "\"0123456789abcdef0123456789abcde\"",
                "\"0123456789abcdef0123456789abcdef0\"",
                "\"\"",
            ] {
                let err = serde_json::from_str::<PieceSeed>(json).unwrap_err();
                assert!(err.to_string().contains("invalid hex"), "{json}");
            }
        }

        #[test]
        fn test_serialized_seed_preserves_sequence() {
            let serialized = serde_json::to_string(&SEED).unwrap();
            let restored: PieceSeed = serde_json::from_str(&serialized).unwrap();

            let mut a = BagRandomizer::with_seed(SEED);
            let mut b = BagRandomizer::with_seed(restored);
            for _ in 0..20 {
                assert_eq!(a.pop_next(), b.pop_next());
            }
        }
    }
}
