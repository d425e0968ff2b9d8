use std::time::Duration;

/// Tick rate used to turn tick counts into wall-clock time (60 Hz).
pub const DEFAULT_TICK_RATE: u32 = 60;

/// What happened during a single engine tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Pieces locked this tick (0 or 1).
    pub blocks_placed: usize,
    /// Rows removed by this tick's line clear.
    pub lines_cleared: usize,
}

/// Running totals accumulated from every [`FrameStats`] of a game.
///
/// # Example
///
/// ```
/// use blocktick_engine::{FrameStats, GameStats};
///
/// let mut stats = GameStats::new();
/// stats.update(&FrameStats { blocks_placed: 1, lines_cleared: 4 });
/// stats.update(&FrameStats::default());
///
/// assert_eq!(stats.blocks_placed(), 1);
/// assert_eq!(stats.lines_cleared(), 4);
/// assert_eq!(stats.ticks_elapsed(), 2);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    blocks_placed: usize,
    lines_cleared: usize,
    ticks_elapsed: u64,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            blocks_placed: 0,
            lines_cleared: 0,
            ticks_elapsed: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn blocks_placed(&self) -> usize {
        self.blocks_placed
    }

    #[must_use]
    pub const fn lines_cleared(&self) -> usize {
        self.lines_cleared
    }

    #[must_use]
    pub const fn ticks_elapsed(&self) -> u64 {
        self.ticks_elapsed
    }

    /// Histogram of placements by the number of lines they cleared.
    ///
    /// - `[0]`: drops that cleared nothing
    /// - `[1]`..`[4]`: singles, doubles, triples and quadruples
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Folds one tick into the totals.
    pub const fn update(&mut self, frame: &FrameStats) {
        self.blocks_placed += frame.blocks_placed;
        self.lines_cleared += frame.lines_cleared;
        self.ticks_elapsed += 1;
        if frame.blocks_placed > 0 && frame.lines_cleared < self.line_cleared_counter.len() {
            self.line_cleared_counter[frame.lines_cleared] += 1;
        }
    }

    /// Game time represented by the elapsed ticks at `tick_rate` ticks per second.
    #[must_use]
    pub fn elapsed(&self, tick_rate: u32) -> Duration {
        let tick_rate = u64::from(tick_rate.max(1));
        let secs = self.ticks_elapsed / tick_rate;
        let nanos = (self.ticks_elapsed % tick_rate) * 1_000_000_000 / tick_rate;
        Duration::from_secs(secs) + Duration::from_nanos(nanos)
    }

    /// Pieces placed per second of game time, or `0.0` before any time passes.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn pieces_per_second(&self, tick_rate: u32) -> f64 {
        if self.ticks_elapsed == 0 {
            return 0.0;
        }
        self.blocks_placed as f64 / self.elapsed(tick_rate).as_secs_f64()
    }
}
