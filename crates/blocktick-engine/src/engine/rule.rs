use std::fmt;

use super::FrameStats;

/// Win or stop condition of a game mode.
///
/// The engine asks [`Rule::end_condition`] before feeding the current tick's
/// [`FrameStats`] to [`Rule::update`], so a goal met on one tick ends the
/// game on the next.
pub trait Rule: fmt::Debug {
    fn end_condition(&self) -> bool;
    fn update(&mut self, frame: &FrameStats);
}

/// Clear a fixed number of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRace {
    goal: usize,
    cleared: usize,
}

impl Default for LineRace {
    fn default() -> Self {
        Self::new(Self::DEFAULT_GOAL)
    }
}

impl LineRace {
    pub const DEFAULT_GOAL: usize = 40;

    #[must_use]
    pub const fn new(goal: usize) -> Self {
        Self { goal, cleared: 0 }
    }

    #[must_use]
    pub const fn goal(&self) -> usize {
        self.goal
    }

    #[must_use]
    pub const fn cleared(&self) -> usize {
        self.cleared
    }

    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.goal.saturating_sub(self.cleared)
    }
}

impl Rule for LineRace {
    fn end_condition(&self) -> bool {
        self.cleared >= self.goal
    }

    fn update(&mut self, frame: &FrameStats) {
        self.cleared += frame.lines_cleared;
    }
}

/// Never ends on its own; only quitting or topping out stops the game.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Endless;

impl Rule for Endless {
    fn end_condition(&self) -> bool {
        false
    }

    fn update(&mut self, _frame: &FrameStats) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleared(lines_cleared: usize) -> FrameStats {
        FrameStats {
            blocks_placed: 1,
            lines_cleared,
        }
    }

    #[test]
    fn test_line_race_reaches_goal() {
        let mut rule = LineRace::new(5);
        assert!(!rule.end_condition());
        rule.update(&cleared(4));
        assert!(!rule.end_condition());
        assert_eq!(rule.remaining(), 1);
        rule.update(&FrameStats::default());
        assert!(!rule.end_condition());
        rule.update(&cleared(2));
        assert!(rule.end_condition());
        assert_eq!(rule.cleared(), 6);
        assert_eq!(rule.remaining(), 0);
    }

    #[test]
    fn test_line_race_default_goal() {
        assert_eq!(LineRace::default().goal(), 40);
    }

    #[test]
    fn test_endless_never_ends() {
        let mut rule = Endless;
        for _ in 0..100 {
            rule.update(&cleared(4));
        }
        assert!(!rule.end_condition());
    }
}
