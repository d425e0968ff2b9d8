use crate::{
    ConfigError, PieceCollisionError, TopOutError,
    core::{
        field::Field,
        piece::{Piece, PieceKind},
        point::Point,
        wall_kick::WallKick,
    },
};

use super::{
    Control, EngineConfig, FrameStats, GameStats, KeyState, MAX_PREVIEW, Preview, Randomizer, Rule,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum EngineState {
    Running,
    Terminated(TerminationReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum TerminationReason {
    #[display("quit")]
    Quit,
    #[display("goal reached")]
    GoalReached,
    #[display("top out")]
    TopOut,
}

/// What an adapter should draw for one visible cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum CellView {
    Empty,
    Locked(PieceKind),
    Active(PieceKind),
    Ghost(PieceKind),
}

/// A single game: field, active and held pieces, input state, rule and
/// statistics, advanced one fixed tick at a time.
///
/// The engine never reads devices or draws anything. An adapter sets control
/// flags with [`Engine::set_control`], calls [`Engine::update`] once per tick
/// and renders from the read-only accessors.
///
/// # Tick order
///
/// 1. advance held-control durations
/// 2. horizontal movement (the more recently pressed direction wins) and
///    soft drop, both with delayed auto-shift
/// 3. rotation, counter-clockwise taking precedence
/// 4. hold, if pushed this tick and allowed for the active piece
/// 5. hard drop, then place, clear lines and spawn the next piece
/// 6. recompute the ghost piece
/// 7. check for termination
/// 8. feed the tick's [`FrameStats`] to the rule and statistics
///
/// # Example
///
/// ```
/// use blocktick_engine::{Control, Engine, EngineConfig};
///
/// let mut engine = Engine::new(&EngineConfig::default())?;
/// engine.set_control(Control::HardDrop, true);
/// let frame = engine.update();
/// assert_eq!(frame.blocks_placed, 1);
/// assert!(engine.state().is_running());
/// # Ok::<(), blocktick_engine::ConfigError>(())
/// ```
#[derive(Debug)]
pub struct Engine {
    state: EngineState,
    das: u32,
    field: Field,
    active: Piece,
    ghost: Piece,
    hold: Option<Piece>,
    key_state: KeyState,
    rule: Box<dyn Rule>,
    stats: GameStats,
    randomizer: Box<dyn Randomizer>,
    wall_kick: Option<Box<dyn WallKick>>,
}

impl Engine {
    /// Validates `config` and builds an engine with the strategies it selects.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        Self::with_strategies(
            config,
            config.randomizer.build(config.seed),
            config.rule.build(),
            config.wall_kick.build(),
        )
    }

    /// Like [`Engine::new`], but with caller-supplied strategies.
    ///
    /// The field dimensions and DAS still come from `config`; its rule,
    /// randomizer, wall-kick and seed selections are ignored. A randomizer
    /// previewing more than [`MAX_PREVIEW`] pieces is rejected.
    pub fn with_strategies(
        config: &EngineConfig,
        mut randomizer: Box<dyn Randomizer>,
        rule: Box<dyn Rule>,
        wall_kick: Option<Box<dyn WallKick>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let count = randomizer.preview_count();
        if count > MAX_PREVIEW {
            return Err(ConfigError::PreviewTooLong {
                count,
                max: MAX_PREVIEW,
            });
        }
        let field = config.build_field();
        let active = Piece::spawn(randomizer.pop_next(), &field);
        let ghost = active.ghost(&field);
        Ok(Self {
            state: EngineState::Running,
            das: config.das,
            field,
            active,
            ghost,
            hold: None,
            key_state: KeyState::new(),
            rule,
            stats: GameStats::new(),
            randomizer,
            wall_kick,
        })
    }

    pub fn set_control(&mut self, control: Control, down: bool) {
        self.key_state.set(control, down);
    }

    /// Advances the game by one tick and reports what happened during it.
    ///
    /// Does nothing once the engine has terminated.
    pub fn update(&mut self) -> FrameStats {
        let mut frame = FrameStats::default();
        if self.state.is_terminated() {
            return frame;
        }

        self.key_state.update_all();
        self.update_movement();
        self.update_rotation();

        let mut result = Ok(());
        if self.key_state.is_pushed(Control::Hold) && self.active.can_be_held() {
            result = self.hold_active();
        }
        if result.is_ok() && self.key_state.is_pushed(Control::HardDrop) {
            result = self.drop_and_lock(&mut frame);
        }
        self.ghost = self.active.ghost(&self.field);

        let reason = if result.is_err() {
            Some(TerminationReason::TopOut)
        } else if self.key_state.is_pushed(Control::Quit) {
            Some(TerminationReason::Quit)
        } else if self.rule.end_condition() {
            Some(TerminationReason::GoalReached)
        } else {
            None
        };
        if let Some(reason) = reason {
            self.state = EngineState::Terminated(reason);
        }

        self.rule.update(&frame);
        self.stats.update(&frame);
        frame
    }

    fn update_movement(&mut self) {
        let left = self.key_state.duration(Control::MoveLeft);
        let right = self.key_state.duration(Control::MoveRight);
        let shift = match (left, right) {
            (0, 0) => None,
            (_, 0) => Some((Control::MoveLeft, -1)),
            (0, _) => Some((Control::MoveRight, 1)),
            (left, right) if left < right => Some((Control::MoveLeft, -1)),
            _ => Some((Control::MoveRight, 1)),
        };
        let shift =
            shift.filter(|&(control, _)| self.key_state.is_pressed_with_das(control, self.das));
        if let Some((_, dx)) = shift {
            self.active.move_by(&self.field, dx, 0);
        }
        if self.key_state.is_pressed_with_das(Control::SoftDrop, self.das) {
            self.active.move_down(&self.field);
        }
    }

    fn update_rotation(&mut self) {
        if self.key_state.is_pushed(Control::RotateLeft) {
            match &self.wall_kick {
                Some(kicks) => self.active.rotate_left(&self.field, &**kicks),
                None => self.active.rotate_left_by(&self.field, Point::ZERO),
            };
        } else if self.key_state.is_pushed(Control::RotateRight) {
            match &self.wall_kick {
                Some(kicks) => self.active.rotate_right(&self.field, &**kicks),
                None => self.active.rotate_right_by(&self.field, Point::ZERO),
            };
        }
    }

    /// Parks the active piece in the hold slot and brings in the previously
    /// held piece, or the next one from the randomizer.
    fn hold_active(&mut self) -> Result<(), TopOutError> {
        let parked = Piece::spawn(self.active.kind(), &self.field);
        self.active = match self.hold.replace(parked) {
            Some(held) => held,
            None => Piece::spawn(self.randomizer.pop_next(), &self.field),
        };
        self.active.forbid_hold();
        if self.active.collides_with(&self.field) {
            return Err(PieceCollisionError.into());
        }
        Ok(())
    }

    fn drop_and_lock(&mut self, frame: &mut FrameStats) -> Result<(), TopOutError> {
        self.active.hard_drop(&self.field);
        self.field.place_piece(&self.active)?;
        frame.blocks_placed += 1;
        frame.lines_cleared += self.field.clear_lines();
        self.active = Piece::spawn(self.randomizer.pop_next(), &self.field);
        if self.active.collides_with(&self.field) {
            return Err(PieceCollisionError.into());
        }
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Ticks processed while running.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.stats.ticks_elapsed()
    }

    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    #[must_use]
    pub fn active_piece(&self) -> &Piece {
        &self.active
    }

    /// Landing position of the active piece, as of the last tick.
    #[must_use]
    pub fn ghost_piece(&self) -> &Piece {
        &self.ghost
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.hold.as_ref().map(Piece::kind)
    }

    #[must_use]
    pub fn preview_pieces(&self) -> Preview {
        self.randomizer.preview_pieces()
    }

    #[must_use]
    pub fn key_state(&self) -> &KeyState {
        &self.key_state
    }

    #[must_use]
    pub fn rule(&self) -> &dyn Rule {
        self.rule.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn das(&self) -> u32 {
        self.das
    }

    /// Classifies a cell for drawing.
    ///
    /// The active piece is drawn over locked cells and the ghost only shows
    /// through empty ones.
    #[must_use]
    pub fn cell_view(&self, x: i32, y: i32) -> CellView {
        if self.active.occupies_cell(x, y) {
            CellView::Active(self.active.kind())
        } else if let Some(kind) = self.field.occupant(x, y) {
            CellView::Locked(kind)
        } else if self.ghost.occupies_cell(x, y) {
            CellView::Ghost(self.ghost.kind())
        } else {
            CellView::Empty
        }
    }
}
