//! Invariants that must hold for arbitrary fields, pieces, seeds and inputs.

use std::collections::HashSet;

use blocktick_engine::{
    BagRandomizer, Control, Engine, EngineConfig, Field, FrameStats, KeyState, Piece, PieceKind,
    PieceRotation, PieceSeed, Point, Randomizer, RuleConfig, Srs,
};
use proptest::prelude::*;

const WIDTH: usize = 10;
const ROWS: usize = 12;

fn field_from_mask(mask: &[bool]) -> Field {
    let art: String = mask
        .chunks(WIDTH)
        .map(|row| {
            row.iter()
                .map(|&filled| if filled { 'Z' } else { '.' })
                .chain(['\n'])
                .collect::<String>()
        })
        .collect();
    Field::from_ascii(&art)
}

fn kind() -> impl Strategy<Value = PieceKind> {
    prop::sample::select(PieceKind::ALL.to_vec())
}

fn piece() -> impl Strategy<Value = Piece> {
    (kind(), 0u8..4, -2i32..10, -2i32..14).prop_map(|(kind, rotation, x, y)| {
        Piece::with_placement(kind, PieceRotation::new(rotation), Point::new(x, y))
    })
}

fn apply(piece: &mut Piece, field: &Field, op: u8) -> bool {
    match op {
        0 => piece.move_left(field),
        1 => piece.move_right(field),
        2 => piece.move_down(field),
        3 => piece.rotate_right(field, &Srs),
        4 => piece.rotate_left(field, &Srs),
        _ => piece.rotate_right_by(field, Point::ZERO),
    }
}

proptest! {
    #[test]
    fn transforms_never_leave_a_colliding_piece(
        mask in prop::collection::vec(prop::bool::weighted(0.3), WIDTH * ROWS),
        start in piece(),
        ops in prop::collection::vec(0u8..6, 0..60),
    ) {
        let field = field_from_mask(&mask);
        prop_assume!(!start.collides_with(&field));

        let mut piece = start;
        for op in ops {
            let before = piece;
            if apply(&mut piece, &field, op) {
                prop_assert!(!piece.collides_with(&field));
            } else {
                prop_assert_eq!(piece, before);
            }
        }
    }

    #[test]
    fn o_rotation_round_trips(rotation in 0u8..4, x in 0i32..7, y in 0i32..10, right_first in any::<bool>()) {
        let field = Field::new(10, 20);
        let start = Piece::with_placement(PieceKind::O, PieceRotation::new(rotation), Point::new(x, y));
        let cells: HashSet<Point> = start.cells().collect();

        let mut piece = start;
        if right_first {
            prop_assert!(piece.rotate_right(&field, &Srs));
            prop_assert_eq!(piece.cells().collect::<HashSet<_>>(), cells.clone());
            prop_assert!(piece.rotate_left(&field, &Srs));
        } else {
            prop_assert!(piece.rotate_left(&field, &Srs));
            prop_assert_eq!(piece.cells().collect::<HashSet<_>>(), cells.clone());
            prop_assert!(piece.rotate_right(&field, &Srs));
        }
        prop_assert_eq!(piece, start);
    }

    #[test]
    fn hard_drop_rests_on_something(
        mask in prop::collection::vec(prop::bool::weighted(0.2), WIDTH * ROWS),
        start in piece(),
    ) {
        let field = field_from_mask(&mask);
        prop_assume!(!start.collides_with(&field));

        let ghost = start.ghost(&field);
        let mut piece = start;
        piece.hard_drop(&field);
        prop_assert_eq!(piece, ghost);
        prop_assert!(piece.is_locked());
        prop_assert_eq!(piece.origin().x, start.origin().x);
        prop_assert!(!piece.move_down(&field));

        // Dropping again changes nothing.
        let landed = piece;
        piece.hard_drop(&field);
        prop_assert_eq!(piece, landed);
    }

    #[test]
    fn bag_windows_hold_every_kind(seed in any::<[u8; 16]>(), windows in 1usize..12) {
        let mut bag = BagRandomizer::with_seed(PieceSeed::from_bytes(seed));
        for _ in 0..windows {
            let kinds: HashSet<PieceKind> = (0..7).map(|_| bag.pop_next()).collect();
            prop_assert_eq!(kinds.len(), 7);
        }
    }

    #[test]
    fn bag_preview_predicts_draws(seed in any::<[u8; 16]>(), skip in 0usize..30) {
        let mut bag = BagRandomizer::with_seed(PieceSeed::from_bytes(seed));
        for _ in 0..skip {
            bag.pop_next();
        }
        let preview = bag.preview_pieces();
        prop_assert_eq!(bag.preview_pieces(), preview.clone());
        let drawn: Vec<PieceKind> = (0..preview.len()).map(|_| bag.pop_next()).collect();
        prop_assert_eq!(drawn.as_slice(), preview.as_slice());
    }

    #[test]
    fn das_fires_on_push_then_after_threshold(das in 0u32..20, held in 1u32..40) {
        let mut keys = KeyState::new();
        keys.key_down(Control::MoveLeft);
        for _ in 0..held {
            keys.update_all();
        }
        prop_assert_eq!(keys.duration(Control::MoveLeft), held);
        prop_assert_eq!(keys.is_pressed_with_das(Control::MoveLeft, das), held == 1 || held > das);
    }

    #[test]
    fn engine_bookkeeping_stays_consistent(
        seed in any::<[u8; 16]>(),
        inputs in prop::collection::vec(any::<u8>(), 1..300),
    ) {
        let config = EngineConfig {
            rule: RuleConfig::Endless,
            das: 2,
            seed: Some(PieceSeed::from_bytes(seed)),
            ..EngineConfig::default()
        };
        let mut engine = Engine::new(&config).unwrap();
        let width = usize::from(engine.field().width());

        for (tick, bits) in inputs.into_iter().enumerate() {
            // Seven low bits drive every control except quit.
            for (bit, control) in Control::ALL[..7].iter().enumerate() {
                engine.set_control(*control, bits & (1 << bit) != 0);
            }
            let occupied = engine.field().occupied_count();
            let frame = engine.update();

            prop_assert!(frame.blocks_placed <= 1);
            prop_assert_eq!(
                engine.field().occupied_count() + width * frame.lines_cleared,
                occupied + 4 * frame.blocks_placed
            );
            if engine.state().is_running() {
                prop_assert!(!engine.active_piece().collides_with(engine.field()));
                prop_assert_eq!(engine.stats().ticks_elapsed(), tick as u64 + 1);
            } else {
                let stats = engine.stats().clone();
                prop_assert_eq!(engine.update(), FrameStats::default());
                prop_assert_eq!(engine.stats(), &stats);
                break;
            }
        }
    }
}
