//! Tick-driven game logic built on the [`core`](crate::core) data types.
//!
//! - [`Engine`] - one game: field, active and held pieces, rule and statistics
//! - [`KeyState`] - held-duration tracking with delayed auto-shift
//! - [`Randomizer`] - piece sequence strategies ([`BagRandomizer`], [`MemorylessRandomizer`])
//! - [`Rule`] - end conditions ([`LineRace`], [`Endless`])
//! - [`GameStats`] - per-game counters fed from each tick's [`FrameStats`]
//! - [`EngineConfig`] - serde-backed setup, validated when the engine is built
//!
//! # Game Flow
//!
//! 1. Build an [`Engine`] from an [`EngineConfig`]
//! 2. Each tick, forward input as control flags and call [`Engine::update`]
//! 3. Draw from [`Engine::cell_view`], [`Engine::preview_pieces`] and friends
//! 4. Stop once [`Engine::state`] reports a termination reason

pub use self::{config::*, game_engine::*, game_stats::*, key_state::*, randomizer::*, rule::*};

mod config;
mod game_engine;
mod game_stats;
mod key_state;
mod randomizer;
mod rule;
