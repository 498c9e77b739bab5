//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per external call, run to completion
//! - Seeded RNG only, threaded explicitly
//! - Collections owned exclusively by `GameState`, compacted after each pass
//! - No rendering or platform dependencies

pub mod clock;
pub mod geom;
pub mod state;
pub mod tick;

pub use clock::{Clock, FrameMode};
pub use geom::Rect;
pub use state::{
    BadGuy, Explosion, Facing, GameEvent, GameState, HitOutcome, Player, Snow, Star,
};
pub use tick::{TickInput, tick};
