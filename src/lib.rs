//! Snowbrawl - a snowy 2D arcade brawl
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, animation frames, combat)
//! - `roster`: Adversary roster loading and validation
//!
//! The crate contains no rendering or input code. A host drives the sim with
//! one `sim::tick` call per frame, reads [`sim::GameState`] to draw, and
//! drains [`sim::GameEvent`]s for audio cues.

pub mod roster;
pub mod sim;

pub use roster::{Roster, RosterError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;

    /// Screen dimensions, y-up (origin at the bottom-left)
    pub const SCREEN_W: f32 = 1280.0;
    pub const SCREEN_H: f32 = 720.0;

    /// Player sprite: a 40x29 sheet slice drawn at 6x
    pub const PLAYER_W: f32 = 40.0 * 6.0;
    pub const PLAYER_H: f32 = 29.0 * 6.0;
    /// Player spawn (horizontally centered, standing on the platform)
    pub const PLAYER_START_X: f32 = SCREEN_W / 2.0 - PLAYER_W / 2.0;
    pub const PLAYER_Y: f32 = 120.0;
    /// Horizontal distance covered by one move command
    pub const PLAYER_SPEED: f32 = 20.0;
    /// Movement range; moves landing outside are rejected, not clamped.
    /// The sprite slice has generous transparent borders, hence the overhang.
    pub const PLAYER_MIN_X: f32 = -80.0;
    pub const PLAYER_MAX_X: f32 = SCREEN_W - PLAYER_W + 90.0;

    /// Attack swing: 5 frames held 3 ticks each, one-shot
    pub const ATTACK_FRAMES: u32 = 5;
    pub const ATTACK_HOLD: u32 = 3;
    /// The single frame on which the weapon connects
    pub const ATTACK_HIT_FRAME: u32 = 1;
    /// Idle animation: 3 frames held 10 ticks each, looping
    pub const IDLE_FRAMES: u32 = 3;
    pub const IDLE_HOLD: u32 = 10;

    /// Hit box extent, offset toward the facing side
    pub const HIT_BOX_W: f32 = 60.0;
    pub const HIT_BOX_H: f32 = 100.0;

    /// Bad guy source art dimensions, scaled down per entity
    pub const BAD_GUY_BASE_W: f32 = 490.0;
    pub const BAD_GUY_BASE_H: f32 = 800.0;
    /// Ordinary bad guys scale with calories up to this factor
    pub const BAD_GUY_MAX_SCALE: f32 = 0.5;
    /// The boss gets a fixed larger scale
    pub const BOSS_SCALE: f32 = 0.7;
    pub const BAD_GUY_Y: f32 = 145.0;
    pub const BAD_GUY_HP: u8 = 1;
    pub const BOSS_HP: u8 = 3;
    /// Randomized-walk step and cooldown
    pub const BAD_GUY_STEP: f32 = 30.0;
    pub const BAD_GUY_MOVE_COOLDOWN: u64 = 50;
    /// Near either screen edge the walk is forced back inward
    pub const BAD_GUY_LEFT_MARGIN: f32 = 30.0;
    pub const BAD_GUY_RIGHT_MARGIN: f32 = 100.0;
    /// Cosmetic sprite variant cycle
    pub const BAD_GUY_SPRITE_FRAMES: u32 = 3;
    pub const BAD_GUY_SPRITE_HOLD: u32 = 30;

    /// Spawn policy: at most this many bad guys alive at once
    pub const MAX_BAD_GUYS: usize = 5;
    /// Minimum ticks between spawn attempts (0.5 s)
    pub const SPAWN_COOLDOWN: u64 = TICK_RATE as u64 / 2;
    /// Horizontal band new bad guys may appear in
    pub const SPAWN_MIN_X: i32 = 100;
    pub const SPAWN_MAX_X: i32 = 1100;
    /// No spawn within this distance of the player or another bad guy
    pub const SPAWN_SPACING: f32 = 100.0;

    /// Explosion animation: 3 frames held 7 ticks each, one-shot
    pub const EXPLOSION_FRAMES: u32 = 3;
    pub const EXPLOSION_HOLD: u32 = 7;

    /// Snow spawns across a band wider than the screen so wind can't
    /// leave the edges bare
    pub const SNOW_MIN_X: i32 = -200;
    pub const SNOW_MAX_X: i32 = 1600;
    /// Per-flake fall speed range (units per tick)
    pub const SNOW_MIN_SPEED: i32 = 6;
    pub const SNOW_MAX_SPEED: i32 = 9;
    pub const SNOW_SIZE: f32 = 2.0;

    /// Star field size range at initialization
    pub const STAR_MIN_COUNT: u32 = 15;
    pub const STAR_MAX_COUNT: u32 = 39;
}
