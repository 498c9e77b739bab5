//! Game state and entity types
//!
//! Everything the sim mutates lives here, owned exclusively by [`GameState`].
//! Entities never remove themselves mid-iteration; they mark state
//! (`defeated`, `done`) and the tick pass compacts the collections after all
//! per-entity updates.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::{Clock, FrameMode};
use super::geom::Rect;
use crate::consts::*;
use crate::roster::Roster;

/// Horizontal facing for the player and bad guys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Sound/display requests produced by the sim, drained by the host each frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An attack swing just started (swoosh cue)
    Swing,
    /// A swing connected with a bad guy that survived
    Hit { calories: u64 },
    /// A bad guy ran out of health
    Defeated { calories: u64, boss: bool },
}

/// The user-controlled entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub facing: Facing,
    /// Tick the current swing started; `Some` iff attacking. Doubles as the
    /// one-hit-per-swing token handed to [`BadGuy::receive_hit`].
    pub attack_started: Option<u64>,
    /// True only on ticks showing the connecting attack frame
    pub hitting: bool,
    /// Current sheet frame of whichever animation is playing (display only)
    pub anim_frame: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_Y),
            facing: Facing::Right,
            attack_started: None,
            hitting: false,
            anim_frame: 0,
        }
    }
}

impl Player {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, PLAYER_W, PLAYER_H)
    }

    /// Strike zone, offset past sprite center toward the facing side.
    /// The sprite art is not horizontally centered, hence the extra shift
    /// when facing left.
    pub fn hit_box(&self) -> Rect {
        let mut shift = PLAYER_W / 2.0 + self.facing.sign() * 30.0;
        if self.facing == Facing::Left {
            shift -= HIT_BOX_W;
        }
        Rect::new(
            self.pos.x + shift,
            self.pos.y + 10.0,
            HIT_BOX_W,
            HIT_BOX_H,
        )
    }

    pub fn attacking(&self) -> bool {
        self.attack_started.is_some()
    }

    /// Start a swing. A no-op mid-swing: one swing cannot be re-triggered.
    pub fn attack(&mut self, clock: Clock) {
        if self.attack_started.is_none() {
            self.attack_started = Some(clock.now());
        }
    }

    pub fn move_left(&mut self) {
        self.facing = Facing::Left;
        self.step();
    }

    pub fn move_right(&mut self) {
        self.facing = Facing::Right;
        self.step();
    }

    /// Shift in the facing direction; out-of-range moves are rejected
    /// outright rather than clamped to the boundary.
    fn step(&mut self) {
        let new_x = self.pos.x + PLAYER_SPEED * self.facing.sign();
        if (PLAYER_MIN_X..PLAYER_MAX_X).contains(&new_x) {
            self.pos.x = new_x;
        }
    }

    /// Advance the attack or idle animation and refresh the one-frame
    /// `hitting` flag. Returns the swing token when this tick lands on the
    /// connecting frame.
    pub fn update_animation(&mut self, clock: Clock, events: &mut Vec<GameEvent>) -> Option<u64> {
        self.hitting = false;
        match self.attack_started {
            Some(started) => {
                if clock.now() == started + 1 {
                    events.push(GameEvent::Swing);
                }
                match clock.frame_index(started, ATTACK_FRAMES, ATTACK_HOLD, FrameMode::Once) {
                    Some(frame) => {
                        self.anim_frame = frame;
                        if frame == ATTACK_HIT_FRAME {
                            self.hitting = true;
                            return Some(started);
                        }
                    }
                    // Swing is over, back to idle
                    None => {
                        self.attack_started = None;
                        self.anim_frame = 0;
                    }
                }
            }
            None => {
                self.anim_frame = clock
                    .frame_index(0, IDLE_FRAMES, IDLE_HOLD, FrameMode::Loop)
                    .unwrap_or(0);
            }
        }
        None
    }
}

/// Outcome of delivering a swing to a bad guy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Swing already credited against this bad guy
    Ignored,
    /// Took the hit and survived
    Staggered,
    /// Health reached zero this hit
    Defeated,
}

/// A spawned hostile entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadGuy {
    pub pos: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    pub hp: u8,
    /// Sum of the assigned snack group; drives scale and boss eligibility
    pub calories: u64,
    /// Fixed at construction against the roster-wide maximum
    pub is_boss: bool,
    pub created: u64,
    pub last_move: u64,
    /// Most recent accepted swing token; one swing credits at most one hit
    pub last_hit_token: Option<u64>,
    /// Cosmetic sprite variant, 1-based
    pub sprite_variant: u32,
    /// Set when health hits zero. Non-bosses are compacted out the same
    /// frame; the boss stays in place as a frozen corpse.
    pub defeated: bool,
}

impl BadGuy {
    pub fn new(x: f32, snacks: &[u64], roster_max: u64, clock: Clock) -> Self {
        let calories: u64 = snacks.iter().sum();
        let is_boss = calories == roster_max;
        let scale = if is_boss {
            BOSS_SCALE
        } else if roster_max > 0 {
            (calories as f32 / roster_max as f32).min(1.0) * BAD_GUY_MAX_SCALE
        } else {
            BAD_GUY_MAX_SCALE
        };
        Self {
            pos: Vec2::new(x, BAD_GUY_Y),
            size: Vec2::new(BAD_GUY_BASE_W * scale, BAD_GUY_BASE_H * scale),
            facing: Facing::Right,
            hp: if is_boss { BOSS_HP } else { BAD_GUY_HP },
            calories,
            is_boss,
            created: clock.now(),
            last_move: clock.now(),
            last_hit_token: None,
            sprite_variant: 1,
            defeated: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Irregular idle wander: only after the cooldown, and only half the
    /// time. Facing is random but forced inward near either screen edge.
    pub fn wander(&mut self, clock: Clock, rng: &mut Pcg32) {
        if !clock.elapsed(self.last_move, BAD_GUY_MOVE_COOLDOWN) || !rng.random_bool(0.5) {
            return;
        }
        self.facing = if rng.random_bool(0.5) {
            Facing::Left
        } else {
            Facing::Right
        };
        if self.pos.x < BAD_GUY_LEFT_MARGIN {
            self.facing = Facing::Right;
        }
        if self.pos.x > SCREEN_W - BAD_GUY_RIGHT_MARGIN - self.size.x {
            self.facing = Facing::Left;
        }
        self.pos.x += BAD_GUY_STEP * self.facing.sign();
        self.last_move = clock.now();
    }

    /// Cycle the cosmetic sprite variant
    pub fn update_sprite(&mut self, clock: Clock) {
        self.sprite_variant = clock
            .frame_index(
                self.created,
                BAD_GUY_SPRITE_FRAMES,
                BAD_GUY_SPRITE_HOLD,
                FrameMode::Loop,
            )
            .unwrap_or(0)
            + 1;
    }

    /// Take a swing. The same token twice is a no-op so a single swing never
    /// lands more than one hit.
    pub fn receive_hit(&mut self, token: u64) -> HitOutcome {
        if self.last_hit_token == Some(token) {
            return HitOutcome::Ignored;
        }
        self.last_hit_token = Some(token);
        self.hp = self.hp.saturating_sub(1);
        if self.hp == 0 {
            self.defeated = true;
            HitOutcome::Defeated
        } else {
            HitOutcome::Staggered
        }
    }
}

/// Short-lived visual effect spawned where a bad guy fell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub bounds: Rect,
    pub created: u64,
    pub frame: u32,
    /// Finished explosions are compacted out after the update pass
    pub done: bool,
}

impl Explosion {
    pub fn new(bounds: Rect, clock: Clock) -> Self {
        Self {
            bounds,
            created: clock.now(),
            frame: 0,
            done: false,
        }
    }

    pub fn update(&mut self, clock: Clock) {
        match clock.frame_index(
            self.created,
            EXPLOSION_FRAMES,
            EXPLOSION_HOLD,
            FrameMode::Once,
        ) {
            Some(frame) => self.frame = frame,
            None => self.done = true,
        }
    }
}

/// A falling snowflake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snow {
    pub pos: Vec2,
    /// Per-flake fall speed, fixed at spawn
    pub speed: f32,
}

impl Snow {
    pub fn spawn(x: f32, y: f32, rng: &mut Pcg32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            speed: rng.random_range(SNOW_MIN_SPEED..=SNOW_MAX_SPEED) as f32,
        }
    }

    /// Fall, with a little horizontal jitter plus the shared wind drift
    pub fn update(&mut self, rng: &mut Pcg32, wind: f32) {
        self.pos.y -= self.speed;
        let jitter = rng.random_range(-3..3) as f32;
        self.pos.x += jitter + wind;
    }

    pub fn offscreen(&self) -> bool {
        self.pos.y < 0.0
    }
}

/// Size oscillation pattern shared by all stars
const STAR_SIZE_SCALE: [f32; 4] = [1.0, 2.0, 3.0, 2.0];

/// Permanent twinkling background decoration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    /// Muted random color, one byte per channel
    pub color: [u8; 3],
    pub size: Vec2,
    base_size: f32,
    /// Oscillation hold ticks, per star
    speed: u32,
    /// Growth direction signs so stars twinkle asymmetrically
    x_dir: f32,
    y_dir: f32,
    created: u64,
}

impl Star {
    pub fn spawn(rng: &mut Pcg32, clock: Clock) -> Self {
        let shade = |rng: &mut Pcg32| 240 - rng.random_range(0..50) as u8;
        let base_size = rng.random_range(0..4) as f32;
        let x_dir = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let y_dir = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        Self {
            pos: Vec2::new(
                rng.random_range(0..SCREEN_W as i32) as f32,
                rng.random_range(0..SCREEN_H as i32) as f32,
            ),
            color: [shade(rng), shade(rng), shade(rng)],
            size: Vec2::new(base_size * x_dir, base_size * y_dir),
            base_size,
            speed: rng.random_range(8..20),
            x_dir,
            y_dir,
            created: clock.now(),
        }
    }

    /// Stars never move; only their rendered extent oscillates
    pub fn update(&mut self, clock: Clock) {
        let i = clock
            .frame_index(self.created, 4, self.speed, FrameMode::Loop)
            .unwrap_or(0);
        let scale = STAR_SIZE_SCALE[i as usize];
        self.size.x = self.base_size * self.x_dir + scale * self.x_dir;
        self.size.y = self.base_size * self.y_dir + scale * self.y_dir;
    }
}

/// Complete encounter state (deterministic, serializable).
///
/// Created once per run; an external reset discards and rebuilds it whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG threaded explicitly through every random decision
    pub rng: Pcg32,
    pub clock: Clock,
    pub player: Player,
    pub bad_guys: Vec<BadGuy>,
    pub explosions: Vec<Explosion>,
    pub snow: Vec<Snow>,
    pub stars: Vec<Star>,
    /// Shared horizontal drift applied to all snow
    pub wind: f32,
    /// Pending snack groups, popped from the front as bad guys spawn.
    /// Exhaustion permanently disables spawning; it is never an error.
    pub roster_queue: VecDeque<Vec<u64>>,
    /// Roster-wide maximum group sum, fixed at load
    pub roster_max: u64,
    /// Set when the boss falls; freezes the whole sim
    pub terminal: bool,
    /// Largest calories observed among live bad guys, for UI emphasis
    pub biggest_seen: u64,
    /// Tick `biggest_seen` last increased
    pub biggest_seen_at: u64,
    /// Tick of the last spawn attempt (successful or abandoned)
    pub last_spawn_at: u64,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Build a fresh encounter: wind, star field, pre-seeded snow, and the
    /// two starting bad guys at the fixed flanking positions.
    pub fn new(seed: u64, roster: Roster) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let clock = Clock::default();

        let wind = rng.random_range(-10..5) as f32;
        let roster_max = roster.max_calories();

        // Shuffle at load so spawn order differs per seed
        let mut groups = roster.into_groups();
        groups.shuffle(&mut rng);
        let mut roster_queue: VecDeque<Vec<u64>> = groups.into();

        let star_count = rng.random_range(STAR_MIN_COUNT..=STAR_MAX_COUNT);
        let stars = (0..star_count).map(|_| Star::spawn(&mut rng, clock)).collect();

        // Pre-seed the sky so the first frame isn't bare
        let snow_count = rng.random_range(20..70);
        let snow = (0..snow_count)
            .map(|_| {
                let x = rng.random_range(SNOW_MIN_X..SNOW_MAX_X) as f32;
                let y = rng.random_range(300..800) as f32;
                Snow::spawn(x, y, &mut rng)
            })
            .collect();

        let mut bad_guys = Vec::new();
        for x in [100.0, 1100.0] {
            if let Some(group) = roster_queue.pop_front() {
                bad_guys.push(BadGuy::new(x, &group, roster_max, clock));
            }
        }

        Self {
            seed,
            rng,
            clock,
            player: Player::default(),
            bad_guys,
            explosions: Vec::new(),
            snow,
            stars,
            wind,
            roster_queue,
            roster_max,
            terminal: false,
            biggest_seen: 0,
            biggest_seen_at: 0,
            last_spawn_at: 0,
            events: Vec::new(),
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn push_events(&mut self, events: impl IntoIterator<Item = GameEvent>) {
        self.events.extend(events);
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
