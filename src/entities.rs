/// All game entity types — pure data, no game logic.

use std::rc::Rc;

use crate::config::Tuning;
use crate::mask::Mask;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Title screen, waiting for the start key.
    NotStarted,
    Playing,
    /// Lives ran out; waiting for the restart key.
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    /// The boat carrying the mage.
    Player,
    /// Fishing net: costs a life on contact.
    Hazard,
    /// Shrimp: +1 score when caught.
    Pickup,
}

// ── Spatial entity ────────────────────────────────────────────────────────────

/// An axis-aligned rectangle with a collision mask.
///
/// The rect's size is the mask's size and never changes; the mask is shared
/// between every entity of the same kind.
#[derive(Clone, Debug)]
pub struct Entity {
    pub kind: EntityKind,
    /// Top-left corner, in viewport pixels.
    pub x: i32,
    pub y: i32,
    /// Vertical pixels per frame. Unused for the player, which moves by input.
    pub speed: f32,
    pub mask: Rc<Mask>,
}

impl Entity {
    pub fn width(&self) -> i32 {
        self.mask.width() as i32
    }

    pub fn height(&self) -> i32 {
        self.mask.height() as i32
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            w: self.width(),
            h: self.height(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// The three per-kind collision masks, built once at startup.
#[derive(Clone, Debug)]
pub struct EntityMasks {
    pub player: Rc<Mask>,
    pub hazard: Rc<Mask>,
    pub pickup: Rc<Mask>,
}

impl EntityMasks {
    pub fn for_kind(&self, kind: EntityKind) -> Rc<Mask> {
        match kind {
            EntityKind::Player => Rc::clone(&self.player),
            EntityKind::Hazard => Rc::clone(&self.hazard),
            EntityKind::Pickup => Rc::clone(&self.pickup),
        }
    }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

/// A fixed-cadence timer polled once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnTimer {
    pub interval_ms: u64,
    pub last_fire_ms: u64,
}

/// The two process-wide spawn timers. They keep running in every phase and
/// survive session resets; only their effect is gated on `Phase::Playing`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spawner {
    pub hazard: SpawnTimer,
    pub pickup: SpawnTimer,
}

// ── Per-frame input ───────────────────────────────────────────────────────────

/// Key state for one frame. Direction flags are "held"; `start` and
/// `restart` are one-shot presses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub start: bool,
    pub restart: bool,
}

// ── Outputs ───────────────────────────────────────────────────────────────────

/// What happened in one collision pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub pickups_caught: u32,
    pub hazard_hit: bool,
}

/// Values the renderer needs for the HUD and overlays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hud {
    pub phase: Phase,
    pub score: u32,
    pub lives: u32,
    pub speed: f32,
    /// True while the post-hit invulnerability window is open.
    pub flash: bool,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state. Cloneable so the pure update functions in
/// `compute` can return a new copy without mutating the original; masks are
/// reference-counted so the copy stays cheap.
#[derive(Clone, Debug)]
pub struct GameState {
    pub phase: Phase,
    pub score: u32,
    pub lives: u32,
    /// Current fall speed of hazards; pickups fall at a fixed fraction of it.
    pub object_speed: f32,
    /// `None` until the first hit of the session.
    pub last_hit_ms: Option<u64>,
    pub session_start_ms: u64,
    pub next_speedup_ms: u64,
    pub player: Entity,
    pub hazards: Vec<Entity>,
    pub pickups: Vec<Entity>,
    pub spawner: Spawner,
    /// Background scroll position in `[0, viewport_height)`.
    pub water_offset: f32,
    /// Frames simulated in the current session.
    pub frame: u64,
    pub tuning: Tuning,
    pub masks: EntityMasks,
}
