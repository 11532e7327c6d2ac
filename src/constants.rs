/// Compile-time defaults for every gameplay constant.
///
/// `Tuning::default()` reads from here; a TOML file may override any of them
/// at startup (see `config.rs`).

// ── Viewport & pacing ─────────────────────────────────────────────────────────

pub const VIEWPORT_WIDTH: i32 = 480;
pub const VIEWPORT_HEIGHT: i32 = 720;
pub const FPS: u32 = 60;

/// Background water scroll, pixels per frame.
pub const SCROLL_SPEED: f32 = 1.6;

// ── Player ────────────────────────────────────────────────────────────────────

/// Horizontal pixels per frame while a direction key is held.
pub const PLAYER_SPEED: i32 = 6;
/// Vertical movement is damped relative to horizontal.
pub const PLAYER_VERTICAL_FACTOR: f32 = 0.6;

/// Player rect is clamped to the viewport minus these insets, keeping the
/// boat on the river and clear of the HUD band at the top.
pub const PLAYFIELD_INSET_LEFT: i32 = 12;
pub const PLAYFIELD_INSET_RIGHT: i32 = 12;
pub const PLAYFIELD_INSET_TOP: i32 = 60;
pub const PLAYFIELD_INSET_BOTTOM: i32 = 20;

/// The player spawns centred horizontally, this far above the bottom edge.
pub const PLAYER_START_OFFSET_Y: i32 = 40;

// ── Falling objects ───────────────────────────────────────────────────────────

pub const BASE_OBJECT_SPEED: f32 = 4.0;
pub const MAX_OBJECT_SPEED: f32 = 10.0;
pub const SPEED_STEP: f32 = 1.0;
pub const SPEED_STEP_INTERVAL_MS: u64 = 17_000;

/// Pickups fall at this fraction of the hazard speed.
pub const PICKUP_SPEED_FACTOR: f32 = 0.9;

pub const SPAWN_HAZARD_MS: u64 = 1_150;
pub const SPAWN_PICKUP_MS: u64 = 1_400;

/// Horizontal keep-out on both sides when choosing a spawn column.
pub const SPAWN_MARGIN: i32 = 20;
/// Extra distance above the viewport a new object starts at.
pub const SPAWN_BUFFER: i32 = 10;
/// An object is culled once its top edge is this far below the viewport.
pub const CULL_MARGIN: i32 = 40;

// ── Lives ─────────────────────────────────────────────────────────────────────

pub const START_LIVES: u32 = 3;
pub const HIT_COOLDOWN_MS: u64 = 800;

// ── Hitbox erosion (pixels shaved off each side of the sprite mask) ───────────

pub const PLAYER_EROSION: u32 = 10;
pub const HAZARD_EROSION: u32 = 4;
pub const PICKUP_EROSION: u32 = 0;

// ── Sprite size limits ────────────────────────────────────────────────────────

pub const MAX_PLAYER_W: u32 = 100;
pub const MAX_PLAYER_H: u32 = 100;
pub const MAX_HAZARD_W: u32 = 120;
pub const MAX_HAZARD_H: u32 = 140;
pub const MAX_PICKUP_W: u32 = 64;
pub const MAX_PICKUP_H: u32 = 64;

/// Alpha values above this count as solid when building a mask.
pub const ALPHA_THRESHOLD: u8 = 127;
