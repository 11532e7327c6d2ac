//! Runtime gameplay tuning, optionally loaded from a TOML file.
//!
//! Every field defaults to the matching constant in `constants.rs`, and the
//! struct is `#[serde(default)]`, so a file only needs the keys it changes:
//!
//! ```toml
//! base_object_speed = 5.0
//! start_lives = 5
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::constants::*;
use crate::error::{RiverError, RiverResult};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_TUNING_FILE: &str = "river_run.toml";

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // ── Viewport & pacing ────────────────────────────────────────────────────
    pub viewport_width: i32,
    pub viewport_height: i32,
    pub fps: u32,
    pub scroll_speed: f32,

    // ── Player ───────────────────────────────────────────────────────────────
    pub player_speed: i32,
    pub player_vertical_factor: f32,
    pub playfield_inset_left: i32,
    pub playfield_inset_right: i32,
    pub playfield_inset_top: i32,
    pub playfield_inset_bottom: i32,
    pub player_start_offset_y: i32,

    // ── Falling objects ──────────────────────────────────────────────────────
    pub base_object_speed: f32,
    pub max_object_speed: f32,
    pub speed_step: f32,
    pub speed_step_interval_ms: u64,
    pub pickup_speed_factor: f32,
    pub spawn_hazard_ms: u64,
    pub spawn_pickup_ms: u64,
    pub spawn_margin: i32,
    pub spawn_buffer: i32,
    pub cull_margin: i32,

    // ── Lives ────────────────────────────────────────────────────────────────
    pub start_lives: u32,
    pub hit_cooldown_ms: u64,

    // ── Hitboxes ─────────────────────────────────────────────────────────────
    pub player_erosion: u32,
    pub hazard_erosion: u32,
    pub pickup_erosion: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            fps: FPS,
            scroll_speed: SCROLL_SPEED,
            player_speed: PLAYER_SPEED,
            player_vertical_factor: PLAYER_VERTICAL_FACTOR,
            playfield_inset_left: PLAYFIELD_INSET_LEFT,
            playfield_inset_right: PLAYFIELD_INSET_RIGHT,
            playfield_inset_top: PLAYFIELD_INSET_TOP,
            playfield_inset_bottom: PLAYFIELD_INSET_BOTTOM,
            player_start_offset_y: PLAYER_START_OFFSET_Y,
            base_object_speed: BASE_OBJECT_SPEED,
            max_object_speed: MAX_OBJECT_SPEED,
            speed_step: SPEED_STEP,
            speed_step_interval_ms: SPEED_STEP_INTERVAL_MS,
            pickup_speed_factor: PICKUP_SPEED_FACTOR,
            spawn_hazard_ms: SPAWN_HAZARD_MS,
            spawn_pickup_ms: SPAWN_PICKUP_MS,
            spawn_margin: SPAWN_MARGIN,
            spawn_buffer: SPAWN_BUFFER,
            cull_margin: CULL_MARGIN,
            start_lives: START_LIVES,
            hit_cooldown_ms: HIT_COOLDOWN_MS,
            player_erosion: PLAYER_EROSION,
            hazard_erosion: HAZARD_EROSION,
            pickup_erosion: PICKUP_EROSION,
        }
    }
}

impl Tuning {
    /// Parse a tuning table from TOML text and validate it.
    pub fn from_toml_str(text: &str, path: &Path) -> RiverResult<Self> {
        let tuning: Tuning = toml::from_str(text).map_err(|source| RiverError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read and validate a tuning file.
    pub fn load(path: &Path) -> RiverResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let tuning = Self::from_toml_str(&text, path)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Use `path` if given, else [`DEFAULT_TUNING_FILE`] when it exists,
    /// else the built-in defaults.
    pub fn resolve(path: Option<&Path>) -> RiverResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let fallback = Path::new(DEFAULT_TUNING_FILE);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    log::info!("No tuning file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> RiverResult<()> {
        fn invalid(name: &'static str, reason: &'static str) -> RiverResult<()> {
            Err(RiverError::InvalidTuning { name, reason })
        }

        if self.viewport_width <= 0 {
            return invalid("viewport_width", "must be positive");
        }
        if self.viewport_height <= 0 {
            return invalid("viewport_height", "must be positive");
        }
        if self.fps == 0 {
            return invalid("fps", "must be positive");
        }
        if self.spawn_hazard_ms == 0 {
            return invalid("spawn_hazard_ms", "must be positive");
        }
        if self.spawn_pickup_ms == 0 {
            return invalid("spawn_pickup_ms", "must be positive");
        }
        if self.speed_step_interval_ms == 0 {
            return invalid("speed_step_interval_ms", "must be positive");
        }
        if self.player_speed <= 0 {
            return invalid("player_speed", "must be positive");
        }
        if !(self.scroll_speed.is_finite() && self.scroll_speed >= 0.0) {
            return invalid("scroll_speed", "must be a finite, non-negative number");
        }
        if !(self.base_object_speed.is_finite() && self.base_object_speed > 0.0) {
            return invalid("base_object_speed", "must be a finite, positive number");
        }
        if !(self.max_object_speed.is_finite() && self.max_object_speed > 0.0) {
            return invalid("max_object_speed", "must be a finite, positive number");
        }
        if self.base_object_speed > self.max_object_speed {
            return invalid("base_object_speed", "must not exceed max_object_speed");
        }
        if !(self.speed_step.is_finite() && self.speed_step >= 0.0) {
            return invalid("speed_step", "must be a finite, non-negative number");
        }

        let factors = [
            ("pickup_speed_factor", self.pickup_speed_factor),
            ("player_vertical_factor", self.player_vertical_factor),
        ];
        for (name, factor) in factors {
            if !(factor > 0.0 && factor <= 1.0) {
                return invalid(name, "must be in (0, 1]");
            }
        }

        let margins = [
            ("playfield_inset_left", self.playfield_inset_left),
            ("playfield_inset_right", self.playfield_inset_right),
            ("playfield_inset_top", self.playfield_inset_top),
            ("playfield_inset_bottom", self.playfield_inset_bottom),
            ("player_start_offset_y", self.player_start_offset_y),
            ("spawn_margin", self.spawn_margin),
            ("spawn_buffer", self.spawn_buffer),
            ("cull_margin", self.cull_margin),
        ];
        for (name, margin) in margins {
            if margin < 0 {
                return invalid(name, "must not be negative");
            }
        }
        if self.start_lives == 0 {
            return invalid("start_lives", "must be at least 1");
        }
        Ok(())
    }

    /// Frame budget in milliseconds.
    pub fn frame_ms(&self) -> u64 {
        (1000 / self.fps.max(1)) as u64
    }
}
