/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (plus the frame's timestamp in milliseconds and, where needed,
/// an RNG handle) and returns a brand-new `GameState`. Side effects are
/// limited to the injected RNG and log output.

use std::rc::Rc;

use rand::Rng;

use crate::config::Tuning;
use crate::entities::{
    CollisionReport, Entity, EntityKind, EntityMasks, FrameInput, GameState, Hud, Phase, Rect,
    SpawnTimer, Spawner,
};
use crate::mask::{build_mask, Transparency};
use crate::sprites::{Artwork, Sprite};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the per-kind collision masks, eroding each by its tuned margin.
/// Colour-keyed art drops its key pixels from the mask.
pub fn build_masks(art: &Artwork, tuning: &Tuning) -> EntityMasks {
    let mask = |sprite: &Sprite, erosion: u32| {
        Rc::new(build_mask(sprite, Transparency::for_sprite(sprite), erosion))
    };
    EntityMasks {
        player: mask(&art.player, tuning.player_erosion),
        hazard: mask(&art.hazard, tuning.hazard_erosion),
        pickup: mask(&art.pickup, tuning.pickup_erosion),
    }
}

/// The player's boat, centred horizontally near the bottom of the viewport.
pub fn new_player(masks: &EntityMasks, tuning: &Tuning) -> Entity {
    let mask = masks.for_kind(EntityKind::Player);
    let (w, h) = (mask.width() as i32, mask.height() as i32);
    Entity {
        kind: EntityKind::Player,
        x: tuning.viewport_width / 2 - w / 2,
        y: tuning.viewport_height - tuning.player_start_offset_y - h / 2,
        speed: 0.0,
        mask,
    }
}

/// Build the process-start state: title screen, spawn timers anchored at `now`.
pub fn init_state(tuning: Tuning, masks: EntityMasks, now: u64) -> GameState {
    let spawner = Spawner {
        hazard: SpawnTimer {
            interval_ms: tuning.spawn_hazard_ms,
            last_fire_ms: now,
        },
        pickup: SpawnTimer {
            interval_ms: tuning.spawn_pickup_ms,
            last_fire_ms: now,
        },
    };
    GameState {
        phase: Phase::NotStarted,
        score: 0,
        lives: tuning.start_lives,
        object_speed: tuning.base_object_speed,
        last_hit_ms: None,
        session_start_ms: now,
        next_speedup_ms: now + tuning.speed_step_interval_ms,
        player: new_player(&masks, &tuning),
        hazards: Vec::new(),
        pickups: Vec::new(),
        spawner,
        water_offset: 0.0,
        frame: 0,
        tuning,
        masks,
    }
}

// ── Session state machine ───────────────────────────────────────────────────

/// Fresh session in `Playing`. The spawn timers are process-wide and carry over.
pub fn reset(state: &GameState, now: u64) -> GameState {
    let t = &state.tuning;
    GameState {
        phase: Phase::Playing,
        score: 0,
        lives: t.start_lives,
        object_speed: t.base_object_speed,
        last_hit_ms: None,
        session_start_ms: now,
        next_speedup_ms: now + t.speed_step_interval_ms,
        player: new_player(&state.masks, t),
        hazards: Vec::new(),
        pickups: Vec::new(),
        water_offset: 0.0,
        frame: 0,
        ..state.clone()
    }
}

/// `NotStarted → Playing`. Ignored in any other phase.
pub fn start_game(state: &GameState, now: u64) -> GameState {
    if state.phase != Phase::NotStarted {
        return state.clone();
    }
    log::info!("Session started at {now} ms");
    reset(state, now)
}

/// `GameOver → Playing`. Ignored in any other phase.
pub fn restart_game(state: &GameState, now: u64) -> GameState {
    if state.phase != Phase::GameOver {
        return state.clone();
    }
    log::info!("Session restarted at {now} ms (previous score {})", state.score);
    reset(state, now)
}

// ── Player movement ──────────────────────────────────────────────────────────

/// The rectangle the player's rect is kept inside.
pub fn playfield(tuning: &Tuning) -> Rect {
    Rect {
        x: tuning.playfield_inset_left,
        y: tuning.playfield_inset_top,
        w: tuning.viewport_width - tuning.playfield_inset_left - tuning.playfield_inset_right,
        h: tuning.viewport_height - tuning.playfield_inset_top - tuning.playfield_inset_bottom,
    }
}

/// Move `rect` the minimum distance needed to lie inside `area`. A rect
/// larger than the area along an axis is centred on that axis.
pub fn clamp_rect(rect: Rect, area: Rect) -> Rect {
    fn clamp_axis(pos: i32, len: i32, lo: i32, span: i32) -> i32 {
        if len >= span {
            lo + span / 2 - len / 2
        } else if pos < lo {
            lo
        } else if pos + len > lo + span {
            lo + span - len
        } else {
            pos
        }
    }
    Rect {
        x: clamp_axis(rect.x, rect.w, area.x, area.w),
        y: clamp_axis(rect.y, rect.h, area.y, area.h),
        ..rect
    }
}

/// Apply held direction keys to the player and clamp to the playfield.
/// Vertical movement is damped relative to horizontal.
pub fn move_player(state: &GameState, input: &FrameInput) -> GameState {
    let t = &state.tuning;
    let vertical = (t.player_speed as f32 * t.player_vertical_factor) as i32;

    let mut dx = 0;
    let mut dy = 0;
    if input.left {
        dx -= t.player_speed;
    }
    if input.right {
        dx += t.player_speed;
    }
    if input.up {
        dy -= vertical;
    }
    if input.down {
        dy += vertical;
    }

    let moved = Rect {
        x: state.player.x + dx,
        y: state.player.y + dy,
        ..state.player.bounds()
    };
    let clamped = clamp_rect(moved, playfield(t));

    GameState {
        player: Entity {
            x: clamped.x,
            y: clamped.y,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

// ── Spawning ─────────────────────────────────────────────────────────────────

/// Random left edge for a new falling object of the given width, keeping
/// `spawn_margin` clear on both sides. Too-wide objects are centred.
pub fn spawn_x_for_width(width: i32, tuning: &Tuning, rng: &mut impl Rng) -> i32 {
    let avail = tuning.viewport_width - 2 * tuning.spawn_margin - width;
    if avail <= 0 {
        return (tuning.viewport_width - width) / 2;
    }
    tuning.spawn_margin + rng.gen_range(0..=avail)
}

/// A new hazard or pickup just above the top edge, falling at the current
/// object speed (scaled down for pickups).
pub fn spawn_falling(state: &GameState, kind: EntityKind, rng: &mut impl Rng) -> Entity {
    let t = &state.tuning;
    let mask = state.masks.for_kind(kind);
    let (w, h) = (mask.width() as i32, mask.height() as i32);
    let speed = match kind {
        EntityKind::Pickup => state.object_speed * t.pickup_speed_factor,
        _ => state.object_speed,
    };
    Entity {
        kind,
        x: spawn_x_for_width(w, t, rng),
        y: -h - t.spawn_buffer,
        speed,
        mask,
    }
}

/// Add one falling object of `kind` to its collection. No-op unless playing.
pub fn spawn(state: &GameState, kind: EntityKind, rng: &mut impl Rng) -> GameState {
    if state.phase != Phase::Playing {
        return state.clone();
    }
    let entity = spawn_falling(state, kind, rng);
    log::debug!("Spawned {:?} at x={} speed={:.1}", kind, entity.x, entity.speed);

    let mut next = state.clone();
    match kind {
        EntityKind::Hazard => next.hazards.push(entity),
        EntityKind::Pickup => next.pickups.push(entity),
        EntityKind::Player => {}
    }
    next
}

/// Fire the timer if a full interval has elapsed since it last fired.
///
/// At most one firing per poll. The next deadline advances by exactly one
/// interval to keep the cadence; if the poll fell more than a whole interval
/// behind, the timer re-anchors to `now` instead of bursting.
pub fn poll_timer(timer: SpawnTimer, now: u64) -> (SpawnTimer, bool) {
    if now.saturating_sub(timer.last_fire_ms) < timer.interval_ms {
        return (timer, false);
    }
    let mut last = timer.last_fire_ms + timer.interval_ms;
    if now.saturating_sub(last) >= timer.interval_ms {
        last = now;
    }
    (
        SpawnTimer {
            last_fire_ms: last,
            ..timer
        },
        true,
    )
}

/// Poll both spawn timers and, while playing, emit what fired.
pub fn run_spawner(state: &GameState, now: u64, rng: &mut impl Rng) -> GameState {
    let (hazard_timer, hazard_due) = poll_timer(state.spawner.hazard, now);
    let (pickup_timer, pickup_due) = poll_timer(state.spawner.pickup, now);

    let mut next = GameState {
        spawner: Spawner {
            hazard: hazard_timer,
            pickup: pickup_timer,
        },
        ..state.clone()
    };
    if hazard_due {
        next = spawn(&next, EntityKind::Hazard, rng);
    }
    if pickup_due {
        next = spawn(&next, EntityKind::Pickup, rng);
    }
    next
}

// ── Motion ───────────────────────────────────────────────────────────────────

/// Move every hazard and pickup down by its speed (whole pixels) and drop
/// those whose top edge has passed below the viewport by the cull margin.
pub fn advance_falling(state: &GameState) -> GameState {
    let t = &state.tuning;
    let cull_below = t.viewport_height + t.cull_margin;
    let advance = |list: &[Entity]| -> Vec<Entity> {
        list.iter()
            .map(|e| Entity {
                y: e.y + e.speed as i32,
                ..e.clone()
            })
            .filter(|e| e.y <= cull_below)
            .collect()
    };

    GameState {
        hazards: advance(state.hazards.as_slice()),
        pickups: advance(state.pickups.as_slice()),
        ..state.clone()
    }
}

/// Scroll the water background, wrapping at the viewport height.
pub fn scroll_water(state: &GameState) -> GameState {
    let height = state.tuning.viewport_height as f32;
    let mut offset = state.water_offset + state.tuning.scroll_speed;
    if offset >= height {
        offset -= height;
    }
    GameState {
        water_offset: offset,
        ..state.clone()
    }
}

// ── Difficulty ramp ──────────────────────────────────────────────────────────

/// One speed step if `now` has reached the next threshold, capped at the
/// maximum. The threshold advances by a fixed interval from its previous
/// value, so thresholds stay exact multiples of the interval from session
/// start; a badly delayed frame still only gets one step.
pub fn step_speed(state: &GameState, now: u64) -> GameState {
    if now < state.next_speedup_ms {
        return state.clone();
    }
    let t = &state.tuning;
    let speed = (state.object_speed + t.speed_step).min(t.max_object_speed);
    log::debug!("Object speed {:.1} -> {:.1}", state.object_speed, speed);
    GameState {
        object_speed: speed,
        next_speedup_ms: state.next_speedup_ms + t.speed_step_interval_ms,
        ..state.clone()
    }
}

// ── Collisions ───────────────────────────────────────────────────────────────

/// Pixel-accurate overlap of two entities' masks at their current positions.
pub fn collides(a: &Entity, b: &Entity) -> bool {
    a.mask.overlaps(&b.mask, b.x - a.x, b.y - a.y)
}

/// True while the post-hit invulnerability window is still open.
pub fn is_invulnerable(state: &GameState, now: u64) -> bool {
    state
        .last_hit_ms
        .is_some_and(|hit| now.saturating_sub(hit) < state.tuning.hit_cooldown_ms)
}

/// Resolve player contacts for this frame.
///
/// Every overlapping pickup is consumed for one point each. Unless the player
/// is invulnerable, any hazard overlap costs exactly one life, starts the
/// invulnerability window and clears every hazard from the board. Losing the
/// last life ends the session.
pub fn resolve_collisions(state: &GameState, now: u64) -> (GameState, CollisionReport) {
    if state.phase != Phase::Playing {
        return (state.clone(), CollisionReport::default());
    }

    // ── 1. Pickups ───────────────────────────────────────────────────────────
    let (caught, pickups): (Vec<Entity>, Vec<Entity>) = state
        .pickups
        .iter()
        .cloned()
        .partition(|p| collides(&state.player, p));
    let pickups_caught = caught.len() as u32;

    let mut next = GameState {
        pickups,
        score: state.score + pickups_caught,
        ..state.clone()
    };

    // ── 2. Hazards ───────────────────────────────────────────────────────────
    let hazard_hit = !is_invulnerable(state, now)
        && state.hazards.iter().any(|h| collides(&state.player, h));

    if hazard_hit {
        next.lives = next.lives.saturating_sub(1);
        next.last_hit_ms = Some(now);
        next.hazards.clear();
        log::info!("Hit at {now} ms, {} lives left", next.lives);

        if next.lives == 0 {
            next.phase = Phase::GameOver;
            log::info!("Game over with score {}", next.score);
        }
    }

    (
        next,
        CollisionReport {
            pickups_caught,
            hazard_hit,
        },
    )
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame at wall-clock time `now` (ms).
///
/// Order: phase inputs, spawn timers, water scroll, movement, speed ramp,
/// collisions. Everything after the spawn timers only runs while playing.
pub fn tick(state: &GameState, input: &FrameInput, now: u64, rng: &mut impl Rng) -> GameState {
    // ── 1. Phase inputs ──────────────────────────────────────────────────────
    let state = match state.phase {
        Phase::NotStarted if input.start => start_game(state, now),
        Phase::GameOver if input.restart => restart_game(state, now),
        _ => state.clone(),
    };

    // ── 2. Spawn timers run in every phase ───────────────────────────────────
    let state = run_spawner(&state, now, rng);
    if state.phase != Phase::Playing {
        return state;
    }

    // ── 3. Motion ────────────────────────────────────────────────────────────
    let state = scroll_water(&state);
    let state = move_player(&state, input);
    let state = advance_falling(&state);

    // ── 4. Ramp & collisions ─────────────────────────────────────────────────
    let state = step_speed(&state, now);
    let (state, _) = resolve_collisions(&state, now);

    GameState {
        frame: state.frame + 1,
        ..state
    }
}

/// Snapshot of the HUD values at `now`.
pub fn hud(state: &GameState, now: u64) -> Hud {
    Hud {
        phase: state.phase,
        score: state.score,
        lives: state.lives,
        speed: state.object_speed,
        flash: state.phase == Phase::Playing && is_invulnerable(state, now),
    }
}
