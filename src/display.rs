/// Rendering layer — all terminal I/O lives here.
///
/// The 480×720 world is sampled onto the terminal with upper-half-block
/// cells, two world samples per cell, so each cell's foreground colour is the
/// upper sample and its background the lower one. No game logic is performed
/// here; this module only translates state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};
use river_run::compute::hud;
use river_run::entities::{Entity, EntityKind, GameState, Hud, Phase};
use river_run::sprites::{Artwork, Sprite};

type Rgb = [u8; 3];

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_SCORE: Color = Color::White;
const C_HUD_SPEED: Color = Color::Grey;
const C_HUD_LIVES: Color = Color::Rgb { r: 255, g: 230, b: 230 };
const C_TITLE: Color = Color::White;
const C_TEXT: Color = Color::Rgb { r: 240, g: 240, b: 240 };
const C_PROMPT: Color = Color::Rgb { r: 255, g: 220, b: 120 };
const C_GAME_OVER: Color = Color::Rgb { r: 255, g: 230, b: 230 };
const C_HINT: Color = Color::DarkGrey;
const C_TEXT_BG: Color = Color::Rgb { r: 10, g: 30, b: 60 };

const HIT_TINT: (Rgb, u8) = ([255, 60, 60], 60);
const GAME_OVER_SHADE: (Rgb, u8) = ([0, 0, 0], 140);

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame onto a `cols × rows` terminal.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    art: &Artwork,
    now: u64,
    (cols, rows): (u16, u16),
) -> std::io::Result<()> {
    if cols == 0 || rows < 2 {
        return Ok(());
    }
    let info = hud(state, now);

    // Last row is reserved for the controls hint.
    let scene_rows = rows - 1;
    let view = Viewport::fit(state, cols, scene_rows);

    draw_scene(out, state, art, &info, &view, cols, scene_rows)?;

    match info.phase {
        Phase::NotStarted => draw_start_screen(out, cols, scene_rows)?,
        Phase::Playing => draw_hud(out, &info)?,
        Phase::GameOver => draw_game_over(out, &info, cols, scene_rows)?,
    }
    draw_controls_hint(out, rows)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── World → terminal mapping ─────────────────────────────────────────────────

/// Maps half-block "pixels" to world coordinates, keeping the world's aspect
/// ratio and centring it horizontally.
struct Viewport {
    /// World pixels per half-block pixel.
    scale: f32,
    /// First terminal column of the scene.
    left: u16,
    /// Scene width in columns.
    width: u16,
}

impl Viewport {
    fn fit(state: &GameState, cols: u16, scene_rows: u16) -> Self {
        let world_w = state.tuning.viewport_width as f32;
        let world_h = state.tuning.viewport_height as f32;
        let scale = (world_w / cols as f32).max(world_h / (scene_rows as f32 * 2.0));
        let width = ((world_w / scale) as u16).clamp(1, cols);
        Self {
            scale,
            left: (cols - width) / 2,
            width,
        }
    }

    fn world_point(&self, col: u16, half_row: u32) -> (i32, i32) {
        let x = ((col - self.left) as f32 + 0.5) * self.scale;
        let y = (half_row as f32 + 0.5) * self.scale;
        (x as i32, y as i32)
    }
}

// ── Scene ────────────────────────────────────────────────────────────────────

fn draw_scene<W: Write>(
    out: &mut W,
    state: &GameState,
    art: &Artwork,
    info: &Hud,
    view: &Viewport,
    cols: u16,
    scene_rows: u16,
) -> std::io::Result<()> {
    let overlay = match info.phase {
        Phase::GameOver => Some(GAME_OVER_SHADE),
        Phase::Playing if info.flash => Some(HIT_TINT),
        _ => None,
    };

    let mut last: Option<(Rgb, Rgb)> = None;
    for row in 0..scene_rows {
        out.queue(cursor::MoveTo(0, row))?;
        for col in 0..cols {
            if col < view.left || col >= view.left + view.width {
                if last.is_some() {
                    out.queue(style::ResetColor)?;
                    last = None;
                }
                out.queue(Print(' '))?;
                continue;
            }

            let sample = |half: u32| {
                let (x, y) = view.world_point(col, row as u32 * 2 + half);
                let rgb = world_color(state, art, x, y);
                match overlay {
                    Some((tint, alpha)) => blend(rgb, tint, alpha),
                    None => rgb,
                }
            };
            let colors = (sample(0), sample(1));

            if last != Some(colors) {
                let ([tr, tg, tb], [br, bg, bb]) = colors;
                out.queue(style::SetForegroundColor(Color::Rgb { r: tr, g: tg, b: tb }))?;
                out.queue(style::SetBackgroundColor(Color::Rgb { r: br, g: bg, b: bb }))?;
                last = Some(colors);
            }
            out.queue(Print('▀'))?;
        }
    }
    out.queue(style::ResetColor)?;
    Ok(())
}

/// Colour of the topmost thing at world point `(x, y)`.
fn world_color(state: &GameState, art: &Artwork, x: i32, y: i32) -> Rgb {
    let water = water_color(art, x, y, state.water_offset, state.tuning.viewport_height);
    let player = std::iter::once(&state.player);
    let layers = player
        .chain(state.pickups.iter().rev())
        .chain(state.hazards.iter().rev());

    for entity in layers {
        if let Some(rgb) = entity_color(entity, sprite_for(art, entity.kind), x, y, water) {
            return rgb;
        }
    }
    water
}

fn sprite_for(art: &Artwork, kind: EntityKind) -> &Sprite {
    match kind {
        EntityKind::Player => &art.player,
        EntityKind::Hazard => &art.hazard,
        EntityKind::Pickup => &art.pickup,
    }
}

/// The sprite's colour at `(x, y)` blended over `under`, or `None` where the
/// sprite is see-through.
fn entity_color(entity: &Entity, sprite: &Sprite, x: i32, y: i32, under: Rgb) -> Option<Rgb> {
    let (lx, ly) = (x - entity.x, y - entity.y);
    if lx < 0 || ly < 0 {
        return None;
    }
    let [r, g, b, a] = sprite.visible_pixel(lx as u32, ly as u32);
    if a == 0 {
        return None;
    }
    Some(blend(under, [r, g, b], a))
}

/// River background scrolled by `offset`: the water image when one was
/// loaded, else 8×6 blocks of procedural ripple.
fn water_color(art: &Artwork, x: i32, y: i32, offset: f32, height: i32) -> Rgb {
    let y = (y - offset as i32).rem_euclid(height.max(1));
    if let Some(water) = &art.water {
        let [r, g, b, _] = water.pixel(x.max(0) as u32, y as u32);
        return [r, g, b];
    }
    let (bx, by) = ((x / 8 * 8) as f32, (y / 6 * 6) as f32);
    let a = 30.0 + 25.0 * (bx * 0.08 + by * 0.06).sin();
    [20, (120.0 + a / 2.0) as u8, (200.0 + a / 3.0) as u8]
}

fn blend(base: Rgb, over: Rgb, alpha: u8) -> Rgb {
    let a = alpha as u16;
    let mix = |b: u8, o: u8| ((b as u16 * (255 - a) + o as u16 * a) / 255) as u8;
    [
        mix(base[0], over[0]),
        mix(base[1], over[1]),
        mix(base[2], over[2]),
    ]
}

// ── HUD (top-left) ────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, info: &Hud) -> std::io::Result<()> {
    out.queue(style::SetBackgroundColor(C_TEXT_BG))?;

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Shrimps: {}", info.score)))?;

    out.queue(cursor::MoveTo(1, 1))?;
    out.queue(style::SetForegroundColor(C_HUD_SPEED))?;
    out.queue(Print(format!("Speed: {:.1}", info.speed)))?;

    out.queue(cursor::MoveTo(1, 2))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(format!("Lives: {}", info.lives)))?;

    out.queue(style::ResetColor)?;
    Ok(())
}

// ── Centred text blocks ───────────────────────────────────────────────────────

/// Print `lines` centred on the scene, each at its row offset from the middle.
fn draw_centered<W: Write>(
    out: &mut W,
    lines: &[(&str, Color, i32)],
    cols: u16,
    scene_rows: u16,
) -> std::io::Result<()> {
    let cx = cols / 2;
    let cy = (scene_rows / 2) as i32;
    out.queue(style::SetBackgroundColor(C_TEXT_BG))?;
    for (msg, color, dy) in lines {
        let row = (cy + dy).clamp(0, scene_rows as i32 - 1) as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    out.queue(style::ResetColor)?;
    Ok(())
}

fn draw_start_screen<W: Write>(out: &mut W, cols: u16, scene_rows: u16) -> std::io::Result<()> {
    let lines: &[(&str, Color, i32)] = &[
        ("River Mage: Shrimp Run", C_TITLE, -4),
        ("Move: Arrow keys / WASD", C_TEXT, -1),
        ("Collect shrimps (+1)", C_TEXT, 0),
        ("Avoid fishing nets", C_TEXT, 1),
        ("Press ENTER to start", C_PROMPT, 4),
    ];
    draw_centered(out, lines, cols, scene_rows)
}

fn draw_game_over<W: Write>(
    out: &mut W,
    info: &Hud,
    cols: u16,
    scene_rows: u16,
) -> std::io::Result<()> {
    let score_line = format!("Shrimps collected: {}", info.score);
    let lines: &[(&str, Color, i32)] = &[
        ("╔══════════════════╗", C_GAME_OVER, -3),
        ("║    GAME  OVER    ║", C_GAME_OVER, -2),
        ("╚══════════════════╝", C_GAME_OVER, -1),
        (score_line.as_str(), C_GAME_OVER, 1),
        ("Press R to play again", C_PROMPT, 3),
    ];
    draw_centered(out, lines, cols, scene_rows)
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, rows: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("←↑→↓ / WASD : Move   ENTER : Start   R : Restart   Q : Quit"))?;
    Ok(())
}
