mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;

use river_run::compute::{build_masks, init_state, tick};
use river_run::config::Tuning;
use river_run::entities::{EntityMasks, FrameInput, GameState, Phase};
use river_run::error::RiverResult;
use river_run::sprites::{Artwork, ASSETS_DIR};

/// Log output goes here while `RUST_LOG` is set; the terminal itself is in
/// raw mode and owned by the renderer.
const LOG_FILE: &str = "river_run.log";

// ── Held-key tracking ─────────────────────────────────────────────────────────

/// A key counts as "held" if its last press/repeat event arrived within this
/// many milliseconds. Covers terminals that never report key releases: OS
/// key-repeat runs at ≥ 15 Hz, so a live key refreshes well before expiry.
const HOLD_WINDOW_MS: u64 = 133;

/// Returns true if `key` was seen within the last `HOLD_WINDOW_MS`.
fn is_held(key_seen: &HashMap<KeyCode, u64>, key: &KeyCode, now: u64) -> bool {
    key_seen
        .get(key)
        .map(|&last| now.saturating_sub(last) <= HOLD_WINDOW_MS)
        .unwrap_or(false)
}

fn any_held(key_seen: &HashMap<KeyCode, u64>, keys: &[KeyCode], now: u64) -> bool {
    keys.iter().any(|k| is_held(key_seen, k, now))
}

/// Direction flags for this frame from the held-key map.
fn held_directions(key_seen: &HashMap<KeyCode, u64>, now: u64) -> FrameInput {
    use KeyCode::{Char, Down, Left, Right, Up};
    FrameInput {
        left: any_held(key_seen, &[Left, Char('a'), Char('A')], now),
        right: any_held(key_seen, &[Right, Char('d'), Char('D')], now),
        up: any_held(key_seen, &[Up, Char('w'), Char('W')], now),
        down: any_held(key_seen, &[Down, Char('s'), Char('S')], now),
        ..FrameInput::default()
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: a `key_seen` map records when each key last produced a press
/// or repeat event. Each frame the fresh keys become the frame's direction
/// flags, so diagonal movement works with two keys held. Enter and R are
/// one-shot and only count on their press event.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    tuning: Tuning,
    masks: EntityMasks,
    art: &Artwork,
) -> RiverResult<()> {
    let mut rng = thread_rng();
    let clock = Instant::now();
    let frame = Duration::from_millis(tuning.frame_ms());

    let mut state: GameState = init_state(tuning, masks, 0);
    let mut key_seen: HashMap<KeyCode, u64> = HashMap::new();
    let mut size = terminal::size()?;

    loop {
        let frame_start = Instant::now();
        let now = clock.elapsed().as_millis() as u64;
        let mut start = false;
        let mut restart = false;

        // ── Drain all pending events (non-blocking) ───────────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match kind {
                    KeyEventKind::Press => {
                        key_seen.insert(code.clone(), now);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            KeyCode::Enter => start = true,
                            KeyCode::Char('r') | KeyCode::Char('R') => restart = true,
                            _ => {}
                        }
                    }
                    // Repeat: refresh timestamp so key stays "held"
                    KeyEventKind::Repeat => {
                        key_seen.insert(code, now);
                    }
                    // Release: remove key immediately (keyboard-enhancement path)
                    KeyEventKind::Release => {
                        key_seen.remove(&code);
                    }
                },
                Event::Resize(cols, rows) => {
                    size = (cols, rows);
                    out.queue(terminal::Clear(terminal::ClearType::All))?;
                }
                _ => {}
            }
        }

        let input = FrameInput {
            start,
            restart,
            ..held_directions(&key_seen, now)
        };

        let before = state.phase;
        state = tick(&state, &input, now, &mut rng);
        if before != state.phase && state.phase == Phase::GameOver {
            log::info!("Run ended after {} frames", state.frame);
        }

        display::render(out, &state, art, now, size)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// The log file when logging is requested. Runs before raw mode so a file
/// that cannot be created is reported on a normal terminal.
fn log_file(enabled: bool, path: &Path) -> RiverResult<Option<File>> {
    if !enabled {
        return Ok(None);
    }
    Ok(Some(File::create(path)?))
}

fn init_logging() -> RiverResult<()> {
    let enabled = std::env::var_os("RUST_LOG").is_some();
    if let Some(file) = log_file(enabled, Path::new(LOG_FILE))? {
        env_logger::Builder::from_default_env()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
    Ok(())
}

fn main() -> RiverResult<()> {
    init_logging()?;

    let tuning_path = std::env::args_os().nth(1).map(PathBuf::from);
    let tuning = Tuning::resolve(tuning_path.as_deref())?;
    let viewport = (tuning.viewport_width as u32, tuning.viewport_height as u32);
    let art = Artwork::load(Path::new(ASSETS_DIR), viewport);
    let masks = build_masks(&art, &tuning);
    log::info!(
        "Hitboxes: player {}px, net {}px, shrimp {}px",
        masks.player.count(),
        masks.hazard.count(),
        masks.pickup.count()
    );

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &rx, tuning, masks, &art);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("{e}");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use river_run::error::RiverError;

    #[test]
    fn no_log_file_without_rust_log() {
        let file = log_file(false, Path::new("/nonexistent/dir/river_run.log")).unwrap();
        assert!(file.is_none());
    }

    #[test]
    fn unwritable_log_path_is_an_error() {
        let err = log_file(true, Path::new("/nonexistent/dir/river_run.log")).unwrap_err();
        assert!(matches!(err, RiverError::Io(_)));
    }

    #[test]
    fn held_key_expires_after_window() {
        let mut seen = HashMap::new();
        seen.insert(KeyCode::Left, 1_000);
        assert!(held_directions(&seen, 1_000 + HOLD_WINDOW_MS).left);
        assert!(!held_directions(&seen, 1_001 + HOLD_WINDOW_MS).left);
    }
}
