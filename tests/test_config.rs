use std::path::Path;

use river_run::config::Tuning;
use river_run::constants::*;
use river_run::error::RiverError;

fn parse(text: &str) -> Result<Tuning, RiverError> {
    Tuning::from_toml_str(text, Path::new("test.toml"))
}

#[test]
fn defaults_mirror_constants() {
    let t = Tuning::default();
    assert_eq!(t.viewport_width, VIEWPORT_WIDTH);
    assert_eq!(t.base_object_speed, BASE_OBJECT_SPEED);
    assert_eq!(t.max_object_speed, MAX_OBJECT_SPEED);
    assert_eq!(t.speed_step_interval_ms, SPEED_STEP_INTERVAL_MS);
    assert_eq!(t.start_lives, START_LIVES);
    assert_eq!(t.hit_cooldown_ms, HIT_COOLDOWN_MS);
    assert!(t.spawn_hazard_ms < t.spawn_pickup_ms);
    assert!(t.player_erosion > t.hazard_erosion);
    assert!(t.validate().is_ok());
}

#[test]
fn empty_file_gives_defaults() {
    assert_eq!(parse("").unwrap(), Tuning::default());
}

#[test]
fn partial_file_overrides_only_named_keys() {
    let t = parse("base_object_speed = 5.0\nstart_lives = 5\n").unwrap();
    assert_eq!(t.base_object_speed, 5.0);
    assert_eq!(t.start_lives, 5);
    assert_eq!(t.max_object_speed, MAX_OBJECT_SPEED);
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = parse("start_lives = \"many\"").unwrap_err();
    assert!(matches!(err, RiverError::ConfigParse { .. }));
    assert!(err.to_string().contains("test.toml"));
}

#[test]
fn base_above_max_is_rejected() {
    let err = parse("base_object_speed = 12.0").unwrap_err();
    assert!(matches!(
        err,
        RiverError::InvalidTuning { name: "base_object_speed", .. }
    ));
}

#[test]
fn zero_lives_is_rejected() {
    assert!(parse("start_lives = 0").is_err());
}

#[test]
fn zero_spawn_interval_is_rejected() {
    assert!(parse("spawn_hazard_ms = 0").is_err());
}

fn rejected_field(text: &str) -> &'static str {
    match parse(text) {
        Err(RiverError::InvalidTuning { name, .. }) => name,
        other => panic!("expected {text:?} to be rejected, got {other:?}"),
    }
}

#[test]
fn negative_base_speed_is_rejected() {
    // Objects moving up would never leave through the cull line.
    assert_eq!(
        rejected_field("base_object_speed = -2.0\nspeed_step = 0.0"),
        "base_object_speed"
    );
}

#[test]
fn zero_base_speed_is_rejected() {
    assert_eq!(rejected_field("base_object_speed = 0.0"), "base_object_speed");
}

#[test]
fn non_finite_speeds_are_rejected() {
    assert_eq!(rejected_field("max_object_speed = nan"), "max_object_speed");
    assert_eq!(rejected_field("max_object_speed = inf"), "max_object_speed");
    assert_eq!(rejected_field("base_object_speed = nan"), "base_object_speed");
    assert_eq!(rejected_field("speed_step = inf"), "speed_step");
    assert_eq!(rejected_field("scroll_speed = nan"), "scroll_speed");
}

#[test]
fn negative_speed_step_is_rejected() {
    assert_eq!(rejected_field("speed_step = -1.0"), "speed_step");
}

#[test]
fn zero_speed_step_is_allowed() {
    assert_eq!(parse("speed_step = 0.0").unwrap().speed_step, 0.0);
}

#[test]
fn non_positive_player_speed_is_rejected() {
    assert_eq!(rejected_field("player_speed = 0"), "player_speed");
}

#[test]
fn factors_must_be_in_unit_interval() {
    assert_eq!(rejected_field("pickup_speed_factor = 0.0"), "pickup_speed_factor");
    assert_eq!(rejected_field("pickup_speed_factor = -0.5"), "pickup_speed_factor");
    assert_eq!(rejected_field("pickup_speed_factor = 1.5"), "pickup_speed_factor");
    assert_eq!(rejected_field("pickup_speed_factor = nan"), "pickup_speed_factor");
    assert_eq!(rejected_field("player_vertical_factor = 0.0"), "player_vertical_factor");
    assert_eq!(parse("pickup_speed_factor = 1.0").unwrap().pickup_speed_factor, 1.0);
}

#[test]
fn negative_margins_are_rejected() {
    for name in [
        "playfield_inset_left",
        "playfield_inset_right",
        "playfield_inset_top",
        "playfield_inset_bottom",
        "player_start_offset_y",
        "spawn_margin",
        "spawn_buffer",
        "cull_margin",
    ] {
        assert_eq!(rejected_field(&format!("{name} = -1")), name);
        assert!(parse(&format!("{name} = 0")).is_ok());
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let err = Tuning::load(Path::new("definitely/not/here.toml")).unwrap_err();
    assert!(matches!(err, RiverError::Io(_)));
}

#[test]
fn frame_budget_from_fps() {
    assert_eq!(Tuning::default().frame_ms(), 16);
}
