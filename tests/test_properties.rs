use std::rc::Rc;

use proptest::prelude::*;
use river_run::compute::*;
use river_run::config::Tuning;
use river_run::entities::*;
use river_run::mask::Mask;

fn make_state() -> GameState {
    let solid = |w, h| Rc::new(Mask::from_fn(w, h, |_, _| true));
    let masks = EntityMasks {
        player: solid(20, 20),
        hazard: solid(10, 10),
        pickup: solid(10, 10),
    };
    start_game(&init_state(Tuning::default(), masks, 0), 0)
}

fn hazard_on_player(state: &GameState) -> Entity {
    Entity {
        kind: EntityKind::Hazard,
        x: state.player.x + 5,
        y: state.player.y + 5,
        speed: state.object_speed,
        mask: state.masks.for_kind(EntityKind::Hazard),
    }
}

proptest! {
    /// Lives never leave [0, START_LIVES], and the session ends exactly when
    /// they first reach zero.
    #[test]
    fn lives_stay_in_range(steps in prop::collection::vec((any::<bool>(), 0u64..1_600), 1..60)) {
        let mut state = make_state();
        let mut now = 0;
        for (overlap, dt) in steps {
            now += dt;
            if overlap {
                let hazard = hazard_on_player(&state);
                state.hazards.push(hazard);
            }
            let before = state.clone();
            let (next, report) = resolve_collisions(&state, now);

            prop_assert!(next.lives <= next.tuning.start_lives);
            prop_assert_eq!(next.phase == Phase::GameOver, next.lives == 0);
            if report.hazard_hit {
                prop_assert_eq!(next.lives + 1, before.lives);
                prop_assert_eq!(next.last_hit_ms, Some(now));
                prop_assert!(next.hazards.is_empty());
            } else {
                prop_assert_eq!(next.lives, before.lives);
            }
            if overlap && before.phase == Phase::Playing && !is_invulnerable(&before, now) {
                prop_assert!(report.hazard_hit);
            }
            state = next;
        }
    }

    /// Object speed never decreases within a session and never passes the cap.
    #[test]
    fn speed_is_monotonic_and_capped(gaps in prop::collection::vec(0u64..40_000, 1..80)) {
        let mut state = make_state();
        let mut now = 0;
        for gap in gaps {
            now += gap;
            let next = step_speed(&state, now);
            prop_assert!(next.object_speed >= state.object_speed);
            prop_assert!(next.object_speed <= next.tuning.max_object_speed);
            prop_assert!(next.next_speedup_ms >= state.next_speedup_ms);
            state = next;
        }
        let reset_state = reset(&state, now);
        prop_assert_eq!(reset_state.object_speed, reset_state.tuning.base_object_speed);
    }

    /// Eroding never grows the occupied area or changes dimensions, and zero
    /// erosion is the identity.
    #[test]
    fn erosion_shrinks_area(
        w in 1u32..90,
        h in 1u32..60,
        seed in any::<u64>(),
        erosion in 0u32..50,
    ) {
        let mask = Mask::from_fn(w, h, |x, y| {
            let v = (x as u64).wrapping_mul(0x9E37_79B9) ^ (y as u64).wrapping_mul(0x85EB_CA6B) ^ seed;
            v.count_ones() % 2 == 0
        });
        let eroded = mask.eroded(erosion);
        prop_assert_eq!((eroded.width(), eroded.height()), (w, h));
        prop_assert!(eroded.count() <= mask.count());
        prop_assert_eq!(mask.eroded(0), mask);
    }

    /// Score rises by exactly the number of overlapping pickups.
    #[test]
    fn score_counts_caught_pickups(offsets in prop::collection::vec((-40i32..40, -40i32..40), 0..12)) {
        let mut state = make_state();
        let mut expected = 0;
        for (dx, dy) in offsets {
            let pickup = Entity {
                kind: EntityKind::Pickup,
                x: state.player.x + dx,
                y: state.player.y + dy,
                speed: 3.0,
                mask: state.masks.for_kind(EntityKind::Pickup),
            };
            // Solid 20×20 player vs solid 10×10 pickup.
            if dx > -10 && dx < 20 && dy > -10 && dy < 20 {
                expected += 1;
            }
            state.pickups.push(pickup);
        }
        let total = state.pickups.len();
        let (next, report) = resolve_collisions(&state, 1_000);
        prop_assert_eq!(next.score, expected);
        prop_assert_eq!(report.pickups_caught, expected);
        prop_assert_eq!(next.pickups.len(), total - expected as usize);
    }
}
