use river_run::mask::{build_mask, Mask, Transparency};
use river_run::sprites::{Artwork, Sprite};

fn solid(w: u32, h: u32) -> Mask {
    Mask::from_fn(w, h, |_, _| true)
}

// ── from_sprite ───────────────────────────────────────────────────────────────

#[test]
fn alpha_threshold_decides_occupancy() {
    let mut s = Sprite::new(3, 1);
    s.put(0, 0, [255, 0, 0, 127]);
    s.put(1, 0, [255, 0, 0, 128]);
    s.put(2, 0, [255, 0, 0, 255]);
    let m = Mask::from_sprite(&s, Transparency::default());
    assert!(!m.get(0, 0));
    assert!(m.get(1, 0));
    assert!(m.get(2, 0));
}

#[test]
fn colorkey_pixels_are_transparent() {
    let mut s = Sprite::filled(2, 1, [255, 255, 255, 255]);
    s.put(1, 0, [10, 20, 30, 255]);
    let key = Transparency::ColorKey { key: [255, 255, 255], threshold: 127 };
    let m = Mask::from_sprite(&s, key);
    assert!(!m.get(0, 0));
    assert!(m.get(1, 0));
}

#[test]
fn mask_dimensions_match_sprite() {
    let s = Sprite::new(70, 33);
    let m = Mask::from_sprite(&s, Transparency::default());
    assert_eq!((m.width(), m.height()), (70, 33));
    assert_eq!(m.count(), 0);
}

// ── erosion ───────────────────────────────────────────────────────────────────

#[test]
fn zero_erosion_is_identity() {
    let m = Mask::from_fn(30, 17, |x, y| (x * 7 + y * 3) % 5 < 2);
    assert_eq!(m.eroded(0), m);
}

#[test]
fn erosion_leaves_clear_border() {
    let m = solid(40, 30).eroded(5);
    assert_eq!((m.width(), m.height()), (40, 30));
    assert_eq!(m.count(), 30 * 20);
    assert!(!m.get(4, 10));
    assert!(m.get(5, 5));
    assert!(m.get(34, 24));
    assert!(!m.get(35, 24));
    assert!(!m.get(10, 25));
}

#[test]
fn oversized_erosion_clamps_to_one_pixel() {
    let m = solid(10, 10).eroded(6);
    assert_eq!((m.width(), m.height()), (10, 10));
    assert_eq!(m.count(), 1);
    assert!(m.get(6, 6));
}

#[test]
fn erosion_past_the_edge_clears_everything() {
    let m = solid(4, 4).eroded(9);
    assert_eq!(m.count(), 0);
}

#[test]
fn scaled_is_nearest_neighbour() {
    let checker = Mask::from_fn(4, 4, |x, y| x / 2 == y / 2);
    let small = checker.scaled(2, 2);
    assert!(small.get(0, 0));
    assert!(!small.get(1, 0));
    assert!(small.get(1, 1));
}

#[test]
fn player_hitbox_is_tighter_than_its_silhouette() {
    let art = Artwork::procedural();
    let raw = Mask::from_sprite(&art.player, Transparency::default());
    let eroded = build_mask(&art.player, Transparency::default(), 10);
    assert!(eroded.count() < raw.count());
    assert!(eroded.count() > 0);
}

// ── overlaps ──────────────────────────────────────────────────────────────────

#[test]
fn overlap_of_solid_boxes() {
    let a = solid(10, 10);
    let b = solid(5, 5);
    assert!(a.overlaps(&b, 9, 9));
    assert!(!a.overlaps(&b, 10, 0));
    assert!(a.overlaps(&b, -4, -4));
    assert!(!a.overlaps(&b, -5, 0));
}

#[test]
fn overlap_is_symmetric() {
    let a = Mask::from_fn(90, 12, |x, y| (x + y) % 7 == 0);
    let b = Mask::from_fn(70, 20, |x, y| (x * y) % 11 == 3);
    for (dx, dy) in [(-50, -5), (13, 2), (40, -10), (-3, 7), (85, 0)] {
        assert_eq!(a.overlaps(&b, dx, dy), b.overlaps(&a, -dx, -dy), "offset {dx},{dy}");
    }
}

#[test]
fn overlap_matches_pixel_by_pixel_check() {
    let a = Mask::from_fn(100, 9, |x, y| (x * 3 + y) % 13 == 0);
    let b = Mask::from_fn(75, 6, |x, y| (x + y * 5) % 17 == 0);
    for dx in -80..105 {
        for dy in -7..10 {
            let mut expected = false;
            for y in 0..b.height() {
                for x in 0..b.width() {
                    let (ax, ay) = (x as i32 + dx, y as i32 + dy);
                    if b.get(x, y) && ax >= 0 && ay >= 0 && a.get(ax as u32, ay as u32) {
                        expected = true;
                    }
                }
            }
            assert_eq!(a.overlaps(&b, dx, dy), expected, "offset {dx},{dy}");
        }
    }
}

#[test]
fn hollow_masks_miss_through_the_gap() {
    // Two rings whose boxes overlap, but whose outlines do not touch.
    let ring = Mask::from_fn(20, 20, |x, y| x == 0 || y == 0 || x == 19 || y == 19);
    let dot = Mask::from_fn(4, 4, |_, _| true);
    assert!(!ring.overlaps(&dot, 8, 8));
    assert!(ring.overlaps(&dot, 17, 8));
}
