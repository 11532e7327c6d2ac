use river_run::sprites::*;

#[test]
fn placeholder_sizes() {
    let art = Artwork::procedural();
    assert_eq!((art.player.width(), art.player.height()), (84, 84));
    assert_eq!((art.hazard.width(), art.hazard.height()), (78, 90));
    assert_eq!((art.pickup.width(), art.pickup.height()), (40, 26));
}

#[test]
fn boat_hull_is_solid_in_the_middle_and_clear_in_corners() {
    let boat = draw_boat(84, 84);
    assert_eq!(boat.pixel(0, 0)[3], 0);
    assert_eq!(boat.pixel(83, 83)[3], 0);
    assert_eq!(boat.pixel(42, 42)[3], 255);
}

#[test]
fn mage_sits_on_the_boat() {
    let boat = draw_boat(84, 84);
    let composed = compose_boat_with_mage(&boat, &draw_mage(44, 44));
    assert_eq!(composed.width(), 84);
    assert_ne!(composed, boat);
}

#[test]
fn net_frame_is_solid_and_centre_is_mostly_open() {
    let net = draw_net(78, 90);
    assert_eq!(net.pixel(3, 45)[3], 255);
    assert_eq!(net.pixel(0, 45)[3], 0);
}

#[test]
fn scale_to_fit_keeps_aspect() {
    let big = Sprite::filled(200, 100, [1, 2, 3, 255]);
    let fit = big.scale_to_fit(100, 100);
    assert_eq!((fit.width(), fit.height()), (100, 50));
    assert_eq!(fit.pixel(10, 10), [1, 2, 3, 255]);
}

#[test]
fn scale_to_fit_leaves_small_sprites_alone() {
    let small = Sprite::filled(30, 20, [9, 9, 9, 255]);
    assert_eq!(small.scale_to_fit(64, 64), small);
}

#[test]
fn out_of_range_pixels_are_transparent() {
    let s = Sprite::filled(2, 2, [255, 255, 255, 255]);
    assert_eq!(s.pixel(2, 0), TRANSPARENT);
    let mut s = s;
    s.put(-1, 0, [0, 0, 0, 255]);
    s.put(0, 5, [0, 0, 0, 255]);
    assert_eq!(s.pixel(0, 0), [255, 255, 255, 255]);
}

#[test]
fn line_hits_both_endpoints() {
    let mut s = Sprite::new(10, 10);
    s.line((1, 8), (7, 2), [5, 5, 5, 255]);
    assert_eq!(s.pixel(1, 8)[3], 255);
    assert_eq!(s.pixel(7, 2)[3], 255);
}
