/// Sprite images: PNG assets when present, procedural placeholder art otherwise.
///
/// Each asset is optional and falls back to its placeholder on its own. The
/// simulation only ever looks at a sprite through its collision mask; the
/// renderer reads the colours.

use std::path::Path;

use crate::constants::*;
use crate::error::{RiverError, RiverResult};

pub type Rgba = [u8; 4];

pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

/// Background colour of the bundled asset images.
pub const WHITE_KEY: [u8; 3] = [255, 255, 255];

/// Asset directory looked up relative to the working directory.
pub const ASSETS_DIR: &str = "assets";

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
    color_key: Option<[u8; 3]>,
}

impl Sprite {
    /// A fully transparent `width × height` image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![TRANSPARENT; width as usize * height as usize],
            color_key: None,
        }
    }

    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
            color_key: None,
        }
    }

    pub fn from_rgba(image: &image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.pixels().map(|p| p.0).collect(),
            color_key: None,
        }
    }

    /// Decode an image file into an unkeyed sprite.
    pub fn open(path: &Path) -> RiverResult<Self> {
        let decoded = image::open(path).map_err(|source| RiverError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_rgba(&decoded.to_rgba8()))
    }

    /// Pixels of exactly this colour are see-through, whatever their alpha.
    pub fn with_color_key(self, key: [u8; 3]) -> Self {
        Self {
            color_key: Some(key),
            ..self
        }
    }

    pub fn color_key(&self) -> Option<[u8; 3]> {
        self.color_key
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Out-of-range reads return a transparent pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        if x >= self.width || y >= self.height {
            return TRANSPARENT;
        }
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Like [`Sprite::pixel`], with colour-keyed pixels read as transparent.
    pub fn visible_pixel(&self, x: u32, y: u32) -> Rgba {
        let px = self.pixel(x, y);
        match self.color_key {
            Some(key) if [px[0], px[1], px[2]] == key => TRANSPARENT,
            _ => px,
        }
    }

    pub fn put(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        self.pixels[y as usize * self.width as usize + x as usize] = color;
    }

    /// Paint every pixel whose centre satisfies `inside`.
    fn paint_where(&mut self, color: Rgba, inside: impl Fn(f32, f32) -> bool) {
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if inside(x as f32 + 0.5, y as f32 + 0.5) {
                    self.put(x, y, color);
                }
            }
        }
    }

    /// Filled ellipse inscribed in the rect `(x, y, w, h)`.
    pub fn fill_ellipse(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        let (rx, ry) = (w / 2.0, h / 2.0);
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let (cx, cy) = (x + rx, y + ry);
        self.paint_where(color, |px, py| {
            let nx = (px - cx) / rx;
            let ny = (py - cy) / ry;
            nx * nx + ny * ny <= 1.0
        });
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgba) {
        self.fill_ellipse(cx - r, cy - r, r * 2.0, r * 2.0, color);
    }

    /// Even-odd polygon fill.
    pub fn fill_polygon(&mut self, points: &[(f32, f32)], color: Rgba) {
        self.paint_where(color, |px, py| point_in_polygon(points, px, py));
    }

    /// Closed polygon outline `thickness` pixels wide.
    pub fn stroke_polygon(&mut self, points: &[(f32, f32)], thickness: f32, color: Rgba) {
        let half = thickness / 2.0;
        self.paint_where(color, |px, py| {
            (0..points.len()).any(|i| {
                let a = points[i];
                let b = points[(i + 1) % points.len()];
                distance_to_segment(px, py, a, b) <= half
            })
        });
    }

    /// Rectangular frame `thickness` pixels wide along the inside of the rect.
    pub fn frame_rect(&mut self, x: i32, y: i32, w: i32, h: i32, thickness: i32, color: Rgba) {
        for py in y..y + h {
            for px in x..x + w {
                let edge = px - x < thickness
                    || x + w - 1 - px < thickness
                    || py - y < thickness
                    || y + h - 1 - py < thickness;
                if edge {
                    self.put(px, py, color);
                }
            }
        }
    }

    /// One-pixel Bresenham line.
    pub fn line(&mut self, from: (i32, i32), to: (i32, i32), color: Rgba) {
        let (mut x0, mut y0) = from;
        let (x1, y1) = to;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Copy the non-transparent pixels of `other` with its top-left at `(ox, oy)`.
    pub fn blit(&mut self, other: &Sprite, ox: i32, oy: i32) {
        for y in 0..other.height {
            for x in 0..other.width {
                let px = other.visible_pixel(x, y);
                if px[3] > 0 {
                    self.put(ox + x as i32, oy + y as i32, px);
                }
            }
        }
    }

    /// Nearest-neighbour resize. The colour key carries over.
    pub fn scaled(&self, width: u32, height: u32) -> Sprite {
        let mut out = Sprite::new(width, height);
        out.color_key = self.color_key;
        if self.width == 0 || self.height == 0 {
            return out;
        }
        for y in 0..height {
            for x in 0..width {
                let sx = (x as u64 * self.width as u64 / width as u64) as u32;
                let sy = (y as u64 * self.height as u64 / height as u64) as u32;
                out.put(x as i32, y as i32, self.pixel(sx, sy));
            }
        }
        out
    }

    /// Shrink proportionally until the sprite fits `max_w × max_h`; sprites
    /// already inside the limits are returned unchanged.
    pub fn scale_to_fit(&self, max_w: u32, max_h: u32) -> Sprite {
        if self.width <= max_w && self.height <= max_h {
            return self.clone();
        }
        let k = (max_w as f32 / self.width as f32).min(max_h as f32 / self.height as f32);
        let w = ((self.width as f32 * k) as u32).max(1);
        let h = ((self.height as f32 * k) as u32).max(1);
        self.scaled(w, h)
    }
}

fn point_in_polygon(points: &[(f32, f32)], px: f32, py: f32) -> bool {
    let mut inside = false;
    let n = points.len();
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn distance_to_segment(px: f32, py: f32, a: (f32, f32), b: (f32, f32)) -> f32 {
    let (vx, vy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = vx * vx + vy * vy;
    let t = if len_sq > 0.0 {
        (((px - a.0) * vx + (py - a.1) * vy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.0 + vx * t, a.1 + vy * t);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

// ── Placeholder art ───────────────────────────────────────────────────────────

/// Wooden diamond-shaped hull, 84×84 by default.
pub fn draw_boat(w: u32, h: u32) -> Sprite {
    let mut s = Sprite::new(w, h);
    let (w, h) = (w as f32, h as f32);
    let hull = [
        (w * 0.5, 0.0),
        (w * 0.95, h * 0.45),
        (w * 0.5, h * 0.95),
        (w * 0.05, h * 0.45),
    ];
    s.fill_polygon(&hull, [168, 115, 72, 255]);
    s.stroke_polygon(&hull, 3.0, [90, 60, 38, 255]);
    s
}

/// Robed mage with a pointed red hat, 44×44 by default.
pub fn draw_mage(w: u32, h: u32) -> Sprite {
    let mut s = Sprite::new(w, h);
    let (w, h) = (w as f32, h as f32);
    s.fill_ellipse(w * 0.1, h * 0.35, w * 0.8, h * 0.6, [80, 60, 160, 255]);
    s.fill_circle(w * 0.5, h * 0.28, h * 0.18, [245, 220, 180, 255]);
    s.fill_polygon(
        &[(w * 0.5, h * 0.02), (w * 0.8, h * 0.36), (w * 0.2, h * 0.36)],
        [200, 40, 40, 255],
    );
    s.fill_ellipse(w * 0.2, h * 0.32, w * 0.6, h * 0.12, [200, 40, 40, 255]);
    s
}

/// The mage scaled to 45% of the boat's width, seated just above its middle.
pub fn compose_boat_with_mage(boat: &Sprite, mage: &Sprite) -> Sprite {
    let mut s = boat.clone();
    let (bw, bh) = (boat.width() as f32, boat.height() as f32);
    let m_w = ((bw * 0.45) as u32).max(1);
    let k = m_w as f32 / mage.width().max(1) as f32;
    let m_h = ((mage.height() as f32 * k) as u32).max(1);
    let m = mage.scaled(m_w, m_h);
    s.blit(
        &m,
        (bw * 0.5 - m_w as f32 / 2.0) as i32,
        (bh * 0.48 - m_h as f32 / 2.0) as i32,
    );
    s
}

/// Fishing net: rope frame, a row of floats along the top, diamond mesh.
pub fn draw_net(w: u32, h: u32) -> Sprite {
    let mut s = Sprite::new(w, h);
    let (wi, hi) = (w as i32, h as i32);
    s.frame_rect(3, 3, wi - 6, hi - 6, 5, [160, 120, 60, 255]);
    for i in 0..6 {
        let fx = (i as f32 + 0.5) * w as f32 / 6.0;
        s.fill_circle(fx, 10.0, 6.0, [230, 200, 120, 255]);
    }
    let mesh = [210, 210, 210, 170];
    let step = 12;
    let half = step / 2;
    let mut y = 10;
    while y < hi - 10 {
        let mut x = 10;
        while x < wi - 10 {
            s.line((x - half, y), (x, y + half), mesh);
            s.line((x, y + half), (x + half, y), mesh);
            s.line((x - half, y), (x, y - half), mesh);
            s.line((x, y - half), (x + half, y), mesh);
            x += step;
        }
        y += step;
    }
    s
}

/// Pink shrimp facing left, 40×26 by default.
pub fn draw_shrimp(w: u32, h: u32) -> Sprite {
    let mut s = Sprite::new(w, h);
    let (wf, hf) = (w as f32, h as f32);
    s.fill_ellipse(0.0, 2.0, wf * 0.7, hf - 4.0, [255, 140, 100, 255]);
    s.fill_ellipse(wf * 0.55, 4.0, wf * 0.25, hf - 8.0, [255, 120, 90, 255]);
    s.fill_polygon(
        &[(wf * 0.8, hf / 2.0), (wf, 0.0), (wf, hf)],
        [255, 110, 85, 255],
    );
    s.fill_circle(wf * 0.18, hf * 0.38, 2.0, [20, 20, 20, 255]);
    s
}

/// One sprite per entity kind, already scaled to the kind's size limit,
/// plus the river background when an image for it was found.
#[derive(Clone, Debug)]
pub struct Artwork {
    pub player: Sprite,
    pub hazard: Sprite,
    pub pickup: Sprite,
    pub water: Option<Sprite>,
}

impl Artwork {
    pub fn procedural() -> Self {
        Self {
            player: procedural_player(),
            hazard: draw_net(78, 90).scale_to_fit(MAX_HAZARD_W, MAX_HAZARD_H),
            pickup: draw_shrimp(40, 26).scale_to_fit(MAX_PICKUP_W, MAX_PICKUP_H),
            water: None,
        }
    }

    /// Load `water.png`, `boat_mage.png` (or `boat.png` + `mage.png`),
    /// `net.png` and `shrimp.png` from `dir`. Loaded sprites are keyed on
    /// white and scaled to their limits; the water is stretched to
    /// `viewport`. Any file that is missing or fails to decode is replaced
    /// by its placeholder.
    pub fn load(dir: &Path, viewport: (u32, u32)) -> Self {
        let (vw, vh) = viewport;
        let water = load_asset(&dir.join("water.png")).map(|s| s.scaled(vw.max(1), vh.max(1)));

        let boat_mage = dir.join("boat_mage.png");
        let (boat, mage) = (dir.join("boat.png"), dir.join("mage.png"));
        let player = match load_keyed(&boat_mage) {
            Some(s) => s.scale_to_fit(MAX_PLAYER_W, MAX_PLAYER_H),
            None if boat.exists() && mage.exists() => {
                let boat = load_keyed(&boat)
                    .unwrap_or_else(|| draw_boat(84, 84))
                    .scale_to_fit(MAX_PLAYER_W, MAX_PLAYER_H);
                let mage = load_keyed(&mage)
                    .unwrap_or_else(|| draw_mage(44, 44))
                    .scale_to_fit(MAX_PLAYER_W / 2, MAX_PLAYER_H / 2);
                compose_boat_with_mage(&boat, &mage)
            }
            None => procedural_player(),
        };

        let hazard = load_keyed(&dir.join("net.png"))
            .unwrap_or_else(|| draw_net(78, 90))
            .scale_to_fit(MAX_HAZARD_W, MAX_HAZARD_H);
        let pickup = load_keyed(&dir.join("shrimp.png"))
            .unwrap_or_else(|| draw_shrimp(40, 26))
            .scale_to_fit(MAX_PICKUP_W, MAX_PICKUP_H);

        Self {
            player,
            hazard,
            pickup,
            water,
        }
    }
}

fn procedural_player() -> Sprite {
    compose_boat_with_mage(&draw_boat(84, 84), &draw_mage(44, 44))
        .scale_to_fit(MAX_PLAYER_W, MAX_PLAYER_H)
}

/// `None` when the file is absent or unreadable; decode failures are logged.
fn load_asset(path: &Path) -> Option<Sprite> {
    if !path.exists() {
        log::debug!("No asset at {}, using placeholder", path.display());
        return None;
    }
    match Sprite::open(path) {
        Ok(sprite) => {
            log::info!("Loaded {} ({}x{})", path.display(), sprite.width(), sprite.height());
            Some(sprite)
        }
        Err(e) => {
            log::warn!("{e}; using placeholder");
            None
        }
    }
}

fn load_keyed(path: &Path) -> Option<Sprite> {
    load_asset(path).map(|s| s.with_color_key(WHITE_KEY))
}
