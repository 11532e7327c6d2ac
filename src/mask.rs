//! Pixel-occupancy masks for shape-accurate collision.
//!
//! A [`Mask`] is a dense bitset, one row of `u64` words per pixel row. Bit `i`
//! of word `i / 64` is column `i`; bits at or past `width` are always zero,
//! which lets the overlap test AND whole words without edge masking.

use crate::constants::ALPHA_THRESHOLD;
use crate::sprites::Sprite;

/// How a sprite marks its see-through pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transparency {
    /// Solid iff alpha is strictly above `threshold`.
    Alpha { threshold: u8 },
    /// As `Alpha`, and additionally any pixel whose colour equals `key` is
    /// treated as transparent (e.g. white backgrounds on imported art).
    ColorKey { key: [u8; 3], threshold: u8 },
}

impl Default for Transparency {
    fn default() -> Self {
        Transparency::Alpha { threshold: ALPHA_THRESHOLD }
    }
}

impl Transparency {
    /// Colour-keyed sprites use their key on top of the default alpha cut.
    pub fn for_sprite(sprite: &Sprite) -> Self {
        match sprite.color_key() {
            Some(key) => Transparency::ColorKey {
                key,
                threshold: ALPHA_THRESHOLD,
            },
            None => Transparency::default(),
        }
    }

    pub fn is_solid(&self, rgba: [u8; 4]) -> bool {
        match *self {
            Transparency::Alpha { threshold } => rgba[3] > threshold,
            Transparency::ColorKey { key, threshold } => {
                rgba[3] > threshold && [rgba[0], rgba[1], rgba[2]] != key
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl Mask {
    /// An all-clear mask.
    pub fn new(width: u32, height: u32) -> Self {
        let words_per_row = (width as usize).div_ceil(64);
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height as usize],
        }
    }

    pub fn from_fn(width: u32, height: u32, mut solid: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if solid(x, y) {
                    mask.set(x, y);
                }
            }
        }
        mask
    }

    pub fn from_sprite(sprite: &Sprite, transparency: Transparency) -> Self {
        Self::from_fn(sprite.width(), sprite.height(), |x, y| {
            transparency.is_solid(sprite.pixel(x, y))
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let word = self.bits[y as usize * self.words_per_row + x as usize / 64];
        word & (1u64 << (x % 64)) != 0
    }

    pub fn set(&mut self, x: u32, y: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.bits[y as usize * self.words_per_row + x as usize / 64] |= 1u64 << (x % 64);
    }

    fn row(&self, y: u32) -> &[u64] {
        let start = y as usize * self.words_per_row;
        &self.bits[start..start + self.words_per_row]
    }

    /// Number of occupied pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Nearest-neighbour resample to `width × height`.
    pub fn scaled(&self, width: u32, height: u32) -> Mask {
        if width == 0 || height == 0 || self.width == 0 || self.height == 0 {
            return Mask::new(width, height);
        }
        Mask::from_fn(width, height, |x, y| {
            let sx = (x as u64 * self.width as u64 / width as u64) as u32;
            let sy = (y as u64 * self.height as u64 / height as u64) as u32;
            self.get(sx, sy)
        })
    }

    /// OR `other` into this mask with its top-left at `(ox, oy)`, clipped.
    pub fn draw(&mut self, other: &Mask, ox: i32, oy: i32) {
        for y in 0..other.height {
            for x in 0..other.width {
                if !other.get(x, y) {
                    continue;
                }
                let tx = ox + x as i32;
                let ty = oy + y as i32;
                if tx >= 0 && ty >= 0 {
                    self.set(tx as u32, ty as u32);
                }
            }
        }
    }

    /// Shrink the occupied region inward by `erosion` pixels on every side,
    /// keeping the mask's outer dimensions.
    ///
    /// The mask is scaled down by `2 * erosion` in each dimension (clamped to
    /// 1px) and re-centred, leaving a clear border `erosion` pixels wide.
    pub fn eroded(&self, erosion: u32) -> Mask {
        if erosion == 0 {
            return self.clone();
        }
        let shrink = erosion.saturating_mul(2);
        let small_w = self.width.saturating_sub(shrink).max(1);
        let small_h = self.height.saturating_sub(shrink).max(1);
        let small = self.scaled(small_w, small_h);

        let mut result = Mask::new(self.width, self.height);
        let offset = i32::try_from(erosion).unwrap_or(i32::MAX);
        result.draw(&small, offset, offset);
        result
    }

    /// True when any occupied pixel of `self` coincides with an occupied pixel
    /// of `other`, where `other`'s top-left sits at `(dx, dy)` relative to
    /// `self`'s top-left.
    pub fn overlaps(&self, other: &Mask, dx: i32, dy: i32) -> bool {
        let y_start = dy.max(0);
        let y_end = (dy + other.height as i32).min(self.height as i32);
        let x_start = dx.max(0);
        let x_end = (dx + other.width as i32).min(self.width as i32);
        if y_start >= y_end || x_start >= x_end {
            return false;
        }

        let first_word = x_start as usize / 64;
        let last_word = (x_end as usize - 1) / 64;

        for y in y_start..y_end {
            let mine = self.row(y as u32);
            let theirs = other.row((y - dy) as u32);
            for k in first_word..=last_word {
                let start = k as i64 * 64 - dx as i64;
                if mine[k] & extract_bits(theirs, other.width, start) != 0 {
                    return true;
                }
            }
        }
        false
    }
}

/// Build the collision mask for a sprite, eroded by `erosion` pixels.
pub fn build_mask(sprite: &Sprite, transparency: Transparency, erosion: u32) -> Mask {
    Mask::from_sprite(sprite, transparency).eroded(erosion)
}

/// The 64 bits of `row` starting at bit position `start` (which may be
/// negative), with position `start` landing in bit 0. Out-of-range bits read
/// as zero.
fn extract_bits(row: &[u64], width: u32, start: i64) -> u64 {
    if row.is_empty() || start >= width as i64 || start <= -64 {
        return 0;
    }
    if start >= 0 {
        let s = start as usize;
        let word = s / 64;
        let bit = s % 64;
        let lo = row[word] >> bit;
        let hi = if bit > 0 && word + 1 < row.len() {
            row[word + 1] << (64 - bit)
        } else {
            0
        };
        lo | hi
    } else {
        row[0] << (-start) as u32
    }
}
