//! Pixel-mask collision detection
//!
//! The tricky part of Flappy Sim: the bird and pipe sprites are irregular
//! shapes with transparent padding, so hit testing must be exact per-pixel
//! overlap under integer translation, never bounding boxes.
//!
//! A `Mask` stores one bit per pixel, packed LSB-first into 64-bit words per
//! row. The overlap test clips the two masks' intersection rectangle and
//! compares whole words, fetching the other mask's bits through a shifted
//! 64-bit window so word boundaries never need per-pixel fallback.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Per-pixel opacity map derived from a sprite image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mask {
    width: u32,
    height: u32,
    /// Words per row (ceil(width / 64))
    words_per_row: usize,
    /// Row-major packed bits; slack bits past `width` are always zero
    bits: Vec<u64>,
}

/// Ones at bit positions [lo, hi), with lo < hi <= 64
#[inline]
fn span_mask(lo: u32, hi: u32) -> u64 {
    let hi_mask = if hi >= 64 { u64::MAX } else { (1u64 << hi) - 1 };
    hi_mask & !((1u64 << lo) - 1)
}

impl Mask {
    /// Create a fully transparent mask
    pub fn new(width: u32, height: u32) -> Self {
        let words_per_row = width.div_ceil(64) as usize;
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height as usize],
        }
    }

    /// Create a fully opaque mask (useful for placeholder rectangle sprites)
    pub fn filled(width: u32, height: u32) -> Self {
        let mut mask = Self::new(width, height);
        for row in 0..height as usize {
            for wi in 0..mask.words_per_row {
                let lo = (wi as u32) * 64;
                let hi = width.min(lo + 64);
                if lo < hi {
                    mask.bits[row * mask.words_per_row + wi] = span_mask(0, hi - lo);
                }
            }
        }
        mask
    }

    /// Build a mask from a per-pixel alpha channel (row-major, `width * height`
    /// bytes); pixels with alpha above `threshold` are opaque. Matches how a
    /// renderer would derive masks from RGBA sprite images.
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8], threshold: u8) -> Self {
        debug_assert_eq!(alpha.len(), (width * height) as usize);
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if alpha[(y * width + x) as usize] > threshold {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Build a mask from a predicate over pixel coordinates
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if f(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True if the mask has zero area or no opaque pixels
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&w| w == 0)
    }

    /// Opacity at (x, y); out-of-bounds reads are transparent
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let word = self.bits[y as usize * self.words_per_row + (x / 64) as usize];
        word >> (x % 64) & 1 != 0
    }

    /// Set opacity at (x, y); out-of-bounds writes are ignored
    pub fn set(&mut self, x: u32, y: u32, opaque: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y as usize * self.words_per_row + (x / 64) as usize;
        let bit = 1u64 << (x % 64);
        if opaque {
            self.bits[idx] |= bit;
        } else {
            self.bits[idx] &= !bit;
        }
    }

    /// Fetch word `wi` of row `y`, treating indices past the row as transparent
    #[inline]
    fn word(&self, y: u32, wi: usize) -> u64 {
        if wi < self.words_per_row {
            self.bits[y as usize * self.words_per_row + wi]
        } else {
            0
        }
    }

    /// 64 bits of row `y` starting at signed column `start`: output bit `b`
    /// holds the opacity at column `start + b`, out-of-bounds columns are
    /// transparent.
    fn row_window(&self, y: u32, start: i64) -> u64 {
        if start >= self.width as i64 || start <= -64 {
            return 0;
        }
        if start >= 0 {
            let wi = (start / 64) as usize;
            let shift = (start % 64) as u32;
            let lo = self.word(y, wi);
            if shift == 0 {
                lo
            } else {
                (lo >> shift) | (self.word(y, wi + 1) << (64 - shift))
            }
        } else {
            // start in (-64, 0): the window begins left of the mask, so only
            // word 0 can contribute, shifted up past the transparent margin
            self.word(y, 0) << (-start) as u32
        }
    }

    /// Exact per-pixel overlap test against `other`, whose top-left corner is
    /// placed at `offset` in this mask's coordinate space.
    ///
    /// Degenerate (zero-size or fully transparent) masks never overlap.
    pub fn overlaps(&self, other: &Mask, offset: IVec2) -> bool {
        let ox = offset.x as i64;
        let oy = offset.y as i64;

        // Intersection rectangle in self's coordinates
        let x0 = ox.max(0);
        let x1 = (ox + other.width as i64).min(self.width as i64);
        let y0 = oy.max(0);
        let y1 = (oy + other.height as i64).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }

        let w_start = (x0 / 64) as usize;
        let w_end = ((x1 - 1) / 64) as usize;

        for y in y0..y1 {
            let other_y = (y - oy) as u32;
            for wi in w_start..=w_end {
                let base = wi as i64 * 64;
                let lo = (x0 - base).clamp(0, 64) as u32;
                let hi = (x1 - base).clamp(0, 64) as u32;
                if lo >= hi {
                    continue;
                }
                let ours = self.word(y as u32, wi) & span_mask(lo, hi);
                if ours == 0 {
                    continue;
                }
                let theirs = other.row_window(other_y, base - ox);
                if ours & theirs != 0 {
                    return true;
                }
            }
        }
        false
    }
}

/// Immutable collision masks for every sprite the simulation touches.
///
/// Sourced from the (external) asset layer once per session and shared
/// read-only by every round; the core only depends on the overlap test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteMasks {
    pub bird: Mask,
    pub pipe_top: Mask,
    pub pipe_bottom: Mask,
}

impl SpriteMasks {
    pub fn new(bird: Mask, pipe_top: Mask, pipe_bottom: Mask) -> Self {
        Self {
            bird,
            pipe_top,
            pipe_bottom,
        }
    }

    /// Solid-rectangle masks at the stock sprite dimensions, for headless
    /// drivers and tests that have no asset layer
    pub fn solid() -> Self {
        use crate::consts::*;
        Self {
            bird: Mask::filled(BIRD_WIDTH, BIRD_HEIGHT),
            pipe_top: Mask::filled(PIPE_WIDTH, PIPE_HEIGHT),
            pipe_bottom: Mask::filled(PIPE_WIDTH, PIPE_HEIGHT),
        }
    }
}
