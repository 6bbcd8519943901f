//! Compose the page under the curl into a single ARGB buffer.
//!
//! The host may keep the next page as RGB565 to save memory. Before the
//! curl is drawn, the part of that page lying to the right of the fold's `WZ`
//! line is copied into the ARGB surface row by row. Pixels that are already
//! non-zero (drawn by an earlier pass) are left alone.

#[cfg(test)]
#[path = "synth_test.rs"]
mod synth_test;

use crate::book::Slot;
use crate::geom::{Line, Point};
use crate::points::AllPoints;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthError {
    #[error("buffer holds {actual} pixels, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Expand a 5-6-5 pixel to opaque 8-bit channels, packed little-endian as
/// `R, G, B, A` bytes (`0xAABBGGRR`), the layout canvas `ImageData` uses.
#[must_use]
pub fn rgb565_to_argb8888(pixel: u16) -> u32 {
    let r = u32::from((pixel >> 11) & 0x1F) * 0xFF / 0x1F;
    let g = u32::from((pixel >> 5) & 0x3F) * 0xFF / 0x3F;
    let b = u32::from(pixel & 0x1F) * 0xFF / 0x1F;
    0xFF << 24 | (b & 0xFF) << 16 | (g & 0xFF) << 8 | (r & 0xFF)
}

/// Per-row fold spans, reused across frames.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    width: usize,
    height: usize,
    /// First column on or right of the `WZ` line, per row.
    wz_edge: Vec<usize>,
    /// First column of the `ST` band, per row.
    st_edge: Vec<usize>,
}

impl Synthesizer {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, wz_edge: vec![0; height], st_edge: vec![0; height] }
    }

    #[must_use]
    pub fn spans(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.wz_edge.iter().copied().zip(self.st_edge.iter().copied())
    }

    fn clamp_column(&self, value: f64) -> usize {
        // Start one column early so no gap shows along the fold.
        #[allow(clippy::cast_possible_truncation)]
        let col = value as i64 - 1;
        let max = i64::try_from(self.width.saturating_sub(1)).unwrap_or(i64::MAX);
        usize::try_from(col.clamp(0, max)).unwrap_or(0)
    }

    /// Recompute the row spans for a fold with the given `W`, `Z` and `S.x`
    /// in surface pixels (screen orientation).
    pub fn compute_spans(&mut self, w: Point, z: Point, s_x: f64, upside_down: bool) {
        let inv_k = (z.x - w.x) / (z.y - w.y);
        let b_wz = z.y - z.x / inv_k;
        let ws = s_x - w.x;

        for row in 0..self.height {
            #[allow(clippy::cast_precision_loss)]
            let x = (row as f64 - b_wz) * inv_k;
            let target = if upside_down { self.height - 1 - row } else { row };
            self.wz_edge[target] = self.clamp_column(x);
            self.st_edge[target] = self.clamp_column(x + ws);
        }
    }

    /// Fill still-transparent pixels of `synthesized` from `lower`, from each
    /// row's `WZ` edge to the right border.
    ///
    /// # Errors
    ///
    /// [`SynthError::SizeMismatch`] if either buffer is not `width · height`.
    pub fn synthesize(&self, synthesized: &mut [u32], lower: &[u16]) -> Result<(), SynthError> {
        let expected = self.width * self.height;
        for actual in [synthesized.len(), lower.len()] {
            if actual != expected {
                return Err(SynthError::SizeMismatch { expected, actual });
            }
        }
        if expected == 0 {
            return Ok(());
        }

        for (row, (wz, st)) in self.spans().enumerate() {
            let base = row * self.width;
            let band = wz..=st;
            let rest = st + 1..self.width;
            for col in band.chain(rest) {
                let idx = base + col;
                if synthesized[idx] == 0 {
                    synthesized[idx] = rgb565_to_argb8888(lower[idx]);
                }
            }
        }
        Ok(())
    }
}

/// Reset every pixel to transparent before a new composition.
pub fn clear(synthesized: &mut [u32]) {
    synthesized.fill(0);
}

/// A page the host supplied as RGB565 pixels instead of a drawn surface.
///
/// Each frame the part revealed right of the fold is expanded into an ARGB
/// buffer; everything left of it stays transparent.
#[derive(Debug, Clone)]
pub struct LowerPage {
    page: usize,
    slot: Slot,
    width: usize,
    height: usize,
    pixels: Vec<u16>,
    synth: Synthesizer,
    composed: Vec<u32>,
}

impl LowerPage {
    /// # Errors
    ///
    /// [`SynthError::SizeMismatch`] if `pixels` is not `width · height`.
    pub fn new(page: usize, slot: Slot, width: usize, height: usize, pixels: Vec<u16>) -> Result<Self, SynthError> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(SynthError::SizeMismatch { expected, actual: pixels.len() });
        }
        Ok(Self {
            page,
            slot,
            width,
            height,
            pixels,
            synth: Synthesizer::new(width, height),
            composed: vec![0; expected],
        })
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub fn slot(&self) -> Slot {
        self.slot
    }

    #[must_use]
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Compose the revealed part for the display polygon `points` (surface
    /// pixels, already mirrored when the curl is upside-down).
    ///
    /// # Errors
    ///
    /// Propagates [`Synthesizer::synthesize`] errors.
    pub fn compose(&mut self, points: &AllPoints, upside_down: bool) -> Result<&[u32], SynthError> {
        // Spans are computed in the solver's orientation and mirrored per row.
        let solved = if upside_down {
            #[allow(clippy::cast_precision_loss)]
            let mid = Line::horizontal(self.height as f64 / 2.0);
            points.reflect_about(&mid)
        } else {
            *points
        };
        self.synth.compute_spans(solved.w, solved.z, solved.s.x, upside_down);
        clear(&mut self.composed);
        self.synth.synthesize(&mut self.composed, &self.pixels)?;
        Ok(&self.composed)
    }
}

/// Byte view of composed pixels in canvas `ImageData` order (`R, G, B, A`).
#[must_use]
pub fn to_rgba_bytes(pixels: &[u32]) -> Vec<u8> {
    pixels.iter().flat_map(|p| p.to_le_bytes()).collect()
}
