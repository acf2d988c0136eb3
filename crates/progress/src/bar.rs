//! Glyph progress bars.

use std::fmt;

use timebar_core::{BarLength, BlockAlphabet, ProgressRatio};

/// A rendered bar of exactly `len()` glyphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressBar {
    glyphs: String,
    len: usize,
}

impl ProgressBar {
    /// Bar text.
    pub fn as_str(&self) -> &str {
        &self.glyphs
    }

    /// Number of glyphs (not bytes).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the bar has no glyphs.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for ProgressBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.glyphs)
    }
}

/// Render `ratio` as a bar of `length` glyphs.
///
/// Whole cells use the full glyph. The cell after them gets one partial
/// glyph chosen by bucketing the leftover fraction over the alphabet's
/// interior glyphs; the rest is padded with the empty glyph. A complete bar
/// has no partial cell.
pub fn render(ratio: ProgressRatio, alphabet: &BlockAlphabet, length: BarLength) -> ProgressBar {
    let length = length.get();
    let scaled = ratio.value() * length as f64;
    let full_count = (scaled.floor().max(0.0) as usize).min(length);

    let mut glyphs = String::with_capacity(length.saturating_mul(4));
    glyphs.extend(std::iter::repeat(alphabet.full()).take(full_count));

    let mut count = full_count;
    if full_count < length {
        glyphs.push(partial_glyph(scaled - full_count as f64, alphabet));
        count += 1;
    }

    glyphs.extend(std::iter::repeat(alphabet.empty()).take(length - count));

    ProgressBar { glyphs, len: length }
}

/// Glyph for a cell filled to `frac` (in `[0, 1)`).
fn partial_glyph(frac: f64, alphabet: &BlockAlphabet) -> char {
    let interior = alphabet.interior_len();
    if interior == 0 {
        return if frac >= 0.5 { alphabet.full() } else { alphabet.empty() };
    }

    let bucket = ((frac * interior as f64).floor().max(0.0) as usize).min(interior - 1);
    alphabet.get(bucket + 1).unwrap_or_else(|| alphabet.empty())
}
