//! Font handling.
//!
//! Real OpenType parsing and glyph rasterization are out of scope for this
//! crate (see the crate docs); [`Font`] is the seam a host application
//! implements against whatever font backend it has on hand. This module
//! only specifies the contract: metrics, space width, ligatures, pairwise
//! kerning and (for a back-end sink) drawing.

mod failover;
mod manager;

pub use failover::FailoverFont;
pub use manager::{FontLoader, FontManager};

use std::sync::Arc;

use crate::error::RenderError;
use crate::units::Sp;

/// A font weight/style/width selector, deliberately coarse — this engine
/// does not interpret font files, so it passes the variant through verbatim
/// to the loader.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontVariant {
    pub bold: bool,
    pub italic: bool,
}

impl FontVariant {
    pub const REGULAR: Self = Self { bold: false, italic: false };
    pub const BOLD: Self = Self { bold: true, italic: false };
    pub const ITALIC: Self = Self { bold: false, italic: true };
    pub const BOLD_ITALIC: Self = Self { bold: true, italic: true };
}

/// Width, height and depth of a piece of typeset material, all in scaled
/// points. Height is measured from the baseline up, depth from the baseline
/// down; both are non-negative.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Metrics {
    pub width: Sp,
    pub height: Sp,
    pub depth: Sp,
}

impl Metrics {
    pub const ZERO: Self = Self { width: 0, height: 0, depth: 0 };

    pub fn new(width: Sp, height: Sp, depth: Sp) -> Self {
        debug_assert!(height >= 0, "height must be non-negative");
        debug_assert!(depth >= 0, "depth must be non-negative");
        Self { width, height, depth }
    }
}

/// A back-end drawing sink. Implementations live outside this crate (the
/// PDF writer, a screen renderer, ...); the engine only ever calls through
/// this trait, never performs drawing itself.
pub trait DrawSink {
    fn set_font(&mut self, font: &dyn Font, size_sp: Sp);
    fn draw_glyphs(&mut self, text: &str, x: Sp, y: Sp);
    fn draw_rule(&mut self, x: Sp, y: Sp, width: Sp, height: Sp);
}

/// The contract a font backend must satisfy, independent of point size.
///
/// Implementations are expected to be cheap to clone (an `Arc<Repr>` style
/// wrapper) and are treated as immutable once constructed, so that a
/// [`FontManager`] can share one instance across every caller that asks for
/// the same `(typeface, variant)`.
pub trait Font: Send + Sync {
    /// Whether the font has a glyph for `codepoint`.
    fn has_character(&self, codepoint: char) -> bool;

    /// The natural width of a space in this font, at `size_sp`.
    fn space_width(&self, size_sp: Sp) -> Sp;

    /// Width/height/depth of a single character at `size_sp`. Callers must
    /// check [`Font::has_character`] first; an unsupported code point
    /// returns zero metrics.
    fn character_metrics(&self, codepoint: char, size_sp: Sp) -> Metrics;

    /// Sum of character metrics (after ligature folding), ignoring kerning,
    /// which callers add explicitly via [`Font::kerning`].
    fn string_metrics(&self, text: &str, size_sp: Sp) -> Metrics {
        let ligated = self.transform_ligatures(text);
        let mut width = 0;
        let mut height = 0;
        let mut depth = 0;
        for c in ligated.chars() {
            let m = self.character_metrics(c, size_sp);
            width += m.width;
            height = height.max(m.height);
            depth = depth.max(m.depth);
        }
        Metrics::new(width, height, depth)
    }

    /// The pairwise kerning correction to apply between two adjacent
    /// characters, in scaled points at `size_sp`. Zero if there is none, or
    /// if either code point is the nul sentinel `'\0'` (meaning "no
    /// preceding/following character").
    fn kerning(&self, prev: char, curr: char, size_sp: Sp) -> Sp;

    /// Applies this font's ligature substitution table to `text`. Pure:
    /// does not depend on or mutate font state. Idempotence on
    /// already-ligated output is not guaranteed, though typical ligature
    /// tables are idempotent in practice.
    fn transform_ligatures(&self, text: &str) -> String;

    /// Draws `text` at `(x, y)` through `sink`. Fails if this font cannot
    /// render some character in `text` — for a plain [`Font`] that's any
    /// character [`Font::has_character`] rejects; [`FailoverFont`]
    /// overrides this to dispatch per-codepoint.
    fn draw(&self, text: &str, x: Sp, y: Sp, size_sp: Sp, sink: &mut dyn DrawSink) -> Result<(), RenderError> {
        for c in text.chars() {
            if !self.has_character(c) {
                return Err(RenderError::new(format!(
                    "font does not support U+{:04X}",
                    c as u32
                )));
            }
        }
        sink.set_font(self, size_sp);
        sink.draw_glyphs(text, x, y);
        Ok(())
    }
}

/// A font bound to a fixed point size: the unit the rest of the engine
/// actually works in, since nearly every metric depends on size.
#[derive(Clone)]
pub struct SizedFont {
    font: Arc<dyn Font>,
    size_sp: Sp,
}

impl SizedFont {
    pub fn new(font: Arc<dyn Font>, size_sp: Sp) -> Self {
        Self { font, size_sp }
    }

    pub fn size(&self) -> Sp {
        self.size_sp
    }

    pub fn font(&self) -> &Arc<dyn Font> {
        &self.font
    }

    pub fn has_character(&self, codepoint: char) -> bool {
        self.font.has_character(codepoint)
    }

    pub fn space_width(&self) -> Sp {
        self.font.space_width(self.size_sp)
    }

    pub fn character_metrics(&self, codepoint: char) -> Metrics {
        self.font.character_metrics(codepoint, self.size_sp)
    }

    pub fn string_metrics(&self, text: &str) -> Metrics {
        self.font.string_metrics(text, self.size_sp)
    }

    pub fn kerning(&self, prev: char, curr: char) -> Sp {
        if prev == '\0' || curr == '\0' {
            return 0;
        }
        self.font.kerning(prev, curr, self.size_sp)
    }

    pub fn transform_ligatures(&self, text: &str) -> String {
        self.font.transform_ligatures(text)
    }

    pub fn draw(&self, text: &str, x: Sp, y: Sp, sink: &mut dyn DrawSink) -> Result<(), RenderError> {
        self.font.draw(text, x, y, self.size_sp, sink)
    }
}
