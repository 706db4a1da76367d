//! A composition of a primary font with a fallback, delegating per-codepoint.

use std::sync::Arc;

use super::{DrawSink, Font, Metrics};
use crate::error::RenderError;
use crate::units::Sp;

/// A primary font backed by a fallback for code points the primary doesn't
/// support. `has_character` is the union of both; metrics and drawing
/// dispatch to whichever constituent reports support, primary first.
/// `space_width` always comes from the primary, matching the contract in
/// the engine's font design (a fallback's space metrics would otherwise
/// make justification inconsistent mid-paragraph).
pub struct FailoverFont {
    primary: Arc<dyn Font>,
    fallback: Arc<dyn Font>,
}

impl FailoverFont {
    pub fn new(primary: Arc<dyn Font>, fallback: Arc<dyn Font>) -> Self {
        Self { primary, fallback }
    }

    fn pick(&self, codepoint: char) -> Option<&Arc<dyn Font>> {
        if self.primary.has_character(codepoint) {
            Some(&self.primary)
        } else if self.fallback.has_character(codepoint) {
            Some(&self.fallback)
        } else {
            None
        }
    }
}

impl Font for FailoverFont {
    fn has_character(&self, codepoint: char) -> bool {
        self.primary.has_character(codepoint) || self.fallback.has_character(codepoint)
    }

    fn space_width(&self, size_sp: Sp) -> Sp {
        self.primary.space_width(size_sp)
    }

    fn character_metrics(&self, codepoint: char, size_sp: Sp) -> Metrics {
        match self.pick(codepoint) {
            Some(font) => font.character_metrics(codepoint, size_sp),
            None => Metrics::ZERO,
        }
    }

    fn kerning(&self, prev: char, curr: char, size_sp: Sp) -> Sp {
        // Kerning only applies between two glyphs drawn from the same face;
        // if they come from different constituents there is no kerning
        // table that covers the pair.
        match (self.pick(prev), self.pick(curr)) {
            (Some(a), Some(b)) if Arc::ptr_eq(a, b) => a.kerning(prev, curr, size_sp),
            _ => 0,
        }
    }

    fn transform_ligatures(&self, text: &str) -> String {
        // Ligatures are primary-font vocabulary; the fallback is only
        // consulted per missing glyph, not for substitution tables.
        self.primary.transform_ligatures(text)
    }

    fn draw(
        &self,
        text: &str,
        x: Sp,
        y: Sp,
        size_sp: Sp,
        sink: &mut dyn DrawSink,
    ) -> Result<(), RenderError> {
        for c in text.chars() {
            if self.pick(c).is_none() {
                return Err(RenderError::new(format!(
                    "neither primary nor fallback font supports U+{:04X}",
                    c as u32
                )));
            }
        }
        // Runs through whichever constituent supports the leading
        // character; callers needing per-glyph mixed drawing should split
        // the string at constituent boundaries themselves (the horizontal
        // assembler already does this via `has_character` checks upstream).
        let font = self.pick(text.chars().next().unwrap_or('\0'));
        match font {
            Some(f) => f.draw(text, x, y, size_sp, sink),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::test_support::StubFont;

    #[test]
    fn has_character_is_union() {
        let primary = Arc::new(StubFont::new("a", 100));
        let fallback = Arc::new(StubFont::new("b", 100));
        let failover = FailoverFont::new(primary, fallback);
        assert!(failover.has_character('a'));
        assert!(failover.has_character('b'));
        assert!(!failover.has_character('c'));
    }

    #[test]
    fn dispatches_metrics_per_codepoint() {
        let primary = Arc::new(StubFont::new("a", 100));
        let fallback = Arc::new(StubFont::new("b", 200));
        let failover = FailoverFont::new(primary, fallback);
        assert_eq!(failover.character_metrics('a', 0).width, 100);
        assert_eq!(failover.character_metrics('b', 0).width, 200);
        assert_eq!(failover.character_metrics('c', 0).width, 0);
    }

    #[test]
    fn space_width_always_primary() {
        let primary = Arc::new(StubFont::new("a", 111));
        let fallback = Arc::new(StubFont::new("b", 222));
        let failover = FailoverFont::new(primary, fallback);
        assert_eq!(failover.space_width(0), 111);
    }

    #[test]
    fn draw_fails_when_neither_supports() {
        let primary = Arc::new(StubFont::new("a", 100));
        let fallback = Arc::new(StubFont::new("b", 100));
        let failover = FailoverFont::new(primary, fallback);
        struct NullSink;
        impl DrawSink for NullSink {
            fn set_font(&mut self, _font: &dyn Font, _size_sp: Sp) {}
            fn draw_glyphs(&mut self, _text: &str, _x: Sp, _y: Sp) {}
            fn draw_rule(&mut self, _x: Sp, _y: Sp, _width: Sp, _height: Sp) {}
        }
        let mut sink = NullSink;
        assert!(failover.draw("c", 0, 0, 0, &mut sink).is_err());
    }
}
