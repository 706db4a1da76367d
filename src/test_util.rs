//! Shared test fixtures used across unit tests in several modules.
#![cfg(test)]

use std::sync::Arc;

use crate::font::test_support::StubFont;
use crate::font::SizedFont;
use crate::units::SP_PER_PT;

/// A `SizedFont` wrapping a small fixed-width [`StubFont`], 10pt size,
/// every ASCII letter plus a handful of punctuation marks supported.
pub fn stub_sized_font() -> SizedFont {
    let font = StubFont::new(
        "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ-'.,;:!?",
        2 * SP_PER_PT,
    );
    SizedFont::new(Arc::new(font), 10 * SP_PER_PT)
}
