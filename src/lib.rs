//! A book-grade typesetting engine core: hyphenation, kerning, TeX-style
//! optimal line and page breaking, locale-aware punctuation, limited
//! bidirectional reordering, and section/bookmark tracking.
//!
//! This crate owns the layout decisions — where lines and pages break, how
//! much glue stretches, which codepoints kern against which — but not
//! parsing, font rasterization, or rendering; see [`font`] for the seam a
//! host application implements against its own font backend.

pub mod breaker;
pub mod element;
pub mod error;
pub mod flow;
pub mod font;
pub mod hyphenation;
pub mod inline;
pub mod locale;
pub mod sections;
pub mod units;

#[cfg(test)]
mod test_util;
