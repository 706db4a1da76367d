//! Locale-sensitive punctuation post-processing: smart quotes, French
//! spacing, ellipsis and em-dash conversion, applied to each paragraph
//! block before horizontal assembly.
//!
//! State (quotation open/closed) is carried *across* the spans of a block
//! by the caller's loop, not inside a span, since a block's style runs can
//! switch styles mid-quotation.

use ecow::EcoString;

use crate::error::Warning;

/// The locales this post-processor distinguishes. Every locale shares the
/// `~`/`'`/quote/ellipsis rules; only French adds thin-space punctuation,
/// French-style guillemets and the dialog-dash rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    French,
    Other,
}

const NBSP: char = '\u{00A0}';
const THIN_NBSP: char = '\u{202F}';
const RIGHT_SINGLE_QUOTE: char = '\u{2019}';
const LEFT_DOUBLE_QUOTE: char = '\u{201C}';
const RIGHT_DOUBLE_QUOTE: char = '\u{201D}';
const GUILLEMET_OPEN: char = '\u{00AB}';
const GUILLEMET_CLOSE: char = '\u{00BB}';
const EM_DASH: char = '\u{2014}';

/// A span of text within a block, as the post-processor sees it: only the
/// text matters here, not font/style attribution.
pub struct Span<'a> {
    pub text: &'a str,
}

/// Carries quotation state across a block's spans and produces the
/// post-processed text for each span in turn.
pub struct BlockPostProcessor {
    locale: Locale,
    quote_open: bool,
    /// Whether we are at the very first code point of the very first span
    /// of the block (for the French leading-dash dialog marker, which spec
    /// defines as `i == 0 && j == 0` — only the first codepoint of the
    /// first span, not "start of any span").
    at_block_start: bool,
    line: Option<u32>,
}

impl BlockPostProcessor {
    pub fn new(locale: Locale, line: Option<u32>) -> Self {
        Self { locale, quote_open: false, at_block_start: true, line }
    }

    /// Processes one span's text, returning the transformed text. Call this
    /// once per span of the block, in order.
    pub fn process_span(&mut self, span: Span) -> EcoString {
        let mut out = EcoString::new();
        let mut chars = span.text.chars().peekable();
        let mut prev_emitted: Option<char> = None;

        while let Some(c) = chars.next() {
            let is_block_start = self.at_block_start;
            self.at_block_start = false;

            match c {
                '~' => {
                    out.push(NBSP);
                    prev_emitted = Some(NBSP);
                }
                '\'' => {
                    out.push(RIGHT_SINGLE_QUOTE);
                    prev_emitted = Some(RIGHT_SINGLE_QUOTE);
                }
                '"' => {
                    self.quote_open = !self.quote_open;
                    let opening = self.quote_open;
                    match self.locale {
                        Locale::Other => {
                            out.push(if opening { LEFT_DOUBLE_QUOTE } else { RIGHT_DOUBLE_QUOTE });
                        }
                        Locale::French => {
                            if opening {
                                out.push(GUILLEMET_OPEN);
                                out.push(NBSP);
                            } else {
                                out.push(NBSP);
                                out.push(GUILLEMET_CLOSE);
                            }
                        }
                    }
                    prev_emitted = Some(c);
                }
                '-' if self.locale == Locale::French
                    && is_block_start
                    && chars.peek() == Some(&' ') =>
                {
                    // "- " at the very start of the block becomes an
                    // em-dash, consuming the following space (dialog
                    // marker). spec.md is explicit this only fires for
                    // i==0 && j==0 (first codepoint of the first span);
                    // see DESIGN.md for the open-question rationale.
                    chars.next();
                    out.push(EM_DASH);
                    prev_emitted = Some(EM_DASH);
                }
                '.' if chars.clone().take(2).eq(['.', '.']) => {
                    chars.next();
                    chars.next();
                    out.push(NBSP);
                    out.push('.');
                    out.push(NBSP);
                    out.push('.');
                    out.push(NBSP);
                    out.push('.');
                    prev_emitted = Some('.');
                }
                ':' | ';' | '!' | '?' if self.locale == Locale::French => {
                    let space = if prev_emitted == Some('.') { NBSP } else { THIN_NBSP };
                    out.push(space);
                    out.push(c);
                    prev_emitted = Some(c);
                }
                other => {
                    out.push(other);
                    prev_emitted = Some(other);
                }
            }
        }

        out
    }

    /// Call after the last span of the block to detect unbalanced
    /// quotation state; emits a [`Warning`] (never fails the job) if the
    /// block ended mid-quote.
    pub fn finish(self) -> Option<Warning> {
        if self.quote_open {
            Some(Warning::UnbalancedQuotes { line: self.line })
        } else {
            None
        }
    }
}

/// Convenience entry point: post-processes every span of a block in order,
/// returning the transformed spans and any warning produced.
pub fn process_block(locale: Locale, spans: &[&str], line: Option<u32>) -> (Vec<EcoString>, Option<Warning>) {
    let mut processor = BlockPostProcessor::new(locale, line);
    let out = spans.iter().map(|s| processor.process_span(Span { text: s })).collect();
    (out, processor.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn e2_french_punctuation_thin_space() {
        let (out, warn) = process_block(Locale::French, &["Bonjour!"], None);
        assert_eq!(out[0].as_str(), "Bonjour\u{202F}!");
        assert!(warn.is_none());
    }

    #[test]
    fn e2_french_guillemets_idempotent_on_explicit_forms() {
        // Explicit guillemets passed straight through: only ASCII `"` is
        // transformed, so already-formed guillemets are untouched.
        let (out, _) = process_block(Locale::French, &["\u{00AB} Bonjour \u{00BB}"], None);
        assert_eq!(out[0].as_str(), "\u{00AB} Bonjour \u{00BB}");
    }

    #[test]
    fn e2_french_leading_dash_becomes_em_dash() {
        let (out, _) = process_block(Locale::French, &["-Bonjour"], None);
        // No space follows '-' here, so the dialog rule does not fire and
        // the dash passes through unchanged.
        assert_eq!(out[0].as_str(), "-Bonjour");

        let (out2, _) = process_block(Locale::French, &["- Bonjour"], None);
        assert_eq!(out2[0].as_str(), "\u{2014}Bonjour");
    }

    #[test]
    fn e3_english_smart_quotes() {
        let (out, _) = process_block(Locale::Other, &["She said \"hi\"."], None);
        assert_eq!(out[0].as_str(), "She said \u{201C}hi\u{201D}.");
    }

    #[test]
    fn e3_apostrophe_is_right_single_quote() {
        let (out, _) = process_block(Locale::Other, &["it's"], None);
        assert_eq!(out[0].as_str(), "it\u{2019}s");
    }

    #[test]
    fn ellipsis_becomes_spaced_nbsp_dots() {
        let (out, _) = process_block(Locale::Other, &["Wait..."], None);
        assert_eq!(out[0].as_str(), "Wait\u{00A0}.\u{00A0}.\u{00A0}.");
    }

    #[test]
    fn quote_state_crosses_span_boundaries() {
        let mut processor = BlockPostProcessor::new(Locale::Other, Some(7));
        let a = processor.process_span(Span { text: "Say \"" });
        let b = processor.process_span(Span { text: "hi" });
        let c = processor.process_span(Span { text: "\" now" });
        assert!(a.ends_with(LEFT_DOUBLE_QUOTE));
        assert_eq!(b.as_str(), "hi");
        assert!(c.starts_with(RIGHT_DOUBLE_QUOTE));
        assert!(processor.finish().is_none());
    }

    #[test]
    fn unbalanced_quote_warns_with_line() {
        let (_, warn) = process_block(Locale::Other, &["\"never closed"], Some(42));
        assert_eq!(warn, Some(Warning::UnbalancedQuotes { line: Some(42) }));
    }

    #[test]
    fn french_punctuation_after_ellipsis_uses_full_nbsp() {
        let (out, _) = process_block(Locale::French, &["Attends...!"], None);
        // The '.' before '!' came from the ellipsis expansion, so the
        // space before '!' must be a full NBSP, not a thin one.
        assert!(out[0].ends_with(&format!("{NBSP}!")));
    }
}
