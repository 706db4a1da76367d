//! Stage 4 of the horizontal assembler: splits each `Text` run into
//! single-character runs with explicit `Kern` elements between them (font
//! metrics never include kerning — see [`crate::font::Font::string_metrics`]),
//! recursing into each `Discretionary` branch independently.
//!
//! A `Text` run immediately followed by a `Discretionary` needs to know what
//! character would follow it if the line is *not* broken there, to kern
//! against. That's the discretionary's `no_break` branch if non-empty,
//! otherwise the `Text` run after the discretionary. When neither exists,
//! this falls back to no kerning and records
//! [`crate::error::Warning::UnresolvedKernPeek`].

use crate::element::{Container, Element, ElementList, Kern, TextRun};
use crate::error::{Warning, Warnings};

pub(super) fn inject(elements: &mut ElementList, warnings: &mut Warnings) {
    let input = std::mem::take(elements);
    let len = input.len();
    let mut out = ElementList::with_capacity(input.len());
    let mut prev_cp = '\0';

    for i in 0..len {
        match &input[i] {
            Element::Text(run) => {
                let run = run.clone();
                prev_cp = emit_run(&run, prev_cp, &mut out);

                if matches!(input.get(i + 1), Some(Element::Discretionary(_))) {
                    let next_cp = effective_next_char(&input, i + 1, warnings);
                    let kern = run.font.kerning(prev_cp, next_cp.unwrap_or('\0'));
                    if kern != 0 {
                        out.push(Element::Kern(Kern { width: kern, explicit: false }));
                    }
                }
            }
            Element::Discretionary(d) => {
                let mut d = d.clone();
                emit_container(&mut d.pre_break, prev_cp);
                emit_container(&mut d.post_break, '\0');
                emit_container(&mut d.no_break, prev_cp);
                let new_prev = trailing_codepoint(&d.no_break).unwrap_or(prev_cp);
                out.push(Element::Discretionary(d));
                prev_cp = new_prev;
            }
            other => {
                out.push(other.clone());
                prev_cp = '\0';
            }
        }
    }

    *elements = out;
}

/// Splits `run` into single-character `Text` elements with `Kern`s between,
/// appending them to `out`. Returns the trailing code point (or `leading`
/// unchanged if `run` is empty).
fn emit_run(run: &TextRun, leading: char, out: &mut ElementList) -> char {
    let mut prev = leading;
    let mut any = false;
    for c in run.text.chars() {
        if prev != '\0' {
            let kern = run.font.kerning(prev, c);
            if kern != 0 {
                out.push(Element::Kern(Kern { width: kern, explicit: false }));
            }
        }
        out.push(Element::Text(TextRun::new(c.to_string(), run.font.clone())));
        prev = c;
        any = true;
    }
    if any {
        prev
    } else {
        leading
    }
}

fn emit_container(container: &mut Container, leading: char) {
    let children = std::mem::take(&mut container.children);
    let mut new_children = Vec::with_capacity(children.len());
    let mut prev = leading;
    for child in children {
        match child {
            Element::Text(run) => {
                prev = emit_run(&run, prev, &mut new_children);
            }
            other => {
                new_children.push(other);
                prev = '\0';
            }
        }
    }
    container.children = new_children;
}

fn trailing_codepoint(container: &Container) -> Option<char> {
    container.children.iter().rev().find_map(|e| match e {
        Element::Text(t) => t.trailing_codepoint(),
        _ => None,
    })
}

fn effective_next_char(input: &[Element], disc_index: usize, warnings: &mut Warnings) -> Option<char> {
    let Element::Discretionary(d) = &input[disc_index] else { return None };
    if let Some(c) = trailing_codepoint(&d.no_break) {
        return Some(c);
    }
    match input.get(disc_index + 1) {
        Some(Element::Text(t)) => t.leading_codepoint(),
        _ => {
            warnings.push(Warning::UnresolvedKernPeek);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Discretionary;
    use crate::font::test_support::StubFont;
    use crate::font::SizedFont;
    use crate::units::SP_PER_PT;
    use std::sync::Arc;

    fn font_with_kern() -> SizedFont {
        let font = StubFont::new("avwy-", 2 * SP_PER_PT).with_kern('a', 'v', -300);
        SizedFont::new(Arc::new(font), 10 * SP_PER_PT)
    }

    #[test]
    fn splits_text_into_single_chars_with_kerns() {
        let font = font_with_kern();
        let mut elements = vec![Element::Text(TextRun::new("av", font))];
        let mut warnings = Warnings::new();
        inject(&mut elements, &mut warnings);

        let texts: Vec<&str> = elements
            .iter()
            .filter_map(|e| match e {
                Element::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["a", "v"]);
        assert!(elements.iter().any(|e| matches!(e, Element::Kern(k) if k.width == -300)));
    }

    #[test]
    fn no_kern_when_pair_has_none() {
        let font = font_with_kern();
        let mut elements = vec![Element::Text(TextRun::new("wy", font))];
        let mut warnings = Warnings::new();
        inject(&mut elements, &mut warnings);
        assert!(!elements.iter().any(|e| matches!(e, Element::Kern(_))));
    }

    #[test]
    fn peeks_through_empty_no_break_to_following_text() {
        let font = font_with_kern();
        let disc = Discretionary {
            pre_break: Container {
                children: vec![Element::Text(TextRun::new("-", font.clone()))],
                width: 0,
                height: 0,
                depth: 0,
                shift: 0,
            },
            post_break: Container::empty(),
            no_break: Container::empty(),
            penalty: 50,
        };
        let mut elements = vec![
            Element::Text(TextRun::new("a", font.clone())),
            Element::Discretionary(disc),
            Element::Text(TextRun::new("v", font)),
        ];
        let mut warnings = Warnings::new();
        inject(&mut elements, &mut warnings);
        // The "a"-before-discretionary kerns against the "v" that follows it
        // (peeked through the empty no_break), inserting a Kern right after
        // "a" and before the Discretionary.
        let kern_before_disc = elements.iter().position(|e| matches!(e, Element::Discretionary(_)))
            .and_then(|idx| idx.checked_sub(1))
            .map(|idx| matches!(elements[idx], Element::Kern(_)))
            .unwrap_or(false);
        assert!(kern_before_disc);
        assert!(warnings.is_empty());
    }

    #[test]
    fn warns_when_peek_target_is_ambiguous() {
        let font = font_with_kern();
        let disc = Discretionary {
            pre_break: Container::empty(),
            post_break: Container::empty(),
            no_break: Container::empty(),
            penalty: 50,
        };
        let mut elements = vec![Element::Text(TextRun::new("a", font)), Element::Discretionary(disc)];
        let mut warnings = Warnings::new();
        inject(&mut elements, &mut warnings);
        assert!(!warnings.is_empty());
    }
}
