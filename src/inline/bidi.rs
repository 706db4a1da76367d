//! Stage 5 of the horizontal assembler: codepoint-level run reversal for
//! strongly-RTL text. This is not a full UAX#9 bidi algorithm (no embedding
//! levels, no paired brackets, no mirroring) — it finds maximal runs of
//! strongly-RTL characters and reverses their visual order, which is enough
//! for runs of Hebrew/Arabic text sitting inside an otherwise-LTR paragraph.
//! Complex script shaping is out of scope (see crate docs).

use unicode_bidi::{bidi_class, BidiClass};

use crate::element::{Element, ElementList, TextRun};

pub(super) fn reorder(elements: &mut ElementList) {
    let len = elements.len();
    let mut i = 0;
    while i < len {
        if is_rtl_text(&elements[i]) {
            let start = i;
            let mut end = i;
            while end < len && (is_rtl_text(&elements[end]) || !matches!(elements[end], Element::Text(_))) {
                end += 1;
            }
            while end > start && !is_rtl_text(&elements[end - 1]) {
                end -= 1;
            }
            reverse_rtl_span(&mut elements[start..end]);
            i = end.max(start + 1);
        } else {
            i += 1;
        }
    }
}

fn is_rtl_text(e: &Element) -> bool {
    matches!(e, Element::Text(t) if t.text.chars().next().is_some_and(is_rtl_char))
}

fn is_rtl_char(c: char) -> bool {
    matches!(bidi_class(c), BidiClass::R | BidiClass::AL)
}

/// Reverses the order of the `Text` elements in `span`, leaving any
/// interleaved non-`Text` elements (inter-word `Glue`, `Kern`, ...) at their
/// original positions.
fn reverse_rtl_span(span: &mut [Element]) {
    let positions: Vec<usize> =
        span.iter().enumerate().filter(|(_, e)| matches!(e, Element::Text(_))).map(|(i, _)| i).collect();
    let mut runs: Vec<TextRun> = positions
        .iter()
        .map(|&i| match &span[i] {
            Element::Text(t) => t.clone(),
            _ => unreachable!(),
        })
        .collect();
    runs.reverse();
    for (slot, run) in positions.into_iter().zip(runs) {
        span[slot] = Element::Text(run);
    }
}
