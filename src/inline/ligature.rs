//! Stage 3 of the horizontal assembler: applies each run's font ligature
//! table, including ligatures that would span a hyphenation point.
//!
//! A ligature can't itself be cut in two, so when the character before a
//! `Discretionary` and the character after it (or the discretionary's own
//! pre/post-break text) would ligate together, the affected glyphs move
//! into the discretionary's three alternatives and only the unaffected
//! remainder stays in the flanking `Text` runs. `entireNoBreak`,
//! `entirePreBreak` and `entirePostBreak` are each reconstructed and
//! re-ligated, then split back out via their longest common prefix/suffix
//! with the flanking text.

use crate::element::{Container, Element, ElementList, TextRun};
use crate::font::SizedFont;

pub(super) fn fold(elements: &mut ElementList) {
    for element in elements.iter_mut() {
        if let Element::Text(run) = element {
            let ligated = run.font.transform_ligatures(&run.text);
            if ligated != run.text.as_str() {
                *run = TextRun::new(ligated, run.font.clone());
            }
        }
    }

    let len = elements.len();
    for i in 0..len {
        if i == 0 || i + 1 >= len || !matches!(elements[i], Element::Discretionary(_)) {
            continue;
        }

        let (before, after) = match (&elements[i - 1], &elements[i + 1]) {
            (Element::Text(b), Element::Text(a)) => (b.clone(), a.clone()),
            _ => continue,
        };

        let (pre_text, post_text) = {
            let Element::Discretionary(d) = &elements[i] else { unreachable!() };
            match (container_text(&d.pre_break), container_text(&d.post_break)) {
                (Some(pre), Some(post)) => (pre, post),
                _ => continue,
            }
        };

        let font = before.font.clone();
        let entire_no_break = format!("{}{}", before.text, after.text);
        let entire_pre_break = format!("{}{}", before.text, pre_text);
        let entire_post_break = format!("{post_text}{}", after.text);

        let ligated_no_break = font.transform_ligatures(&entire_no_break);
        let ligated_pre_break = font.transform_ligatures(&entire_pre_break);
        let ligated_post_break = font.transform_ligatures(&entire_post_break);

        if ligated_no_break == entire_no_break
            && ligated_pre_break == entire_pre_break
            && ligated_post_break == entire_post_break
        {
            // No ligature crosses either boundary: nothing to move.
            continue;
        }

        let no_break_len = ligated_no_break.chars().count();
        let prefix_len = common_prefix_len(&ligated_no_break, &ligated_pre_break).min(no_break_len);
        let suffix_len =
            common_suffix_len(&ligated_no_break, &ligated_post_break).min(no_break_len - prefix_len);

        let prefix = chars_range(&ligated_no_break, 0, prefix_len);
        let middle = chars_range(&ligated_no_break, prefix_len, no_break_len - suffix_len);
        let suffix = chars_range(&ligated_no_break, no_break_len - suffix_len, no_break_len);

        let new_pre_break = strip_prefix_len(&ligated_pre_break, prefix_len);
        let new_post_break = strip_suffix_len(&ligated_post_break, suffix_len);

        elements[i - 1] = Element::Text(TextRun::new(prefix, font.clone()));
        elements[i + 1] = Element::Text(TextRun::new(suffix, font.clone()));
        if let Element::Discretionary(d) = &mut elements[i] {
            d.pre_break = container_from_text(&new_pre_break, &font);
            d.post_break = container_from_text(&new_post_break, &font);
            d.no_break = container_from_text(&middle, &font);
        }
    }
}

/// The concatenated text of a container's children, or `None` if it holds
/// anything other than plain `Text` (leaves such discretionaries alone
/// rather than risk corrupting non-text content).
fn container_text(container: &Container) -> Option<String> {
    let mut out = String::new();
    for child in &container.children {
        match child {
            Element::Text(t) => out.push_str(&t.text),
            _ => return None,
        }
    }
    Some(out)
}

fn container_from_text(text: &str, font: &SizedFont) -> Container {
    if text.is_empty() {
        return Container::empty();
    }
    let run = TextRun::new(text, font.clone());
    Container { children: vec![Element::Text(run.clone())], width: run.width, height: run.height, depth: run.depth, shift: 0 }
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

fn common_suffix_len(a: &str, b: &str) -> usize {
    a.chars().rev().zip(b.chars().rev()).take_while(|(x, y)| x == y).count()
}

fn chars_range(s: &str, start: usize, end: usize) -> String {
    s.chars().skip(start).take(end.saturating_sub(start)).collect()
}

fn strip_prefix_len(s: &str, n: usize) -> String {
    s.chars().skip(n).collect()
}

fn strip_suffix_len(s: &str, n: usize) -> String {
    let total = s.chars().count();
    s.chars().take(total.saturating_sub(n)).collect()
}
