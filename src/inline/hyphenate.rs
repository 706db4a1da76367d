//! Stage 2 of the horizontal assembler: turns eligible `Text` elements into
//! `Text`/`Discretionary`/`Text`/... sequences at each hyphenation point.

use crate::element::{Container, Discretionary, Element, ElementList, TextRun};
use crate::hyphenation::Dictionary;

use super::words::is_word_char;

/// Walks `elements` in place, replacing any `Text` run that starts with a
/// word character with its hyphenated expansion.
pub(super) fn insert(elements: &mut ElementList, dict: &Dictionary, hyphen_penalty: i32) {
    let mut out = ElementList::with_capacity(elements.len());

    for element in elements.drain(..) {
        match element {
            Element::Text(run) if run.leading_codepoint().is_some_and(is_word_char) => {
                expand(run, dict, hyphen_penalty, &mut out);
            }
            other => out.push(other),
        }
    }

    *elements = out;
}

fn expand(run: TextRun, dict: &Dictionary, hyphen_penalty: i32, out: &mut ElementList) {
    let segments = dict.hyphenate(&run.text);
    if segments.len() <= 1 {
        out.push(Element::Text(run));
        return;
    }

    for (i, segment) in segments.iter().enumerate() {
        out.push(Element::Text(TextRun::new(segment.clone(), run.font.clone())));
        if i + 1 < segments.len() {
            out.push(Element::Discretionary(hyphen_point(&run, segment, hyphen_penalty)));
        }
    }
}

/// Builds the discretionary at a hyphenation point. `segment` is the
/// syllable immediately before this point; if `apply_dash_postfixes`
/// already merged a literal `-` onto its tail, the pre-break hyphen is
/// omitted rather than doubled.
fn hyphen_point(run: &TextRun, segment: &str, hyphen_penalty: i32) -> Discretionary {
    let pre_break = if segment.ends_with('-') {
        Container::empty()
    } else {
        let hyphen = TextRun::new("-", run.font.clone());
        Container {
            children: vec![Element::Text(hyphen)],
            width: run.font.character_metrics('-').width,
            height: 0,
            depth: 0,
            shift: 0,
        }
    };
    Discretionary { pre_break, post_break: Container::empty(), no_break: Container::empty(), penalty: hyphen_penalty }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINI_EN: &str = "\
LEFTHYPHENMIN 2
RIGHTHYPHENMIN 3
NEXTLEVEL
dif1f
1fi
fi1c
cult1
";

    fn text_run(word: &str) -> TextRun {
        TextRun::new(word, crate::test_util::stub_sized_font())
    }

    #[test]
    fn inserts_discretionaries_at_hyphen_points() {
        let dict = Dictionary::parse(MINI_EN).unwrap();
        let mut elements = vec![Element::Text(text_run("difficult"))];
        insert(&mut elements, &dict, 50);

        let texts: Vec<&str> = elements
            .iter()
            .filter_map(|e| match e {
                Element::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["dif", "fi", "cult"]);
        assert_eq!(
            elements.iter().filter(|e| matches!(e, Element::Discretionary(_))).count(),
            2
        );
    }

    #[test]
    fn word_without_hyphen_points_stays_one_text() {
        let dict = Dictionary::parse(MINI_EN).unwrap();
        let mut elements = vec![Element::Text(text_run("a"))];
        insert(&mut elements, &dict, 50);
        assert_eq!(elements.len(), 1);
        assert!(matches!(&elements[0], Element::Text(t) if t.text.as_str() == "a"));
    }

    #[test]
    fn segment_already_ending_in_dash_gets_no_extra_hyphen() {
        // A segment that already ends in "-" (as apply_dash_postfixes can
        // produce) must not get a second hyphen inserted.
        let disc = hyphen_point(&text_run("dif"), "dif-", 50);
        assert!(disc.pre_break.children.is_empty());

        let disc_plain = hyphen_point(&text_run("dif"), "dif", 50);
        assert!(!disc_plain.pre_break.children.is_empty());
    }

    #[test]
    fn non_word_text_is_left_untouched() {
        let dict = Dictionary::parse(MINI_EN).unwrap();
        let mut elements = vec![Element::Text(text_run(","))];
        insert(&mut elements, &dict, 50);
        assert_eq!(elements.len(), 1);
    }
}
