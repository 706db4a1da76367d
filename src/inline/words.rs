//! Stage 1 of the horizontal assembler: splits each span's text into word
//! and non-word runs, interleaved with non-text spans (images, footnotes,
//! labels, index entries, page references) converted to their element form.

use ecow::EcoString;

use crate::element::{
    Bookmark, Container, Element, ElementList, Glue, Penalty, Stretch, TextRun,
};
use crate::units::Sp;

use super::{AssemblerConfig, InputSpan, ProcessedSpan};

const NBSP: char = '\u{00A0}';
const THIN_NBSP: char = '\u{202F}';

/// Word characters: letters, plus the handful of marks that keep a
/// hyphenated or contracted word as a single unit for hyphenation and
/// kerning purposes.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphabetic() || c == '-' || c == '\'' || c == '\u{2019}'
}

pub(super) fn split(config: &AssemblerConfig, spans: &[ProcessedSpan]) -> ElementList {
    let mut out = ElementList::new();

    for span in spans {
        match span {
            ProcessedSpan::Text(text, style) => {
                split_text(config, text, *style, &mut out);
            }
            ProcessedSpan::Other(InputSpan::Image { width, height }) => {
                out.push(Element::HBox(Container {
                    children: Vec::new(),
                    width: *width,
                    height: *height,
                    depth: 0,
                    shift: 0,
                }));
            }
            ProcessedSpan::Other(InputSpan::Footnote { body }) => {
                out.push(Element::Bookmark(Bookmark::Footnote { body: body.clone() }));
            }
            ProcessedSpan::Other(InputSpan::Label { name }) => {
                out.push(Element::Bookmark(Bookmark::Label { name: name.clone() }));
            }
            ProcessedSpan::Other(InputSpan::Index { entries }) => {
                out.push(Element::Bookmark(Bookmark::Index { entries: entries.clone() }));
            }
            ProcessedSpan::Other(InputSpan::PageRef { style, resolved, .. }) => {
                let label = resolved.clone().unwrap_or_else(|| EcoString::from("?"));
                let font = config.fonts.get(*style).clone();
                out.push(Element::Text(TextRun::new(label, font)));
            }
            ProcessedSpan::Other(InputSpan::Text { .. }) => unreachable!(),
        }
    }

    out
}

fn split_text(config: &AssemblerConfig, text: &str, style: super::StyleFlag, out: &mut ElementList) {
    let font = config.fonts.get(style).clone();

    #[derive(PartialEq, Eq, Clone, Copy)]
    enum Run {
        Word,
        Other,
    }

    let mut run_kind: Option<Run> = None;
    let mut run_start = 0usize;
    let chars: Vec<(usize, char)> = text.char_indices().collect();

    let flush = |out: &mut ElementList, kind: Run, slice: &str| {
        if slice.is_empty() {
            return;
        }
        let _ = kind;
        out.push(Element::Text(TextRun::new(slice, font.clone())));
    };

    let mut i = 0;
    while i < chars.len() {
        let (byte_pos, c) = chars[i];

        if c == ' ' {
            if let Some(kind) = run_kind.take() {
                flush(out, kind, &text[run_start..byte_pos]);
            }
            push_space(config, out);
            i += 1;
            run_start = chars.get(i).map(|(b, _)| *b).unwrap_or(text.len());
            continue;
        }

        if c == NBSP || c == THIN_NBSP {
            if let Some(kind) = run_kind.take() {
                flush(out, kind, &text[run_start..byte_pos]);
            }
            push_unbreakable_space(config, out, c, &font);
            i += 1;
            run_start = chars.get(i).map(|(b, _)| *b).unwrap_or(text.len());
            continue;
        }

        let kind = if is_word_char(c) { Run::Word } else { Run::Other };
        match run_kind {
            None => {
                run_kind = Some(kind);
                run_start = byte_pos;
            }
            Some(prev) if prev != kind => {
                flush(out, prev, &text[run_start..byte_pos]);
                run_kind = Some(kind);
                run_start = byte_pos;
            }
            _ => {}
        }
        i += 1;
    }

    if let Some(kind) = run_kind {
        flush(out, kind, &text[run_start..]);
    }
}

fn push_space(config: &AssemblerConfig, out: &mut ElementList) {
    let space_width = config.fonts.regular.space_width();
    if config.no_line_breaks {
        out.push(Element::Penalty(Penalty::forbidden()));
        out.push(Element::Glue(Glue::new(space_width, Stretch::ZERO, Stretch::ZERO, true)));
        return;
    }

    let stretch = match config.justification {
        super::Justification::Justified => Stretch::finite(space_width / 2),
        super::Justification::RaggedLeft | super::Justification::RaggedRight => {
            Stretch::infinite(0)
        }
    };
    let shrink = Stretch::finite(space_width / 3);
    out.push(Element::Glue(Glue::new(space_width, stretch, shrink, true)));
}

fn push_unbreakable_space(
    config: &AssemblerConfig,
    out: &mut ElementList,
    c: char,
    font: &crate::font::SizedFont,
) {
    let width: Sp = if c == '\u{00A0}' { font.space_width() } else { font.space_width() / 2 };
    out.push(Element::Penalty(Penalty::forbidden()));

    let stretch = match config.justification {
        super::Justification::Justified => Stretch::finite(width / 2),
        super::Justification::RaggedLeft | super::Justification::RaggedRight => Stretch::infinite(0),
    };
    let shrink = Stretch::finite(width / 3);
    out.push(Element::Glue(Glue::new(width, stretch, shrink, true)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::{FontPack, Justification};

    fn config() -> AssemblerConfig<'static> {
        AssemblerConfig {
            fonts: FontPack::uniform(crate::test_util::stub_sized_font()),
            hyphenation: None,
            locale: crate::locale::Locale::Other,
            justification: Justification::Justified,
            no_line_breaks: false,
            hyphen_penalty: 50,
        }
    }

    fn text_contents(elements: &ElementList) -> Vec<String> {
        elements
            .iter()
            .filter_map(|e| match e {
                Element::Text(t) => Some(t.text.to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn splits_words_and_punctuation() {
        let cfg = config();
        let spans = vec![ProcessedSpan::Text("hello, world".into(), super::super::StyleFlag::Regular)];
        let out = split(&cfg, &spans);
        assert_eq!(text_contents(&out), vec!["hello", ",", "world"]);
    }

    #[test]
    fn space_becomes_breakable_glue() {
        let cfg = config();
        let spans = vec![ProcessedSpan::Text("a b".into(), super::super::StyleFlag::Regular)];
        let out = split(&cfg, &spans);
        assert!(matches!(out[1], Element::Glue(_)));
    }

    #[test]
    fn no_line_breaks_forbids_space_break() {
        let mut cfg = config();
        cfg.no_line_breaks = true;
        let spans = vec![ProcessedSpan::Text("a b".into(), super::super::StyleFlag::Regular)];
        let out = split(&cfg, &spans);
        assert!(matches!(out[1], Element::Penalty(p) if p.cost == crate::element::PENALTY_FORBID));
    }

    #[test]
    fn nbsp_is_unbreakable() {
        let cfg = config();
        let spans = vec![ProcessedSpan::Text("a\u{00A0}b".into(), super::super::StyleFlag::Regular)];
        let out = split(&cfg, &spans);
        assert!(matches!(out[1], Element::Penalty(p) if p.cost == crate::element::PENALTY_FORBID));
    }

    #[test]
    fn nbsp_glue_is_elastic_like_a_breakable_space() {
        let cfg = config();
        let spans = vec![ProcessedSpan::Text("a\u{00A0}b".into(), super::super::StyleFlag::Regular)];
        let out = split(&cfg, &spans);
        match &out[2] {
            Element::Glue(g) => {
                assert!(g.stretch.finite > 0, "nbsp glue should be stretchable under justification");
                assert!(g.shrink.finite > 0, "nbsp glue should be shrinkable under justification");
            }
            _ => panic!("expected glue"),
        }
    }
}
