//! The horizontal assembler: text -> words -> hyphenated words ->
//! ligated + kerned element stream -> ready for the shared breaker
//! (see [`crate::breaker`]).

mod bidi;
mod hyphenate;
mod kerning;
mod ligature;
pub mod line;
mod words;

use ecow::EcoString;

use crate::element::ElementList;
use crate::error::Warnings;
use crate::font::SizedFont;
use crate::hyphenation::Dictionary;
use crate::locale::{self, Locale};
use crate::units::Sp;

/// Style attribution carried by a `TextSpan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleFlag {
    Regular,
    Bold,
    Italic,
    BoldItalic,
    SmallCaps,
    Code,
}

/// One sized font per style, as the assembler expects from its caller.
#[derive(Clone)]
pub struct FontPack {
    pub regular: SizedFont,
    pub bold: SizedFont,
    pub italic: SizedFont,
    pub bold_italic: SizedFont,
    pub small_caps: SizedFont,
    pub code: SizedFont,
}

impl FontPack {
    /// A font pack where every style maps to the same font, useful for
    /// tests and for callers that don't distinguish styles.
    pub fn uniform(font: SizedFont) -> Self {
        Self {
            regular: font.clone(),
            bold: font.clone(),
            italic: font.clone(),
            bold_italic: font.clone(),
            small_caps: font.clone(),
            code: font,
        }
    }

    pub fn get(&self, style: StyleFlag) -> &SizedFont {
        match style {
            StyleFlag::Regular => &self.regular,
            StyleFlag::Bold => &self.bold,
            StyleFlag::Italic => &self.italic,
            StyleFlag::BoldItalic => &self.bold_italic,
            StyleFlag::SmallCaps => &self.small_caps,
            StyleFlag::Code => &self.code,
        }
    }
}

/// The span kinds the horizontal assembler recognizes from the (external,
/// out-of-scope) source parser, per the engine's external-interfaces
/// contract.
pub enum InputSpan {
    Text { text: EcoString, style: StyleFlag },
    Image { width: Sp, height: Sp },
    Footnote { body: ElementList },
    Label { name: EcoString },
    Index { entries: Vec<EcoString> },
    /// A cross-reference to a named label. `resolved` is filled in by the
    /// caller (typically after a first pagination pass has produced a
    /// label -> page map); an unresolved reference renders as `"?"`.
    PageRef { name: EcoString, style: StyleFlag, resolved: Option<EcoString> },
}

/// One paragraph-equivalent block of spans, as produced by the (external)
/// source parser.
pub struct Block {
    pub spans: Vec<InputSpan>,
    /// Source line, used only to attribute warnings.
    pub line: Option<u32>,
}

/// How a line's trailing/leading glue should absorb leftover space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justification {
    Justified,
    RaggedLeft,
    RaggedRight,
}

/// Configuration the horizontal assembler needs beyond the block itself.
pub struct AssemblerConfig<'a> {
    pub fonts: FontPack,
    pub hyphenation: Option<&'a Dictionary>,
    pub locale: Locale,
    pub justification: Justification,
    /// Disables word-space breakability entirely (spec.md §4.6 stage 1).
    pub no_line_breaks: bool,
    pub hyphen_penalty: i32,
}

/// Runs the full horizontal-assembly pipeline over one block, producing an
/// element list ready for the shared breaker.
#[tracing::instrument(skip_all)]
pub fn assemble(config: &AssemblerConfig, block: &Block, warnings: &mut Warnings) -> ElementList {
    let mut processor = locale::BlockPostProcessor::new(config.locale, block.line);

    // Stage 0 (ambient to spec's stage 1): locale punctuation
    // post-processing, applied to the text of text-spans only, before word
    // splitting. State crosses spans within the block, so this walks spans
    // in order and only substitutes the text of `Text` spans.
    let processed: Vec<ProcessedSpan> = block
        .spans
        .iter()
        .map(|span| match span {
            InputSpan::Text { text, style } => {
                ProcessedSpan::Text(processor.process_span(locale::Span { text }), *style)
            }
            other => ProcessedSpan::Other(other),
        })
        .collect();
    if let Some(warning) = processor.finish() {
        warnings.push(warning);
    }

    // Stage 1: words.
    let mut elements = words::split(config, &processed);

    // Stage 2: hyphenation.
    if let Some(dict) = config.hyphenation {
        hyphenate::insert(&mut elements, dict, config.hyphen_penalty);
    }

    // Stage 3: ligatures around discretionaries.
    ligature::fold(&mut elements);

    // Stage 4: kerning.
    kerning::inject(&mut elements, warnings);

    // Stage 5: RTL reordering.
    bidi::reorder(&mut elements);

    // Stage 6: end of paragraph.
    line::append_paragraph_end(&mut elements);

    elements
}

/// A span after stage-0 locale post-processing: `Text` spans carry their
/// transformed string, everything else passes through by reference.
pub(crate) enum ProcessedSpan<'a> {
    Text(EcoString, StyleFlag),
    Other(&'a InputSpan),
}

#[cfg(test)]
pub(crate) fn is_word_char(c: char) -> bool {
    words::is_word_char(c)
}
