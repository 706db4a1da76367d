//! The element model shared by the horizontal and vertical lists: a tagged
//! variant for everything that can appear in either list, plus the
//! invariants spec.md §3 requires of it.

use ecow::EcoString;

use crate::font::SizedFont;
use crate::units::Sp;

/// Penalty cost sentinel meaning "never break here".
pub const PENALTY_FORBID: i32 = i32::MAX;
/// Penalty cost sentinel meaning "always break here".
pub const PENALTY_FORCE: i32 = i32::MIN;

/// Natural size plus elastic adjustability, shared by [`Element::Glue`] and
/// by the per-chunk accumulation the breaker performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stretch {
    pub finite: Sp,
    pub infinite: bool,
}

impl Stretch {
    pub const ZERO: Self = Self { finite: 0, infinite: false };

    pub fn finite(amount: Sp) -> Self {
        Self { finite: amount, infinite: false }
    }

    pub fn infinite(amount: Sp) -> Self {
        Self { finite: amount, infinite: true }
    }

    /// Combines two adjacent stretch/shrink accumulators. An infinite
    /// accumulator dominates: once any glue in the run is infinite, finite
    /// amounts contributed by other glue are irrelevant to the fit ratio.
    pub fn add(self, other: Self) -> Self {
        if self.infinite || other.infinite {
            Self { finite: self.finite + other.finite, infinite: true }
        } else {
            Self { finite: self.finite + other.finite, infinite: false }
        }
    }
}

/// Elastic spacing: natural size, stretch and shrink, each possibly
/// "infinite" (dominating all finite amounts in its accumulator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glue {
    pub size: Sp,
    pub stretch: Stretch,
    pub shrink: Stretch,
    pub horizontal: bool,
}

impl Glue {
    pub fn new(size: Sp, stretch: Stretch, shrink: Stretch, horizontal: bool) -> Self {
        Self { size, stretch, shrink, horizontal }
    }
}

/// A rigid offset. `explicit` distinguishes kerns the assembler inserted
/// from intra-font kerning (both behave the same in the breaker, but the
/// distinction matters to callers inspecting the materialized list).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kern {
    pub width: Sp,
    pub explicit: bool,
}

/// A break-point cost. `±PENALTY_FORBID`/`±PENALTY_FORCE`-valued penalties
/// forbid/force a break; intermediate values trade off against badness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Penalty {
    pub cost: i32,
    pub even_page_only: bool,
}

impl Penalty {
    pub fn new(cost: i32) -> Self {
        Self { cost, even_page_only: false }
    }

    pub fn forced() -> Self {
        Self { cost: PENALTY_FORCE, even_page_only: false }
    }

    pub fn forbidden() -> Self {
        Self { cost: PENALTY_FORBID, even_page_only: false }
    }
}

/// A simple box with fixed width/height/depth and an optional vertical
/// shift (used by lines whose baseline was adjusted, e.g. by a `Text`
/// attribute or a footnote reference).
#[derive(Debug, Clone, Default)]
pub struct Rule {
    pub width: Sp,
    pub height: Sp,
    pub depth: Sp,
}

/// A run of text set in one [`SizedFont`], with metrics cached from that
/// font at construction time.
#[derive(Clone)]
pub struct TextRun {
    pub text: EcoString,
    pub font: SizedFont,
    pub width: Sp,
    pub height: Sp,
    pub depth: Sp,
}

impl TextRun {
    pub fn new(text: impl Into<EcoString>, font: SizedFont) -> Self {
        let text = text.into();
        let metrics = font.string_metrics(&text);
        Self { text, font, width: metrics.width, height: metrics.height, depth: metrics.depth }
    }

    pub fn leading_codepoint(&self) -> Option<char> {
        self.text.chars().next()
    }

    pub fn trailing_codepoint(&self) -> Option<char> {
        self.text.chars().next_back()
    }
}

/// An ordered box of child elements with cached intrinsic size.
#[derive(Clone)]
pub struct Container {
    pub children: Vec<Element>,
    pub width: Sp,
    pub height: Sp,
    pub depth: Sp,
    /// Vertical shift applied when this box is placed (positive moves the
    /// box down relative to its baseline). Only meaningful for [`Element::HBox`].
    pub shift: Sp,
}

impl Container {
    pub fn empty() -> Self {
        Self { children: Vec::new(), width: 0, height: 0, depth: 0, shift: 0 }
    }
}

/// The three alternative typesettings at a potential break point: shown if
/// cut there (`pre_break`), shown just after the cut (`post_break`), or
/// shown if the point is not cut at all (`no_break`). All three are laid
/// out with the same font; `no_break`'s width need not equal `pre_break`'s.
#[derive(Clone)]
pub struct Discretionary {
    pub pre_break: Container,
    pub post_break: Container,
    pub no_break: Container,
    pub penalty: i32,
}

/// A column layout applied to a span of the vertical list: `count` parallel
/// columns separated by `margin` of gutter, occupying the full page text
/// width between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub count: u32,
    pub margin: Sp,
}

impl ColumnLayout {
    pub const SINGLE: Self = Self { count: 1, margin: 0 };
}

/// Zero-size markers that ride along in an element list without being
/// discarded by the breaker.
#[derive(Clone)]
pub enum Bookmark {
    Section { kind: SectionKind, name: EcoString },
    Label { name: EcoString },
    Index { entries: Vec<EcoString> },
    Footnote { body: Vec<Element> },
}

/// The kind of a structural section bookmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Part,
    Chapter,
}

/// A tagged value that can appear in a horizontal or vertical list. Not
/// every variant is legal on both axes — see [`Element::allowed_horizontal`]
/// / [`Element::allowed_vertical`], enforced as a runtime assertion rather
/// than via two separate sum types, per the engine's design notes.
#[derive(Clone)]
pub enum Element {
    Text(TextRun),
    HBox(Container),
    VBox(Container),
    Glue(Glue),
    Kern(Kern),
    Penalty(Penalty),
    Discretionary(Discretionary),
    Rule(Rule),
    Columns { layout: ColumnLayout, children: Vec<Element> },
    Bookmark(Bookmark),
}

impl Element {
    pub fn allowed_horizontal(&self) -> bool {
        !matches!(self, Element::VBox(_) | Element::Columns { .. })
    }

    pub fn allowed_vertical(&self) -> bool {
        !matches!(self, Element::Text(_) | Element::Discretionary(_))
    }

    /// Whether this element is discardable at the start of a line/page
    /// (Glue, Penalty, and non-explicit Kern are; everything else is a box
    /// that anchors material).
    pub fn is_discardable(&self) -> bool {
        match self {
            Element::Glue(_) | Element::Penalty(_) => true,
            Element::Kern(k) => !k.explicit,
            _ => false,
        }
    }

    /// Natural width/size along the horizontal axis, used outside the
    /// breaker's own chunk accumulation (e.g. for estimating).
    pub fn natural_width(&self) -> Sp {
        match self {
            Element::Text(t) => t.width,
            Element::HBox(b) | Element::VBox(b) => b.width,
            Element::Glue(g) => g.size,
            Element::Kern(k) => k.width,
            Element::Penalty(_) => 0,
            Element::Discretionary(d) => d.no_break.width,
            Element::Rule(r) => r.width,
            Element::Columns { .. } => 0,
            Element::Bookmark(_) => 0,
        }
    }

    pub fn height(&self) -> Sp {
        match self {
            Element::Text(t) => t.height,
            Element::HBox(b) | Element::VBox(b) => b.height,
            Element::Rule(r) => r.height,
            _ => 0,
        }
    }

    pub fn depth(&self) -> Sp {
        match self {
            Element::Text(t) => t.depth,
            Element::HBox(b) | Element::VBox(b) => b.depth,
            Element::Rule(r) => r.depth,
            _ => 0,
        }
    }
}

/// A list of elements as assembled by either axis, prior to breaking.
pub type ElementList = Vec<Element>;

/// A vertical-list root: the children laid out on one physical page.
#[derive(Clone)]
pub struct Page {
    pub children: Vec<Element>,
    pub physical_page_number: u32,
    pub baseline_shift: Sp,
}
