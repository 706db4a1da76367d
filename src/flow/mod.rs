//! The vertical assembler: accumulates a vertical list with automatic
//! baseline-skip glue, tracks column-layout regions, and paginates the list
//! via the shared breaker (see [`crate::breaker`]).

mod axis;

pub use axis::VerticalAxis;

use std::collections::BTreeMap;

use crate::breaker::Axis;
use crate::element::{ColumnLayout, Element, ElementList, Glue, Page, Penalty, Stretch};
use crate::units::{Sp, SP_PER_PT};

fn default_baseline_skip() -> Sp {
    // 11pt * 1.2, the classic book-text baseline-to-baseline distance.
    (11 * SP_PER_PT * 12) / 10
}

/// Whether an element anchors vertical space and therefore wants
/// baseline-skip glue inserted before it when it follows another such
/// element.
fn is_anchoring_box(e: &Element) -> bool {
    matches!(e, Element::VBox(_) | Element::HBox(_) | Element::Rule(_) | Element::Columns { .. })
}

/// Accumulates the vertical list for one document (or one flow within a
/// document), inserting baseline-skip glue between consecutive boxes the
/// way a real book-layout vertical list does.
pub struct VerticalList {
    elements: ElementList,
    baseline_skip: Sp,
    last_was_box: bool,
    /// Column-layout regions: element index -> layout active from that
    /// index onward, until superseded by a later entry. A `BTreeMap` gives
    /// exactly the "navigable map" spec.md calls for via `range`.
    columns: BTreeMap<usize, ColumnLayout>,
}

impl VerticalList {
    pub fn new() -> Self {
        Self {
            elements: ElementList::new(),
            baseline_skip: default_baseline_skip(),
            last_was_box: false,
            columns: BTreeMap::new(),
        }
    }

    pub fn baseline_skip(&self) -> Sp {
        self.baseline_skip
    }

    /// Sets the baseline skip used for glue inserted from here on, returning
    /// the previous value.
    pub fn set_baseline_skip(&mut self, sp: Sp) -> Sp {
        std::mem::replace(&mut self.baseline_skip, sp)
    }

    /// Appends a box-like element (a line's `HBox`, an image `HBox`, a
    /// `Rule`, ...), inserting baseline-skip glue first if the previous
    /// element was also box-like.
    pub fn push_box(&mut self, element: Element) {
        if self.last_was_box && is_anchoring_box(&element) {
            self.elements.push(Element::Glue(Glue::new(
                self.baseline_skip,
                Stretch::finite(self.baseline_skip / 6),
                Stretch::finite(self.baseline_skip / 6),
                false,
            )));
        }
        self.last_was_box = is_anchoring_box(&element);
        self.elements.push(element);
    }

    /// Appends a non-box element (glue, penalty, discretionary-free
    /// bookmark, ...) without baseline-skip handling.
    pub fn push(&mut self, element: Element) {
        self.last_was_box = is_anchoring_box(&element);
        self.elements.push(element);
    }

    /// Registers a column layout effective from the current end of the list
    /// onward, until the next registration.
    pub fn set_column_layout(&mut self, layout: ColumnLayout) {
        self.columns.insert(self.elements.len(), layout);
    }

    /// Forces a page break at the current point.
    pub fn new_page(&mut self) {
        self.push(Element::Penalty(Penalty::forced()));
    }

    /// Forces a page break at the current point, additionally requiring
    /// that the page it starts land on an odd physical page number (a
    /// blank page is inserted by pagination if it would not).
    pub fn odd_page(&mut self) {
        let mut penalty = Penalty::forced();
        penalty.even_page_only = true;
        self.push(Element::Penalty(penalty));
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn columns(&self) -> &BTreeMap<usize, ColumnLayout> {
        &self.columns
    }
}

impl Default for VerticalList {
    fn default() -> Self {
        Self::new()
    }
}

/// Breaks a vertical list into pages, wraps each page's children with its
/// active column layout (the layout registered at or before the page's
/// first element), and numbers the pages sequentially starting at
/// `first_physical_page`. A page break produced by [`VerticalList::odd_page`]
/// that would land on an even page gets a blank page inserted ahead of it.
#[tracing::instrument(skip_all)]
pub fn paginate(
    list: &VerticalList,
    config: &crate::breaker::BreakerConfig,
    target: impl Fn(u32) -> Sp,
    first_physical_page: u32,
) -> Vec<Page> {
    let axis = VerticalAxis;
    let lines = crate::breaker::break_into_lines(&axis, &list.elements, config, &target);

    let mut pages = Vec::with_capacity(lines.len());
    let mut physical = first_physical_page;
    let mut line_start = 0usize;
    let mut pending_odd_required = false;

    for line in lines {
        if pending_odd_required && physical % 2 == 0 {
            pages.push(Page { children: Vec::new(), physical_page_number: physical, baseline_shift: 0 });
            physical += 1;
        }
        pending_odd_required = false;

        let layout = list
            .columns
            .range(..=line_start)
            .next_back()
            .map(|(_, l)| *l)
            .unwrap_or(ColumnLayout::SINGLE);

        let break_index = line.break_index;
        let materialized = axis.make_output(line.children, line.target, line.ratio);
        let children = if layout == ColumnLayout::SINGLE {
            vec![materialized]
        } else {
            vec![Element::Columns { layout, children: vec![materialized] }]
        };

        pages.push(Page { children, physical_page_number: physical, baseline_shift: 0 });
        physical += 1;
        line_start = break_index;
        pending_odd_required = list
            .elements
            .get(break_index)
            .is_some_and(|e| matches!(e, Element::Penalty(p) if p.even_page_only));
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::TextRun;

    fn page_box() -> Element {
        Element::HBox(crate::element::Container {
            children: vec![Element::Text(TextRun::new("line", crate::test_util::stub_sized_font()))],
            width: 100 * SP_PER_PT,
            height: 10 * SP_PER_PT,
            depth: 0,
            shift: 0,
        })
    }

    #[test]
    fn baseline_skip_inserted_between_consecutive_boxes() {
        let mut list = VerticalList::new();
        list.push_box(page_box());
        list.push_box(page_box());
        assert_eq!(list.elements().len(), 3);
        assert!(matches!(list.elements()[1], Element::Glue(_)));
    }

    #[test]
    fn no_baseline_skip_before_first_box() {
        let mut list = VerticalList::new();
        list.push_box(page_box());
        assert_eq!(list.elements().len(), 1);
    }

    #[test]
    fn set_baseline_skip_returns_previous_value() {
        let mut list = VerticalList::new();
        let previous = list.set_baseline_skip(12 * SP_PER_PT);
        assert_eq!(previous, default_baseline_skip());
        assert_eq!(list.baseline_skip(), 12 * SP_PER_PT);
    }

    #[test]
    fn odd_page_inserts_blank_page_when_needed() {
        let mut list = VerticalList::new();
        list.push_box(page_box());
        list.odd_page();
        list.push_box(page_box());

        let config = crate::breaker::BreakerConfig::default();
        let pages = paginate(&list, &config, |_| 200 * SP_PER_PT, 1);
        // Page 1 holds the first box; the odd_page break lands on physical
        // page 2 (even), so a blank page 2 is inserted and the second box
        // starts page 3.
        assert_eq!(pages.len(), 3);
        assert!(pages[1].children.is_empty());
        assert_eq!(pages[2].physical_page_number, 3);
    }
}
