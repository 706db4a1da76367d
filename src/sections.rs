//! Bookmarks, sections and page numbering: the caller walks paginated pages
//! through [`Sections::build`] to get a page -> bookmark multimap, a label ->
//! page map, and the front/body-matter split used for page-number labels and
//! running headlines.

use std::collections::BTreeMap;

use ecow::EcoString;
use rustc_hash::FxHashMap;

use crate::element::{Bookmark, Container, Element, Page, SectionKind};
use crate::error::{Warning, Warnings};

/// Walks `children` looking for `Bookmark` elements, descending into
/// `Columns`/`HBox`/`VBox` containers so bookmarks nested inside a
/// multi-column page or a materialized box are still found.
fn collect_bookmarks<'a>(children: &'a [Element], out: &mut Vec<&'a Bookmark>) {
    for child in children {
        match child {
            Element::Bookmark(bookmark) => out.push(bookmark),
            Element::Columns { children, .. } => collect_bookmarks(children, out),
            Element::HBox(Container { children, .. }) | Element::VBox(Container { children, .. }) => {
                collect_bookmarks(children, out)
            }
            _ => {}
        }
    }
}

/// One section bookmark's position, kept separately from the full
/// page -> bookmarks multimap so `section_bookmark_for_page` can binary
/// search it with `BTreeMap::range` instead of rescanning every bookmark.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SectionStart {
    kind: SectionKind,
    name: EcoString,
}

/// Indexes a paginated document's bookmarks.
pub struct Sections {
    by_page: BTreeMap<u32, Vec<Bookmark>>,
    labels: FxHashMap<EcoString, u32>,
    section_starts: BTreeMap<u32, SectionStart>,
    first_body_matter_page: u32,
    book_title: EcoString,
}

impl Sections {
    /// Scans `pages` in order, building the bookmark and label maps and
    /// deriving the front/body-matter boundary. Duplicate `Section`
    /// bookmarks landing on the same physical page push a
    /// [`Warning::DuplicateSection`] rather than failing.
    #[tracing::instrument(skip_all)]
    pub fn build(pages: &[Page], book_title: impl Into<EcoString>, warnings: &mut Warnings) -> Self {
        let mut by_page: BTreeMap<u32, Vec<Bookmark>> = BTreeMap::new();
        let mut labels = FxHashMap::default();
        let mut section_starts: BTreeMap<u32, SectionStart> = BTreeMap::new();
        let mut first_part_page = None;
        let mut first_chapter_page = None;

        for page in pages {
            let mut bookmarks = Vec::new();
            collect_bookmarks(&page.children, &mut bookmarks);
            for bookmark in bookmarks {
                match bookmark {
                    Bookmark::Section { kind, name } => {
                        if section_starts.contains_key(&page.physical_page_number) {
                            warnings.push(Warning::DuplicateSection { page: page.physical_page_number });
                        } else {
                            section_starts.insert(
                                page.physical_page_number,
                                SectionStart { kind: *kind, name: name.clone() },
                            );
                        }
                        match kind {
                            SectionKind::Part => {
                                first_part_page.get_or_insert(page.physical_page_number);
                            }
                            SectionKind::Chapter => {
                                first_chapter_page.get_or_insert(page.physical_page_number);
                            }
                        }
                    }
                    Bookmark::Label { name } => {
                        labels.entry(name.clone()).or_insert(page.physical_page_number);
                    }
                    Bookmark::Index { .. } | Bookmark::Footnote { .. } => {}
                }
                by_page.entry(page.physical_page_number).or_default().push(bookmark.clone());
            }
        }

        let first_body_matter_page = first_part_page.or(first_chapter_page).unwrap_or(1);

        Self {
            by_page,
            labels,
            section_starts,
            first_body_matter_page,
            book_title: book_title.into(),
        }
    }

    pub fn bookmarks_on_page(&self, page: u32) -> &[Bookmark] {
        self.by_page.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn page_for_label(&self, name: &str) -> Option<u32> {
        self.labels.get(name).copied()
    }

    pub fn first_body_matter_page(&self) -> u32 {
        self.first_body_matter_page
    }

    /// The section bookmark in force on `page`: the most recent section
    /// start at or before `page`, if any.
    pub fn section_bookmark_for_page(&self, page: u32) -> Option<(SectionKind, &str)> {
        self.section_starts.range(..=page).next_back().map(|(_, s)| (s.kind, s.name.as_str()))
    }

    /// A page that starts a section, or any front-matter page before the
    /// body matter begins, suppresses the running headline.
    pub fn should_draw_headline(&self, page: u32) -> bool {
        !self.section_starts.contains_key(&page) && page >= self.first_body_matter_page
    }

    /// Front matter is numbered with lowercase Roman numerals, 1-indexed
    /// within the front matter; body matter with Arabic numerals, 1-indexed
    /// within the body.
    pub fn page_number_label(&self, page: u32) -> EcoString {
        if page < self.first_body_matter_page {
            roman_numeral(page)
        } else {
            EcoString::from((page - self.first_body_matter_page + 1).to_string())
        }
    }

    /// The running headline: the book title on even pages, the nearest
    /// prior section's name on odd pages.
    pub fn headline_label(&self, page: u32) -> EcoString {
        if page % 2 == 0 {
            self.book_title.clone()
        } else {
            self.section_bookmark_for_page(page).map(|(_, name)| EcoString::from(name)).unwrap_or_default()
        }
    }
}

/// Renders `n` (1-based, `n >= 1`) as a lowercase Roman numeral.
pub fn roman_numeral(mut n: u32) -> EcoString {
    const TABLE: &[(u32, &str)] = &[
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut out = EcoString::new();
    for (value, symbol) in TABLE {
        while n >= *value {
            out.push_str(symbol);
            n -= value;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section_page(n: u32, kind: SectionKind, name: &str) -> Page {
        Page {
            children: vec![Element::Bookmark(Bookmark::Section { kind, name: EcoString::from(name) })],
            physical_page_number: n,
            baseline_shift: 0,
        }
    }

    fn plain_page(n: u32) -> Page {
        Page { children: Vec::new(), physical_page_number: n, baseline_shift: 0 }
    }

    #[test]
    fn roman_numerals_cover_subtractive_forms() {
        assert_eq!(roman_numeral(1).as_str(), "i");
        assert_eq!(roman_numeral(4).as_str(), "iv");
        assert_eq!(roman_numeral(9).as_str(), "ix");
        assert_eq!(roman_numeral(40).as_str(), "xl");
        assert_eq!(roman_numeral(90).as_str(), "xc");
        assert_eq!(roman_numeral(400).as_str(), "cd");
        assert_eq!(roman_numeral(900).as_str(), "cm");
        assert_eq!(roman_numeral(1994).as_str(), "mcmxciv");
    }

    #[test]
    fn e5_roman_front_matter_then_arabic_body() {
        let pages: Vec<Page> = (1..=6)
            .map(plain_page)
            .chain(std::iter::once(section_page(7, SectionKind::Part, "Part One")))
            .chain((8..=10).map(plain_page))
            .collect();
        let mut warnings = Warnings::new();
        let sections = Sections::build(&pages, "Book Title", &mut warnings);
        assert_eq!(sections.first_body_matter_page(), 7);
        for (page, expected) in [(1, "i"), (2, "ii"), (3, "iii"), (4, "iv"), (5, "v"), (6, "vi")] {
            assert_eq!(sections.page_number_label(page).as_str(), expected);
        }
        for (page, expected) in [(7, "1"), (8, "2"), (9, "3"), (10, "4")] {
            assert_eq!(sections.page_number_label(page).as_str(), expected);
        }
        assert!(warnings.is_empty());
    }

    #[test]
    fn falls_back_to_first_chapter_when_no_part() {
        let pages =
            vec![plain_page(1), section_page(2, SectionKind::Chapter, "Chapter One"), plain_page(3)];
        let mut warnings = Warnings::new();
        let sections = Sections::build(&pages, "Book Title", &mut warnings);
        assert_eq!(sections.first_body_matter_page(), 2);
    }

    #[test]
    fn no_sections_puts_body_matter_at_page_one() {
        let pages = vec![plain_page(1), plain_page(2)];
        let mut warnings = Warnings::new();
        let sections = Sections::build(&pages, "Book Title", &mut warnings);
        assert_eq!(sections.first_body_matter_page(), 1);
        assert_eq!(sections.page_number_label(2).as_str(), "2");
    }

    #[test]
    fn duplicate_section_on_one_page_warns() {
        let mut page = section_page(1, SectionKind::Chapter, "One");
        page.children.push(Element::Bookmark(Bookmark::Section {
            kind: SectionKind::Chapter,
            name: EcoString::from("Two"),
        }));
        let mut warnings = Warnings::new();
        let _ = Sections::build(&[page], "Book Title", &mut warnings);
        assert_eq!(warnings.as_slice(), &[Warning::DuplicateSection { page: 1 }]);
    }

    #[test]
    fn label_bookmark_resolves_to_its_page() {
        let page = Page {
            children: vec![Element::Bookmark(Bookmark::Label { name: EcoString::from("fig-1") })],
            physical_page_number: 3,
            baseline_shift: 0,
        };
        let mut warnings = Warnings::new();
        let sections = Sections::build(&[page], "Book Title", &mut warnings);
        assert_eq!(sections.page_for_label("fig-1"), Some(3));
        assert_eq!(sections.page_for_label("missing"), None);
    }

    #[test]
    fn bookmark_nested_in_columns_and_box_is_still_found() {
        let inner = Container {
            children: vec![Element::Bookmark(Bookmark::Label { name: EcoString::from("deep") })],
            width: 0,
            height: 0,
            depth: 0,
            shift: 0,
        };
        let page = Page {
            children: vec![Element::Columns {
                layout: crate::element::ColumnLayout::SINGLE,
                children: vec![Element::VBox(inner)],
            }],
            physical_page_number: 5,
            baseline_shift: 0,
        };
        let mut warnings = Warnings::new();
        let sections = Sections::build(&[page], "Book Title", &mut warnings);
        assert_eq!(sections.page_for_label("deep"), Some(5));
    }

    #[test]
    fn headline_is_title_on_even_pages_and_section_name_on_odd() {
        let pages = vec![section_page(1, SectionKind::Chapter, "Chapter One"), plain_page(2), plain_page(3)];
        let mut warnings = Warnings::new();
        let sections = Sections::build(&pages, "My Book", &mut warnings);
        assert_eq!(sections.headline_label(2).as_str(), "My Book");
        assert_eq!(sections.headline_label(3).as_str(), "Chapter One");
    }

    #[test]
    fn headline_suppressed_on_section_start_and_front_matter() {
        let pages = vec![plain_page(1), section_page(2, SectionKind::Part, "Part One"), plain_page(3)];
        let mut warnings = Warnings::new();
        let sections = Sections::build(&pages, "My Book", &mut warnings);
        assert!(!sections.should_draw_headline(1));
        assert!(!sections.should_draw_headline(2));
        assert!(sections.should_draw_headline(3));
    }
}
