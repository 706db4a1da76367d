//! Stage 6 of the horizontal assembler (paragraph-end glue) and the
//! [`crate::breaker::Axis`] implementation that turns broken lines into
//! `HBox`es.

use crate::breaker::Axis;
use crate::element::{Container, Element, ElementList, Glue, Penalty, Stretch};
use crate::units::Sp;

/// Appends the standard end-of-paragraph sequence: a break is forbidden
/// immediately before the final glue (so the last word can't be orphaned
/// onto its own line by accident), the glue itself absorbs any leftover
/// width with infinite stretch, and a forced penalty guarantees the
/// breaker always closes the paragraph's last line.
pub(super) fn append_paragraph_end(elements: &mut ElementList) {
    elements.push(Element::Penalty(Penalty::forbidden()));
    elements.push(Element::Glue(Glue::new(0, Stretch::infinite(0), Stretch::ZERO, true)));
    elements.push(Element::Penalty(Penalty::forced()));
}

/// Renders one broken line's children into a fixed-width `HBox`, applying
/// the chosen fit ratio to every finite `Glue` in the line (an infinite
/// glue absorbs the whole adjustment and is left at its natural size).
pub struct HorizontalAxis;

impl Axis for HorizontalAxis {
    fn make_output(&self, mut children: Vec<Element>, target: Sp, ratio: f64) -> Element {
        for child in &mut children {
            if let Element::Glue(g) = child {
                if ratio >= 0.0 {
                    if !g.stretch.infinite {
                        g.size += (ratio * g.stretch.finite as f64).round() as Sp;
                    }
                } else if !g.shrink.infinite {
                    g.size += (ratio * g.shrink.finite as f64).round() as Sp;
                }
            }
        }
        let (height, depth) = children.iter().fold((0, 0), |(h, d), c| (h.max(c.height()), d.max(c.depth())));
        Element::HBox(Container { children, width: target, height, depth, shift: 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::TextRun;

    #[test]
    fn paragraph_end_ends_with_forced_penalty() {
        let mut elements = ElementList::new();
        append_paragraph_end(&mut elements);
        assert_eq!(elements.len(), 3);
        assert!(matches!(elements.last(), Some(Element::Penalty(p)) if p.cost == crate::element::PENALTY_FORCE));
    }

    #[test]
    fn make_output_stretches_finite_glue_by_ratio() {
        let axis = HorizontalAxis;
        let glue = Glue::new(10_000, Stretch::finite(4_000), Stretch::finite(2_000), true);
        let children = vec![Element::Glue(glue)];
        let out = axis.make_output(children, 20_000, 0.5);
        if let Element::HBox(b) = out {
            if let Element::Glue(g) = &b.children[0] {
                assert_eq!(g.size, 12_000);
            } else {
                panic!("expected glue child");
            }
        } else {
            panic!("expected HBox");
        }
    }

    #[test]
    fn make_output_leaves_infinite_glue_at_natural_size() {
        let axis = HorizontalAxis;
        let glue = Glue::new(0, Stretch::infinite(0), Stretch::ZERO, true);
        let out = axis.make_output(vec![Element::Glue(glue)], 50_000, 1.0);
        if let Element::HBox(b) = out {
            if let Element::Glue(g) = &b.children[0] {
                assert_eq!(g.size, 0);
            } else {
                panic!("expected glue child");
            }
        } else {
            panic!("expected HBox");
        }
    }

    #[test]
    fn height_and_depth_are_the_max_over_children() {
        let axis = HorizontalAxis;
        let font = crate::test_util::stub_sized_font();
        let children = vec![Element::Text(TextRun::new("x", font))];
        let out = axis.make_output(children, 10_000, 0.0);
        if let Element::HBox(b) = out {
            assert!(b.height > 0);
        } else {
            panic!("expected HBox");
        }
    }
}
