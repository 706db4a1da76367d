//! The [`crate::breaker::Axis`] implementation for the vertical list: wraps
//! one page's children into a `VBox` sized to the page's target height.

use crate::breaker::Axis;
use crate::element::{Container, Element};
use crate::units::Sp;

pub struct VerticalAxis;

impl Axis for VerticalAxis {
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
        let width = children.iter().map(|c| c.natural_width()).fold(0, Sp::max);
        Element::VBox(Container { children, width, height: target, depth: 0, shift: 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Glue, Stretch};

    #[test]
    fn stretches_finite_glue_by_ratio() {
        let axis = VerticalAxis;
        let glue = Glue::new(10_000, Stretch::finite(4_000), Stretch::finite(2_000), false);
        let out = axis.make_output(vec![Element::Glue(glue)], 500_000, 0.5);
        if let Element::VBox(b) = out {
            if let Element::Glue(g) = &b.children[0] {
                assert_eq!(g.size, 12_000);
            } else {
                panic!("expected glue child");
            }
            assert_eq!(b.height, 500_000);
        } else {
            panic!("expected VBox");
        }
    }
}
