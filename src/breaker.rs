//! The shared Knuth-Plass-style optimal-fit breaker used by both the
//! horizontal assembler (lines) and the vertical assembler (pages). Neither
//! axis reimplements the dynamic program: each only supplies how to turn a
//! chosen line/page's material into an output box via [`Axis::make_output`].

use crate::element::{Element, Stretch, PENALTY_FORBID, PENALTY_FORCE};
use crate::units::Sp;

/// What an axis must supply to use the shared breaker.
pub trait Axis {
    /// Builds the final output box (`HBox` for lines, `VBox` for pages)
    /// from one line/page's already-resolved children, its target size and
    /// the chosen adjustment ratio (negative shrinks, positive stretches,
    /// zero for an exact fit).
    fn make_output(&self, children: Vec<Element>, target: Sp, ratio: f64) -> Element;

    /// Extra demerit cost for choosing to break at `elements[index]`, beyond
    /// badness and penalty (the `extraIncrement` hook — e.g. a vertical
    /// axis might discourage breaking immediately after a bookmark).
    /// Default: no extra cost.
    fn extra_increment(&self, elements: &[Element], index: usize) -> i64 {
        let _ = (elements, index);
        0
    }
}

/// Tunable weights for the demerit calculation, exposed as configuration
/// rather than baked-in constants.
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Added to a line's badness before squaring (TeX's `\linepenalty`; 0
    /// leaves demerits as plain squared badness).
    pub line_badness_weight: i64,
    /// Extra demerit when two consecutive chosen breaks are both flagged
    /// (both hyphens), discouraging runs of hyphenated lines.
    pub flagged_demerit: i64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self { line_badness_weight: 10, flagged_demerit: 3_000 }
    }
}

const BADNESS_INFINITE: i64 = 10_000;

fn natural(e: &Element) -> Sp {
    match e {
        Element::Glue(g) => g.size,
        Element::Discretionary(d) => d.no_break.width,
        _ => e.natural_width(),
    }
}

fn elastic_stretch(e: &Element) -> Stretch {
    match e {
        Element::Glue(g) => g.stretch,
        _ => Stretch::ZERO,
    }
}

fn elastic_shrink(e: &Element) -> Stretch {
    match e {
        Element::Glue(g) => g.shrink,
        _ => Stretch::ZERO,
    }
}

/// `(penalty cost, flagged)` if `elements[index]` is a legal break point.
fn break_candidate(elements: &[Element], index: usize) -> Option<(i32, bool)> {
    match &elements[index] {
        Element::Penalty(p) if p.cost < PENALTY_FORBID => Some((p.cost, false)),
        Element::Discretionary(d) => Some((d.penalty, true)),
        Element::Glue(_) => {
            if index > 0 && !elements[index - 1].is_discardable() {
                Some((0, false))
            } else {
                None
            }
        }
        _ => None,
    }
}

fn pre_break_children(e: &Element) -> Vec<Element> {
    match e {
        Element::Discretionary(d) => d.pre_break.children.clone(),
        _ => Vec::new(),
    }
}

fn post_break_children(e: &Element) -> Vec<Element> {
    match e {
        Element::Discretionary(d) => d.post_break.children.clone(),
        _ => Vec::new(),
    }
}

fn sum_metrics(children: &[Element]) -> (Sp, Stretch, Stretch) {
    let mut n = 0;
    let mut s = Stretch::ZERO;
    let mut sh = Stretch::ZERO;
    for c in children {
        n += natural(c);
        s = s.add(elastic_stretch(c));
        sh = sh.add(elastic_shrink(c));
    }
    (n, s, sh)
}

fn skip_leading_discardable(elements: &[Element], mut idx: usize) -> usize {
    while idx < elements.len() && elements[idx].is_discardable() {
        idx += 1;
    }
    idx
}

/// Badness of a chunk of the given natural size/stretch/shrink against a
/// `target` size. Badness is `100*|ratio|^3`, clamped to 10000; a chunk
/// that can't reach `target` even at full shrink (and isn't backed by
/// infinite glue) is reported `infeasible`.
fn badness(natural: Sp, stretch: Stretch, shrink: Stretch, target: Sp) -> (i64, bool) {
    let diff = target - natural;
    if diff == 0 {
        return (0, false);
    }
    if diff > 0 {
        if stretch.infinite {
            return (0, false);
        }
        if stretch.finite <= 0 {
            return (BADNESS_INFINITE, true);
        }
        (badness_from_ratio(diff as f64 / stretch.finite as f64), false)
    } else {
        let need = -diff;
        if shrink.infinite {
            return (0, false);
        }
        if shrink.finite <= 0 || need > shrink.finite {
            return (BADNESS_INFINITE, true);
        }
        (badness_from_ratio(need as f64 / shrink.finite as f64), false)
    }
}

fn badness_from_ratio(ratio: f64) -> i64 {
    let raw = 100.0 * ratio.abs().powi(3);
    raw.round().min(BADNESS_INFINITE as f64) as i64
}

/// `(lineBadness + weight)^2 + pi*|pi|*sign(pi)`, TeX's demerit formula: a
/// non-negative penalty adds its square, a finite negative penalty
/// subtracts its square (rewarding a break the author flagged as
/// desirable), a forced penalty contributes nothing (it wasn't a choice).
fn demerits(line_badness: i64, penalty: i32, weight: i64) -> i64 {
    let base = (weight + line_badness).pow(2);
    let p = penalty as i64;
    if p >= 0 {
        base + p * p
    } else if penalty > PENALTY_FORCE {
        base - p * p
    } else {
        base
    }
}

#[derive(Clone)]
struct Prefix {
    natural: Vec<Sp>,
    stretch_finite: Vec<i64>,
    stretch_inf: Vec<u32>,
    shrink_finite: Vec<i64>,
    shrink_inf: Vec<u32>,
}

impl Prefix {
    fn build(elements: &[Element]) -> Self {
        let n = elements.len();
        let mut out = Prefix {
            natural: vec![0; n + 1],
            stretch_finite: vec![0; n + 1],
            stretch_inf: vec![0; n + 1],
            shrink_finite: vec![0; n + 1],
            shrink_inf: vec![0; n + 1],
        };
        for i in 0..n {
            let s = elastic_stretch(&elements[i]);
            let sh = elastic_shrink(&elements[i]);
            out.natural[i + 1] = out.natural[i] + natural(&elements[i]);
            out.stretch_finite[i + 1] = out.stretch_finite[i] + s.finite;
            out.stretch_inf[i + 1] = out.stretch_inf[i] + u32::from(s.infinite);
            out.shrink_finite[i + 1] = out.shrink_finite[i] + sh.finite;
            out.shrink_inf[i + 1] = out.shrink_inf[i] + u32::from(sh.infinite);
        }
        out
    }

    fn range(&self, start: usize, end: usize) -> (Sp, Stretch, Stretch) {
        let natural = self.natural[end] - self.natural[start];
        let stretch = Stretch {
            finite: self.stretch_finite[end] - self.stretch_finite[start],
            infinite: self.stretch_inf[end] - self.stretch_inf[start] > 0,
        };
        let shrink = Stretch {
            finite: self.shrink_finite[end] - self.shrink_finite[start],
            infinite: self.shrink_inf[end] - self.shrink_inf[start] > 0,
        };
        (natural, stretch, shrink)
    }
}

struct Node {
    line_start: usize,
    lead: Vec<Element>,
    total_demerits: i64,
    line_number: u32,
    pred: Option<usize>,
    break_index: usize,
    ends_in_hyphen: bool,
}

/// One finished line/page: its materialized children, the fit ratio chosen
/// for it, and the element-list index just past its break (for callers
/// that need to correlate output boxes back to source positions).
pub struct Line {
    pub children: Vec<Element>,
    pub ratio: f64,
    pub break_index: usize,
    pub line_number: u32,
    pub target: Sp,
}

/// Breaks `elements` into lines/pages and renders each via `axis`.
/// `target(line_number)` gives the target size for the `line_number`-th
/// output line/page (0-indexed), so callers can special-case e.g. a first
/// line's indent.
#[tracing::instrument(skip_all)]
pub fn break_list<A: Axis>(
    axis: &A,
    elements: &[Element],
    config: &BreakerConfig,
    target: impl Fn(u32) -> Sp,
) -> Vec<Element> {
    let lines = break_into_lines(axis, elements, config, &target);
    lines.into_iter().map(|line| axis.make_output(line.children, line.target, line.ratio)).collect()
}

/// Like [`break_list`] but returns the lines without materializing output
/// boxes, for callers (the vertical assembler) that need to inspect line
/// contents before wrapping them.
pub fn break_into_lines<A: Axis>(
    axis: &A,
    elements: &[Element],
    config: &BreakerConfig,
    target: &impl Fn(u32) -> Sp,
) -> Vec<Line> {
    if elements.is_empty() {
        return Vec::new();
    }

    let prefix = Prefix::build(elements);
    let n = elements.len();

    let mut nodes: Vec<Node> = vec![Node {
        line_start: 0,
        lead: Vec::new(),
        total_demerits: 0,
        line_number: 0,
        pred: None,
        break_index: 0,
        ends_in_hyphen: false,
    }];
    let mut active_idx: Vec<usize> = vec![0];

    for i in 0..n {
        let Some((penalty_cost, flagged)) = break_candidate(elements, i) else { continue };
        let forced = penalty_cost <= PENALTY_FORCE;

        let (extra_w, extra_stretch, extra_shrink) = sum_metrics(&pre_break_children(&elements[i]));
        let mut best: Option<(usize, i64)> = None;
        let mut still_active = Vec::with_capacity(active_idx.len());

        for &node_idx in &active_idx {
            let (lead_natural, lead_stretch, lead_shrink) = sum_metrics(&nodes[node_idx].lead);
            let (range_natural, range_stretch, range_shrink) =
                prefix.range(nodes[node_idx].line_start, i);
            let total_natural = lead_natural + range_natural + extra_w;
            let total_stretch = lead_stretch.add(range_stretch).add(extra_stretch);
            let total_shrink = lead_shrink.add(range_shrink).add(extra_shrink);

            let target_size = target(nodes[node_idx].line_number);
            let (b, infeasible) = badness(total_natural, total_stretch, total_shrink, target_size);

            let flagged_extra = if flagged && nodes[node_idx].ends_in_hyphen {
                config.flagged_demerit
            } else {
                0
            };
            let extra_cost = axis.extra_increment(elements, i);
            let d = demerits(b, penalty_cost, config.line_badness_weight) + flagged_extra + extra_cost;
            let candidate_total = nodes[node_idx].total_demerits + d;

            let overfull_forever = infeasible && total_natural > target_size;
            if !overfull_forever || forced {
                still_active.push(node_idx);
            }

            if (!infeasible || forced)
                && best.as_ref().map(|(_, bd)| candidate_total < *bd).unwrap_or(true)
            {
                best = Some((node_idx, candidate_total));
            }
        }

        if let Some((pred_idx, total_demerits)) = best {
            let line_start = skip_leading_discardable(elements, i + 1);
            let new_node = Node {
                line_start,
                lead: post_break_children(&elements[i]),
                total_demerits,
                line_number: nodes[pred_idx].line_number + 1,
                pred: Some(pred_idx),
                break_index: i,
                ends_in_hyphen: flagged,
            };
            nodes.push(new_node);
            let new_idx = nodes.len() - 1;

            if forced {
                active_idx = vec![new_idx];
            } else {
                active_idx = still_active;
                active_idx.push(new_idx);
            }
        } else {
            active_idx = still_active;
        }

        if active_idx.is_empty() {
            // Nothing survived (pathological target/shrink combination with
            // no forced break yet reached): keep going from the last node
            // created so the breaker always terminates instead of losing
            // the rest of the material.
            active_idx.push(nodes.len() - 1);
        }
    }

    // The end of the list is always an implicit forced break, exactly like
    // TeX's final `\penalty-'10000000000`: whichever active node reaches it
    // most cheaply wins, even if no explicit break candidate ever occurred
    // there (e.g. a paragraph too short to need one).
    let mut best_end: Option<(usize, i64)> = None;
    for &node_idx in &active_idx {
        let (lead_natural, lead_stretch, lead_shrink) = sum_metrics(&nodes[node_idx].lead);
        let (range_natural, range_stretch, range_shrink) = prefix.range(nodes[node_idx].line_start, n);
        let total_natural = lead_natural + range_natural;
        let total_stretch = lead_stretch.add(range_stretch);
        let total_shrink = lead_shrink.add(range_shrink);
        let target_size = target(nodes[node_idx].line_number);
        let (b, _infeasible) = badness(total_natural, total_stretch, total_shrink, target_size);
        let d = demerits(b, PENALTY_FORCE, config.line_badness_weight);
        let candidate_total = nodes[node_idx].total_demerits + d;
        if best_end.as_ref().map(|(_, bd)| candidate_total < *bd).unwrap_or(true) {
            best_end = Some((node_idx, candidate_total));
        }
    }
    let (pred_idx, total_demerits) = best_end.expect("active_idx is never empty");
    nodes.push(Node {
        line_start: n,
        lead: Vec::new(),
        total_demerits,
        line_number: nodes[pred_idx].line_number + 1,
        pred: Some(pred_idx),
        break_index: n,
        ends_in_hyphen: false,
    });
    let best_final = nodes.len() - 1;

    // Walk predecessors to collect (break_index, line_start-before, lead)
    // in reverse, then materialize each line's children forward.
    let mut chain = Vec::new();
    let mut cursor = best_final;
    loop {
        chain.push(cursor);
        match nodes[cursor].pred {
            Some(p) => cursor = p,
            None => break,
        }
    }
    chain.reverse();

    let mut lines = Vec::with_capacity(chain.len().saturating_sub(1));
    for window in chain.windows(2) {
        let [prev, curr] = [window[0], window[1]];
        let line_start = nodes[prev].line_start;
        let break_index = nodes[curr].break_index;

        let mut children = nodes[prev].lead.clone();
        for element in &elements[line_start..break_index] {
            match element {
                Element::Discretionary(d) => children.extend(d.no_break.children.iter().cloned()),
                other => children.push(other.clone()),
            }
        }
        if break_index < elements.len() {
            children.extend(pre_break_children(&elements[break_index]));
        }

        let (nat, stretch, shrink) = sum_metrics(&children);
        let target_size = target(nodes[prev].line_number);
        let ratio = fit_ratio(nat, stretch, shrink, target_size);

        lines.push(Line {
            children,
            ratio,
            break_index,
            line_number: nodes[prev].line_number,
            target: target_size,
        });
    }

    lines
}

fn fit_ratio(natural: Sp, stretch: Stretch, shrink: Stretch, target: Sp) -> f64 {
    let diff = (target - natural) as f64;
    if diff == 0.0 {
        0.0
    } else if diff > 0.0 {
        if stretch.infinite || stretch.finite == 0 {
            0.0
        } else {
            diff / stretch.finite as f64
        }
    } else if shrink.infinite || shrink.finite == 0 {
        0.0
    } else {
        diff / shrink.finite as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Container, Glue, Penalty, TextRun};

    struct TestAxis;
    impl Axis for TestAxis {
        fn make_output(&self, children: Vec<Element>, target: Sp, _ratio: f64) -> Element {
            Element::HBox(Container { children, width: target, height: 0, depth: 0, shift: 0 })
        }
    }

    fn font() -> crate::font::SizedFont {
        crate::test_util::stub_sized_font()
    }

    fn word(text: &str) -> Element {
        Element::Text(TextRun::new(text, font()))
    }

    fn space() -> Element {
        Element::Glue(Glue::new(20_000, Stretch::finite(10_000), Stretch::finite(5_000), true))
    }

    #[test]
    fn forced_break_always_taken() {
        let elements = vec![word("a"), Element::Penalty(Penalty::forced()), word("b")];
        let config = BreakerConfig::default();
        let lines = break_into_lines(&TestAxis, &elements, &config, &|_| 1_000_000);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].break_index, 1);
    }

    #[test]
    fn breaks_at_interword_space_when_line_is_full() {
        let elements = vec![word("aaaaaaaaaa"), space(), word("bbbbbbbbbb"), space(), word("cccccccccc")];
        // Target narrow enough that each word roughly fills one line.
        let config = BreakerConfig::default();
        let lines = break_into_lines(&TestAxis, &elements, &config, &|_| 300_000);
        assert!(lines.len() >= 2);
    }

    #[test]
    fn single_word_no_breakpoints_is_one_line() {
        let elements = vec![word("hello")];
        let config = BreakerConfig::default();
        let lines = break_into_lines(&TestAxis, &elements, &config, &|_| 1_000_000);
        assert_eq!(lines.len(), 1);
    }
}
