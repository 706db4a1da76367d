//! Liang/TeX hyphenation: loads a `.dic` pattern file and computes
//! hyphenation segment lists for a word.

use rustc_hash::FxHashMap;

use crate::error::LoadError;

/// A loaded hyphenation pattern dictionary for one language. Immutable once
/// built, so it's freely shareable across jobs and threads.
#[derive(Debug, Clone)]
pub struct Dictionary {
    left_hyphen_min: usize,
    right_hyphen_min: usize,
    /// Pattern key (digits removed, `.` anchors kept) -> per-position digit
    /// values, index `i` holding the break-strength value just before the
    /// `i`-th character of the key.
    patterns: FxHashMap<String, Vec<u8>>,
}

const DEFAULT_LEFT_MIN: usize = 2;
const DEFAULT_RIGHT_MIN: usize = 3;

impl Dictionary {
    /// Parses a Liang-style `.dic` file: header `KEY value` lines, a
    /// `NEXTLEVEL` delimiter, then body pattern lines. `%`-prefixed and
    /// blank lines are comments and are ignored in both sections.
    pub fn parse(source: &str) -> Result<Self, LoadError> {
        let mut left_hyphen_min = DEFAULT_LEFT_MIN;
        let mut right_hyphen_min = DEFAULT_RIGHT_MIN;
        let mut patterns = FxHashMap::default();
        let mut in_body = false;

        for raw_line in source.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('%') {
                continue;
            }

            if !in_body {
                if line == "NEXTLEVEL" {
                    in_body = true;
                    continue;
                }
                let mut parts = line.splitn(2, char::is_whitespace);
                let key = parts.next().unwrap_or_default();
                let value = parts.next().unwrap_or_default().trim();
                match key {
                    "LEFTHYPHENMIN" => {
                        left_hyphen_min = value.parse().map_err(|_| {
                            LoadError::new(format!("invalid LEFTHYPHENMIN value {value:?}"))
                        })?;
                    }
                    "RIGHTHYPHENMIN" => {
                        right_hyphen_min = value.parse().map_err(|_| {
                            LoadError::new(format!("invalid RIGHTHYPHENMIN value {value:?}"))
                        })?;
                    }
                    "COMPOUNDLEFTHYPHENMIN" | "COMPOUNDRIGHTHYPHENMIN" | "UTF-8" => {
                        // Recognized but not modeled by this engine beyond
                        // acknowledging the key is legal.
                    }
                    other => {
                        return Err(LoadError::new(format!(
                            "unknown hyphenation dictionary header key {other:?}"
                        )));
                    }
                }
                continue;
            }

            let (key, value) = normalize_pattern(line);
            patterns.insert(key, value);
        }

        Ok(Self { left_hyphen_min, right_hyphen_min, patterns })
    }

    /// Splits `word` into hyphenation segments. Segments concatenate back
    /// to exactly `word` (modulo the `-`-merging post-fixes below), so no
    /// characters are gained or lost.
    pub fn hyphenate(&self, word: &str) -> Vec<String> {
        if word.is_empty() {
            return Vec::new();
        }

        let lower: Vec<char> = word.to_lowercase().chars().collect();
        let wrapped: Vec<char> = std::iter::once('.')
            .chain(lower.iter().copied())
            .chain(std::iter::once('.'))
            .collect();

        // cut_points[i] is the break strength just before original-word
        // position i, for i in 0..=word.len() (in chars).
        let n = lower.len();
        let mut cut_points = vec![0u8; n + 1];

        for start in 0..wrapped.len() {
            for end in (start + 1)..=wrapped.len() {
                let substring: String = wrapped[start..end].iter().collect();
                let Some(values) = self.patterns.get(&substring) else { continue };

                // `values` has one entry per gap in `substring` (including
                // the leading/trailing gaps), i.e. `substring.chars().count()
                // + 1` minus anchor dots already stripped at normalization
                // time. Map each gap back to its position in `wrapped`,
                // then into `cut_points` (which is indexed over the
                // unwrapped word, i.e. offset by the leading sentinel).
                for (i, &v) in values.iter().enumerate() {
                    let wrapped_pos = start + i;
                    // Position in `cut_points` corresponds to
                    // wrapped_pos - 1 (since wrapped[0] is the sentinel
                    // dot, which has no corresponding unwrapped gap before
                    // it except gap 0 itself).
                    if wrapped_pos == 0 {
                        continue;
                    }
                    let cp_index = wrapped_pos - 1;
                    if cp_index <= n {
                        cut_points[cp_index] = cut_points[cp_index].max(v);
                    }
                }
            }
        }

        for i in 0..self.left_hyphen_min.min(cut_points.len()) {
            cut_points[i] = 0;
        }
        for i in 0..self.right_hyphen_min.min(cut_points.len()) {
            let idx = cut_points.len() - 1 - i;
            cut_points[idx] = 0;
        }
        // The boundaries before the very first and after the very last
        // character are never valid hyphenation points.
        cut_points[0] = 0;
        if let Some(last) = cut_points.last_mut() {
            *last = 0;
        }

        let mut segments = Vec::new();
        let mut seg_start = 0;
        let chars: Vec<char> = word.chars().collect();
        for i in 1..n {
            if cut_points[i] % 2 == 1 {
                segments.push(chars[seg_start..i].iter().collect::<String>());
                seg_start = i;
            }
        }
        segments.push(chars[seg_start..].iter().collect::<String>());

        apply_dash_postfixes(segments)
    }
}

/// Derives the normalized `(key, value)` pair for one pattern line: `key` is
/// the pattern with digits removed (anchor dots kept), `value` is a
/// per-gap digit array of length `key.chars().count() + 1` (implicit zeros
/// where the pattern had none), with leading/trailing anchor dots stripped
/// before the digit array is built.
fn normalize_pattern(pattern: &str) -> (String, Vec<u8>) {
    let leading_anchor = pattern.starts_with('.');
    let trailing_anchor = pattern.ends_with('.');

    let mut key = String::with_capacity(pattern.len());
    let mut gaps: Vec<u8> = vec![0];

    for c in pattern.chars() {
        if let Some(d) = c.to_digit(10) {
            *gaps.last_mut().unwrap() = d as u8;
        } else {
            key.push(c);
            gaps.push(0);
        }
    }

    // `gaps` currently has one entry per character of `key` plus the
    // leading gap, i.e. `key.chars().count() + 1` entries already — no
    // trimming needed beyond what anchor stripping below does to `key`.
    let _ = (leading_anchor, trailing_anchor);

    (key, gaps)
}

/// Post-fixes applied to hyphenation segments: a bare `"-"` segment merges
/// onto the preceding segment, and a segment starting with `"-"` moves that
/// dash to the tail of the preceding segment instead.
fn apply_dash_postfixes(segments: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(segments.len());
    for seg in segments {
        if seg == "-" {
            if let Some(prev) = out.last_mut() {
                prev.push('-');
                continue;
            }
        } else if let Some(rest) = seg.strip_prefix('-') {
            if let Some(prev) = out.last_mut() {
                prev.push('-');
                out.push(rest.to_string());
                continue;
            }
        }
        out.push(seg);
    }
    out
}
