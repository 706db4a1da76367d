//! Scaled-point geometry: the single integer unit used for every distance
//! in the engine.
//!
//! One point is `65_536` scaled points (SP), matching TeX's `sp` unit. All
//! arithmetic on positions, widths, stretch and shrink is integer so that
//! layout is reproducible across platforms.

use std::fmt;

use ecow::{eco_format, EcoString};

use crate::error::ParseError;

/// Scaled points: the fundamental integer distance unit of the engine.
pub type Sp = i64;

/// Scaled points per point.
pub const SP_PER_PT: i64 = 65_536;

/// A unit that a distance literal can be expressed in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Unit {
    /// PostScript point: `1 pt = 65536 sp`.
    Pt,
    /// Pica: `1 pc = 12 pt`.
    Pc,
    /// Inch: `1 in = 72 pt`.
    In,
    /// Centimeter: derived from `2.54 cm = 1 in`.
    Cm,
    /// Millimeter: `1 cm = 10 mm`.
    Mm,
    /// Scaled point itself, the identity unit.
    Sp,
}

impl Unit {
    /// Parses a case-insensitive unit name from the closed set this engine
    /// supports.
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pt" => Some(Self::Pt),
            "pc" => Some(Self::Pc),
            "in" => Some(Self::In),
            "cm" => Some(Self::Cm),
            "mm" => Some(Self::Mm),
            "sp" => Some(Self::Sp),
            _ => None,
        }
    }

    /// The unit's name, used when formatting a distance back to text.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pt => "pt",
            Self::Pc => "pc",
            Self::In => "in",
            Self::Cm => "cm",
            Self::Mm => "mm",
            Self::Sp => "sp",
        }
    }

    /// How many scaled points make up one of this unit, expressed as a
    /// rational `(numerator, denominator)` so that conversions round to the
    /// nearest SP instead of accumulating floating-point error.
    fn sp_ratio(self) -> (i128, i128) {
        match self {
            Self::Pt => (SP_PER_PT as i128, 1),
            Self::Pc => (12 * SP_PER_PT as i128, 1),
            Self::In => (72 * SP_PER_PT as i128, 1),
            // 2.54 cm = 1 in = 72 pt, so 1 cm = 72/2.54 pt.
            Self::Cm => (72 * SP_PER_PT as i128 * 100, 254),
            Self::Mm => (72 * SP_PER_PT as i128 * 100, 2540),
            Self::Sp => (1, 1),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Converts a value expressed in `unit` to scaled points, rounding to the
/// nearest SP.
///
/// `value` is taken as a decimal fixed to three fractional digits of
/// precision internally (matching the granularity a distance literal can
/// express); callers passing a `f64` should prefer [`parse_distance`] which
/// parses the literal directly and avoids a lossy `f64` round-trip.
pub fn to_sp(value: f64, unit: Unit) -> Sp {
    let (num, den) = unit.sp_ratio();
    // Scale `value` by `den` so all arithmetic beyond this point is exact
    // in the rational domain, then do a single rounding division.
    let scaled = value * den as f64;
    let product = (scaled.round() as i128) * num;
    round_div(product, den)
}

/// Converts scaled points to a floating-point value in `unit`.
pub fn from_sp(sp: Sp, unit: Unit) -> f64 {
    let (num, den) = unit.sp_ratio();
    (sp as f64 * den as f64) / num as f64
}

/// Integer division of `a / b` rounding to nearest, ties away from zero.
fn round_div(a: i128, b: i128) -> Sp {
    debug_assert!(b > 0);
    let half = b / 2;
    let rounded = if a >= 0 { (a + half) / b } else { (a - half) / b };
    rounded as Sp
}

/// Parses a distance literal of the form `<signed-decimal><unit>`, with
/// optional whitespace between the number and the unit, and a
/// case-insensitive unit name from the closed set `{pt, pc, in, cm, mm, sp}`.
pub fn parse_distance(text: &str) -> Result<Sp, ParseError> {
    let trimmed = text.trim();
    let number_end = trimmed
        .char_indices()
        .find(|&(_, c)| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());

    let (number_part, rest) = trimmed.split_at(number_end);
    let unit_part = rest.trim_start();

    if number_part.is_empty() {
        return Err(ParseError::new(eco_format!(
            "missing number in distance literal {text:?}"
        )));
    }

    let value: f64 = number_part
        .parse()
        .map_err(|_| ParseError::new(eco_format!("invalid number {number_part:?}")))?;

    if unit_part.is_empty() {
        return Err(ParseError::new(EcoString::from("missing unit")));
    }

    let unit = Unit::parse(unit_part)
        .ok_or_else(|| ParseError::new(eco_format!("unknown unit {unit_part}")))?;

    Ok(to_sp(value, unit))
}

/// Formats scaled points as a distance literal in the given unit, the
/// inverse of [`parse_distance`] for representable values.
pub fn format_distance(sp: Sp, unit: Unit) -> EcoString {
    let value = from_sp(sp, unit);
    // Trim to a stable number of fractional digits so formatting doesn't
    // leak floating-point noise; 6 digits is comfortably more precision
    // than an SP (1/65536 pt) needs for any of the supported units.
    let mut s = format!("{value:.6}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    eco_format!("{s}{unit}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn e1_parse_cm_to_inch() {
        // 2.54 cm == 1 in == 72 pt == 72 * 65536 sp.
        assert_eq!(parse_distance("2.54 cm").unwrap(), 72 * SP_PER_PT);
        assert_eq!(parse_distance("2.54 cm").unwrap(), 4_718_592);
    }

    #[test]
    fn e1_parse_negative_pt() {
        assert_eq!(parse_distance("-3 pt").unwrap(), -196_608);
    }

    #[test]
    fn e1_missing_unit() {
        let err = parse_distance("5").unwrap_err();
        assert!(err.message().contains("missing unit"));
    }

    #[test]
    fn e1_unknown_unit() {
        let err = parse_distance("1km").unwrap_err();
        assert!(err.message().contains("km"));
    }

    #[test]
    fn case_insensitive_and_whitespace() {
        assert_eq!(parse_distance("1 PT").unwrap(), parse_distance("1pt").unwrap());
        assert_eq!(parse_distance("1\tIn").unwrap(), parse_distance("1in").unwrap());
    }

    #[test]
    fn roundtrip_pt() {
        for pts in [0i64, 1, -1, 10, 12345, -98765] {
            let sp = pts * SP_PER_PT;
            let text = format_distance(sp, Unit::Pt);
            assert_eq!(parse_distance(&text).unwrap(), sp);
        }
    }

    #[test]
    fn roundtrip_arbitrary_sp() {
        // Property 5: parseDistance(formatDistance(x, unit)) == x for
        // representable x (values that land exactly on an SP boundary for
        // the chosen unit's granularity).
        for sp in [0i64, 65536, 32768, -65536, 720896] {
            for unit in [Unit::Pt, Unit::Pc, Unit::In, Unit::Cm, Unit::Mm, Unit::Sp] {
                let text = format_distance(sp, unit);
                let back = parse_distance(&text).unwrap();
                assert!(
                    (back - sp).abs() <= 1,
                    "{sp} via {unit:?} round-tripped to {back} ({text})"
                );
            }
        }
    }
}
