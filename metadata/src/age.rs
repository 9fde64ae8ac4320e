//! Age bounds from free-text eligibility criteria.

use std::sync::OnceLock;

use regex::Regex;

/// Minimum and maximum age found in a criterion. Either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgeRange {
    /// Lower bound in years.
    pub min: Option<f64>,
    /// Upper bound in years.
    pub max: Option<f64>,
}

#[allow(clippy::expect_used)]
fn comparison_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:age\s*)?(>=|<=|>|<)\s*(\d+(?:\.\d+)?)\s*(?:years\s*old|years)?")
            .expect("valid regex")
    })
}

#[allow(clippy::expect_used)]
fn between_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)between\s+(\d+(?:\.\d+)?)\s*(?:and|[-–])\s*(\d+(?:\.\d+)?)\s*years?")
            .expect("valid regex")
    })
}

/// Extracts the tightest age bounds from `text`.
///
/// Recognizes `>=`, `<=`, `>`, `<` (and `≥`, `≤`) before a number, and
/// `between X and Y years` (also `X-Y` and `X–Y`). Strict and inclusive
/// operators give the same bound. Returns `None` when nothing matches.
///
/// ```
/// use cmeo_metadata::age::{extract_age_range, AgeRange};
///
/// assert_eq!(
///     extract_age_range("age >= 18 and age <= 65 years"),
///     Some(AgeRange { min: Some(18.0), max: Some(65.0) })
/// );
/// ```
#[must_use]
pub fn extract_age_range(text: &str) -> Option<AgeRange> {
    let text = text.trim().replace('≥', ">=").replace('≤', "<=");
    let mut min: Option<f64> = None;
    let mut max: Option<f64> = None;

    for caps in comparison_re().captures_iter(&text) {
        let Ok(value) = caps[2].parse::<f64>() else {
            continue;
        };
        match &caps[1] {
            ">=" | ">" => raise(&mut min, value),
            _ => lower(&mut max, value),
        }
    }

    if let Some(caps) = between_re().captures(&text) {
        if let (Ok(lo), Ok(hi)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) {
            raise(&mut min, lo);
            lower(&mut max, hi);
        }
    }

    (min.is_some() || max.is_some()).then_some(AgeRange { min, max })
}

fn raise(bound: &mut Option<f64>, value: f64) {
    if bound.map_or(true, |b| value > b) {
        *bound = Some(value);
    }
}

fn lower(bound: &mut Option<f64>, value: f64) {
    if bound.map_or(true, |b| value < b) {
        *bound = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: Option<f64>, max: Option<f64>) -> Option<AgeRange> {
        Some(AgeRange { min, max })
    }

    #[test]
    fn explicit_comparisons() {
        assert_eq!(extract_age_range("age >= 18 and age <= 65 years"), range(Some(18.0), Some(65.0)));
        assert_eq!(extract_age_range("Age > 40 years old"), range(Some(40.0), None));
        assert_eq!(extract_age_range("≤ 80"), range(None, Some(80.0)));
    }

    #[test]
    fn between_forms() {
        assert_eq!(extract_age_range("between 18 and 65 years"), range(Some(18.0), Some(65.0)));
        assert_eq!(extract_age_range("Between 20-30 years"), range(Some(20.0), Some(30.0)));
        assert_eq!(extract_age_range("between 20.5–30 year"), range(Some(20.5), Some(30.0)));
    }

    #[test]
    fn tightest_bounds_kept() {
        assert_eq!(
            extract_age_range(">= 18, > 21, < 70, <= 65, between 19 and 80 years"),
            range(Some(21.0), Some(65.0))
        );
    }

    #[test]
    fn nothing_found() {
        assert_eq!(extract_age_range("no constraints"), None);
        assert_eq!(extract_age_range(""), None);
    }
}
