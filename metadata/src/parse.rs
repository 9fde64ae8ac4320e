//! Parsers for values found in data-dictionary cells.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

#[allow(clippy::expect_used)]
fn keyed_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+\s*=").expect("valid regex"))
}

#[allow(clippy::expect_used)]
fn keyed_pair_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\d+\s*=\s*"[^"]*"|\d+\s*=\s*[^|]+"#).expect("valid regex"))
}

#[allow(clippy::expect_used)]
fn key_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\s*=\s*").expect("valid regex"))
}

#[allow(clippy::expect_used)]
fn piped_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""[^"]*"|[^|"]+"#).expect("valid regex"))
}

#[allow(clippy::expect_used)]
fn tick_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Text\([^,]+,\s*[^,]+,\s*'([^']+)'\)").expect("valid regex"))
}

/// Splits a categorical or pipe-joined cell into its values.
///
/// Handles keyed strings (`1=No|2=Yes`, `1="mmol|l"|2="g|dl"`) and plain
/// pipe-joined strings (`"mg|dl"|mmol`). Quoted values may contain pipes;
/// surrounding quotes and whitespace are removed.
///
/// ```
/// use cmeo_metadata::parse::parse_joined_string;
///
/// assert_eq!(parse_joined_string("1=No|2=Yes"), vec!["No", "Yes"]);
/// assert_eq!(parse_joined_string("\"mg|dl\"|mmol"), vec!["mg|dl", "mmol"]);
/// ```
#[must_use]
pub fn parse_joined_string(input: &str) -> Vec<String> {
    if keyed_marker_re().is_match(input) {
        keyed_pair_re()
            .find_iter(input)
            .map(|m| key_prefix_re().replace(m.as_str(), ""))
            .map(|v| v.trim().trim_matches('"').to_owned())
            .collect()
    } else {
        piped_item_re()
            .find_iter(input)
            .filter(|m| !m.as_str().trim().is_empty())
            .map(|m| m.as_str().trim().trim_matches('"').to_owned())
            .collect()
    }
}

/// Extracts numeric tick labels from a `Text(x, y, 'label') - Text(...)`
/// string. The Unicode minus sign is read as `-`; labels that are not
/// numbers are skipped.
///
/// ```
/// use cmeo_metadata::parse::extract_tick_values;
///
/// let s = "Text(-2.5, 0, '−2.5') - Text(0.0, 0, '0.0') - Text(2.5, 0, '2.5')";
/// assert_eq!(extract_tick_values(s), vec![-2.5, 0.0, 2.5]);
/// ```
#[must_use]
pub fn extract_tick_values(input: &str) -> Vec<f64> {
    input
        .split(" - ")
        .filter_map(|token| tick_label_re().captures(token))
        .filter_map(|caps| caps[1].replace('−', "-").parse::<f64>().ok())
        .collect()
}

/// Parses an integer the lenient way: as a float, truncated toward zero.
///
/// Empty input gives `None`. Input that is not a finite number in `i64`
/// range gives `None` and logs a warning.
#[must_use]
pub fn safe_int(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f.trunc() >= i64::MIN as f64 && f.trunc() < i64::MAX as f64 => {
            Some(f.trunc() as i64)
        }
        _ => {
            warn!(value = %value, "invalid integer value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_values() {
        assert_eq!(parse_joined_string("1=No|2=Yes"), vec!["No", "Yes"]);
        assert_eq!(parse_joined_string("0 = none | 1 = mild | 2 = severe"), vec!["none", "mild", "severe"]);
        assert_eq!(parse_joined_string(r#"1="mmol|l"|2="g|dl""#), vec!["mmol|l", "g|dl"]);
    }

    #[test]
    fn plain_pipes_respect_quotes() {
        assert_eq!(parse_joined_string(r#""mg|dl"|mmol"#), vec!["mg|dl", "mmol"]);
        assert_eq!(parse_joined_string("a| |b"), vec!["a", "b"]);
        assert!(parse_joined_string("").is_empty());
    }

    #[test]
    fn ticks_skip_non_numeric_labels() {
        let s = "Text(0, 0, 'low') - Text(1, 0, '1e3') - Text(2, 0, '−7')";
        assert_eq!(extract_tick_values(s), vec![1000.0, -7.0]);
        assert!(extract_tick_values("no ticks").is_empty());
    }

    #[test]
    fn safe_int_truncates() {
        assert_eq!(safe_int("12"), Some(12));
        assert_eq!(safe_int("12.9"), Some(12));
        assert_eq!(safe_int("-3.7"), Some(-3));
        assert_eq!(safe_int(" 0 "), Some(0));
    }

    #[test]
    fn safe_int_rejects_garbage() {
        assert_eq!(safe_int(""), None);
        assert_eq!(safe_int("abc"), None);
        assert_eq!(safe_int("inf"), None);
        assert_eq!(safe_int("NaN"), None);
        assert_eq!(safe_int("1e30"), None);
    }
}
