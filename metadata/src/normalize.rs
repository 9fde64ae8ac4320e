//! Canonicalization of free-text labels into URI path segments.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes left unescaped: ASCII alphanumerics, `_`, and `-`.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-');

/// Missing-value marker found in exported tables.
const NAN: &str = "nan";

/// Normalizes a raw label into a URI-safe path segment.
///
/// Lower-cases and trims the input, maps spaces, `/`, and `:` to `_`, drops
/// `[` and `]`, then percent-encodes every byte outside `[A-Za-z0-9_-]`.
/// Well-formed `%XX` escapes already present are kept with upper-case hex,
/// so normalizing twice gives the same result.
///
/// Returns `None` for empty input, the `nan` marker, or input that is empty
/// once brackets are removed.
///
/// ```
/// use cmeo_metadata::normalize::normalize_text;
///
/// assert_eq!(normalize_text(" Body Mass: kg/m2 ").as_deref(), Some("body_mass__kg_m2"));
/// assert_eq!(normalize_text("NaN"), None);
/// ```
#[must_use]
pub fn normalize_text(raw: &str) -> Option<String> {
    let lowered = raw.to_lowercase();
    let trimmed = lowered.trim();
    if trimmed.is_empty() || trimmed == NAN {
        return None;
    }

    let replaced: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '[' | ']'))
        .map(|c| match c {
            ' ' | '/' | ':' => '_',
            other => other,
        })
        .collect();
    if replaced.is_empty() || replaced == NAN {
        return None;
    }
    Some(encode_segment(&replaced))
}

fn encode_segment(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 3 / 2);
    let mut rest = s;
    while let Some(pos) = rest.find('%') {
        out.extend(utf8_percent_encode(&rest[..pos], SEGMENT));
        let tail = &rest[pos..];
        match tail.get(1..3) {
            Some(hex) if hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
                out.push('%');
                out.push_str(&hex.to_ascii_uppercase());
                rest = &tail[3..];
            }
            _ => {
                out.push_str("%25");
                rest = &tail[1..];
            }
        }
    }
    out.extend(utf8_percent_encode(rest, SEGMENT));
    out
}
