//! Statistical-type classification of study variables.

use std::collections::BTreeSet;
use std::fmt;

/// The statistical type assigned to a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatisticalType {
    /// Categorical with exactly two categories.
    BinaryClass,
    /// Categorical with any other number of categories.
    MultiClass,
    /// Free text or dates.
    Qualitative,
    /// Everything else.
    Continuous,
}

impl StatisticalType {
    /// The CMEO local name, also used as the URI suffix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BinaryClass => "binary_class_variable",
            Self::MultiClass => "multi_class_variable",
            Self::Qualitative => "qualitative_variable",
            Self::Continuous => "continuous_variable",
        }
    }
}

impl fmt::Display for StatisticalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data types treated as qualitative.
const QUALITATIVE_DTYPES: &[&str] = &["str", "datetime"];

/// Classifies a variable. Binary membership wins over multi-class
/// membership, which wins over a qualitative `dtype`; anything else is
/// continuous.
///
/// Set membership is by exact name, so callers holding normalized sets
/// should pass the normalized variable name.
#[must_use]
pub fn classify_variable(
    name: &str,
    binary: &BTreeSet<String>,
    multi: &BTreeSet<String>,
    dtype: Option<&str>,
) -> StatisticalType {
    if binary.contains(name) {
        StatisticalType::BinaryClass
    } else if multi.contains(name) {
        StatisticalType::MultiClass
    } else if dtype.is_some_and(|d| QUALITATIVE_DTYPES.contains(&d)) {
        StatisticalType::Qualitative
    } else {
        StatisticalType::Continuous
    }
}
