//! Error type shared by cell, space-group, ASU, and catalogue construction.

use std::fmt;

/// Errors surfaced while building geometry or operation tables.
///
/// Singular facet triples during vertex enumeration are not reported here;
/// they are skipped locally. An empty mapping list for a site is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum AsuError {
    /// Inputs that cannot describe a valid object (zero normal, bad cell, empty region, ...).
    Configuration { reason: String },
    /// A geometric query has no unique answer for the given input.
    DegenerateGeometry { reason: String },
    /// A symmetry operation in `x,y,z` notation could not be parsed.
    InvalidSymOp { text: String, reason: String },
}

impl AsuError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            reason: reason.into(),
        }
    }

    pub(crate) fn sym_op(text: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSymOp {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for AsuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { reason } => write!(f, "invalid configuration: {reason}"),
            Self::DegenerateGeometry { reason } => write!(f, "degenerate geometry: {reason}"),
            Self::InvalidSymOp { text, reason } => {
                write!(f, "cannot parse symmetry operation {text:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for AsuError {}
