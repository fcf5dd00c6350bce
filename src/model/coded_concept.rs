//! Coded concepts used for findings and finding sites.

use serde::{Deserialize, Serialize};

use crate::constants::{CODING_SCHEME_DESIGNATOR, FREE_TEXT_CODE_VALUE};

/// A DICOM coded concept (code sequence item).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodedConcept {
    /// Code value within the coding scheme
    pub code_value: String,
    /// Coding scheme the value belongs to
    pub coding_scheme_designator: String,
    /// Human-readable meaning
    pub code_meaning: String,
}

impl CodedConcept {
    /// Create a new coded concept.
    pub fn new(
        code_value: impl Into<String>,
        coding_scheme_designator: impl Into<String>,
        code_meaning: impl Into<String>,
    ) -> Self {
        Self {
            code_value: code_value.into(),
            coding_scheme_designator: coding_scheme_designator.into(),
            code_meaning: code_meaning.into(),
        }
    }

    /// A free-text finding carrying `text` as its meaning.
    pub fn free_text(text: impl Into<String>) -> Self {
        Self::new(FREE_TEXT_CODE_VALUE, CODING_SCHEME_DESIGNATOR, text)
    }

    /// Whether this concept is the engine's free-text sentinel.
    pub fn is_free_text(&self) -> bool {
        self.code_value == FREE_TEXT_CODE_VALUE
    }

    /// Whether this concept has the given value in the given scheme.
    pub fn matches(&self, code_value: &str, coding_scheme_designator: &str) -> bool {
        self.code_value == code_value && self.coding_scheme_designator == coding_scheme_designator
    }
}

/// Finding to write for a point-display measurement.
///
/// An attached free-text finding is kept as-is. Anything else, including no
/// finding at all, is replaced by a free-text finding built from `text`.
pub fn free_text_finding_or_default(finding: Option<&CodedConcept>, text: &str) -> CodedConcept {
    match finding {
        Some(finding) if finding.is_free_text() => finding.clone(),
        _ => CodedConcept::free_text(text),
    }
}
