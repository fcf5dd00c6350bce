//! Tracking identifiers: `<engine-tag>:<tool-type>`.
//!
//! Every group this engine writes carries one, and it is how a group finds
//! its way back to the right codec on decode. Identifiers written by other
//! software are simply not ours; they never produce errors.

use std::fmt;

use crate::constants::{ENGINE_TAG, TRACKING_IDENTIFIER_SEPARATOR};

/// A tracking identifier split into namespace and tool type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingIdentifier<'a> {
    /// Everything before the first separator
    pub namespace: &'a str,
    /// Everything after the first separator
    pub tool_type: &'a str,
}

impl<'a> TrackingIdentifier<'a> {
    /// Identifier for a tool type in this engine's namespace.
    pub fn for_tool(tool_type: &'a str) -> Self {
        Self {
            namespace: ENGINE_TAG,
            tool_type,
        }
    }

    /// Split on the first separator. `None` if there is no separator.
    pub fn parse(text: &'a str) -> Option<Self> {
        let (namespace, tool_type) = text.split_once(TRACKING_IDENTIFIER_SEPARATOR)?;
        Some(Self {
            namespace,
            tool_type,
        })
    }

    /// Whether the namespace is this engine's.
    pub fn is_engine(&self) -> bool {
        self.namespace == ENGINE_TAG
    }
}

impl fmt::Display for TrackingIdentifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.namespace, TRACKING_IDENTIFIER_SEPARATOR, self.tool_type
        )
    }
}

/// The tracking identifier text written for a tool type.
pub fn tracking_identifier(tool_type: &str) -> String {
    TrackingIdentifier::for_tool(tool_type).to_string()
}

/// Tool type named by an identifier in this engine's namespace.
pub fn engine_tool_type(text: &str) -> Option<&str> {
    TrackingIdentifier::parse(text)
        .filter(TrackingIdentifier::is_engine)
        .map(|id| id.tool_type)
}

/// Whether `text` is exactly this engine's identifier for `tool_type`.
pub fn is_valid_tracking_identifier(text: &str, tool_type: &str) -> bool {
    engine_tool_type(text) == Some(tool_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(
            tracking_identifier("DICOMSRDisplay"),
            "Cornerstone3DTools@^0.1.0:DICOMSRDisplay"
        );
    }

    #[test]
    fn test_parse_splits_on_first_separator() {
        let id = TrackingIdentifier::parse("a:b:c").unwrap();
        assert_eq!(id.namespace, "a");
        assert_eq!(id.tool_type, "b:c");
        assert!(TrackingIdentifier::parse("no separator").is_none());
    }

    #[test]
    fn test_validation() {
        let valid = "Cornerstone3DTools@^0.1.0:DICOMSRDisplay";
        assert!(is_valid_tracking_identifier(valid, "DICOMSRDisplay"));
        assert!(!is_valid_tracking_identifier(valid, "Length"));
        assert!(!is_valid_tracking_identifier("DICOMSRDisplay", "DICOMSRDisplay"));
        assert!(!is_valid_tracking_identifier(
            "OtherViewer:DICOMSRDisplay",
            "DICOMSRDisplay"
        ));
        assert!(!is_valid_tracking_identifier(
            "Cornerstone3DTools@^0.1.0:DICOMSRDisplay:extra",
            "DICOMSRDisplay"
        ));
    }

    #[test]
    fn test_engine_tool_type() {
        assert_eq!(
            engine_tool_type("Cornerstone3DTools@^0.1.0:Probe"),
            Some("Probe")
        );
        assert_eq!(engine_tool_type("web annotation"), None);
        assert_eq!(engine_tool_type("OHIF:Probe"), None);
    }
}
