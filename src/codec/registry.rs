//! Tool codec registry: tool type → codec.

use std::collections::HashMap;

use crate::codec::tools::{DicomSrDisplay, PlanarFreehandContourSegmentationTool};
use crate::codec::tracking;
use crate::codec::traits::ToolCodec;

/// Registry of tool codecs, keyed by tool type.
///
/// Built once at startup and passed to the decode and encode entry points.
/// Registering a tool type twice replaces the earlier codec.
pub struct ToolCodecRegistry {
    codecs: HashMap<&'static str, Box<dyn ToolCodec>>,
}

impl ToolCodecRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// Create a registry with all built-in tool codecs registered.
    pub fn with_builtin_tools() -> Self {
        let mut registry = Self::new();

        registry.register(Box::new(DicomSrDisplay));
        registry.register(Box::new(PlanarFreehandContourSegmentationTool::default()));

        registry
    }

    /// Register a codec under its tool type.
    pub fn register(&mut self, codec: Box<dyn ToolCodec>) {
        let tool_type = codec.tool_type();
        if self.codecs.insert(tool_type, codec).is_some() {
            log::debug!("Replaced codec for tool type {}", tool_type);
        }
    }

    /// Get the codec of a tool type.
    pub fn get(&self, tool_type: &str) -> Option<&dyn ToolCodec> {
        self.codecs.get(tool_type).map(|c| c.as_ref())
    }

    /// Find the codec a tracking identifier points at.
    ///
    /// `None` for identifiers from other software and for tool types that
    /// are not registered.
    pub fn resolve(&self, tracking_identifier: &str) -> Option<&dyn ToolCodec> {
        let tool_type = tracking::engine_tool_type(tracking_identifier)?;
        self.get(tool_type)
            .filter(|codec| codec.is_valid_tracking_identifier(tracking_identifier))
    }

    /// Whether a tracking identifier names a registered tool of this engine.
    pub fn is_valid_tracking_identifier(&self, tracking_identifier: &str) -> bool {
        self.resolve(tracking_identifier).is_some()
    }

    /// All registered tool types, sorted.
    pub fn tool_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.codecs.keys().copied().collect();
        types.sort_unstable();
        types
    }
}

impl Default for ToolCodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;
    use crate::codec::traits::DecodeContext;
    use crate::codec::tools::{DICOM_SR_DISPLAY, PLANAR_FREEHAND_CONTOUR_SEGMENTATION};
    use crate::metadata::CoordinateMapper;
    use crate::model::Annotation;
    use crate::sr::{MeasurementGroup, Tid300Representation, Tid300RepresentationArguments};

    struct FakeProbe(Tid300Representation);

    impl ToolCodec for FakeProbe {
        fn tool_type(&self) -> &'static str {
            "Probe"
        }

        fn representation(&self) -> Tid300Representation {
            self.0
        }

        fn decode(
            &self,
            _group: &MeasurementGroup,
            _context: &DecodeContext<'_>,
        ) -> Result<Annotation, CodecError> {
            Err(CodecError::UnsupportedOperation("fake".into()))
        }

        fn encode(
            &self,
            _annotation: &Annotation,
            _mapper: &dyn CoordinateMapper,
        ) -> Result<Tid300RepresentationArguments, CodecError> {
            Err(CodecError::UnsupportedOperation("fake".into()))
        }
    }

    #[test]
    fn test_builtin_tools() {
        let registry = ToolCodecRegistry::with_builtin_tools();

        assert!(registry.get(DICOM_SR_DISPLAY).is_some());
        assert!(registry.get(PLANAR_FREEHAND_CONTOUR_SEGMENTATION).is_some());
        assert_eq!(
            registry.tool_types(),
            vec![DICOM_SR_DISPLAY, PLANAR_FREEHAND_CONTOUR_SEGMENTATION]
        );
    }

    #[test]
    fn test_empty_registry() {
        let registry = ToolCodecRegistry::new();

        assert!(registry.get(DICOM_SR_DISPLAY).is_none());
        assert!(ToolCodecRegistry::default().tool_types().is_empty());
        assert!(!registry.is_valid_tracking_identifier("Cornerstone3DTools@^0.1.0:DICOMSRDisplay"));
    }

    #[test]
    fn test_resolve() {
        let mut registry = ToolCodecRegistry::new();
        registry.register(Box::new(FakeProbe(Tid300Representation::Point)));

        let codec = registry.resolve("Cornerstone3DTools@^0.1.0:Probe").unwrap();
        assert_eq!(codec.tool_type(), "Probe");

        assert!(registry.resolve("OtherViewer:Probe").is_none());
        assert!(registry.resolve("Cornerstone3DTools@^0.1.0:Length").is_none());
        assert!(registry.resolve("Probe").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = ToolCodecRegistry::new();
        registry.register(Box::new(FakeProbe(Tid300Representation::Point)));
        registry.register(Box::new(FakeProbe(Tid300Representation::Polyline)));

        assert_eq!(registry.tool_types(), vec!["Probe"]);
        assert_eq!(
            registry.get("Probe").unwrap().representation(),
            Tid300Representation::Polyline
        );
    }
}
