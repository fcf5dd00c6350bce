//! Trait definitions for per-tool codec implementations.

use crate::codec::error::CodecError;
use crate::codec::tracking;
use crate::metadata::{CoordinateMapper, MetadataProvider};
use crate::model::Annotation;
use crate::sr::{
    ContourSequenceItem, MeasurementGroup, SopInstanceUidToImageIdMap, Tid300Representation,
    Tid300RepresentationArguments,
};

/// Collaborators needed to decode a measurement group.
#[derive(Clone, Copy)]
pub struct DecodeContext<'a> {
    /// Resolves referenced SOP instances to image ids.
    pub sop_instance_uid_map: &'a SopInstanceUidToImageIdMap,
    /// Image-to-world mapping.
    pub mapper: &'a dyn CoordinateMapper,
    /// Per-image metadata.
    pub metadata: &'a dyn MetadataProvider,
}

impl<'a> DecodeContext<'a> {
    /// Bundle the decode collaborators.
    pub fn new(
        sop_instance_uid_map: &'a SopInstanceUidToImageIdMap,
        mapper: &'a dyn CoordinateMapper,
        metadata: &'a dyn MetadataProvider,
    ) -> Self {
        Self {
            sop_instance_uid_map,
            mapper,
            metadata,
        }
    }
}

/// Bidirectional conversion between one tool's annotations and TID300
/// measurement groups.
///
/// Each tool type (point display, freehand contour, ...) implements this trait
/// and is registered in a [`ToolCodecRegistry`](crate::codec::ToolCodecRegistry)
/// under its [`tool_type`](ToolCodec::tool_type).
pub trait ToolCodec: Send + Sync {
    /// Tool type tag (e.g. "DICOMSRDisplay"). Used as the registry key and
    /// as the suffix of the tracking identifier.
    fn tool_type(&self) -> &'static str;

    /// TID300 template the tool encodes into.
    fn representation(&self) -> Tid300Representation;

    /// Decode a measurement group into annotation state.
    fn decode(
        &self,
        group: &MeasurementGroup,
        context: &DecodeContext<'_>,
    ) -> Result<Annotation, CodecError>;

    /// Encode an annotation into TID300 representation arguments.
    ///
    /// Fails with [`CodecError::MissingReference`] if the annotation has no
    /// referenced image.
    fn encode(
        &self,
        annotation: &Annotation,
        mapper: &dyn CoordinateMapper,
    ) -> Result<Tid300RepresentationArguments, CodecError>;

    /// Whether [`contour_sequence`](ToolCodec::contour_sequence) is supported.
    fn supports_contour_export(&self) -> bool {
        false
    }

    /// Export the annotation as contour sequence items.
    fn contour_sequence(
        &self,
        _annotation: &Annotation,
        _metadata: &dyn MetadataProvider,
    ) -> Result<Vec<ContourSequenceItem>, CodecError> {
        Err(CodecError::UnsupportedOperation(format!(
            "{} does not export contours",
            self.tool_type()
        )))
    }

    /// Tracking identifier written into every group this tool encodes.
    fn tracking_identifier(&self) -> String {
        tracking::tracking_identifier(self.tool_type())
    }

    /// Whether a tracking identifier names this tool in this engine.
    fn is_valid_tracking_identifier(&self, text: &str) -> bool {
        tracking::is_valid_tracking_identifier(text, self.tool_type())
    }
}
