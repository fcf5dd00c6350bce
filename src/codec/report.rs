//! Decoding and encoding whole lists of measurements.
//!
//! A report mixes groups from many tools and, often, from other software.
//! Decoding skips what it cannot handle and reports it as a warning; encoding
//! is strict, since every annotation handed to it is expected to be written.

use serde::Serialize;

use crate::codec::error::CodecError;
use crate::codec::registry::ToolCodecRegistry;
use crate::codec::traits::DecodeContext;
use crate::codec::tracking::TrackingIdentifier;
use crate::metadata::{CoordinateMapper, MetadataProvider};
use crate::model::Annotation;
use crate::sr::{
    MeasurementGroup, SopInstanceUidToImageIdMap, Tid300Representation,
    Tid300RepresentationArguments,
};

/// Severity level of a codec warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    /// Informational message, not a problem.
    Info,
    /// Something was skipped or modified.
    Warning,
    /// A measurement failed and was left out.
    Error,
}

/// Warning generated while processing a list of measurements.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodecWarning {
    /// Position of the group or annotation in the input list.
    pub index: usize,
    /// Human-readable warning message.
    pub message: String,
    /// Severity level.
    pub severity: WarningSeverity,
}

impl CodecWarning {
    /// Create a new warning.
    pub fn new(index: usize, message: impl Into<String>, severity: WarningSeverity) -> Self {
        Self {
            index,
            message: message.into(),
            severity,
        }
    }
}

/// Result of decoding a list of measurement groups.
#[derive(Debug, Default, Serialize)]
pub struct DecodeResult {
    /// Decoded annotations, in group order.
    pub annotations: Vec<Annotation>,
    /// Groups that were skipped or failed.
    pub warnings: Vec<CodecWarning>,
}

impl DecodeResult {
    /// Check if there were any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if any group failed to decode.
    pub fn has_errors(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.severity == WarningSeverity::Error)
    }
}

/// One encoded measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedGroup {
    /// TID300 template to write.
    pub representation: Tid300Representation,
    /// Arguments for the template.
    pub arguments: Tid300RepresentationArguments,
}

/// Result of encoding a list of annotations.
#[derive(Debug, Default, Serialize)]
pub struct EncodeResult {
    /// Encoded measurements, in annotation order.
    pub groups: Vec<EncodedGroup>,
    /// Non-fatal notes about the encoded annotations.
    pub warnings: Vec<CodecWarning>,
}

impl EncodeResult {
    /// Check if there were any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Decode every group a registered codec recognizes.
///
/// Groups without a tracking identifier, groups written by other software,
/// and groups of unregistered tools are skipped. A group that fails to decode
/// is reported and the rest are still decoded.
pub fn decode_measurement_groups(
    registry: &ToolCodecRegistry,
    groups: &[MeasurementGroup],
    sop_instance_uid_map: &SopInstanceUidToImageIdMap,
    mapper: &dyn CoordinateMapper,
    metadata: &dyn MetadataProvider,
) -> DecodeResult {
    let context = DecodeContext::new(sop_instance_uid_map, mapper, metadata);
    let mut result = DecodeResult::default();

    for (index, group) in groups.iter().enumerate() {
        let Some(tracking_identifier) = group.tracking_identifier() else {
            result.warnings.push(CodecWarning::new(
                index,
                "Measurement group has no tracking identifier",
                WarningSeverity::Warning,
            ));
            continue;
        };

        let Some(codec) = registry.resolve(tracking_identifier) else {
            let severity = match TrackingIdentifier::parse(tracking_identifier) {
                Some(id) if id.is_engine() => WarningSeverity::Warning,
                _ => WarningSeverity::Info,
            };
            log::debug!("Skipping group {} ({})", index, tracking_identifier);
            result.warnings.push(CodecWarning::new(
                index,
                format!("No codec for tracking identifier '{}'", tracking_identifier),
                severity,
            ));
            continue;
        };

        match codec.decode(group, &context) {
            Ok(annotation) => result.annotations.push(annotation),
            Err(e) => {
                log::warn!("Failed to decode {} group {}: {}", codec.tool_type(), index, e);
                result.warnings.push(CodecWarning::new(
                    index,
                    format!("{}: {}", codec.tool_type(), e),
                    WarningSeverity::Error,
                ));
            }
        }
    }

    log::info!(
        "Decoded {} of {} measurement groups ({} warnings)",
        result.annotations.len(),
        groups.len(),
        result.warnings.len()
    );

    result
}

/// Encode every annotation with the codec of its tool.
///
/// Fails on the first annotation whose tool is not registered or whose
/// encoding fails.
pub fn encode_annotations(
    registry: &ToolCodecRegistry,
    annotations: &[Annotation],
    mapper: &dyn CoordinateMapper,
) -> Result<EncodeResult, CodecError> {
    let mut result = EncodeResult::default();

    for (index, annotation) in annotations.iter().enumerate() {
        let tool_type = annotation.tool_name();
        let codec = registry
            .get(tool_type)
            .ok_or_else(|| CodecError::UnregisteredTool {
                tool_type: tool_type.to_string(),
            })?;

        let arguments = codec.encode(annotation, mapper)?;

        let stale_stats = annotation.invalidated
            && annotation
                .contour_data()
                .is_some_and(|data| data.cached_stats.is_some());
        if stale_stats {
            result.warnings.push(CodecWarning::new(
                index,
                "Geometry changed since statistics were computed",
                WarningSeverity::Warning,
            ));
        }

        result.groups.push(EncodedGroup {
            representation: codec.representation(),
            arguments,
        });
    }

    log::info!("Encoded {} annotations", result.groups.len());

    Ok(result)
}
