//! Annotation state shared with the rendering layer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::UUID_UID_ROOT;
use crate::model::{CodedConcept, Point3};

/// Generate a fresh DICOM UID under the UUID-derived `2.25` root.
pub fn generate_uid() -> String {
    format!("{}.{}", UUID_UID_ROOT, Uuid::new_v4().as_u128())
}

/// Identifying metadata for an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationMetadata {
    /// Tool type that owns this annotation.
    pub tool_name: String,
    /// Image the annotation was drawn on.
    #[serde(default)]
    pub referenced_image_id: Option<String>,
    /// Frame of reference of the referenced image, when known.
    #[serde(default)]
    pub frame_of_reference_uid: Option<String>,
    /// Display label.
    #[serde(default)]
    pub label: String,
}

impl AnnotationMetadata {
    /// Create metadata for the given tool with no image reference.
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            referenced_image_id: None,
            frame_of_reference_uid: None,
            label: String::new(),
        }
    }

    /// Set the referenced image.
    pub fn with_referenced_image(mut self, image_id: impl Into<String>) -> Self {
        self.referenced_image_id = Some(image_id.into());
        self
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Text box state attached to a point-display annotation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBox {
    /// Whether the user dragged the text box away from its default spot.
    pub has_moved: bool,
}

/// Handles of a two-point (arrow) display annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayHandles {
    /// Handle positions in world space (always two after decode).
    pub points: Vec<Point3>,
    /// Handle currently being manipulated.
    pub active_handle_index: usize,
    /// Whether the first handle is the arrow head (the meaningful location).
    pub arrow_first: bool,
    /// Text box state.
    #[serde(default)]
    pub text_box: TextBox,
}

impl DisplayHandles {
    /// The handle that marks the measured location.
    pub fn anchor(&self) -> Option<&Point3> {
        if self.arrow_first {
            self.points.first()
        } else {
            self.points.get(1)
        }
    }
}

/// Geometry payload of a point-display annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayData {
    /// Text shown next to the arrow.
    pub text: String,
    /// Arrow handles.
    pub handles: DisplayHandles,
    /// Frame within a multi-frame image.
    #[serde(default)]
    pub frame_number: Option<u32>,
}

/// A polyline contour.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contour {
    /// Ordered contour vertices in world space.
    pub polyline: Vec<Point3>,
    /// Whether the last vertex connects back to the first.
    #[serde(default)]
    pub closed: bool,
}

/// Handles of a contour annotation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContourHandles {
    /// End points of an open contour; empty for closed contours.
    #[serde(default)]
    pub points: Vec<Point3>,
    /// Handle currently being manipulated.
    #[serde(default)]
    pub active_handle_index: Option<usize>,
}

/// Segmentation a contour belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationReference {
    /// Segmentation identifier in the segmentation state.
    pub segmentation_id: String,
}

/// Cached statistics of a contour on its referenced image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContourStats {
    /// Enclosed area.
    pub area: f64,
    /// Unit of `area`.
    pub area_unit: String,
    /// Contour length.
    pub perimeter: f64,
}

/// Geometry payload of a contour annotation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContourData {
    /// The contour itself.
    pub contour: Contour,
    /// Editing handles.
    #[serde(default)]
    pub handles: ContourHandles,
    /// Owning segmentation, if the contour is part of one.
    #[serde(default)]
    pub segmentation: Option<SegmentationReference>,
    /// Statistics for the referenced image.
    #[serde(default)]
    pub cached_stats: Option<ContourStats>,
    /// Frame within a multi-frame image.
    #[serde(default)]
    pub frame_number: Option<u32>,
}

/// Tool-specific geometry payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AnnotationData {
    /// Arrow plus label pointing at one location.
    PointDisplay(DisplayData),
    /// Polyline contour.
    Contour(ContourData),
}

impl AnnotationData {
    /// Name of the payload shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            AnnotationData::PointDisplay(_) => "pointDisplay",
            AnnotationData::Contour(_) => "contour",
        }
    }
}

/// An annotation as held by the annotation state layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Unique identifier.
    pub annotation_uid: String,
    /// Identifying metadata.
    pub metadata: AnnotationMetadata,
    /// Geometry payload.
    pub data: AnnotationData,
    /// What the measurement represents.
    #[serde(default)]
    pub finding: Option<CodedConcept>,
    /// Where the measurement was taken.
    #[serde(default)]
    pub finding_sites: Option<Vec<CodedConcept>>,
    /// Whether the geometry changed since the last render.
    #[serde(default)]
    pub invalidated: bool,
}

impl Annotation {
    /// Create a new annotation with a fresh UID.
    pub fn new(metadata: AnnotationMetadata, data: AnnotationData) -> Self {
        Self {
            annotation_uid: generate_uid(),
            metadata,
            data,
            finding: None,
            finding_sites: None,
            invalidated: false,
        }
    }

    /// Attach a finding.
    pub fn with_finding(mut self, finding: CodedConcept) -> Self {
        self.finding = Some(finding);
        self
    }

    /// Attach finding sites.
    pub fn with_finding_sites(mut self, sites: Vec<CodedConcept>) -> Self {
        self.finding_sites = Some(sites);
        self
    }

    /// Tool type that owns this annotation.
    pub fn tool_name(&self) -> &str {
        &self.metadata.tool_name
    }

    /// Point-display payload, if this is a point-display annotation.
    pub fn display_data(&self) -> Option<&DisplayData> {
        match &self.data {
            AnnotationData::PointDisplay(data) => Some(data),
            AnnotationData::Contour(_) => None,
        }
    }

    /// Contour payload, if this is a contour annotation.
    pub fn contour_data(&self) -> Option<&ContourData> {
        match &self.data {
            AnnotationData::Contour(data) => Some(data),
            AnnotationData::PointDisplay(_) => None,
        }
    }

    /// Mutable contour payload.
    pub fn contour_data_mut(&mut self) -> Option<&mut ContourData> {
        match &mut self.data {
            AnnotationData::Contour(data) => Some(data),
            AnnotationData::PointDisplay(_) => None,
        }
    }

    /// Flag the geometry as changed.
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display(arrow_first: bool) -> DisplayHandles {
        DisplayHandles {
            points: vec![Point3::new(1.0, 2.0, 3.0), Point3::new(4.0, 5.0, 6.0)],
            active_handle_index: 0,
            arrow_first,
            text_box: TextBox::default(),
        }
    }

    #[test]
    fn test_anchor_follows_arrow_first() {
        assert_eq!(display(true).anchor(), Some(&Point3::new(1.0, 2.0, 3.0)));
        assert_eq!(display(false).anchor(), Some(&Point3::new(4.0, 5.0, 6.0)));
    }

    #[test]
    fn test_generated_uid_format() {
        let uid = generate_uid();
        assert!(uid.starts_with("2.25."));
        assert!(uid["2.25.".len()..].chars().all(|c| c.is_ascii_digit()));
        assert!(uid.len() <= 64);
        assert_ne!(uid, generate_uid());
    }

    #[test]
    fn test_payload_accessors() {
        let annotation = Annotation::new(
            AnnotationMetadata::new("Test"),
            AnnotationData::Contour(ContourData::default()),
        );
        assert!(annotation.contour_data().is_some());
        assert!(annotation.display_data().is_none());
        assert_eq!(annotation.data.kind(), "contour");
    }

    #[test]
    fn test_json_tagged_by_kind() {
        let annotation = Annotation::new(
            AnnotationMetadata::new("Test").with_referenced_image("img1"),
            AnnotationData::PointDisplay(DisplayData {
                text: "A".into(),
                handles: display(true),
                frame_number: None,
            }),
        );
        let value = serde_json::to_value(&annotation).unwrap();
        assert_eq!(value["data"]["kind"], "pointDisplay");
        assert_eq!(value["metadata"]["referencedImageId"], "img1");
        assert_eq!(value["data"]["handles"]["arrowFirst"], true);

        let back: Annotation = serde_json::from_value(value).unwrap();
        assert_eq!(back, annotation);
    }
}
