//! TID1501 measurement groups and access to their well-known content.

use serde::{Deserialize, Serialize};

use crate::constants::concepts;
use crate::model::{CodedConcept, Point3};
use crate::sr::content::{ContentItem, GraphicType, ReferencedSop, ValueType};

/// A measurement group container from an SR document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeasurementGroup {
    /// Items contained in the group
    #[serde(
        rename = "ContentSequence",
        default,
        deserialize_with = "crate::sr::content::sequence"
    )]
    pub content_sequence: Vec<ContentItem>,
}

/// Concept name of the tracking identifier item.
pub fn tracking_identifier_concept() -> CodedConcept {
    CodedConcept::new(
        concepts::TRACKING_IDENTIFIER,
        concepts::DCM,
        "Tracking Identifier",
    )
}

/// Concept name of the tracking unique identifier item.
pub fn tracking_unique_identifier_concept() -> CodedConcept {
    CodedConcept::new(
        concepts::TRACKING_UNIQUE_IDENTIFIER,
        concepts::DCM,
        "Tracking Unique Identifier",
    )
}

/// Concept name of the finding item.
pub fn finding_concept() -> CodedConcept {
    CodedConcept::new(concepts::FINDING, concepts::DCM, "Finding")
}

/// Concept name of a finding site item.
pub fn finding_site_concept() -> CodedConcept {
    CodedConcept::new(concepts::FINDING_SITE, concepts::SRT, "Finding Site")
}

/// The spatial-coordinate payload of a measurement group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialCoordinates<'a> {
    /// SCOORD (image space) or SCOORD3D (world space)
    pub value_type: ValueType,
    /// Declared graphic type, if any
    pub graphic_type: Option<GraphicType>,
    /// Flat coordinate list
    pub graphic_data: &'a [f64],
    /// Image the coordinates were drawn on (SCOORD only)
    pub referenced_sop: Option<&'a ReferencedSop>,
    /// Frame of reference (SCOORD3D only)
    pub frame_of_reference_uid: Option<&'a str>,
}

impl SpatialCoordinates<'_> {
    /// Whether the coordinates are patient-space triples (SCOORD3D).
    pub fn is_world_space(&self) -> bool {
        self.value_type == ValueType::Scoord3d
    }

    /// Values per point: 3 for SCOORD3D, 2 otherwise.
    pub fn dimension(&self) -> usize {
        if self.is_world_space() { 3 } else { 2 }
    }

    /// Coordinate pairs of a 2D payload. A trailing unpaired value is dropped.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.graphic_data.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    /// Points of a 3D payload. Trailing values that do not form a full
    /// triple are dropped.
    pub fn triples(&self) -> impl Iterator<Item = Point3> + '_ {
        self.graphic_data
            .chunks_exact(3)
            .map(|xyz| Point3::new(xyz[0], xyz[1], xyz[2]))
    }

    /// Whether the flat list cannot be split evenly into points.
    pub fn has_unpaired_value(&self) -> bool {
        self.graphic_data.len() % self.dimension() != 0
    }
}

impl MeasurementGroup {
    /// Create a group holding only a tracking identifier.
    pub fn new(tracking_identifier: impl Into<String>) -> Self {
        Self {
            content_sequence: vec![ContentItem::text(
                tracking_identifier_concept(),
                tracking_identifier,
            )],
        }
    }

    /// Add a tracking unique identifier.
    pub fn with_tracking_uid(mut self, uid: impl Into<String>) -> Self {
        self.content_sequence.push(ContentItem::uid_ref(
            tracking_unique_identifier_concept(),
            uid,
        ));
        self
    }

    /// Add a finding.
    pub fn with_finding(mut self, finding: CodedConcept) -> Self {
        self.content_sequence
            .push(ContentItem::code(finding_concept(), finding));
        self
    }

    /// Add a finding site.
    pub fn with_finding_site(mut self, site: CodedConcept) -> Self {
        self.content_sequence
            .push(ContentItem::code(finding_site_concept(), site));
        self
    }

    /// Add an arbitrary content item.
    pub fn with_item(mut self, item: ContentItem) -> Self {
        self.content_sequence.push(item);
        self
    }

    fn find_concept(&self, code_value: &str, designator: &str) -> Option<&ContentItem> {
        self.content_sequence
            .iter()
            .find(|item| item.has_concept(code_value, designator))
    }

    /// The tracking identifier text, if present.
    pub fn tracking_identifier(&self) -> Option<&str> {
        self.find_concept(concepts::TRACKING_IDENTIFIER, concepts::DCM)?
            .text_value
            .as_deref()
    }

    /// The tracking unique identifier, if present.
    pub fn tracking_unique_identifier(&self) -> Option<&str> {
        self.find_concept(concepts::TRACKING_UNIQUE_IDENTIFIER, concepts::DCM)?
            .uid
            .as_deref()
    }

    /// The finding, if present.
    pub fn finding(&self) -> Option<&CodedConcept> {
        self.find_concept(concepts::FINDING, concepts::DCM)?
            .concept_code
            .as_ref()
    }

    /// All finding sites, in document order.
    pub fn finding_sites(&self) -> Vec<&CodedConcept> {
        self.content_sequence
            .iter()
            .filter(|item| item.has_concept(concepts::FINDING_SITE, concepts::SRT))
            .filter_map(|item| item.concept_code.as_ref())
            .collect()
    }

    /// The first SCOORD/SCOORD3D item, either directly in the group or
    /// inferred from one of its NUM measurements.
    pub fn spatial_coordinates(&self) -> Option<SpatialCoordinates<'_>> {
        let direct = self.content_sequence.iter().find(|item| item.is_spatial());
        let item = direct.or_else(|| {
            self.content_sequence
                .iter()
                .filter(|item| item.value_type == ValueType::Num)
                .flat_map(|num| num.content_sequence.iter())
                .find(|item| item.is_spatial())
        })?;

        // The image reference normally lives in a child IMAGE item, but some
        // writers put it on the coordinate item itself.
        let referenced_sop = item.referenced_sop.as_ref().or_else(|| {
            item.content_sequence
                .iter()
                .find_map(|child| child.referenced_sop.as_ref())
        });

        Some(SpatialCoordinates {
            value_type: item.value_type,
            graphic_type: item.graphic_type,
            graphic_data: item.graphic_data.as_deref().unwrap_or(&[]),
            referenced_sop,
            frame_of_reference_uid: item.referenced_frame_of_reference_uid.as_deref(),
        })
    }
}
