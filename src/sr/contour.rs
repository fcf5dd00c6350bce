//! DICOM contour sequence items.

use serde::{Deserialize, Serialize};

use crate::constants::CONTOUR_DATA_PRECISION;
use crate::model::Point3;
use crate::sr::precision::to_fixed;

/// Geometric type of a contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContourGeometricType {
    /// A single point
    Point,
    /// Open polyline in one plane
    OpenPlanar,
    /// Open polyline across planes
    OpenNonplanar,
    /// Closed polygon in one plane
    ClosedPlanar,
}

/// Image a contour was drawn on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContourImageReference {
    /// SOP Class UID of the image
    #[serde(rename = "ReferencedSOPClassUID")]
    pub referenced_sop_class_uid: String,
    /// SOP Instance UID of the image
    #[serde(rename = "ReferencedSOPInstanceUID")]
    pub referenced_sop_instance_uid: String,
}

/// One item of a `ContourSequence`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContourSequenceItem {
    /// Number of (x, y, z) triples in `contour_data`
    pub number_of_contour_points: usize,
    /// Image the contour was drawn on
    pub contour_image_sequence: ContourImageReference,
    /// Open/closed, planar/non-planar
    pub contour_geometric_type: ContourGeometricType,
    /// Flat coordinate list as decimal strings
    pub contour_data: Vec<String>,
}

/// Flatten world points into fixed-precision decimal strings.
pub fn contour_data(points: &[Point3]) -> Vec<String> {
    points
        .iter()
        .flat_map(|p| p.to_array())
        .map(|value| to_fixed(value, CONTOUR_DATA_PRECISION))
        .collect()
}

impl ContourSequenceItem {
    /// Build an item from world points.
    pub fn new(
        points: &[Point3],
        contour_image_sequence: ContourImageReference,
        contour_geometric_type: ContourGeometricType,
    ) -> Self {
        let contour_data = contour_data(points);
        Self {
            number_of_contour_points: contour_data.len() / 3,
            contour_image_sequence,
            contour_geometric_type,
            contour_data,
        }
    }
}
