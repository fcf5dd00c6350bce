//! TID300 measurement representation arguments.
//!
//! These are what an SR document writer needs to lay out one measurement:
//! image-space points, the tracking identifier, and classification. The full
//! document assembly lives outside this crate; [`Tid300RepresentationArguments::to_measurement_group`]
//! produces just the measurement group, which is enough to feed a group back
//! into decoding.

use serde::{Deserialize, Serialize};

use crate::model::{CodedConcept, ContourStats, Point2};
use crate::sr::content::{ContentItem, GraphicType, ReferencedSop};
use crate::sr::measurement_group::MeasurementGroup;

/// TID300 geometry template a tool encodes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tid300Representation {
    /// A single point
    Point,
    /// An open or explicitly closed polyline
    Polyline,
}

impl Tid300Representation {
    /// SCOORD graphic type written for this representation.
    pub fn graphic_type(&self) -> GraphicType {
        match self {
            Tid300Representation::Point => GraphicType::Point,
            Tid300Representation::Polyline => GraphicType::Polyline,
        }
    }
}

/// Arguments for one TID300 measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tid300RepresentationArguments {
    /// Image-space points
    pub points: Vec<Point2>,
    /// `<engine-tag>:<tool-type>`
    pub tracking_identifier_text_value: String,
    /// What the measurement represents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finding: Option<CodedConcept>,
    /// Where it was measured
    #[serde(default)]
    pub finding_sites: Vec<CodedConcept>,
    /// Enclosed area, for region tools
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    /// Unit of `area`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_unit: Option<String>,
    /// Perimeter, for region tools
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perimeter: Option<f64>,
}

impl Tid300RepresentationArguments {
    /// Create arguments with no classification or statistics.
    pub fn new(points: Vec<Point2>, tracking_identifier: impl Into<String>) -> Self {
        Self {
            points,
            tracking_identifier_text_value: tracking_identifier.into(),
            finding: None,
            finding_sites: Vec::new(),
            area: None,
            area_unit: None,
            perimeter: None,
        }
    }

    /// Copy area and perimeter from cached statistics.
    pub fn with_stats(mut self, stats: Option<&ContourStats>) -> Self {
        if let Some(stats) = stats {
            self.area = Some(stats.area);
            self.area_unit = Some(stats.area_unit.clone());
            self.perimeter = Some(stats.perimeter);
        }
        self
    }

    /// Flat `[x0, y0, x1, y1, ...]` coordinate list.
    pub fn graphic_data(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    /// Lay the arguments out as a measurement group drawn on `referenced`.
    pub fn to_measurement_group(
        &self,
        representation: Tid300Representation,
        referenced: ReferencedSop,
    ) -> MeasurementGroup {
        let mut group = MeasurementGroup::new(&self.tracking_identifier_text_value);
        if let Some(finding) = &self.finding {
            group = group.with_finding(finding.clone());
        }
        for site in &self.finding_sites {
            group = group.with_finding_site(site.clone());
        }
        group.with_item(ContentItem::scoord(
            representation.graphic_type(),
            self.graphic_data(),
            referenced,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_writer_keys() {
        let mut args = Tid300RepresentationArguments::new(
            vec![Point2::new(1.5, 2.5)],
            "Cornerstone3DTools@^0.1.0:DICOMSRDisplay",
        );
        args.finding = Some(CodedConcept::free_text("Note"));

        let value = serde_json::to_value(&args).unwrap();
        assert_eq!(value["points"][0]["x"], 1.5);
        assert_eq!(
            value["trackingIdentifierTextValue"],
            "Cornerstone3DTools@^0.1.0:DICOMSRDisplay"
        );
        assert_eq!(value["finding"]["CodeMeaning"], "Note");
        assert_eq!(value["findingSites"], serde_json::json!([]));
        assert!(value.get("use3DSpatialCoordinates").is_none());
        assert!(value.get("area").is_none());
    }

    #[test]
    fn test_to_measurement_group() {
        let mut args =
            Tid300RepresentationArguments::new(vec![Point2::new(12.0, 34.0)], "ns:Tool");
        args.finding = Some(CodedConcept::free_text("Arrow"));

        let group = args.to_measurement_group(
            Tid300Representation::Point,
            ReferencedSop::new(None, "1.2.3"),
        );

        assert_eq!(group.tracking_identifier(), Some("ns:Tool"));
        assert_eq!(group.finding().unwrap().code_meaning, "Arrow");
        let coords = group.spatial_coordinates().unwrap();
        assert_eq!(coords.graphic_type, Some(GraphicType::Point));
        assert_eq!(coords.graphic_data, &[12.0, 34.0]);
        assert_eq!(coords.referenced_sop.unwrap().sop_instance_uid, "1.2.3");
    }
}
