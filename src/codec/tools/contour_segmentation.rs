//! Freehand contour codec for contours that belong to a segmentation.
//!
//! Contours travel as TID300 polylines. A closed contour repeats its first
//! point at the end on the SR side; on decode, a last point that lands on the
//! first one closes the contour again. Contours can also be exported as DICOM
//! `ContourSequence` items for RTSTRUCT-style consumers.

use serde::{Deserialize, Serialize};

use crate::codec::error::CodecError;
use crate::codec::events::{SegmentationEvent, SegmentationEventSink};
use crate::codec::setup::setup_measurement;
use crate::codec::traits::{DecodeContext, ToolCodec};
use crate::constants::CLOSED_CONTOUR_THRESHOLD;
use crate::metadata::{CoordinateMapper, MetadataProvider, SOP_COMMON_MODULE};
use crate::model::{
    Annotation, AnnotationData, Contour, ContourData, ContourHandles, ContourStats,
    planar_polygon_area, polyline_length,
};
use crate::sr::{
    ContourGeometricType, ContourImageReference, ContourSequenceItem, MeasurementGroup,
    Tid300Representation, Tid300RepresentationArguments,
};

/// Tool type of the contour segmentation codec.
pub const PLANAR_FREEHAND_CONTOUR_SEGMENTATION: &str = "PlanarFreehandContourSegmentationTool";

/// Unit reported for contour areas.
const AREA_UNIT: &str = "mm²";

/// Behaviour switches of the contour segmentation tool.
///
/// Missing fields in a serialized configuration take their defaults, so a
/// partial configuration overrides only what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContourToolConfiguration {
    /// Compute area and perimeter when the contour changes.
    pub calculate_stats: bool,
    /// Whether a finished contour may stay open. Contours are always allowed
    /// to be open while being drawn.
    pub allow_open_contours: bool,
    /// World distance under which the last decoded point closes the contour.
    pub closed_contour_threshold: f64,
}

impl Default for ContourToolConfiguration {
    fn default() -> Self {
        Self {
            calculate_stats: false,
            allow_open_contours: false,
            closed_contour_threshold: CLOSED_CONTOUR_THRESHOLD,
        }
    }
}

impl ContourToolConfiguration {
    /// Parse a (possibly partial) configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Codec for `PlanarFreehandContourSegmentationTool` contours.
#[derive(Debug, Clone, Default)]
pub struct PlanarFreehandContourSegmentationTool {
    configuration: ContourToolConfiguration,
}

/// Area and perimeter of a contour.
pub fn contour_stats(contour: &Contour) -> ContourStats {
    let area = if contour.closed {
        planar_polygon_area(&contour.polyline)
    } else {
        0.0
    };
    ContourStats {
        area,
        area_unit: AREA_UNIT.to_string(),
        perimeter: polyline_length(&contour.polyline, contour.closed),
    }
}

impl PlanarFreehandContourSegmentationTool {
    /// Create the tool with the given configuration.
    pub fn new(configuration: ContourToolConfiguration) -> Self {
        Self { configuration }
    }

    /// Current configuration.
    pub fn configuration(&self) -> &ContourToolConfiguration {
        &self.configuration
    }

    /// Finish drawing a contour.
    ///
    /// When open contours are not allowed, an open contour is closed.
    /// Returns whether the contour had to be closed.
    pub fn complete_contour(&self, data: &mut ContourData) -> bool {
        if data.contour.closed || self.configuration.allow_open_contours {
            return false;
        }
        data.contour.closed = true;
        data.handles.points.clear();
        log::debug!("Closed open contour on completion");
        true
    }

    /// Render one annotation through `render` and notify segmentation
    /// listeners if its geometry was invalidated.
    ///
    /// Exactly one [`SegmentationEvent::DataModified`] is emitted per pass
    /// that sees the invalidation, after rendering. The flag is cleared
    /// afterwards so the next pass stays quiet until the geometry changes
    /// again.
    pub fn render_annotation_instance<R>(
        &self,
        annotation: &mut Annotation,
        render: R,
        events: &dyn SegmentationEventSink,
    ) -> bool
    where
        R: FnOnce(&Annotation) -> bool,
    {
        let invalidated = annotation.invalidated;

        if invalidated && self.configuration.calculate_stats {
            if let Some(data) = annotation.contour_data_mut() {
                data.cached_stats = Some(contour_stats(&data.contour));
            }
        }

        let rendered = render(annotation);

        if invalidated {
            match annotation
                .contour_data()
                .and_then(|data| data.segmentation.as_ref())
            {
                Some(segmentation) => events.emit(SegmentationEvent::DataModified {
                    segmentation_id: segmentation.segmentation_id.clone(),
                }),
                None => log::debug!(
                    "Invalidated contour {} has no segmentation",
                    annotation.annotation_uid
                ),
            }
            annotation.invalidated = false;
        }

        rendered
    }
}

impl ToolCodec for PlanarFreehandContourSegmentationTool {
    fn tool_type(&self) -> &'static str {
        PLANAR_FREEHAND_CONTOUR_SEGMENTATION
    }

    fn representation(&self) -> Tid300Representation {
        Tid300Representation::Polyline
    }

    fn decode(
        &self,
        group: &MeasurementGroup,
        context: &DecodeContext<'_>,
    ) -> Result<Annotation, CodecError> {
        let setup = setup_measurement(
            group,
            context.sop_instance_uid_map,
            context.metadata,
            PLANAR_FREEHAND_CONTOUR_SEGMENTATION,
        )?;
        let image_id = setup.referenced_image_id().to_string();

        let mut polyline = setup.world_points(&image_id, context.mapper)?;

        let (Some(&first), Some(&last)) = (polyline.first(), polyline.last()) else {
            return Err(CodecError::malformed_group(format!(
                "{} group has no coordinates",
                PLANAR_FREEHAND_CONTOUR_SEGMENTATION
            )));
        };

        // A closed contour is written with its first point repeated.
        let closed = polyline.len() > 1
            && last.distance_to(&first) < self.configuration.closed_contour_threshold;
        if closed {
            polyline.pop();
        }

        let handles = ContourHandles {
            points: if closed { Vec::new() } else { vec![first, last] },
            active_handle_index: None,
        };

        let data = ContourData {
            contour: Contour { polyline, closed },
            handles,
            segmentation: None,
            cached_stats: None,
            frame_number: setup.frame_number,
        };

        Ok(setup.into_annotation(AnnotationData::Contour(data)))
    }

    fn encode(
        &self,
        annotation: &Annotation,
        mapper: &dyn CoordinateMapper,
    ) -> Result<Tid300RepresentationArguments, CodecError> {
        let referenced_image_id = annotation
            .metadata
            .referenced_image_id
            .as_deref()
            .ok_or_else(|| CodecError::missing_reference(PLANAR_FREEHAND_CONTOUR_SEGMENTATION))?;

        let data = annotation.contour_data().ok_or_else(|| {
            CodecError::unsupported_annotation(
                PLANAR_FREEHAND_CONTOUR_SEGMENTATION,
                annotation.data.kind(),
            )
        })?;

        let mut points = data
            .contour
            .polyline
            .iter()
            .map(|point| mapper.world_to_image(referenced_image_id, *point))
            .collect::<Result<Vec<_>, _>>()?;

        let Some(&first) = points.first() else {
            return Err(CodecError::invalid_geometry("contour has no points"));
        };
        if data.contour.closed {
            points.push(first);
        }

        let mut args = Tid300RepresentationArguments::new(points, self.tracking_identifier())
            .with_stats(data.cached_stats.as_ref());
        args.finding = annotation.finding.clone();
        args.finding_sites = annotation.finding_sites.clone().unwrap_or_default();

        Ok(args)
    }

    fn supports_contour_export(&self) -> bool {
        true
    }

    fn contour_sequence(
        &self,
        annotation: &Annotation,
        metadata: &dyn MetadataProvider,
    ) -> Result<Vec<ContourSequenceItem>, CodecError> {
        let data = annotation.contour_data().ok_or_else(|| {
            CodecError::unsupported_annotation(
                PLANAR_FREEHAND_CONTOUR_SEGMENTATION,
                annotation.data.kind(),
            )
        })?;
        let referenced_image_id = annotation
            .metadata
            .referenced_image_id
            .as_deref()
            .ok_or_else(|| CodecError::missing_reference(PLANAR_FREEHAND_CONTOUR_SEGMENTATION))?;

        let sop_common = metadata
            .sop_common_module(referenced_image_id)
            .ok_or_else(|| CodecError::missing_metadata(SOP_COMMON_MODULE, referenced_image_id))?;

        let item = ContourSequenceItem::new(
            &data.contour.polyline,
            ContourImageReference {
                referenced_sop_class_uid: sop_common.sop_class_uid,
                referenced_sop_instance_uid: sop_common.sop_instance_uid,
            },
            ContourGeometricType::OpenPlanar,
        );

        Ok(vec![item])
    }
}
