//! Point-display codec: an arrow with a label pointing at one location.
//!
//! On the SR side this is a single TID300 point. On the annotation side the
//! arrow needs two handles, so a lone point gets a second one placed a tenth of
//! the image size away (or 10 pixels when the image size is unknown). The
//! placement only affects how the arrow is drawn.

use crate::codec::error::CodecError;
use crate::codec::setup::setup_measurement;
use crate::codec::traits::{DecodeContext, ToolCodec};
use crate::constants::{FALLBACK_SECOND_POINT_OFFSET, SECOND_POINT_SIZE_DIVISOR};
use crate::metadata::{CoordinateMapper, ImagePixelModule};
use crate::model::{
    Annotation, AnnotationData, DisplayData, DisplayHandles, Point2, TextBox,
    free_text_finding_or_default,
};
use crate::sr::{MeasurementGroup, Tid300Representation, Tid300RepresentationArguments};

/// Tool type of the point-display codec.
pub const DICOM_SR_DISPLAY: &str = "DICOMSRDisplay";

/// Codec for `DICOMSRDisplay` arrows.
#[derive(Debug, Clone, Copy, Default)]
pub struct DicomSrDisplay;

/// Image-space position of the second handle synthesized for a lone point.
pub fn synthesized_second_point(first: Point2, pixel_module: Option<ImagePixelModule>) -> Point2 {
    let (dx, dy) = match pixel_module {
        Some(pixel) => (
            f64::from(pixel.columns) / SECOND_POINT_SIZE_DIVISOR,
            f64::from(pixel.rows) / SECOND_POINT_SIZE_DIVISOR,
        ),
        None => (FALLBACK_SECOND_POINT_OFFSET, FALLBACK_SECOND_POINT_OFFSET),
    };
    first.offset(dx, dy)
}

impl ToolCodec for DicomSrDisplay {
    fn tool_type(&self) -> &'static str {
        DICOM_SR_DISPLAY
    }

    fn representation(&self) -> Tid300Representation {
        Tid300Representation::Point
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
            DICOM_SR_DISPLAY,
        )?;

        // Groups of this tool reference a single image, so any image of the
        // map will do for the transform.
        let image_id = context
            .sop_instance_uid_map
            .first_image_id()
            .unwrap_or_else(|| setup.referenced_image_id())
            .to_string();

        let mut points = setup.world_points(&image_id, context.mapper)?;
        let Some(&first) = points.first() else {
            return Err(CodecError::malformed_group(format!(
                "{} group has no coordinates",
                DICOM_SR_DISPLAY
            )));
        };
        points.truncate(2);

        if points.len() == 1 {
            let pixel_module = context.metadata.image_pixel_module(&image_id);
            if pixel_module.is_none() {
                log::debug!(
                    "No pixel module for {}, using a fixed offset for the second handle",
                    image_id
                );
            }
            // The offset is in pixels, so a world-space point is taken to the
            // image first.
            let first_image = match setup.coordinates.pairs().next() {
                Some((x, y)) if !setup.coordinates.is_world_space() => Point2::new(x, y),
                _ => context.mapper.world_to_image(&image_id, first)?,
            };
            let second = synthesized_second_point(first_image, pixel_module);
            points.push(context.mapper.image_to_world(&image_id, second)?);
        }

        let data = DisplayData {
            text: setup.label().to_string(),
            handles: DisplayHandles {
                points,
                active_handle_index: 0,
                arrow_first: true,
                text_box: TextBox::default(),
            },
            frame_number: None,
        };

        Ok(setup.into_annotation(AnnotationData::PointDisplay(data)))
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
            .ok_or_else(|| CodecError::missing_reference(DICOM_SR_DISPLAY))?;

        let data = annotation.display_data().ok_or_else(|| {
            CodecError::unsupported_annotation(DICOM_SR_DISPLAY, annotation.data.kind())
        })?;

        let anchor = data.handles.anchor().ok_or_else(|| {
            CodecError::invalid_geometry(format!(
                "{} annotation has no anchor handle",
                DICOM_SR_DISPLAY
            ))
        })?;
        let point = mapper.world_to_image(referenced_image_id, *anchor)?;

        let mut args = Tid300RepresentationArguments::new(vec![point], self.tracking_identifier());
        args.finding = Some(free_text_finding_or_default(
            annotation.finding.as_ref(),
            &data.text,
        ));
        args.finding_sites = annotation.finding_sites.clone().unwrap_or_default();

        Ok(args)
    }
}
