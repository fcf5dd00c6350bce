//! Conversion between image space and world space.

use std::collections::HashMap;

use crate::codec::CodecError;
use crate::metadata::{ImagePlaneModule, MetadataProvider};
use crate::model::{Point2, Point3};

/// Maps points between an image's pixel grid and patient space.
///
/// Implementations must be deterministic and free of side effects; the codec
/// may call them any number of times per measurement.
pub trait CoordinateMapper {
    /// Map an image-space point on `image_id` into world space.
    fn image_to_world(&self, image_id: &str, point: Point2) -> Result<Point3, CodecError>;

    /// Project a world-space point onto the pixel grid of `image_id`.
    fn world_to_image(&self, image_id: &str, point: Point3) -> Result<Point2, CodecError>;
}

/// Coordinate mapper built from image plane modules.
///
/// Image coordinates start at the top-left corner of the first pixel while
/// `imagePositionPatient` is the centre of that pixel, hence the half-pixel
/// shift in both directions.
#[derive(Debug, Clone, Default)]
pub struct ImagePlaneMapper {
    planes: HashMap<String, ImagePlaneModule>,
}

impl ImagePlaneMapper {
    /// Create a mapper with no planes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the plane modules of the given images from a provider.
    ///
    /// Images without a plane module are skipped; mapping them later fails
    /// with [`CodecError::UnknownImage`].
    pub fn from_provider<'a>(
        provider: &dyn MetadataProvider,
        image_ids: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut mapper = Self::new();
        for image_id in image_ids {
            match provider.image_plane_module(image_id) {
                Some(plane) => mapper.insert(image_id, plane),
                None => log::warn!("No image plane module for {}", image_id),
            }
        }
        mapper
    }

    /// Add or replace the plane of an image.
    pub fn insert(&mut self, image_id: impl Into<String>, plane: ImagePlaneModule) {
        self.planes.insert(image_id.into(), plane);
    }

    fn plane(&self, image_id: &str) -> Result<&ImagePlaneModule, CodecError> {
        self.planes
            .get(image_id)
            .ok_or_else(|| CodecError::unknown_image(image_id))
    }
}

fn spacing_or_unit(spacing: f64) -> f64 {
    if spacing == 0.0 { 1.0 } else { spacing }
}

impl CoordinateMapper for ImagePlaneMapper {
    fn image_to_world(&self, image_id: &str, point: Point2) -> Result<Point3, CodecError> {
        let plane = self.plane(image_id)?;
        let origin = Point3::from(plane.image_position_patient);
        let row_cosines = Point3::from(plane.row_cosines);
        let column_cosines = Point3::from(plane.column_cosines);

        let world = origin
            .scale_and_add(
                &row_cosines,
                spacing_or_unit(plane.column_pixel_spacing) * (point.x - 0.5),
            )
            .scale_and_add(
                &column_cosines,
                spacing_or_unit(plane.row_pixel_spacing) * (point.y - 0.5),
            );
        Ok(world)
    }

    fn world_to_image(&self, image_id: &str, point: Point3) -> Result<Point2, CodecError> {
        let plane = self.plane(image_id)?;
        let row_cosines = Point3::from(plane.row_cosines);
        let column_cosines = Point3::from(plane.column_cosines);
        let row_spacing = spacing_or_unit(plane.row_pixel_spacing);
        let column_spacing = spacing_or_unit(plane.column_pixel_spacing);

        let corner = Point3::from(plane.image_position_patient)
            .scale_and_add(&column_cosines, -row_spacing / 2.0)
            .scale_and_add(&row_cosines, -column_spacing / 2.0);
        let relative = point.sub(&corner);

        Ok(Point2::new(
            relative.dot(&row_cosines) / column_spacing,
            relative.dot(&column_cosines) / row_spacing,
        ))
    }
}
