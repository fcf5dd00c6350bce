//! Unit tests for the built-in tool codecs.
//!
//! Decoding runs against a translation mapper, so world coordinates are the
//! image coordinates with `z = 0` plus a fixed shift.

mod roundtrip_tests;

use crate::codec::CodecError;
use crate::metadata::CoordinateMapper;
use crate::model::{Point2, Point3};

/// Image id every fixture draws on.
pub(super) const IMAGE_ID: &str = "wadouri:image-1";

/// SOP instance of [`IMAGE_ID`].
pub(super) const SOP_INSTANCE_UID: &str = "1.2.826.0.1.1";

/// SOP class of [`IMAGE_ID`].
pub(super) const SOP_CLASS_UID: &str = "1.2.840.10008.5.1.4.1.1.2";

/// Maps image `(x, y)` to world `(x + dx, y + dy, 0)` on known images.
pub(super) struct TranslationMapper {
    pub dx: f64,
    pub dy: f64,
}

impl TranslationMapper {
    pub fn identity() -> Self {
        Self { dx: 0.0, dy: 0.0 }
    }
}

impl CoordinateMapper for TranslationMapper {
    fn image_to_world(&self, image_id: &str, point: Point2) -> Result<Point3, CodecError> {
        if image_id != IMAGE_ID {
            return Err(CodecError::unknown_image(image_id));
        }
        Ok(Point3::new(point.x + self.dx, point.y + self.dy, 0.0))
    }

    fn world_to_image(&self, image_id: &str, point: Point3) -> Result<Point2, CodecError> {
        if image_id != IMAGE_ID {
            return Err(CodecError::unknown_image(image_id));
        }
        Ok(Point2::new(point.x - self.dx, point.y - self.dy))
    }
}
