//! Per-image metadata lookups and coordinate mapping.
//!
//! The codec never loads images itself. Everything it needs to know about an
//! image comes through two collaborators:
//!
//! - a [`MetadataProvider`], answering module lookups (pixel module, SOP
//!   common module, image plane module) for an image id;
//! - a [`CoordinateMapper`], converting between image (pixel) space and
//!   world (patient) space.
//!
//! [`InMemoryMetadata`] and [`ImagePlaneMapper`] are ready-made
//! implementations backed by plain data, used by the command-line driver and
//! the tests.

mod mapper;

pub use mapper::{CoordinateMapper, ImagePlaneMapper};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::codec::CodecError;
use crate::sr::SopInstanceUidToImageIdMap;

/// Name of the pixel module, as used in error messages.
pub const IMAGE_PIXEL_MODULE: &str = "imagePixelModule";
/// Name of the SOP common module.
pub const SOP_COMMON_MODULE: &str = "sopCommonModule";
/// Name of the image plane module.
pub const IMAGE_PLANE_MODULE: &str = "imagePlaneModule";

/// Image matrix size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePixelModule {
    /// Number of rows
    pub rows: u32,
    /// Number of columns
    pub columns: u32,
}

/// SOP identifiers of an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SopCommonModule {
    /// SOP Class UID
    #[serde(rename = "sopClassUID")]
    pub sop_class_uid: String,
    /// SOP Instance UID
    #[serde(rename = "sopInstanceUID")]
    pub sop_instance_uid: String,
}

/// Position and orientation of an image in patient space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePlaneModule {
    /// Frame of reference the plane is expressed in
    #[serde(default, rename = "frameOfReferenceUID")]
    pub frame_of_reference_uid: Option<String>,
    /// Centre of the first transmitted pixel
    pub image_position_patient: [f64; 3],
    /// Direction of increasing column index
    pub row_cosines: [f64; 3],
    /// Direction of increasing row index
    pub column_cosines: [f64; 3],
    /// Spacing between rows
    pub row_pixel_spacing: f64,
    /// Spacing between columns
    pub column_pixel_spacing: f64,
}

/// Read-only lookup of per-image metadata modules.
///
/// Lookups are expected to be cheap, synchronous reads of already-cached
/// metadata. Absent modules are `None`; callers decide whether that is fatal.
pub trait MetadataProvider {
    /// Rows and columns of the image.
    fn image_pixel_module(&self, image_id: &str) -> Option<ImagePixelModule>;

    /// SOP class and instance of the image.
    fn sop_common_module(&self, image_id: &str) -> Option<SopCommonModule>;

    /// Plane geometry of the image.
    fn image_plane_module(&self, image_id: &str) -> Option<ImagePlaneModule>;
}

/// All metadata modules known for one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    /// Pixel module
    #[serde(default)]
    pub image_pixel_module: Option<ImagePixelModule>,
    /// SOP common module
    #[serde(default)]
    pub sop_common_module: Option<SopCommonModule>,
    /// Image plane module
    #[serde(default)]
    pub image_plane_module: Option<ImagePlaneModule>,
}

/// Metadata provider backed by an in-memory table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryMetadata {
    /// Image id → modules, ordered by image id
    #[serde(default)]
    pub images: BTreeMap<String, ImageMetadata>,
}

impl InMemoryMetadata {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a metadata table from JSON.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Mutable entry for an image, created on first use.
    pub fn entry(&mut self, image_id: impl Into<String>) -> &mut ImageMetadata {
        self.images.entry(image_id.into()).or_default()
    }

    /// Set the pixel module of an image.
    pub fn with_pixel_module(mut self, image_id: &str, columns: u32, rows: u32) -> Self {
        self.entry(image_id).image_pixel_module = Some(ImagePixelModule { rows, columns });
        self
    }

    /// Set the SOP common module of an image.
    pub fn with_sop_common(
        mut self,
        image_id: &str,
        sop_class_uid: impl Into<String>,
        sop_instance_uid: impl Into<String>,
    ) -> Self {
        self.entry(image_id).sop_common_module = Some(SopCommonModule {
            sop_class_uid: sop_class_uid.into(),
            sop_instance_uid: sop_instance_uid.into(),
        });
        self
    }

    /// Set the image plane module of an image.
    pub fn with_image_plane(mut self, image_id: &str, plane: ImagePlaneModule) -> Self {
        self.entry(image_id).image_plane_module = Some(plane);
        self
    }

    /// Image ids in the table.
    pub fn image_ids(&self) -> impl Iterator<Item = &str> {
        self.images.keys().map(String::as_str)
    }

    /// Build the SOP Instance UID → image id map from the SOP common modules.
    ///
    /// Images without a SOP common module are left out.
    pub fn sop_instance_uid_map(&self) -> SopInstanceUidToImageIdMap {
        self.images
            .iter()
            .filter_map(|(image_id, modules)| {
                modules
                    .sop_common_module
                    .as_ref()
                    .map(|sop| (sop.sop_instance_uid.clone(), image_id.clone()))
            })
            .collect()
    }
}

impl MetadataProvider for InMemoryMetadata {
    fn image_pixel_module(&self, image_id: &str) -> Option<ImagePixelModule> {
        self.images.get(image_id)?.image_pixel_module
    }

    fn sop_common_module(&self, image_id: &str) -> Option<SopCommonModule> {
        self.images.get(image_id)?.sop_common_module.clone()
    }

    fn image_plane_module(&self, image_id: &str) -> Option<ImagePlaneModule> {
        self.images.get(image_id)?.image_plane_module.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups() {
        let metadata = InMemoryMetadata::new()
            .with_pixel_module("img1", 512, 256)
            .with_sop_common("img1", "1.2.840.10008.5.1.4.1.1.2", "1.2.3");

        let pixel = metadata.image_pixel_module("img1").unwrap();
        assert_eq!(pixel.columns, 512);
        assert_eq!(pixel.rows, 256);
        assert_eq!(
            metadata.sop_common_module("img1").unwrap().sop_instance_uid,
            "1.2.3"
        );
        assert!(metadata.image_plane_module("img1").is_none());
        assert!(metadata.image_pixel_module("img2").is_none());
    }

    #[test]
    fn test_from_json_uses_module_names() {
        let json = r#"{
            "images": {
                "wadors:img1": {
                    "imagePixelModule": { "rows": 200, "columns": 100 },
                    "sopCommonModule": {
                        "sopClassUID": "1.2.840.10008.5.1.4.1.1.4",
                        "sopInstanceUID": "1.2.3.4"
                    }
                }
            }
        }"#;
        let metadata = InMemoryMetadata::from_json(json).unwrap();
        assert_eq!(
            metadata.image_pixel_module("wadors:img1"),
            Some(ImagePixelModule {
                rows: 200,
                columns: 100
            })
        );

        let map = metadata.sop_instance_uid_map();
        assert_eq!(map.get("1.2.3.4"), Some("wadors:img1"));
    }
}
