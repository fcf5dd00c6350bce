//! DICOM Structured Report building blocks.
//!
//! - [`MeasurementGroup`]: the SR side of decoding, a TID1501 container
//!   with typed access to its tracking identifier, finding, finding sites and
//!   spatial coordinates
//! - [`Tid300RepresentationArguments`]: the SR side of encoding
//! - [`ContourSequenceItem`]: exported contours

mod content;
mod contour;
mod measurement_group;
mod precision;
mod sop_map;
mod tid300;

pub use content::{ContentItem, GraphicType, ReferencedSop, ValueType};
pub use contour::{ContourGeometricType, ContourImageReference, ContourSequenceItem, contour_data};
pub use measurement_group::{
    MeasurementGroup, SpatialCoordinates, finding_concept, finding_site_concept,
    tracking_identifier_concept, tracking_unique_identifier_concept,
};
pub use precision::to_fixed;
pub use sop_map::SopInstanceUidToImageIdMap;
pub use tid300::{Tid300Representation, Tid300RepresentationArguments};
