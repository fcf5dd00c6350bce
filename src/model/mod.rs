//! Data models for annotations and their classification.

mod annotation;
mod coded_concept;
mod geometry;

pub use annotation::{
    Annotation, AnnotationData, AnnotationMetadata, Contour, ContourData, ContourHandles,
    ContourStats, DisplayData, DisplayHandles, SegmentationReference, TextBox, generate_uid,
};
pub use coded_concept::{CodedConcept, free_text_finding_or_default};
pub use geometry::{Point2, Point3, planar_polygon_area, polyline_length};
