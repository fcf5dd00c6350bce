//! Built-in tool codecs.

mod contour_segmentation;
mod dicom_sr_display;

#[cfg(test)]
mod tests;

pub use contour_segmentation::{
    ContourToolConfiguration, PLANAR_FREEHAND_CONTOUR_SEGMENTATION,
    PlanarFreehandContourSegmentationTool, contour_stats,
};
pub use dicom_sr_display::{DICOM_SR_DISPLAY, DicomSrDisplay, synthesized_second_point};
