//! Global constants for the SR codec

/// Namespace tag prefixed to every tracking identifier this engine writes.
pub const ENGINE_TAG: &str = "Cornerstone3DTools@^0.1.0";

/// Separator between the engine tag and the tool type in a tracking identifier.
pub const TRACKING_IDENTIFIER_SEPARATOR: char = ':';

/// Coding scheme designator used for codes private to this engine.
pub const CODING_SCHEME_DESIGNATOR: &str = "CORNERSTONEJS";

/// Code value marking a finding whose meaning is free text.
pub const FREE_TEXT_CODE_VALUE: &str = "CORNERSTONEFREETEXT";

/// SR concept codes used when walking a measurement group.
pub mod concepts {
    /// DCM designator.
    pub const DCM: &str = "DCM";
    /// SRT designator.
    pub const SRT: &str = "SRT";

    /// Tracking Identifier (TEXT).
    pub const TRACKING_IDENTIFIER: &str = "112039";
    /// Tracking Unique Identifier (UIDREF).
    pub const TRACKING_UNIQUE_IDENTIFIER: &str = "112040";
    /// Finding (CODE).
    pub const FINDING: &str = "121071";
    /// Finding Site (CODE).
    pub const FINDING_SITE: &str = "G-C0E3";
}

/// Image-space offset used when a single-point geometry has no pixel module.
pub const FALLBACK_SECOND_POINT_OFFSET: f64 = 10.0;

/// Fraction of the image size used to place a synthesized second point.
pub const SECOND_POINT_SIZE_DIVISOR: f64 = 10.0;

/// Fraction digits written for each `ContourData` value.
pub const CONTOUR_DATA_PRECISION: usize = 2;

/// World-space distance under which a contour's first and last points are
/// considered the same point.
pub const CLOSED_CONTOUR_THRESHOLD: f64 = 1e-2;

/// Root prefix for UUID-derived DICOM UIDs.
pub const UUID_UID_ROOT: &str = "2.25";
