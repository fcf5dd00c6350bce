//! Error types for measurement codec operations.

use thiserror::Error;

/// Errors that can occur while decoding, encoding or exporting measurements.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The annotation has no referenced image, so no SR group can point at it
    #[error("{tool_type}: referencedImageId is not defined")]
    MissingReference {
        /// Tool type being encoded
        tool_type: String,
    },

    /// The measurement group lacks content every tool needs
    #[error("Malformed measurement group: {message}")]
    MalformedGroup {
        /// Description of what is missing or wrong
        message: String,
    },

    /// The group references an SOP instance that is not in the image map
    #[error("No image id for referenced SOP instance '{sop_instance_uid}'")]
    UnresolvedImageReference {
        /// The unresolved SOP Instance UID
        sop_instance_uid: String,
    },

    /// A metadata module required for the operation is not available
    #[error("Metadata module '{module}' not available for image '{image_id}'")]
    MissingMetadata {
        /// Module name (e.g. "sopCommonModule")
        module: String,
        /// Image the module was requested for
        image_id: String,
    },

    /// The coordinate mapper has no geometry for an image
    #[error("No image plane known for image '{image_id}'")]
    UnknownImage {
        /// The image id
        image_id: String,
    },

    /// The annotation payload does not belong to the codec it was given to
    #[error("Tool '{tool_type}' cannot handle '{kind}' annotation data")]
    UnsupportedAnnotation {
        /// Tool type of the codec
        tool_type: String,
        /// Payload kind that was found
        kind: String,
    },

    /// No codec is registered for the annotation's tool type
    #[error("No codec registered for tool type '{tool_type}'")]
    UnregisteredTool {
        /// The tool type
        tool_type: String,
    },

    /// Geometry is unusable for the requested operation
    #[error("Invalid geometry: {message}")]
    InvalidGeometry {
        /// Description of the geometry problem
        message: String,
    },

    /// Operation not supported by this tool
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    /// Create a missing reference error for a tool type.
    pub fn missing_reference(tool_type: impl Into<String>) -> Self {
        Self::MissingReference {
            tool_type: tool_type.into(),
        }
    }

    /// Create a malformed group error with a message.
    pub fn malformed_group(message: impl Into<String>) -> Self {
        Self::MalformedGroup {
            message: message.into(),
        }
    }

    /// Create a missing metadata error.
    pub fn missing_metadata(module: impl Into<String>, image_id: impl Into<String>) -> Self {
        Self::MissingMetadata {
            module: module.into(),
            image_id: image_id.into(),
        }
    }

    /// Create an unknown image error.
    pub fn unknown_image(image_id: impl Into<String>) -> Self {
        Self::UnknownImage {
            image_id: image_id.into(),
        }
    }

    /// Create an unsupported annotation error.
    pub fn unsupported_annotation(tool_type: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::UnsupportedAnnotation {
            tool_type: tool_type.into(),
            kind: kind.into(),
        }
    }

    /// Create an invalid geometry error.
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            message: message.into(),
        }
    }

    /// Whether this error is the fatal missing-image-reference case.
    pub fn is_missing_reference(&self) -> bool {
        matches!(self, Self::MissingReference { .. })
    }
}
