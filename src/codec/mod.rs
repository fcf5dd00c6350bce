//! Measurement codec: annotations ⇄ TID300 measurement groups.
//!
//! This module provides:
//! - [`ToolCodec`] trait implemented once per tool type
//! - [`ToolCodecRegistry`] mapping tool types (and tracking identifiers) to codecs
//! - [`setup_measurement`] extracting what every tool needs from a group
//! - [`decode_measurement_groups`] / [`encode_annotations`] for whole reports
//! - [`CodecError`] for error handling
//!
//! # Example
//!
//! ```ignore
//! use srcodec::codec::{ToolCodecRegistry, decode_measurement_groups};
//!
//! let registry = ToolCodecRegistry::with_builtin_tools();
//! let result = decode_measurement_groups(&registry, &groups, &map, &mapper, &metadata);
//! ```

mod error;
mod events;
mod registry;
mod report;
mod setup;
pub mod tools;
mod tracking;
mod traits;

pub use error::CodecError;
pub use events::{SegmentationEvent, SegmentationEventSink};
pub use registry::ToolCodecRegistry;
pub use report::{
    CodecWarning, DecodeResult, EncodeResult, EncodedGroup, WarningSeverity,
    decode_measurement_groups, encode_annotations,
};
pub use setup::{MeasurementSetup, setup_measurement};
pub use tracking::{
    TrackingIdentifier, engine_tool_type, is_valid_tracking_identifier, tracking_identifier,
};
pub use traits::{DecodeContext, ToolCodec};
