//! srcodec - DICOM SR TID300 measurement codec
//!
//! Converts between annotation state drawn over medical images and DICOM
//! Structured Report TID300 measurement groups, and exports contour
//! annotations as DICOM `ContourSequence` items.
//!
//! Tools plug in through [`codec::ToolCodec`] and are looked up through a
//! [`codec::ToolCodecRegistry`] built once by the caller.

pub mod codec;
pub mod config;
pub mod constants;
pub mod metadata;
pub mod model;
pub mod sr;

pub use codec::{
    CodecError, DecodeResult, EncodeResult, ToolCodec, ToolCodecRegistry,
    decode_measurement_groups, encode_annotations,
};
pub use config::{CodecConfig, ConfigError, LogLevel};
