//! Command-line driver for the SR codec.
//!
//! ```text
//! sr-codec decode   <groups.json>      <metadata.json> [--config config.json]
//! sr-codec encode   <annotations.json> <metadata.json> [--config config.json]
//! sr-codec contours <annotations.json> <metadata.json> [--config config.json]
//! ```
//!
//! Results are printed to stdout as pretty JSON.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;

use srcodec::codec::tools::PlanarFreehandContourSegmentationTool;
use srcodec::codec::{CodecError, ToolCodecRegistry, decode_measurement_groups, encode_annotations};
use srcodec::config::{CodecConfig, ConfigError, LogLevel};
use srcodec::metadata::{ImagePlaneMapper, InMemoryMetadata};
use srcodec::model::Annotation;
use srcodec::sr::{ContourSequenceItem, MeasurementGroup};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser)]
#[command(name = "sr-codec")]
#[command(about = "Decode and encode DICOM SR TID300 measurements", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode measurement groups into annotations
    Decode {
        /// JSON array of measurement groups
        input: PathBuf,
        /// Image metadata table
        metadata: PathBuf,
        /// Codec configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Encode annotations into TID300 arguments
    Encode {
        /// JSON array of annotations
        input: PathBuf,
        /// Image metadata table
        metadata: PathBuf,
        /// Codec configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Export contour sequences of contour annotations
    Contours {
        /// JSON array of annotations
        input: PathBuf,
        /// Image metadata table
        metadata: PathBuf,
        /// Codec configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Command {
    fn paths(&self) -> (&Path, &Path, Option<&Path>) {
        match self {
            Command::Decode {
                input,
                metadata,
                config,
            }
            | Command::Encode {
                input,
                metadata,
                config,
            }
            | Command::Contours {
                input,
                metadata,
                config,
            } => (input.as_path(), metadata.as_path(), config.as_deref()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContourExport {
    annotation_uid: String,
    contour_sequence: Vec<ContourSequenceItem>,
}

/// Install the logger; `RUST_LOG` overrides the configured level.
fn init_logging(level: LogLevel) {
    env_logger::Builder::new()
        .filter_level(level.into())
        .parse_env("RUST_LOG")
        .init();
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn build_registry(config: &CodecConfig) -> ToolCodecRegistry {
    let mut registry = ToolCodecRegistry::with_builtin_tools();
    registry.register(Box::new(PlanarFreehandContourSegmentationTool::new(
        config.contour_tool.clone(),
    )));
    registry
}

fn export_contours(
    registry: &ToolCodecRegistry,
    annotations: &[Annotation],
    metadata: &InMemoryMetadata,
) -> Result<Vec<ContourExport>, CodecError> {
    let mut exports = Vec::new();
    for annotation in annotations {
        let Some(codec) = registry.get(annotation.tool_name()) else {
            log::warn!("No codec for tool type {}", annotation.tool_name());
            continue;
        };
        if !codec.supports_contour_export() {
            log::debug!("{} does not export contours", codec.tool_type());
            continue;
        }
        exports.push(ContourExport {
            annotation_uid: annotation.annotation_uid.clone(),
            contour_sequence: codec.contour_sequence(annotation, metadata)?,
        });
    }
    Ok(exports)
}

fn run(command: &Command) -> Result<String, CliError> {
    let (input_path, metadata_path, config_path) = command.paths();

    let config = match config_path {
        Some(path) => CodecConfig::load(path)?,
        None => CodecConfig::default(),
    };
    init_logging(config.log_level);

    let metadata = InMemoryMetadata::from_json(&read_file(metadata_path)?)?;
    let mapper = ImagePlaneMapper::from_provider(&metadata, metadata.image_ids());
    let registry = build_registry(&config);
    let input = read_file(input_path)?;

    let output = match command {
        Command::Decode { .. } => {
            let groups: Vec<MeasurementGroup> = serde_json::from_str(&input)?;
            let result = decode_measurement_groups(
                &registry,
                &groups,
                &metadata.sop_instance_uid_map(),
                &mapper,
                &metadata,
            );
            serde_json::to_string_pretty(&result)?
        }
        Command::Encode { .. } => {
            let annotations: Vec<Annotation> = serde_json::from_str(&input)?;
            let result = encode_annotations(&registry, &annotations, &mapper)?;
            serde_json::to_string_pretty(&result)?
        }
        Command::Contours { .. } => {
            let annotations: Vec<Annotation> = serde_json::from_str(&input)?;
            let exports = export_contours(&registry, &annotations, &metadata)?;
            serde_json::to_string_pretty(&exports)?
        }
    };

    Ok(output)
}

fn main() {
    let cli = Cli::parse();
    match run(&cli.command) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("sr-codec: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decode_with_config() {
        let cli = Cli::try_parse_from([
            "sr-codec",
            "decode",
            "groups.json",
            "meta.json",
            "--config",
            "codec.json",
        ])
        .unwrap();

        assert!(matches!(cli.command, Command::Decode { .. }));
        let (input, metadata, config) = cli.command.paths();
        assert_eq!(input, Path::new("groups.json"));
        assert_eq!(metadata, Path::new("meta.json"));
        assert_eq!(config, Some(Path::new("codec.json")));
    }

    #[test]
    fn test_parse_contours_without_config() {
        let cli = Cli::try_parse_from(["sr-codec", "contours", "a.json", "meta.json"]).unwrap();

        assert!(matches!(cli.command, Command::Contours { .. }));
        assert_eq!(cli.command.paths().2, None);
    }

    #[test]
    fn test_parse_rejects_bad_arguments() {
        assert!(Cli::try_parse_from(["sr-codec", "convert", "a.json", "meta.json"]).is_err());
        assert!(Cli::try_parse_from(["sr-codec", "encode", "a.json"]).is_err());
        assert!(Cli::try_parse_from(["sr-codec", "encode", "a.json", "m.json", "extra"]).is_err());
    }
}
