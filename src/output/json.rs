//! Gecko profile JSON writer.
//!
//! Writes GeckoProfile documents to JSON files with proper formatting.

use super::gecko::GeckoProfile;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write a Gecko profile to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `profile` - Profile document to write
/// * `output_path` - Path to output JSON file
/// * `pretty` - Indent the output; compact output is much smaller
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let profile = GeckoProfile::new(&info, profiles.values());
/// write_gecko_profile(&profile, "gecko-profile.json", false)?;
/// ```
pub fn write_gecko_profile(
    profile: &GeckoProfile,
    output_path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing Gecko profile to: {}", output_path.display());

    validate_output_path(output_path)?;
    create_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    let serialized = if pretty {
        serde_json::to_writer_pretty(&mut writer, profile)
    } else {
        serde_json::to_writer(&mut writer, profile)
    };
    serialized.map_err(OutputError::SerializationFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "Profile written successfully ({} threads, {} bytes)",
        profile.threads.len(),
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Read a Gecko profile from a JSON file
///
/// **Public** - used by the validate command and tests
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_gecko_profile(input_path: impl AsRef<Path>) -> Result<GeckoProfile, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading Gecko profile from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let profile: GeckoProfile =
        serde_json::from_reader(BufReader::new(file)).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Profile loaded: version {}, {} threads",
        profile.meta.version,
        profile.threads.len()
    );

    Ok(profile)
}

/// Validate that output path is writable
///
/// **Private** - shared with the SVG writer
pub(crate) fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Create parent directories of `path` if they are missing
///
/// **Private** - shared with the SVG writer
pub(crate) fn create_parent_dirs(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
