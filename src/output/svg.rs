//! SVG flamegraph and HTML report writer.
//!
//! Writes rendered flamegraph content to files with proper encoding.

use super::json::{create_parent_dirs, validate_output_path};
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write SVG content to a file
///
/// **Public** - main entry point for SVG output
///
/// # Example
/// ```ignore
/// let svg = render_thread_svg(&tree, &config)?;
/// write_svg(&svg, "flamegraph.svg")?;
/// ```
pub fn write_svg(svg_content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    warn_on_extension(output_path, "svg");
    write_text(svg_content, output_path, "SVG")
}

/// Write an HTML flamegraph report to a file
///
/// **Public** - used by the flamegraph command
pub fn write_report(html_content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    warn_on_extension(output_path, "html");
    write_text(html_content, output_path, "Report")
}

/// **Private** - shared write path
fn write_text(content: &str, output_path: &Path, kind: &str) -> Result<(), OutputError> {
    info!("Writing {} to: {}", kind, output_path.display());

    validate_output_path(output_path)?;
    create_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(content.as_bytes())
        .map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    let file_size = content.len();
    info!(
        "{} written successfully ({} bytes, {:.2} KB)",
        kind,
        file_size,
        file_size as f64 / 1024.0
    );

    Ok(())
}

fn warn_on_extension(path: &Path, expected: &str) {
    if let Some(ext) = path.extension() {
        if ext != expected {
            debug!(
                "Warning: File does not have .{} extension: {}",
                expected,
                path.display()
            );
        }
    }
}
