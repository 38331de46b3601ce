use crate::interner::Category;
use crate::output::read_gecko_profile;
use crate::parser::JsonSampleReader;
use crate::utils::config::GECKO_PROFILE_VERSION;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Open the decoded sample stream, `-` meaning stdin
pub fn open_samples(input: &Path, leaf_first: bool) -> Result<JsonSampleReader<Box<dyn Read>>> {
    let reader: Box<dyn Read> = if input.as_os_str() == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(input)
            .with_context(|| format!("Failed to open sample file {}", input.display()))?;
        Box::new(BufReader::new(file))
    };
    Ok(JsonSampleReader::new(reader).with_leaf_first(leaf_first))
}

/// Validate a Gecko profile JSON file
pub fn validate_profile_file(file_path: PathBuf) -> Result<()> {
    println!("Validating profile: {}", file_path.display());

    let profile = read_gecko_profile(&file_path)?;

    if profile.meta.version != GECKO_PROFILE_VERSION {
        anyhow::bail!(
            "Unsupported Gecko profile version {} (expected {})",
            profile.meta.version,
            GECKO_PROFILE_VERSION
        );
    }

    println!("✓ Valid Gecko profile JSON");
    println!("  Version: {}", profile.meta.version);
    println!("  Product: {}", profile.meta.product.as_deref().unwrap_or("-"));
    println!("  Threads: {}", profile.threads.len());
    println!("  Samples: {}", profile.total_samples());
    for thread in &profile.threads {
        println!(
            "    {:>8} {:<24} {:>8} samples {:>6} frames {:>6} stacks",
            thread.tid,
            thread.name,
            thread.samples.data.len(),
            thread.frame_table.data.len(),
            thread.stack_table.data.len()
        );
    }

    Ok(())
}

/// Display the frame category table
pub fn display_categories() {
    println!("Frame categories (ordinal, name, color):");
    for category in Category::ALL {
        println!(
            "  {}  {:<8} {}",
            category.ordinal(),
            category.name(),
            category.color()
        );
    }
}

/// Display version information
pub fn display_version() {
    println!("Perf Trace Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Gecko Profile Format: v{}", GECKO_PROFILE_VERSION);
    println!();
    println!("Flamegraphs and Gecko profiles from CPU sampling captures.");
}
