//! Detect command handler.

use super::exit_codes;
use crate::parsers::{Sniffer, MAX_SBOM_FILE_SIZE};
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Print the detected format triple of one file
pub fn run_detect(path: &Path, json: bool) -> Result<i32> {
    let size = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();
    if size > MAX_SBOM_FILE_SIZE {
        bail!("{} is {size} bytes, larger than the {MAX_SBOM_FILE_SIZE} byte limit", path.display());
    }

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let (_, triple) = Sniffer::new()
        .detect_reader(&mut BufReader::new(file))
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&triple)?);
    } else {
        println!("{}: {triple}", path.display());
    }

    if triple.is_known() {
        Ok(exit_codes::SUCCESS)
    } else {
        tracing::error!(path = %path.display(), "unrecognized SBOM format");
        Ok(exit_codes::PARSE_FAILED)
    }
}
