//! Input path expansion

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Default input when neither arguments nor config name any files
pub const DEFAULT_INPUT_PATTERN: &str = "DEX-files/*.log";

fn is_glob_pattern(input: &str) -> bool {
    input.contains(|c: char| matches!(c, '*' | '?' | '['))
}

/// Expand files and glob patterns into a list of paths
///
/// Patterns expand in alphabetical order; a pattern matching nothing is only
/// warned about. Plain paths are passed through unchecked so that missing
/// files are reported by the batch.
pub fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        if !is_glob_pattern(input) {
            paths.push(PathBuf::from(input));
            continue;
        }

        let entries = glob::glob(input).with_context(|| format!("Invalid glob pattern: {}", input))?;
        let before = paths.len();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(_) => {}
                Err(e) => log::warn!("Cannot read {:?}: {}", e.path(), e.error()),
            }
        }

        let matched = paths.len() - before;
        if matched == 0 {
            log::warn!("No files match pattern: {}", input);
        } else {
            log::debug!("Pattern {} matched {} file(s)", input, matched);
        }
    }

    Ok(paths)
}
