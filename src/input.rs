//! Input file reading.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashSet;

use crate::error::{Error, Result};

/// Read a text file as trimmed, non-empty lines in file order.
pub fn read_trimmed_lines(path: &Path) -> Result<Vec<String>> {
    let text = read_verbatim(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}

/// Read a file's entire contents (header/footer text is used verbatim).
pub fn read_verbatim(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the blocklist as a set of lowercased artist names.
/// The blocklist is optional: a missing path yields an empty set.
pub fn load_blocklist(path: Option<&Path>) -> Result<FxHashSet<String>> {
    let Some(path) = path else {
        return Ok(FxHashSet::default());
    };
    if !path.exists() {
        return Ok(FxHashSet::default());
    }
    Ok(read_trimmed_lines(path)?
        .into_iter()
        .map(|l| l.to_lowercase())
        .collect())
}
