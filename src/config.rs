//! Configuration loading.
//!
//! Both tools read a single TOML file (default `config.toml`) once at
//! startup. Each tool gets one immutable config value that is passed down
//! explicitly; nothing reads configuration ad hoc after startup.
//!
//! The `[format]` section keeps the PascalCase key names of the original
//! config surface (`InputFile`, `MaxLength`, ...).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    diff: Option<DiffConfig>,
    format: Option<FormatConfig>,
}

impl ConfigFile {
    /// The `[diff]` section, required by tracklist-diff.
    pub fn diff(self) -> Result<DiffConfig> {
        self.diff
            .ok_or_else(|| Error::Config("missing [diff] section".to_string()))
    }

    /// The `[format]` section, required by tracklist-format.
    pub fn format(self) -> Result<FormatConfig> {
        self.format
            .ok_or_else(|| Error::Config("missing [format] section".to_string()))
    }
}

/// Settings for the fuzzy differ.
#[derive(Debug, Clone, Deserialize)]
pub struct DiffConfig {
    pub main_file: PathBuf,
    pub new_file: PathBuf,
    pub similarity_threshold: u32,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default)]
    pub debug_mode: bool,
    #[serde(default = "default_true")]
    pub strip_leading_numbers: bool,
    #[serde(default)]
    pub save_csv: bool,
    /// 0 = all cores minus one, 1 = sequential, >1 = capped at 8.
    /// Unparseable values fall back to 1 rather than aborting.
    #[serde(default = "default_thread_cap", deserialize_with = "lenient_thread_cap")]
    pub thread_cap: usize,
}

/// Settings for the tracklist formatter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FormatConfig {
    pub input_file: PathBuf,
    pub prefix: i64,
    pub max_length: usize,
    pub sort_option: String,
    pub remove_prefix: bool,
    pub replace_separator: bool,
    #[serde(default)]
    pub replace_with: String,
    #[serde(default)]
    pub blocklist_file: Option<PathBuf>,
    #[serde(default = "default_separators")]
    pub separators: String,
    #[serde(default)]
    pub debug: bool,
    #[serde(rename = "SaveAsCSV", default)]
    pub save_as_csv: bool,
}

impl FormatConfig {
    /// Candidate artist/title separators in configured order. The order is a
    /// deliberate tie-break policy: the first separator found in a track
    /// line wins.
    pub fn separator_list(&self) -> Vec<String> {
        self.separators
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// `ReplaceWith` with surrounding double quotes stripped, so separators
    /// with significant leading/trailing spaces can be configured.
    pub fn replacement(&self) -> &str {
        let raw = self.replace_with.as_str();
        raw.strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(raw)
    }
}

fn default_sort_by() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

fn default_thread_cap() -> usize {
    1
}

fn default_separators() -> String {
    "·,•,‧,⋅,-".to_string()
}

fn lenient_thread_cap<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Int(n) if n >= 0 => n as usize,
        Raw::Int(_) => 1,
        Raw::Text(s) => s.trim().parse().unwrap_or(1),
    })
}

/// Load and parse the config file. Fatal on missing file or malformed TOML.
pub fn load(path: &Path) -> Result<ConfigFile> {
    let text = fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
}
