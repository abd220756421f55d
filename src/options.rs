//! Decode and output configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```json
//! { "decode": { "timestamp_policy": "abort" }, "output": { "write_table": false } }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DecodeError;

// ── TimestampPolicy ───────────────────────────────────────────────────────────

/// What to do with a checksum-valid record whose timestamp is not a real
/// calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    /// Drop the record, count it, keep reading.
    #[default]
    Skip,
    /// Stop the file with [`DecodeError::InvalidTimestamp`].
    Abort,
}

// ── DecodeOptions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    pub timestamp_policy: TimestampPolicy,
    /// Stop after this many emitted records.
    pub max_records:      Option<usize>,
}

// ── OutputOptions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    pub output_dir:    PathBuf,
    /// `<base>.his` wave-parameter history.
    pub write_his:     bool,
    /// `<base>_225.csv` extended parameter table.
    pub write_table:   bool,
    /// `<base>_SPT.txt` per-record spectra.
    pub write_spectra: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            output_dir:    PathBuf::from("processed"),
            write_his:     true,
            write_table:   true,
            write_spectra: true,
        }
    }
}

impl OutputOptions {
    pub fn any_enabled(&self) -> bool {
        self.write_his || self.write_table || self.write_spectra
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub decode: DecodeOptions,
    pub output: OutputOptions,
}

impl Config {
    /// Load a JSON config file.  Missing keys take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DecodeError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            DecodeError::Config(format!("reading {}: {e}", path.display()))
        })?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DecodeError> {
        if self.decode.max_records == Some(0) {
            return Err(DecodeError::Config("max_records must be at least 1".into()));
        }
        if !self.output.any_enabled() {
            return Err(DecodeError::Config("every output sink is disabled".into()));
        }
        Ok(())
    }
}
