//! Split options and their TOML representation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SplitError};

/// Default output file name prefix.
pub const DEFAULT_PREFIX: &str = "AP";

/// Options controlling naming and the synthesized control commands.
///
/// Every field may be omitted from a TOML file:
///
/// ```toml
/// prefix = "part"
/// output_dir = "out"
/// bed_off = true
/// fan_off = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitOptions {
    /// Prefix of every output file name.
    pub prefix: String,
    /// Output directory. Defaults to the input file's directory.
    pub output_dir: Option<PathBuf>,
    /// Skip the slow first layer of resumed segments.
    pub faststart: bool,
    /// Switch the bed off at each pause and reheat on resume.
    pub bed_off: bool,
    /// Switch the hotend off at each pause and reheat on resume.
    pub extruder_off: bool,
    /// Switch the fan off at each pause and back on when resuming.
    pub fan_off: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.into(),
            output_dir: None,
            faststart: false,
            bed_off: false,
            extruder_off: false,
            fan_off: false,
        }
    }
}

impl SplitOptions {
    /// Parse options from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| SplitError::Config(e.to_string()))
    }

    /// Read options from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| SplitError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// True if any pause shutdown command is enabled.
    pub fn any_off(&self) -> bool {
        self.extruder_off || self.bed_off || self.fan_off
    }
}
