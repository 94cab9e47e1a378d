//! Writing split parts to disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, SplitError};

/// File name of the part at 1-based `ordinal`.
pub fn output_name(prefix: &str, ordinal: usize, input_name: &str) -> String {
    format!("{prefix}{ordinal}_{input_name}")
}

/// Directory receiving the parts: the configured one, else the input's.
pub fn output_dir(configured: Option<&Path>, input: &Path) -> PathBuf {
    if let Some(dir) = configured {
        return dir.to_path_buf();
    }
    std::path::absolute(input)
        .ok()
        .and_then(|abs| abs.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Writes numbered parts into one directory.
#[derive(Debug, Clone)]
pub struct PartWriter {
    dir: PathBuf,
    prefix: String,
    input_name: String,
}

impl PartWriter {
    /// Writer naming parts after `input` inside `dir`.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, input: &Path) -> Result<Self> {
        let input_name = input
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| SplitError::NoFileName(input.to_path_buf()))?
            .to_string();
        Ok(Self {
            dir: dir.into(),
            prefix: prefix.into(),
            input_name,
        })
    }

    /// Path of the part at 1-based `ordinal`.
    pub fn path_for(&self, ordinal: usize) -> PathBuf {
        self.dir
            .join(output_name(&self.prefix, ordinal, &self.input_name))
    }

    /// Create the output directory if needed.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| SplitError::CreateDir {
            path: self.dir.clone(),
            source,
        })
    }

    /// Write one part and return its path.
    pub fn write(&self, ordinal: usize, lines: &[String]) -> Result<PathBuf> {
        let path = self.path_for(ordinal);
        fs::write(&path, lines.concat()).map_err(|source| SplitError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), lines = lines.len(), "wrote part");
        Ok(path)
    }

    /// Write all parts in order. Stops at the first failure; parts already
    /// written stay on disk.
    pub fn write_all(&self, parts: &[Vec<String>]) -> Result<Vec<PathBuf>> {
        self.prepare()?;
        let written = parts
            .iter()
            .enumerate()
            .map(|(i, lines)| self.write(i + 1, lines))
            .collect::<Result<Vec<_>>>()?;
        info!(parts = written.len(), dir = %self.dir.display(), "split files written");
        Ok(written)
    }
}
