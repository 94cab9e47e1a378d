//! Loaded G-code programs.

use std::fs;
use std::ops::Range;
use std::path::Path;

use crate::error::{Result, SplitError};

/// A G-code program as an immutable sequence of lines.
///
/// Every line keeps its original terminator, so concatenating
/// [`lines`](Self::lines) reproduces the source text byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GcodeProgram {
    lines: Vec<String>,
}

impl GcodeProgram {
    /// Build a program from in-memory text.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: split_lines(text),
        }
    }

    /// Read a program from disk.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SplitError::InputNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| SplitError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_text(&text))
    }

    /// All lines, terminators included.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines in the half-open range.
    pub fn slice(&self, range: Range<usize>) -> &[String] {
        &self.lines[range]
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True if the program has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Split text into lines that keep their `\n` terminator.
pub(crate) fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_owned).collect()
}
