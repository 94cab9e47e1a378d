//! Optional user-supplied pause/resume code blocks.
//!
//! Each block lives in its own file and is looked up in a fixed list of
//! directories. A block that cannot be found or read is simply empty.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::program::split_lines;

/// Subdirectory searched next to each base directory.
pub const CODEBLOCKS_DIR: &str = "codeblocks";

/// Kinds of scaffold block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaffoldKind {
    /// Inserted at the very start of every resumed segment.
    RestartPrologue1,
    /// Inserted after the reheat commands of every resumed segment.
    RestartPrologue2,
    /// Appended to every segment that is followed by another one.
    PauseEpilogue,
}

impl ScaffoldKind {
    /// All kinds, in prologue-to-epilogue order.
    pub const ALL: [ScaffoldKind; 3] = [
        ScaffoldKind::RestartPrologue1,
        ScaffoldKind::RestartPrologue2,
        ScaffoldKind::PauseEpilogue,
    ];

    /// File name of the block.
    pub fn file_name(self) -> &'static str {
        match self {
            ScaffoldKind::RestartPrologue1 => "restartcode1.gcode",
            ScaffoldKind::RestartPrologue2 => "restartcode2.gcode",
            ScaffoldKind::PauseEpilogue => "pausecode.gcode",
        }
    }
}

/// The three scaffold blocks, as lines with terminators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldBlocks {
    /// Start of every resumed segment.
    pub restart_prologue_1: Vec<String>,
    /// After the reheat commands of every resumed segment.
    pub restart_prologue_2: Vec<String>,
    /// End of every segment that is followed by another one.
    pub pause_epilogue: Vec<String>,
}

impl ScaffoldBlocks {
    /// Block of the given kind.
    pub fn get(&self, kind: ScaffoldKind) -> &[String] {
        match kind {
            ScaffoldKind::RestartPrologue1 => &self.restart_prologue_1,
            ScaffoldKind::RestartPrologue2 => &self.restart_prologue_2,
            ScaffoldKind::PauseEpilogue => &self.pause_epilogue,
        }
    }

    fn slot(&mut self, kind: ScaffoldKind) -> &mut Vec<String> {
        match kind {
            ScaffoldKind::RestartPrologue1 => &mut self.restart_prologue_1,
            ScaffoldKind::RestartPrologue2 => &mut self.restart_prologue_2,
            ScaffoldKind::PauseEpilogue => &mut self.pause_epilogue,
        }
    }

    /// Load every block from the first existing candidate location.
    pub fn discover(search: &ScaffoldSearch) -> Self {
        let mut blocks = Self::default();
        for kind in ScaffoldKind::ALL {
            if let Some(path) = search.locate(kind) {
                *blocks.slot(kind) = read_optional(&path);
            } else {
                debug!(file = kind.file_name(), "no scaffold block found");
            }
        }
        blocks
    }
}

/// Ordered base directories in which scaffold files are looked up.
///
/// Each base directory is tried directly and through its
/// [`CODEBLOCKS_DIR`] subdirectory.
#[derive(Debug, Clone, Default)]
pub struct ScaffoldSearch {
    explicit: Option<PathBuf>,
    bases: Vec<PathBuf>,
}

impl ScaffoldSearch {
    /// Search next to the running executable, then next to the input.
    pub fn for_input(input: &Path) -> Self {
        let mut bases = Vec::new();
        if let Some(dir) = tool_dir() {
            bases.push(dir);
        }
        if let Some(dir) = input_dir(input) {
            bases.push(dir);
        }
        Self {
            explicit: None,
            bases,
        }
    }

    /// Search only the given base directories.
    pub fn with_bases(bases: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            explicit: None,
            bases: bases.into_iter().collect(),
        }
    }

    /// Try `dir` before any other location.
    pub fn prefer_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.explicit = Some(dir.into());
        self
    }

    /// Candidate paths for a block, in lookup order.
    pub fn candidates(&self, kind: ScaffoldKind) -> Vec<PathBuf> {
        let name = kind.file_name();
        let explicit = self.explicit.iter().map(|dir| dir.join(name));
        let defaults = self
            .bases
            .iter()
            .flat_map(|base| [base.join(name), base.join(CODEBLOCKS_DIR).join(name)]);
        explicit.chain(defaults).collect()
    }

    /// First existing candidate for a block.
    pub fn locate(&self, kind: ScaffoldKind) -> Option<PathBuf> {
        let found = self.candidates(kind).into_iter().find(|p| p.exists());
        if let Some(path) = &found {
            debug!(path = %path.display(), "using scaffold block");
        }
        found
    }
}

fn tool_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}

fn input_dir(input: &Path) -> Option<PathBuf> {
    let abs = std::path::absolute(input).ok()?;
    abs.parent().map(Path::to_path_buf)
}

/// Lines of a scaffold block. The last line is always terminated so
/// whatever follows the block starts on a line of its own.
pub fn block_lines(text: &str) -> Vec<String> {
    let mut lines = split_lines(text);
    if let Some(last) = lines.last_mut() {
        if !last.ends_with('\n') {
            last.push('\n');
        }
    }
    lines
}

fn read_optional(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(text) => block_lines(&text),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "scaffold block unreadable");
            Vec::new()
        }
    }
}
