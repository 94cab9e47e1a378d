#![warn(missing_docs)]

//! Split slicer G-code into independently printable parts.
//!
//! A program is cut at the first marker of each requested layer. Every part
//! after the first resumes the print: it reheats, returns to its print height
//! and optionally prints its first layer slowly. Every part before the last
//! ends with optional heater/fan shutdown commands and a pause block, so a
//! filament or color change can happen between parts.
//!
//! # Example
//!
//! ```ignore
//! use anypause::{split_file, ScaffoldBlocks, ScaffoldSearch, SplitOptions};
//! use std::path::Path;
//!
//! let input = Path::new("benchy.gcode");
//! let scaffold = ScaffoldBlocks::discover(&ScaffoldSearch::for_input(input));
//! let options = SplitOptions { fan_off: true, ..Default::default() };
//!
//! let report = split_file(input, &[12, 40], &options, &scaffold)?;
//! for path in &report.written {
//!     println!("{}", path.display());
//! }
//! ```

pub mod commands;
pub mod error;
pub mod markers;
pub mod options;
pub mod output;
pub mod params;
pub mod program;
pub mod scaffold;
pub mod segment;
pub mod split;
pub mod synth;

pub use commands::ControlCommand;
pub use error::{Result, SplitError};
pub use options::{SplitOptions, DEFAULT_PREFIX};
pub use output::PartWriter;
pub use params::{extract, Extraction, LayerIndex, SlicerInfo};
pub use program::GcodeProgram;
pub use scaffold::{block_lines, ScaffoldBlocks, ScaffoldKind, ScaffoldSearch};
pub use segment::{segments, Segment, SegmentRole};
pub use split::{plan, split_file, write_parts, SplitPlan, SplitReport};
pub use synth::Synthesizer;
