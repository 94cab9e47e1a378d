//! End-to-end split of a G-code program.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, SplitError};
use crate::options::SplitOptions;
use crate::output::{output_dir, PartWriter};
use crate::params::{extract, SlicerInfo};
use crate::program::GcodeProgram;
use crate::scaffold::ScaffoldBlocks;
use crate::segment::{segments, Segment};
use crate::synth::Synthesizer;

/// In-memory result of splitting a program.
#[derive(Debug, Clone)]
pub struct SplitPlan {
    /// Slicer settings found in the program.
    pub slicer_info: SlicerInfo,
    /// Requested layers without a marker, ascending.
    pub missing: Vec<u32>,
    /// Segments of the source program.
    pub segments: Vec<Segment>,
    /// Output lines of each segment, in order.
    pub parts: Vec<Vec<String>>,
}

/// Outcome of [`split_file`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    /// Requested layers without a marker, ascending.
    pub missing: Vec<u32>,
    /// Paths written, in part order.
    pub written: Vec<PathBuf>,
}

/// Split an in-memory program at the requested layers.
pub fn plan(
    program: &GcodeProgram,
    layers: &[u32],
    options: &SplitOptions,
    scaffold: &ScaffoldBlocks,
) -> Result<SplitPlan> {
    if layers.is_empty() {
        return Err(SplitError::NoLayers);
    }

    let extraction = extract(program, layers);
    if !extraction.missing.is_empty() {
        warn!(missing = ?extraction.missing, "layer markers not found");
    }

    let segments = segments(&extraction.layers, program.len());
    debug!(
        segments = segments.len(),
        settings = extraction.slicer_info.len(),
        "program segmented"
    );

    let synth = Synthesizer {
        program,
        options,
        slicer_info: &extraction.slicer_info,
        scaffold,
    };
    let parts = synth.synthesize_all(&segments);

    Ok(SplitPlan {
        slicer_info: extraction.slicer_info,
        missing: extraction.missing,
        segments,
        parts,
    })
}

/// Read `input`, split it and write every part.
///
/// Nothing is written when the input cannot be read.
pub fn split_file(
    input: &Path,
    layers: &[u32],
    options: &SplitOptions,
    scaffold: &ScaffoldBlocks,
) -> Result<SplitReport> {
    let program = GcodeProgram::load(input)?;
    info!(input = %input.display(), lines = program.len(), "loaded program");

    let plan = plan(&program, layers, options, scaffold)?;
    let written = write_parts(&plan, input, options)?;

    Ok(SplitReport {
        missing: plan.missing,
        written,
    })
}

/// Write the parts of `plan` as configured, named after `input`.
pub fn write_parts(
    plan: &SplitPlan,
    input: &Path,
    options: &SplitOptions,
) -> Result<Vec<PathBuf>> {
    let dir = output_dir(options.output_dir.as_deref(), input);
    let writer = PartWriter::new(dir, options.prefix.as_str(), input)?;
    writer.write_all(&plan.parts)
}
