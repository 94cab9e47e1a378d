//! Slicer settings and layer positions extracted from a program.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::markers;
use crate::program::GcodeProgram;

/// Slicer key for the nozzle temperature.
pub const PRINT_TEMPERATURE: &str = "material_print_temperature";
/// Slicer key for the first-layer nozzle temperature.
pub const PRINT_TEMPERATURE_LAYER_0: &str = "material_print_temperature_layer_0";
/// Slicer key for the bed temperature.
pub const BED_TEMPERATURE: &str = "material_bed_temperature";
/// Slicer key for the first-layer bed temperature.
pub const BED_TEMPERATURE_LAYER_0: &str = "material_bed_temperature_layer_0";

/// Settings the slicer embedded as `Slicer info` comments.
///
/// A key seen more than once keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlicerInfo {
    values: HashMap<String, String>,
}

impl SlicerInfo {
    /// Record a setting, replacing any earlier value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Raw value of a key. Empty values read as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Number of recorded settings.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no settings were recorded.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// General nozzle temperature.
    pub fn nozzle_temp(&self) -> Option<&str> {
        self.get(PRINT_TEMPERATURE)
    }

    /// First-layer nozzle temperature.
    pub fn nozzle_temp_layer0(&self) -> Option<&str> {
        self.get(PRINT_TEMPERATURE_LAYER_0)
    }

    /// General bed temperature.
    pub fn bed_temp(&self) -> Option<&str> {
        self.get(BED_TEMPERATURE)
    }

    /// First-layer bed temperature.
    pub fn bed_temp_layer0(&self) -> Option<&str> {
        self.get(BED_TEMPERATURE_LAYER_0)
    }

    /// Nozzle temperature to reheat to: first-layer value, else general.
    pub fn reheat_nozzle_temp(&self) -> Option<&str> {
        self.nozzle_temp_layer0().or_else(|| self.nozzle_temp())
    }

    /// Bed temperature to reheat to: first-layer value, else general.
    pub fn reheat_bed_temp(&self) -> Option<&str> {
        self.bed_temp_layer0().or_else(|| self.bed_temp())
    }
}

/// Line index of the first marker of each requested layer that was found.
pub type LayerIndex = BTreeMap<u32, usize>;

/// Result of scanning a program once.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Slicer settings.
    pub slicer_info: SlicerInfo,
    /// Positions of the requested layers that were found.
    pub layers: LayerIndex,
    /// Requested layers without a marker, ascending.
    pub missing: Vec<u32>,
}

/// Scan the program once for slicer settings and requested layer markers.
///
/// Duplicate requests collapse. Only the first marker of each requested
/// layer counts.
pub fn extract(program: &GcodeProgram, requested: &[u32]) -> Extraction {
    let requested: BTreeSet<u32> = requested.iter().copied().collect();
    let mut slicer_info = SlicerInfo::default();
    let mut layers = LayerIndex::new();

    for (idx, line) in program.lines().iter().enumerate() {
        if let Some((key, value)) = markers::slicer_setting(line) {
            slicer_info.insert(key, value);
        }
        if let Some(layer) = markers::layer_number(line) {
            if requested.contains(&layer) {
                layers.entry(layer).or_insert(idx);
            }
        }
    }

    let missing = requested
        .iter()
        .copied()
        .filter(|layer| !layers.contains_key(layer))
        .collect();

    Extraction {
        slicer_info,
        layers,
        missing,
    }
}
