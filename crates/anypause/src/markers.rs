//! Recognition of slicer comments inside G-code lines.
//!
//! Two comment conventions are understood:
//!
//! - layer markers such as `;LAYER:12`, `; layer #12` or `;LAYER 12`
//! - slicer settings such as `;Slicer info:material_bed_temperature;60`
//!
//! Matching is case-insensitive and line-local.

use once_cell::sync::Lazy;
use regex::Regex;

static LAYER_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i);\s*LAYER\s*[:#]?\s*([0-9]+)").expect("valid layer regex"));

static SLICER_INFO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i);\s*Slicer info:([^;]+);(.+)").expect("valid slicer info regex")
});

static Z_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[Zz]([-+]?[0-9]*\.?[0-9]+)").expect("valid Z regex"));

/// True if the line contains a layer marker, whatever its number.
pub fn is_layer_marker(line: &str) -> bool {
    LAYER_MARKER.is_match(line)
}

/// Layer number of a marker line.
///
/// Returns `None` for lines without a marker and for numbers that do not
/// fit a `u32`.
pub fn layer_number(line: &str) -> Option<u32> {
    let caps = LAYER_MARKER.captures(line)?;
    caps[1].parse().ok()
}

/// Key and value of a slicer setting comment, both trimmed.
pub fn slicer_setting(line: &str) -> Option<(&str, &str)> {
    let caps = SLICER_INFO.captures(line)?;
    let key = caps.get(1)?.as_str().trim();
    let value = caps.get(2)?.as_str().trim();
    Some((key, value))
}

/// First numeric value following a `Z` axis letter.
pub fn z_value(line: &str) -> Option<&str> {
    Z_VALUE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
