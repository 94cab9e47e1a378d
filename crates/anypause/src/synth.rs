//! Per-segment output synthesis.
//!
//! The first segment is emitted verbatim. Every later segment is a resumed
//! print: it gets a reheat prologue, a move back to its print height and an
//! optional slow first layer. Every segment followed by another one ends
//! with the pause shutdown commands and the pause epilogue.

use rayon::prelude::*;

use crate::commands::{render, ControlCommand};
use crate::markers;
use crate::options::SplitOptions;
use crate::params::SlicerInfo;
use crate::program::GcodeProgram;
use crate::scaffold::ScaffoldBlocks;
use crate::segment::{Segment, SegmentRole};

/// Lines to insert before a body position.
type Insertion = (usize, Vec<String>);

/// Builds the output lines of each segment.
///
/// Holds only shared references; synthesis never mutates its inputs.
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer<'a> {
    /// Source program.
    pub program: &'a GcodeProgram,
    /// Split options.
    pub options: &'a SplitOptions,
    /// Slicer settings of the program.
    pub slicer_info: &'a SlicerInfo,
    /// Scaffold blocks.
    pub scaffold: &'a ScaffoldBlocks,
}

impl<'a> Synthesizer<'a> {
    /// Output lines of the segment at 1-based `ordinal` out of `count`.
    pub fn synthesize(&self, segment: Segment, ordinal: usize, count: usize) -> Vec<String> {
        let role = SegmentRole::of(ordinal, count);
        let body = self.program.slice(segment.range());

        let mut out = if role.is_first() {
            body.to_vec()
        } else {
            self.resume(body)
        };

        if !role.is_last() {
            out.extend(pause_commands(self.options));
            out.extend(self.scaffold.pause_epilogue.iter().cloned());
        }
        out
    }

    /// Output lines of every segment, in order.
    pub fn synthesize_all(&self, segments: &[Segment]) -> Vec<Vec<String>> {
        let count = segments.len();
        segments
            .par_iter()
            .enumerate()
            .map(|(i, &segment)| self.synthesize(segment, i + 1, count))
            .collect()
    }

    fn resume(&self, body: &[String]) -> Vec<String> {
        let region_end = first_layer_end(body);
        let z_start = body.iter().find_map(|line| markers::z_value(line));

        let mut prefix = Vec::new();
        if let Some(z) = z_start {
            prefix.push(ControlCommand::RestoreZ(z));
        }

        let mut insertions: Vec<Insertion> = Vec::new();
        let resets = self.temperature_resets();
        if !resets.is_empty() {
            insertions.push((region_end, render(&resets)));
        }

        if !self.options.faststart {
            prefix.push(ControlCommand::SlowStartFan);
            prefix.push(ControlCommand::SlowStartFeed);
            let restore_at = region_end + prefix.len();
            if restore_at <= body.len() {
                insertions.push((
                    restore_at,
                    render(&[ControlCommand::RestoreFeed, ControlCommand::RestoreFan]),
                ));
            }
        }

        let mut out = self.prologue();
        out.push(ControlCommand::Blank.to_line());
        out.extend(render(&prefix));
        out.extend(splice(body, insertions));
        out
    }

    fn prologue(&self) -> Vec<String> {
        let mut lines = self.scaffold.restart_prologue_1.clone();
        if self.options.fan_off {
            let at = lines.len().saturating_sub(1);
            lines.insert(at, ControlCommand::FanOn.to_line());
        }

        let mut reheat = Vec::new();
        if self.options.bed_off {
            if let Some(t) = self.slicer_info.reheat_bed_temp() {
                reheat.extend([
                    ControlCommand::Blank,
                    ControlCommand::HeatBed(t),
                    ControlCommand::Dwell,
                    ControlCommand::WaitBed(t),
                ]);
            }
        }
        if self.options.extruder_off {
            if let Some(t) = self.slicer_info.reheat_nozzle_temp() {
                reheat.extend([
                    ControlCommand::Blank,
                    ControlCommand::HeatHotend(t),
                    ControlCommand::WaitHotend(t),
                ]);
            }
        }
        lines.extend(render(&reheat));
        lines.extend(self.scaffold.restart_prologue_2.iter().cloned());
        lines
    }

    /// Commands returning to general temperatures after the first layer.
    fn temperature_resets(&self) -> Vec<ControlCommand<'a>> {
        let info = self.slicer_info;
        let mut resets = Vec::new();
        if let (Some(general), Some(first)) = (info.nozzle_temp(), info.nozzle_temp_layer0()) {
            if general != first {
                resets.push(ControlCommand::ResetNozzle(general));
            }
        }
        if let (Some(general), Some(first)) = (info.bed_temp(), info.bed_temp_layer0()) {
            if general != first {
                resets.push(ControlCommand::ResetBed(general));
            }
        }
        resets
    }
}

/// Shutdown block appended before the pause epilogue.
fn pause_commands(options: &SplitOptions) -> Vec<String> {
    if !options.any_off() {
        return Vec::new();
    }
    let mut commands = vec![ControlCommand::Blank];
    if options.extruder_off {
        commands.push(ControlCommand::ExtruderOff);
    }
    if options.bed_off {
        commands.push(ControlCommand::BedOff);
    }
    if options.fan_off {
        commands.push(ControlCommand::FanOff);
    }
    commands.push(ControlCommand::Blank);
    render(&commands)
}

/// Index of the first layer marker after the body's first line, or the
/// body length if the body spans a single layer.
fn first_layer_end(body: &[String]) -> usize {
    body.iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| markers::is_layer_marker(line))
        .map_or(body.len(), |(i, _)| i)
}

/// Rebuild `body` with each insertion placed before its position.
///
/// Positions refer to the unmodified body. Insertions at the same position
/// keep their given order.
fn splice(body: &[String], mut insertions: Vec<Insertion>) -> Vec<String> {
    insertions.sort_by_key(|(at, _)| *at);
    let extra: usize = insertions.iter().map(|(_, lines)| lines.len()).sum();
    let mut out = Vec::with_capacity(body.len() + extra);
    let mut cursor = 0;
    for (at, lines) in insertions {
        out.extend_from_slice(&body[cursor..at]);
        out.extend(lines);
        cursor = at;
    }
    out.extend_from_slice(&body[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::extract;
    use crate::scaffold::block_lines;
    use crate::segment::segments;

    const TEMPS: &str = "\
;Slicer info:material_print_temperature;200
;Slicer info:material_print_temperature_layer_0;210
;Slicer info:material_bed_temperature;60
;Slicer info:material_bed_temperature_layer_0;65
";

    /// Program with layers 0-3; layers 1 and 2 have six lines each.
    fn program(header: &str) -> GcodeProgram {
        let mut text = String::from(header);
        text.push_str("G28\n;LAYER:0\nG1 Z0.2 F600\nG1 X10 E1\n");
        for (layer, z) in [(1, "0.4"), (2, "0.6")] {
            text.push_str(&format!(";LAYER:{layer}\nG1 Z{z}\n"));
            for x in 0..4 {
                text.push_str(&format!("G1 X{}{x} E{x}\n", layer + 1));
            }
        }
        text.push_str(";LAYER:3\nG1 Z0.8\nG1 X40 E10\nM107\n");
        GcodeProgram::from_text(&text)
    }

    fn split(
        program: &GcodeProgram,
        layers: &[u32],
        options: &SplitOptions,
        scaffold: &ScaffoldBlocks,
    ) -> (Vec<Segment>, Vec<Vec<String>>) {
        let extraction = extract(program, layers);
        let segs = segments(&extraction.layers, program.len());
        let synth = Synthesizer {
            program,
            options,
            slicer_info: &extraction.slicer_info,
            scaffold,
        };
        let outputs = synth.synthesize_all(&segs);
        (segs, outputs)
    }

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_segment_is_verbatim() {
        let program = program(TEMPS);
        let options = SplitOptions {
            bed_off: true,
            fan_off: true,
            ..Default::default()
        };
        let scaffold = ScaffoldBlocks {
            pause_epilogue: lines(&["M0\n"]),
            ..Default::default()
        };
        let (segs, outputs) = split(&program, &[42], &options, &scaffold);
        assert_eq!(segs.len(), 1);
        assert_eq!(outputs, vec![program.lines().to_vec()]);
    }

    #[test]
    fn test_bodies_partition_program() {
        let program = program(TEMPS);
        let extraction = extract(&program, &[1, 2, 3]);
        let segs = segments(&extraction.layers, program.len());
        assert_eq!(segs.len(), 4);
        let rebuilt: Vec<String> = segs
            .iter()
            .flat_map(|s| program.slice(s.range()).to_vec())
            .collect();
        assert_eq!(rebuilt, program.lines());
    }

    #[test]
    fn test_first_segment_gets_epilogue() {
        let program = program("");
        let scaffold = ScaffoldBlocks {
            pause_epilogue: lines(&["M600\n"]),
            ..Default::default()
        };
        let (segs, outputs) = split(&program, &[2], &SplitOptions::default(), &scaffold);
        let mut expected = program.slice(segs[0].range()).to_vec();
        expected.push("M600\n".into());
        assert_eq!(outputs[0], expected);
    }

    #[test]
    fn test_resumed_last_segment() {
        let program = program(TEMPS);
        let (segs, outputs) = split(
            &program,
            &[2],
            &SplitOptions::default(),
            &ScaffoldBlocks::default(),
        );
        let body = program.slice(segs[1].range());
        assert_eq!(body.len(), 10);

        let mut expected = lines(&["\n", "G0 Z0.6\n", "M106 S128\n", "M220 S25\n"]);
        expected.extend_from_slice(&body[..6]);
        expected.extend(lines(&[
            "M104 S200 ; set nozzle to general temp\n",
            "M140 S60 ; set bed to general temp\n",
        ]));
        expected.extend_from_slice(&body[6..9]);
        expected.extend(lines(&["M220 S100\n", "M106 S255\n"]));
        expected.extend_from_slice(&body[9..]);
        assert_eq!(outputs[1], expected);
    }

    #[test]
    fn test_faststart_skips_slow_layer() {
        let program = program("");
        let options = SplitOptions {
            faststart: true,
            ..Default::default()
        };
        let (segs, outputs) = split(&program, &[2], &options, &ScaffoldBlocks::default());
        let mut expected = lines(&["\n", "G0 Z0.6\n"]);
        expected.extend_from_slice(program.slice(segs[1].range()));
        assert_eq!(outputs[1], expected);
    }

    #[test]
    fn test_restore_skipped_past_body_end() {
        let program = GcodeProgram::from_text(";LAYER:0\nG1 Z0.2\n;LAYER:1\nG1 Z0.4\nG1 X1\n");
        let (_, outputs) = split(
            &program,
            &[1],
            &SplitOptions::default(),
            &ScaffoldBlocks::default(),
        );
        assert_eq!(
            outputs[1],
            lines(&[
                "\n",
                "G0 Z0.4\n",
                "M106 S128\n",
                "M220 S25\n",
                ";LAYER:1\n",
                "G1 Z0.4\n",
                "G1 X1\n",
            ])
        );
    }

    #[test]
    fn test_heater_prologue_and_resets() {
        let program = program(TEMPS);
        let options = SplitOptions {
            bed_off: true,
            extruder_off: true,
            ..Default::default()
        };
        let scaffold = ScaffoldBlocks {
            restart_prologue_1: lines(&["G28\n"]),
            restart_prologue_2: lines(&["G92 E0\n"]),
            pause_epilogue: lines(&["M0\n"]),
        };
        let (segs, outputs) = split(&program, &[1, 2], &options, &scaffold);
        assert_eq!(segs.len(), 3);

        let first = &outputs[0];
        let tail = &first[first.len() - 5..];
        assert_eq!(
            tail,
            lines(&[
                "\n",
                "M104 S0                                    ; Extruder off \n",
                "M140 S0                                    ; Heatbed off \n",
                "\n",
                "M0\n",
            ])
            .as_slice()
        );

        let middle = &outputs[1];
        assert_eq!(
            &middle[..10],
            lines(&[
                "G28\n",
                "\n",
                "M140 S65   ; Start heating the bed\n",
                "G4 S60                                     ; wait 1 minute \n",
                "M190 S65   ; wait for bed\n",
                "\n",
                "M104 S210 ; start hotend\n",
                "M109 S210 ; wait hotend\n",
                "G92 E0\n",
                "\n",
            ])
            .as_slice()
        );
        assert!(middle.contains(&"M104 S200 ; set nozzle to general temp\n".to_string()));
        assert!(middle.contains(&"M140 S60 ; set bed to general temp\n".to_string()));
        assert_eq!(middle.last().map(String::as_str), Some("M0\n"));

        let last = &outputs[2];
        assert_ne!(last.last().map(String::as_str), Some("M0\n"));
        assert_eq!(last.last().map(String::as_str), Some("M107\n"));
    }

    #[test]
    fn test_fan_off_toggle_independent() {
        let program = program(TEMPS);
        let scaffold = ScaffoldBlocks {
            restart_prologue_1: lines(&["G28\n", "G1 Z10\n"]),
            ..Default::default()
        };
        let (_, plain) = split(&program, &[1, 2], &SplitOptions::default(), &scaffold);
        let fan_off = SplitOptions {
            fan_off: true,
            ..Default::default()
        };
        let (_, with_fan) = split(&program, &[1, 2], &fan_off, &scaffold);

        let fan_on = ControlCommand::FanOn.to_line();
        let fan_stop = ControlCommand::FanOff.to_line();
        for (ordinal, (a, b)) in plain.iter().zip(&with_fan).enumerate() {
            let count = |v: &Vec<String>, s: &str| v.iter().filter(|l| *l == s).count();
            let expect_on = usize::from(ordinal > 0);
            let expect_off = usize::from(ordinal < 2);
            assert_eq!(count(b, &fan_on), expect_on);
            assert_eq!(count(b, &fan_stop), expect_off);

            let stripped: Vec<String> = b
                .iter()
                .filter(|l| **l != fan_on && **l != fan_stop && *l != "\n")
                .cloned()
                .collect();
            let base: Vec<String> = a.iter().filter(|l| *l != "\n").cloned().collect();
            assert_eq!(stripped, base);
        }
        assert_eq!(with_fan[1][1], fan_on);
    }

    #[test]
    fn test_unterminated_scaffolds_stay_separate() {
        let program = program("");
        let options = SplitOptions {
            faststart: true,
            ..Default::default()
        };
        let scaffold = ScaffoldBlocks {
            restart_prologue_1: block_lines("G28"),
            restart_prologue_2: block_lines("G92 E0"),
            pause_epilogue: block_lines("M0"),
        };
        let (_, outputs) = split(&program, &[2], &options, &scaffold);
        assert!(outputs[0].concat().ends_with("G1 X23 E3\nM0\n"));
        assert!(outputs[1]
            .concat()
            .starts_with("G28\nG92 E0\n\nG0 Z0.6\n;LAYER:2\n"));
    }

    #[test]
    fn test_fan_on_with_empty_prologue() {
        let program = program("");
        let options = SplitOptions {
            fan_off: true,
            ..Default::default()
        };
        let (_, outputs) = split(&program, &[2], &options, &ScaffoldBlocks::default());
        assert_eq!(outputs[1][0], ControlCommand::FanOn.to_line());
        assert_eq!(outputs[1][1], "\n");
    }

    #[test]
    fn test_equal_temperatures_no_reset() {
        let header = "\
;Slicer info:material_print_temperature;200
;Slicer info:material_print_temperature_layer_0;200
;Slicer info:material_bed_temperature;60
";
        let program = program(header);
        let (_, outputs) = split(
            &program,
            &[2],
            &SplitOptions::default(),
            &ScaffoldBlocks::default(),
        );
        assert!(!outputs[1].iter().any(|l| l.contains("general temp")));
    }

    #[test]
    fn test_missing_temperature_skips_reheat() {
        let program = program("");
        let options = SplitOptions {
            bed_off: true,
            extruder_off: true,
            ..Default::default()
        };
        let (_, outputs) = split(&program, &[2], &options, &ScaffoldBlocks::default());
        assert!(!outputs[1].iter().any(|l| l.starts_with("M190") || l.starts_with("M109")));
    }

    #[test]
    fn test_splice_positions_refer_to_original() {
        let body = lines(&["a\n", "b\n", "c\n"]);
        let out = splice(
            &body,
            vec![
                (3, lines(&["z\n"])),
                (1, lines(&["x\n", "y\n"])),
                (1, lines(&["w\n"])),
            ],
        );
        assert_eq!(out, lines(&["a\n", "x\n", "y\n", "w\n", "b\n", "c\n", "z\n"]));
    }

    #[test]
    fn test_idempotent() {
        let program = program(TEMPS);
        let options = SplitOptions {
            bed_off: true,
            fan_off: true,
            ..Default::default()
        };
        let (_, a) = split(&program, &[1, 2, 3], &options, &ScaffoldBlocks::default());
        let (_, b) = split(&program, &[3, 2, 1, 1], &options, &ScaffoldBlocks::default());
        assert_eq!(a, b);
    }
}
