//! Control commands injected around split segments.

/// A single G-code control line emitted by the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand<'a> {
    /// Switch the hotend heater off.
    ExtruderOff,
    /// Switch the bed heater off.
    BedOff,
    /// Switch the part cooling fan off.
    FanOff,
    /// Switch the part cooling fan back on at full speed.
    FanOn,
    /// Start heating the bed.
    HeatBed(&'a str),
    /// Wait one minute.
    Dwell,
    /// Block until the bed reaches temperature.
    WaitBed(&'a str),
    /// Start heating the hotend.
    HeatHotend(&'a str),
    /// Block until the hotend reaches temperature.
    WaitHotend(&'a str),
    /// Return the nozzle to its general (non first-layer) temperature.
    ResetNozzle(&'a str),
    /// Return the bed to its general (non first-layer) temperature.
    ResetBed(&'a str),
    /// Move to the print height of the resumed segment.
    RestoreZ(&'a str),
    /// Half fan speed for the slow restart layer.
    SlowStartFan,
    /// 25% feed-rate override for the slow restart layer.
    SlowStartFeed,
    /// Restore 100% feed rate.
    RestoreFeed,
    /// Restore full fan speed.
    RestoreFan,
    /// An empty separator line.
    Blank,
}

impl ControlCommand<'_> {
    /// Render as one newline-terminated line.
    pub fn to_line(&self) -> String {
        match self {
            ControlCommand::ExtruderOff => {
                "M104 S0                                    ; Extruder off \n".into()
            }
            ControlCommand::BedOff => {
                "M140 S0                                    ; Heatbed off \n".into()
            }
            ControlCommand::FanOff => {
                "M107                                       ; Fan off \n".into()
            }
            ControlCommand::FanOn => {
                "M106 S255                                  ; Fan on\n".into()
            }
            ControlCommand::HeatBed(t) => format!("M140 S{t}   ; Start heating the bed\n"),
            ControlCommand::Dwell => {
                "G4 S60                                     ; wait 1 minute \n".into()
            }
            ControlCommand::WaitBed(t) => format!("M190 S{t}   ; wait for bed\n"),
            ControlCommand::HeatHotend(t) => format!("M104 S{t} ; start hotend\n"),
            ControlCommand::WaitHotend(t) => format!("M109 S{t} ; wait hotend\n"),
            ControlCommand::ResetNozzle(t) => format!("M104 S{t} ; set nozzle to general temp\n"),
            ControlCommand::ResetBed(t) => format!("M140 S{t} ; set bed to general temp\n"),
            ControlCommand::RestoreZ(z) => format!("G0 Z{z}\n"),
            ControlCommand::SlowStartFan => "M106 S128\n".into(),
            ControlCommand::SlowStartFeed => "M220 S25\n".into(),
            ControlCommand::RestoreFeed => "M220 S100\n".into(),
            ControlCommand::RestoreFan => "M106 S255\n".into(),
            ControlCommand::Blank => "\n".into(),
        }
    }
}

/// Render a command sequence into lines.
pub fn render(commands: &[ControlCommand<'_>]) -> Vec<String> {
    commands.iter().map(ControlCommand::to_line).collect()
}
