//! GPIO bindings for the elevator control board.
//!
//! Implements the `elevator-core` driver traits on top of plain push-pull
//! outputs. Board wiring: four coil lines to the unipolar stepper driver,
//! three active-high floor lamps plus the alarm lamp, seven active-low
//! segment lines, and the piezo buzzer line.

use elevator_core::motion::{CoilDriver, CoilPhase};
use elevator_core::panel::{FLOOR_LAMP_COUNT, PanelDriver, PanelFrame, SEGMENT_COUNT};
use elevator_core::tone::BuzzerDriver;
use embassy_stm32::gpio::{Level, Output};

fn level(high: bool) -> Level {
    if high { Level::High } else { Level::Low }
}

/// The four stepper coil drive lines, in `CoilLine` A..D order.
pub struct CoilOutputs<'d> {
    lines: [Output<'d>; 4],
}

impl<'d> CoilOutputs<'d> {
    pub fn new(lines: [Output<'d>; 4]) -> Self {
        Self { lines }
    }
}

impl CoilDriver for CoilOutputs<'_> {
    fn energize(&mut self, phase: CoilPhase) {
        for (line, energized) in self.lines.iter_mut().zip(phase.levels()) {
            line.set_level(level(energized));
        }
    }
}

/// Floor lamps, alarm lamp, and the 7-segment lines in a..g order.
pub struct PanelOutputs<'d> {
    floor_lamps: [Output<'d>; FLOOR_LAMP_COUNT],
    alarm_lamp: Output<'d>,
    segments: [Output<'d>; SEGMENT_COUNT],
}

impl<'d> PanelOutputs<'d> {
    pub fn new(
        floor_lamps: [Output<'d>; FLOOR_LAMP_COUNT],
        alarm_lamp: Output<'d>,
        segments: [Output<'d>; SEGMENT_COUNT],
    ) -> Self {
        Self {
            floor_lamps,
            alarm_lamp,
            segments,
        }
    }
}

impl PanelDriver for PanelOutputs<'_> {
    fn apply(&mut self, frame: &PanelFrame) {
        for (lamp, lit) in self.floor_lamps.iter_mut().zip(frame.floor_lamps) {
            lamp.set_level(level(lit));
        }
        self.alarm_lamp.set_level(level(frame.alarm_lamp));
        // Segment lines are active-low; the frame already carries the
        // inverted electrical levels.
        for (line, high) in self.segments.iter_mut().zip(frame.glyph.line_levels()) {
            line.set_level(level(high));
        }
    }
}

/// Piezo buzzer drive line.
pub struct BuzzerOutput<'d> {
    line: Output<'d>,
}

impl<'d> BuzzerOutput<'d> {
    pub fn new(line: Output<'d>) -> Self {
        Self { line }
    }
}

impl BuzzerDriver for BuzzerOutput<'_> {
    fn set_active(&mut self, active: bool) {
        self.line.set_level(level(active));
    }
}

/// Every output the controller drives, grouped so the tasks can share one
/// mutex-guarded handle.
pub struct Outputs<'d> {
    pub coils: CoilOutputs<'d>,
    pub panel: PanelOutputs<'d>,
    pub buzzer: BuzzerOutput<'d>,
}
