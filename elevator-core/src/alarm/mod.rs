//! Fire-alarm sequence data shared by firmware and host targets.
//!
//! The alarm path is one-way: once the alarm input fires, normal service is
//! over and the only exit is a full reset. This module holds the visual
//! flash template and the emergency-descent computation; the executing
//! context (firmware alarm task or emulator session) owns the outputs for
//! the duration and never hands them back.

use core::time::Duration;

use crate::motion::{Direction, MotionPlan, PHASES_PER_CYCLE};
use crate::panel::PanelFrame;

/// Hold time with the panel blanked before the flash sequence starts.
pub const PANEL_CLEAR_HOLD: Duration = Duration::from_millis(300);

/// Times the `F` indication is flashed.
pub const FLASH_REPEATS: usize = 3;

/// Hold time for each half of a flash (dark phase and lit phase alike).
pub const FLASH_PHASE_HOLD: Duration = Duration::from_millis(500);

/// One timed phase of the visual alarm indication.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FlashStep {
    pub frame: PanelFrame,
    pub hold: Duration,
}

impl FlashStep {
    const fn new(lamp_on: bool) -> Self {
        Self {
            frame: PanelFrame::alarm_flash(lamp_on),
            hold: FLASH_PHASE_HOLD,
        }
    }
}

/// Ordered flash phases: [`FLASH_REPEATS`] pairs of (lamp dark + blank
/// display) then (lamp lit + `F` glyph).
pub const FLASH_STEPS: [FlashStep; FLASH_REPEATS * 2] = [
    FlashStep::new(false),
    FlashStep::new(true),
    FlashStep::new(false),
    FlashStep::new(true),
    FlashStep::new(false),
    FlashStep::new(true),
];

/// Whole 4-step cycles of downward travel needed to return the platform to
/// its physical zero, from the raw tracked position. Truncating division:
/// up to 3 residual micro-steps are left uncorrected, so a platform that is
/// not on an exact cycle boundary when the alarm fires comes to rest
/// slightly above true zero.
pub const fn descent_cycles(position: i32) -> i32 {
    position / PHASES_PER_CYCLE
}

/// Micro-steps the descent leaves behind (the truncation remainder).
pub const fn residual_steps(position: i32) -> i32 {
    position % PHASES_PER_CYCLE
}

/// Builds the emergency descent plan from the raw tracked position. A
/// position at or below zero yields an empty plan.
pub fn descent_plan(position: i32) -> MotionPlan {
    let cycles = descent_cycles(position);
    let cycles = u32::try_from(cycles).unwrap_or(0);
    MotionPlan::new(Direction::Down, cycles)
}

/// Stages of the alarm sequence, in execution order. Purely descriptive;
/// the sequence is not resumable and no stage can be skipped.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AlarmStage {
    Flashing,
    Sounding,
    Descending,
    Resetting,
}
