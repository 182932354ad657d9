//! Stepper drive sequencing shared by firmware and host targets.
//!
//! The platform hangs from a unipolar 4-wire stepper with no position
//! feedback, so correctness rests on never losing count: every coil phase
//! change moves the software position counter by exactly one. The firmware
//! and the emulator both execute [`MotionPlan`]s produced here; neither is
//! allowed to touch the coils outside a plan.

use core::time::Duration;

/// Pause between coil phase changes, long enough for the rotor to settle.
pub const MOTOR_STEP_INTERVAL: Duration = Duration::from_millis(30);

/// Micro-steps (single phase changes) between adjacent floors.
pub const STEPS_PER_FLOOR: i32 = 144;

/// Phase changes per full coil cycle.
pub const PHASES_PER_CYCLE: i32 = 4;

/// Full 4-phase cycles needed to travel one floor.
pub const CYCLES_PER_FLOOR: u32 = (STEPS_PER_FLOOR / PHASES_PER_CYCLE) as u32;

/// Direction of platform travel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Position counter delta applied per micro-step in this direction.
    pub const fn step_delta(self) -> i32 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }

    /// Returns the opposite travel direction.
    pub const fn reversed(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// Identifier for the four motor coil drive lines.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CoilLine {
    A,
    B,
    C,
    D,
}

impl CoilLine {
    /// Deterministic index for lookups into level arrays.
    pub const fn as_index(self) -> usize {
        match self {
            CoilLine::A => 0,
            CoilLine::B => 1,
            CoilLine::C => 2,
            CoilLine::D => 3,
        }
    }

    /// Attempts to construct a [`CoilLine`] from a raw index.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(CoilLine::A),
            1 => Some(CoilLine::B),
            2 => Some(CoilLine::C),
            3 => Some(CoilLine::D),
            _ => None,
        }
    }
}

/// One drive state of the unipolar sequence: exactly one coil energized.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CoilPhase {
    active: CoilLine,
}

impl CoilPhase {
    /// Creates a phase that energizes the given line exclusively.
    pub const fn new(active: CoilLine) -> Self {
        Self { active }
    }

    /// Returns the line energized during this phase.
    pub const fn active_line(self) -> CoilLine {
        self.active
    }

    /// Electrical levels for lines A..D; `true` means energized.
    pub const fn levels(self) -> [bool; 4] {
        let mut levels = [false; 4];
        levels[self.active.as_index()] = true;
        levels
    }
}

/// Phase order for upward travel.
pub const UP_PHASE_CYCLE: [CoilPhase; 4] = [
    CoilPhase::new(CoilLine::D),
    CoilPhase::new(CoilLine::C),
    CoilPhase::new(CoilLine::B),
    CoilPhase::new(CoilLine::A),
];

/// Phase order for downward travel; the exact reverse of [`UP_PHASE_CYCLE`]
/// so the rotor retraces its steps.
pub const DOWN_PHASE_CYCLE: [CoilPhase; 4] = [
    CoilPhase::new(CoilLine::A),
    CoilPhase::new(CoilLine::B),
    CoilPhase::new(CoilLine::C),
    CoilPhase::new(CoilLine::D),
];

/// Returns the coil phase order for the requested direction.
pub const fn phase_cycle(direction: Direction) -> [CoilPhase; 4] {
    match direction {
        Direction::Up => UP_PHASE_CYCLE,
        Direction::Down => DOWN_PHASE_CYCLE,
    }
}

/// Net micro-step counter; the only record of how far above ground the
/// platform sits. There is no feedback sensor to correct it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct StepTracker {
    position: i32,
}

impl StepTracker {
    /// Creates a tracker at the physical zero position.
    pub const fn new() -> Self {
        Self { position: 0 }
    }

    /// Creates a tracker at a known raw position.
    pub const fn at_position(position: i32) -> Self {
        Self { position }
    }

    /// Current net micro-step count since boot.
    pub const fn position(&self) -> i32 {
        self.position
    }

    /// Records one completed phase change in the given direction.
    pub fn record_step(&mut self, direction: Direction) {
        self.position += direction.step_delta();
    }
}

/// A fixed number of full coil cycles in one direction.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MotionPlan {
    pub direction: Direction,
    pub cycles: u32,
}

impl MotionPlan {
    /// Creates a plan for `cycles` full 4-phase cycles.
    pub const fn new(direction: Direction, cycles: u32) -> Self {
        Self { direction, cycles }
    }

    /// Plan covering exactly one floor of travel.
    pub const fn one_floor(direction: Direction) -> Self {
        Self::new(direction, CYCLES_PER_FLOOR)
    }

    /// Total phase changes the plan will issue.
    pub const fn phase_count(&self) -> u32 {
        self.cycles * PHASES_PER_CYCLE as u32
    }

    /// Wall-clock time the plan occupies when driven at
    /// [`MOTOR_STEP_INTERVAL`] per phase.
    pub fn duration(&self) -> Duration {
        MOTOR_STEP_INTERVAL * self.phase_count()
    }

    /// Iterates the coil phases of the plan in drive order.
    pub fn phases(&self) -> PhaseIter {
        PhaseIter {
            cycle: phase_cycle(self.direction),
            remaining: self.phase_count(),
            index: 0,
        }
    }
}

/// Iterator over the coil phases of a [`MotionPlan`].
#[derive(Clone, Debug)]
pub struct PhaseIter {
    cycle: [CoilPhase; 4],
    remaining: u32,
    index: usize,
}

impl Iterator for PhaseIter {
    type Item = CoilPhase;

    fn next(&mut self) -> Option<CoilPhase> {
        if self.remaining == 0 {
            return None;
        }
        let phase = self.cycle[self.index];
        self.index = (self.index + 1) % self.cycle.len();
        self.remaining -= 1;
        Some(phase)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

/// Abstraction over the physical coil drive lines.
pub trait CoilDriver {
    /// Applies a phase to the coil outputs. Fire-and-forget; cannot fail.
    fn energize(&mut self, phase: CoilPhase);
}

/// Coil driver that performs no hardware interaction.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopCoilDriver;

impl NoopCoilDriver {
    /// Creates a new no-op coil driver.
    pub const fn new() -> Self {
        Self
    }
}

impl CoilDriver for NoopCoilDriver {
    fn energize(&mut self, _: CoilPhase) {}
}

/// Executes a plan against a driver and tracker, invoking `settle` with
/// [`MOTOR_STEP_INTERVAL`] after each phase change. Host-side executor; the
/// firmware drives its own async loop with the same ordering.
pub fn run_plan<D, W>(plan: &MotionPlan, driver: &mut D, tracker: &mut StepTracker, mut settle: W)
where
    D: CoilDriver,
    W: FnMut(Duration),
{
    for phase in plan.phases() {
        driver.energize(phase);
        settle(MOTOR_STEP_INTERVAL);
        tracker.record_step(plan.direction);
    }
}
