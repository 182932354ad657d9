//! Floor state machine for the three-floor cab.
//!
//! Requests arrive as sampled button levels once per control-loop pass.
//! There is no request queue: a press that cannot be honored this pass is
//! simply dropped and picked up again on the next poll if still held.

use core::time::Duration;

use crate::motion::{Direction, MotionPlan};

/// Door-open time simulated before the motor starts moving.
pub const BOARDING_DELAY: Duration = Duration::from_millis(1_000);

/// Settle time between the motor stopping and the arrival tone.
pub const ARRIVAL_SETTLE: Duration = Duration::from_millis(400);

/// Floors served by the cab. Ground is `First`; there is nothing outside
/// this range to represent.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Floor {
    First,
    Second,
    Third,
}

impl Floor {
    /// Human-facing floor number, 1 through 3.
    pub const fn as_number(self) -> u8 {
        match self {
            Floor::First => 1,
            Floor::Second => 2,
            Floor::Third => 3,
        }
    }

    /// Attempts to construct a floor from its number.
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Floor::First),
            2 => Some(Floor::Second),
            3 => Some(Floor::Third),
            _ => None,
        }
    }

    /// The floor directly above, if any.
    pub const fn above(self) -> Option<Self> {
        match self {
            Floor::First => Some(Floor::Second),
            Floor::Second => Some(Floor::Third),
            Floor::Third => None,
        }
    }

    /// The floor directly below, if any.
    pub const fn below(self) -> Option<Self> {
        match self {
            Floor::First => None,
            Floor::Second => Some(Floor::First),
            Floor::Third => Some(Floor::Second),
        }
    }

    /// Neighbor in the requested travel direction, if one exists.
    pub const fn neighbor(self, direction: Direction) -> Option<Self> {
        match direction {
            Direction::Up => self.above(),
            Direction::Down => self.below(),
        }
    }
}

/// Logical button levels sampled from the panel (`true` = pressed).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RequestInput {
    pub up: bool,
    pub down: bool,
}

impl RequestInput {
    /// Creates a sampled input pair.
    pub const fn new(up: bool, down: bool) -> Self {
        Self { up, down }
    }

    /// Direction requested, honoring requests only when exactly one button
    /// is pressed. Simultaneous presses cancel out.
    pub const fn direction(self) -> Option<Direction> {
        match (self.up, self.down) {
            (true, false) => Some(Direction::Up),
            (false, true) => Some(Direction::Down),
            _ => None,
        }
    }
}

/// An accepted one-floor trip: where the cab is headed and how to get there.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TravelPlan {
    pub direction: Direction,
    pub destination: Floor,
    pub motion: MotionPlan,
}

/// Resting floor of the cab. The floor only changes through
/// [`CabState::arrive`], after the motor has finished a trip.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CabState {
    floor: Floor,
}

impl Default for CabState {
    fn default() -> Self {
        Self::new()
    }
}

impl CabState {
    /// Cab at the ground floor, the boot state.
    pub const fn new() -> Self {
        Self {
            floor: Floor::First,
        }
    }

    /// Floor the cab last came to rest at.
    pub const fn floor(&self) -> Floor {
        self.floor
    }

    /// Evaluates sampled inputs against the current floor. Returns a plan
    /// only for a single-button request that stays within bounds; everything
    /// else is dropped without side effects.
    pub fn plan_travel(&self, input: RequestInput) -> Option<TravelPlan> {
        let direction = input.direction()?;
        let destination = self.floor.neighbor(direction)?;
        Some(TravelPlan {
            direction,
            destination,
            motion: MotionPlan::one_floor(direction),
        })
    }

    /// Commits a completed trip. Called once motion and the arrival tone
    /// have finished so the displayed floor never runs ahead of the
    /// platform.
    pub fn arrive(&mut self, destination: Floor) {
        self.floor = destination;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::CYCLES_PER_FLOOR;

    #[test]
    fn boots_at_ground_floor() {
        assert_eq!(CabState::new().floor(), Floor::First);
    }

    #[test]
    fn up_from_ground_targets_second_floor() {
        let cab = CabState::new();
        let plan = cab
            .plan_travel(RequestInput::new(true, false))
            .expect("up request from ground should be honored");
        assert_eq!(plan.direction, Direction::Up);
        assert_eq!(plan.destination, Floor::Second);
        assert_eq!(plan.motion.cycles, CYCLES_PER_FLOOR);
    }

    #[test]
    fn down_from_ground_is_dropped() {
        let cab = CabState::new();
        assert_eq!(cab.plan_travel(RequestInput::new(false, true)), None);
    }

    #[test]
    fn up_from_top_is_dropped() {
        let mut cab = CabState::new();
        cab.arrive(Floor::Third);
        assert_eq!(cab.plan_travel(RequestInput::new(true, false)), None);
    }

    #[test]
    fn simultaneous_presses_cancel_out() {
        let mut cab = CabState::new();
        cab.arrive(Floor::Second);
        assert_eq!(cab.plan_travel(RequestInput::new(true, true)), None);
        assert_eq!(cab.plan_travel(RequestInput::new(false, false)), None);
    }

    #[test]
    fn floor_never_leaves_bounds() {
        let mut cab = CabState::new();
        let presses = [
            RequestInput::new(false, true),
            RequestInput::new(true, false),
            RequestInput::new(true, false),
            RequestInput::new(true, false),
            RequestInput::new(true, true),
            RequestInput::new(false, true),
            RequestInput::new(false, true),
            RequestInput::new(false, true),
        ];
        for input in presses {
            if let Some(plan) = cab.plan_travel(input) {
                cab.arrive(plan.destination);
            }
            let number = cab.floor().as_number();
            assert!((1..=3).contains(&number));
        }
        assert_eq!(cab.floor(), Floor::First);
    }

    #[test]
    fn floor_number_round_trips() {
        for number in 1..=3 {
            let floor = Floor::from_number(number).expect("floor in range");
            assert_eq!(floor.as_number(), number);
        }
        assert_eq!(Floor::from_number(0), None);
        assert_eq!(Floor::from_number(4), None);
    }
}
