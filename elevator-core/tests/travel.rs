use core::time::Duration;

use elevator_core::cab::{CabState, Floor, RequestInput};
use elevator_core::motion::{
    CoilDriver, CoilPhase, Direction, MOTOR_STEP_INTERVAL, MotionPlan, StepTracker, run_plan,
};

/// Coil driver that remembers every phase it was asked to drive.
#[derive(Default)]
struct RecordingCoilDriver {
    phases: Vec<CoilPhase>,
}

impl CoilDriver for RecordingCoilDriver {
    fn energize(&mut self, phase: CoilPhase) {
        self.phases.push(phase);
    }
}

/// Drives one accepted request end to end the way the firmware control task
/// does: plan, motion, arrival commit.
fn serve_request(
    cab: &mut CabState,
    tracker: &mut StepTracker,
    driver: &mut RecordingCoilDriver,
    input: RequestInput,
) -> bool {
    match cab.plan_travel(input) {
        Some(plan) => {
            run_plan(&plan.motion, driver, tracker, |_| {});
            cab.arrive(plan.destination);
            true
        }
        None => false,
    }
}

#[test]
fn boot_to_top_and_back_matches_expected_positions() {
    let mut cab = CabState::new();
    let mut tracker = StepTracker::new();
    let mut driver = RecordingCoilDriver::default();

    assert_eq!(cab.floor(), Floor::First);
    assert_eq!(tracker.position(), 0);

    assert!(serve_request(
        &mut cab,
        &mut tracker,
        &mut driver,
        RequestInput::new(true, false),
    ));
    assert_eq!(cab.floor(), Floor::Second);
    assert_eq!(tracker.position(), 144);

    assert!(serve_request(
        &mut cab,
        &mut tracker,
        &mut driver,
        RequestInput::new(true, false),
    ));
    assert_eq!(cab.floor(), Floor::Third);
    assert_eq!(tracker.position(), 288);

    assert!(serve_request(
        &mut cab,
        &mut tracker,
        &mut driver,
        RequestInput::new(false, true),
    ));
    assert_eq!(cab.floor(), Floor::Second);
    assert_eq!(tracker.position(), 144);
}

#[test]
fn round_trip_returns_to_ground_and_zero() {
    let mut cab = CabState::new();
    let mut tracker = StepTracker::new();
    let mut driver = RecordingCoilDriver::default();

    for _ in 0..2 {
        serve_request(
            &mut cab,
            &mut tracker,
            &mut driver,
            RequestInput::new(true, false),
        );
    }
    for _ in 0..2 {
        serve_request(
            &mut cab,
            &mut tracker,
            &mut driver,
            RequestInput::new(false, true),
        );
    }

    assert_eq!(cab.floor(), Floor::First);
    assert_eq!(tracker.position(), 0);
}

#[test]
fn boundary_and_simultaneous_requests_move_nothing() {
    let mut cab = CabState::new();
    let mut tracker = StepTracker::new();
    let mut driver = RecordingCoilDriver::default();

    // Down from ground, both buttons at once: no motion either way.
    assert!(!serve_request(
        &mut cab,
        &mut tracker,
        &mut driver,
        RequestInput::new(false, true),
    ));
    assert!(!serve_request(
        &mut cab,
        &mut tracker,
        &mut driver,
        RequestInput::new(true, true),
    ));

    assert_eq!(cab.floor(), Floor::First);
    assert_eq!(tracker.position(), 0);
    assert!(driver.phases.is_empty());
}

#[test]
fn one_floor_trip_takes_the_budgeted_time() {
    let plan = MotionPlan::one_floor(Direction::Up);
    let mut elapsed = Duration::ZERO;
    let mut tracker = StepTracker::new();
    let mut driver = RecordingCoilDriver::default();

    run_plan(&plan, &mut driver, &mut tracker, |pause| elapsed += pause);

    // 36 cycles x 4 phases x 30 ms per phase.
    assert_eq!(elapsed, MOTOR_STEP_INTERVAL * 144);
    assert_eq!(elapsed, plan.duration());
    assert_eq!(driver.phases.len(), 144);
}

#[test]
fn opposite_trips_replay_phases_in_reverse() {
    let mut up_driver = RecordingCoilDriver::default();
    let mut down_driver = RecordingCoilDriver::default();
    let mut tracker = StepTracker::new();

    run_plan(
        &MotionPlan::new(Direction::Up, 2),
        &mut up_driver,
        &mut tracker,
        |_| {},
    );
    run_plan(
        &MotionPlan::new(Direction::Down, 2),
        &mut down_driver,
        &mut tracker,
        |_| {},
    );

    let mut reversed = up_driver.phases.clone();
    reversed.reverse();
    assert_eq!(down_driver.phases, reversed);
    assert_eq!(tracker.position(), 0);
}
