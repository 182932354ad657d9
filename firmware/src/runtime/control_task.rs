//! Normal-service control loop: poll the call buttons, run one-floor trips,
//! refresh the indicator panel.

use elevator_core::cab::{ARRIVAL_SETTLE, BOARDING_DELAY, CabState, RequestInput};
use elevator_core::motion::{CoilDriver, MOTOR_STEP_INTERVAL, MotionPlan};
use elevator_core::panel::{PanelDriver, PanelFrame};
use elevator_core::tone::{BuzzerDriver, Tone};
use embassy_stm32::gpio::Input;
use embassy_time::{Duration, Timer};
use portable_atomic::Ordering;

use super::{MOTOR_POSITION, OutputMutex, as_embassy};

/// Button sampling cadence between trips.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[embassy_executor::task]
pub async fn run(
    outputs: &'static OutputMutex,
    up_button: Input<'static>,
    down_button: Input<'static>,
) -> ! {
    let mut cab = CabState::new();

    loop {
        // Buttons are active-low: pressed reads as a low level.
        let input = RequestInput::new(up_button.is_low(), down_button.is_low());

        if let Some(plan) = cab.plan_travel(input) {
            defmt::info!(
                "cab: floor {} -> {}",
                cab.floor().as_number(),
                plan.destination.as_number()
            );

            // Door-open time before any motion, so the displayed floor only
            // changes once the trip has fully completed.
            Timer::after(as_embassy(BOARDING_DELAY)).await;
            drive_motor(outputs, &plan.motion).await;
            Timer::after(as_embassy(ARRIVAL_SETTLE)).await;
            play_tone(outputs, Tone::arrival()).await;

            cab.arrive(plan.destination);
            defmt::info!(
                "cab: arrived at floor {} position={}",
                cab.floor().as_number(),
                MOTOR_POSITION.load(Ordering::SeqCst)
            );
        }

        {
            let mut guard = outputs.lock().await;
            guard.panel.apply(&PanelFrame::for_floor(cab.floor()));
        }

        Timer::after(POLL_INTERVAL).await;
    }
}

/// Drives a plan one phase at a time, releasing the output lock between
/// phases so the alarm task can seize the bus mid-trip.
async fn drive_motor(outputs: &'static OutputMutex, plan: &MotionPlan) {
    let pause = as_embassy(MOTOR_STEP_INTERVAL);
    for phase in plan.phases() {
        {
            let mut guard = outputs.lock().await;
            guard.coils.energize(phase);
        }
        Timer::after(pause).await;
        MOTOR_POSITION.fetch_add(plan.direction.step_delta(), Ordering::SeqCst);
    }
}

/// Plays a fixed-pitch tone by toggling the buzzer line.
async fn play_tone(outputs: &'static OutputMutex, tone: Tone) {
    let half = as_embassy(tone.half_period);
    for _ in 0..tone.pulses {
        {
            let mut guard = outputs.lock().await;
            guard.buzzer.set_active(true);
        }
        Timer::after(half).await;
        {
            let mut guard = outputs.lock().await;
            guard.buzzer.set_active(false);
        }
        Timer::after(half).await;
    }
}
