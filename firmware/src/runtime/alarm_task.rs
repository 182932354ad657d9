//! Fire-alarm handler: single-shot, non-resumable, ends in a system reset.

use elevator_core::alarm::{FLASH_STEPS, PANEL_CLEAR_HOLD, descent_plan};
use elevator_core::motion::{CoilDriver, MOTOR_STEP_INTERVAL};
use elevator_core::panel::{PanelDriver, PanelFrame};
use elevator_core::tone::{BuzzerDriver, alarm_sweep};
use embassy_stm32::exti::ExtiInput;
use embassy_time::Timer;
use portable_atomic::Ordering;

use super::{MOTOR_POSITION, OutputMutex, as_embassy};

#[embassy_executor::task]
pub async fn run(outputs: &'static OutputMutex, mut alarm_button: ExtiInput<'static>) -> ! {
    // Active-low pushbutton: a press is a falling edge. Further presses
    // while the sequence runs have no effect; nothing awaits the line again.
    alarm_button.wait_for_falling_edge().await;
    defmt::warn!("alarm: fire input asserted, seizing outputs");

    // Held until the reset below. The control task blocks on its next lock
    // and never runs again, whatever it was doing.
    let mut outputs = outputs.lock().await;

    outputs.panel.apply(&PanelFrame::blank());
    Timer::after(as_embassy(PANEL_CLEAR_HOLD)).await;

    for step in &FLASH_STEPS {
        outputs.panel.apply(&step.frame);
        Timer::after(as_embassy(step.hold)).await;
    }

    for half_period in alarm_sweep() {
        let half = as_embassy(half_period);
        outputs.buzzer.set_active(true);
        Timer::after(half).await;
        outputs.buzzer.set_active(false);
        Timer::after(half).await;
    }

    // Descent is computed from the raw tracked position, not the floor
    // number; truncation leaves up to 3 micro-steps of drift uncorrected.
    let position = MOTOR_POSITION.load(Ordering::SeqCst);
    let plan = descent_plan(position);
    defmt::warn!(
        "alarm: descending {} cycles from position {}",
        plan.cycles,
        position
    );

    let pause = as_embassy(MOTOR_STEP_INTERVAL);
    for phase in plan.phases() {
        outputs.coils.energize(phase);
        Timer::after(pause).await;
        MOTOR_POSITION.fetch_sub(1, Ordering::SeqCst);
    }

    defmt::warn!("alarm: descent complete, issuing system reset");
    cortex_m::peripheral::SCB::sys_reset()
}
