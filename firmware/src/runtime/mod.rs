use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32 as hal;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_sync::mutex::Mutex;
use portable_atomic::AtomicI32;
use static_cell::StaticCell;

use crate::hw::{BuzzerOutput, CoilOutputs, Outputs, PanelOutputs};

mod alarm_task;
mod control_task;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

/// Shared output bundle. The control task locks per micro-step; the alarm
/// task locks once and never releases, which is what stops normal service.
pub(super) type OutputMutex = Mutex<ThreadModeRawMutex, Outputs<'static>>;

static OUTPUTS: StaticCell<OutputMutex> = StaticCell::new();

/// Net micro-step counter shared between the control and alarm tasks; the
/// only record of how far above ground the platform is.
pub(super) static MOTOR_POSITION: AtomicI32 = AtomicI32::new(0);

/// Converts a core plan duration into an embassy timer duration.
pub(super) fn as_embassy(duration: core::time::Duration) -> embassy_time::Duration {
    let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
    embassy_time::Duration::from_micros(micros)
}

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let config = hal::Config::default();
    let hal::Peripherals {
        PA0,
        PA1,
        PA4,
        PA5,
        PB0,
        PB1,
        PB2,
        PB3,
        PB4,
        PB5,
        PB6,
        PB7,
        PB8,
        PB9,
        PB10,
        PB12,
        PB13,
        PB14,
        PB15,
        EXTI2,
        ..
    } = hal::init(config);

    // Coil lines in CoilLine A..D order.
    let coils = CoilOutputs::new([
        Output::new(PB1, Level::Low, Speed::Low),
        Output::new(PA1, Level::Low, Speed::Low),
        Output::new(PB0, Level::Low, Speed::Low),
        Output::new(PA0, Level::Low, Speed::Low),
    ]);

    let panel = PanelOutputs::new(
        [
            Output::new(PB15, Level::Low, Speed::Low),
            Output::new(PB14, Level::Low, Speed::Low),
            Output::new(PB13, Level::Low, Speed::Low),
        ],
        Output::new(PB12, Level::Low, Speed::Low),
        // Segment lines a..g, released high (segments dark).
        [
            Output::new(PB3, Level::High, Speed::Low),
            Output::new(PB4, Level::High, Speed::Low),
            Output::new(PB6, Level::High, Speed::Low),
            Output::new(PB7, Level::High, Speed::Low),
            Output::new(PB8, Level::High, Speed::Low),
            Output::new(PB9, Level::High, Speed::Low),
            Output::new(PA5, Level::High, Speed::Low),
        ],
    );

    let buzzer = BuzzerOutput::new(Output::new(PB10, Level::Low, Speed::Low));

    let outputs = OUTPUTS.init(Mutex::new(Outputs {
        coils,
        panel,
        buzzer,
    }));

    let up_button = Input::new(PA4, Pull::Up);
    let down_button = Input::new(PB5, Pull::Up);
    let alarm_button = ExtiInput::new(PB2, EXTI2, Pull::Up);

    spawner
        .spawn(control_task::run(outputs, up_button, down_button))
        .expect("failed to spawn control task");

    spawner
        .spawn(alarm_task::run(outputs, alarm_button))
        .expect("failed to spawn alarm task");

    core::future::pending::<()>().await;
}
