#![no_std]

// Shared logic for the model elevator controller.
//
// This crate stays portable across MCU firmware and host tooling by avoiding
// the Rust standard library: the floor state machine, stepper sequencing,
// panel frames, tone plans, and the fire-alarm sequence all live here, while
// GPIO and real time stay in the firmware and emulator crates.

pub mod alarm;
pub mod cab;
pub mod motion;
pub mod panel;
pub mod telemetry;
pub mod tone;
