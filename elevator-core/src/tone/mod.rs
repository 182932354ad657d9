//! Square-wave tone plans for the piezo buzzer.
//!
//! The buzzer is a bare digital line; pitch comes entirely from how fast the
//! executor toggles it. Plans are expressed as pulse counts and half-periods
//! so the firmware and the emulator can share them.

use core::time::Duration;

/// Pulses in the floor-arrival tone.
pub const ARRIVAL_PULSES: u32 = 700;

/// Half-period of the arrival tone square wave.
pub const ARRIVAL_HALF_PERIOD: Duration = Duration::from_micros(300);

/// Times the alarm pitch sweep is repeated back to back.
pub const SWEEP_REPEATS: u32 = 4;

/// Pulses per alarm sweep repetition.
pub const SWEEP_PULSES: u32 = 800;

/// Half-period at the start of each sweep repetition (lowest pitch).
pub const SWEEP_START_HALF_PERIOD: Duration = Duration::from_micros(600);

/// Amount the half-period shrinks on every sweep pulse, raising the pitch.
pub const SWEEP_HALF_PERIOD_DECREMENT: Duration = Duration::from_nanos(500);

/// Floor for any half-period so a zero-length wait is never requested.
pub const MIN_HALF_PERIOD: Duration = Duration::from_micros(1);

/// A fixed-pitch tone: `pulses` high/low toggles at a constant half-period.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Tone {
    pub pulses: u32,
    pub half_period: Duration,
}

impl Tone {
    /// Creates a fixed-pitch tone plan.
    pub const fn new(pulses: u32, half_period: Duration) -> Self {
        Self {
            pulses,
            half_period,
        }
    }

    /// The tone sounded when the cab reaches a floor.
    pub const fn arrival() -> Self {
        Self::new(ARRIVAL_PULSES, ARRIVAL_HALF_PERIOD)
    }

    /// Wall-clock time the tone occupies (two half-periods per pulse).
    pub fn duration(&self) -> Duration {
        (self.half_period * 2) * self.pulses
    }
}

/// Half-period of a given pulse within one sweep repetition, clamped to
/// [`MIN_HALF_PERIOD`]. The pitch rises because the period only shrinks; it
/// resets at the start of the next repetition.
pub fn sweep_half_period(pulse_index: u32) -> Duration {
    let shrink = SWEEP_HALF_PERIOD_DECREMENT * pulse_index;
    let half = SWEEP_START_HALF_PERIOD.saturating_sub(shrink);
    if half < MIN_HALF_PERIOD {
        MIN_HALF_PERIOD
    } else {
        half
    }
}

/// Iterator over the half-period of every pulse in the full alarm tone:
/// [`SWEEP_REPEATS`] repetitions of [`SWEEP_PULSES`] ascending-pitch pulses.
#[derive(Copy, Clone, Debug, Default)]
pub struct AlarmSweep {
    repeat: u32,
    pulse: u32,
}

impl AlarmSweep {
    /// Creates the sweep positioned at its first pulse.
    pub const fn new() -> Self {
        Self {
            repeat: 0,
            pulse: 0,
        }
    }

    /// Total pulses across all repetitions.
    pub const fn total_pulses() -> u32 {
        SWEEP_REPEATS * SWEEP_PULSES
    }
}

impl Iterator for AlarmSweep {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.repeat >= SWEEP_REPEATS {
            return None;
        }
        let half = sweep_half_period(self.pulse);
        self.pulse += 1;
        if self.pulse == SWEEP_PULSES {
            self.pulse = 0;
            self.repeat += 1;
        }
        Some(half)
    }
}

/// Returns the full alarm tone sweep.
pub fn alarm_sweep() -> AlarmSweep {
    AlarmSweep::new()
}

/// Abstraction over the buzzer drive line.
pub trait BuzzerDriver {
    /// Drives the buzzer line high (`true`) or low. Fire-and-forget.
    fn set_active(&mut self, active: bool);
}

/// Buzzer driver that performs no hardware interaction.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopBuzzerDriver;

impl NoopBuzzerDriver {
    /// Creates a new no-op buzzer driver.
    pub const fn new() -> Self {
        Self
    }
}

impl BuzzerDriver for NoopBuzzerDriver {
    fn set_active(&mut self, _: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrival_tone_matches_fixed_plan() {
        let tone = Tone::arrival();
        assert_eq!(tone.pulses, 700);
        assert_eq!(tone.half_period, Duration::from_micros(300));
        assert_eq!(tone.duration(), Duration::from_micros(420_000));
    }

    #[test]
    fn sweep_emits_every_pulse() {
        assert_eq!(alarm_sweep().count(), 3_200);
        assert_eq!(AlarmSweep::total_pulses(), 3_200);
    }

    #[test]
    fn sweep_restarts_at_each_repetition() {
        let halves: heapless::Vec<Duration, 3_200> = alarm_sweep().collect();
        for repeat in 0..SWEEP_REPEATS as usize {
            let start = repeat * SWEEP_PULSES as usize;
            assert_eq!(halves[start], SWEEP_START_HALF_PERIOD);
        }
    }

    #[test]
    fn sweep_pitch_only_rises_within_a_repetition() {
        let mut sweep = alarm_sweep();
        let mut previous = sweep.next().expect("sweep has pulses");
        for half in sweep.by_ref().take(SWEEP_PULSES as usize - 1) {
            assert!(half <= previous);
            previous = half;
        }
        // 600 us minus 799 decrements of 0.5 us.
        assert_eq!(previous, Duration::from_nanos(200_500));
    }

    #[test]
    fn half_period_clamps_to_a_positive_floor() {
        // Far beyond where the linear sweep would cross zero.
        assert_eq!(sweep_half_period(2_000), MIN_HALF_PERIOD);
        assert!(sweep_half_period(u32::MAX) >= MIN_HALF_PERIOD);
    }
}
