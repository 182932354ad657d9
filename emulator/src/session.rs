use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant as HostInstant};

use elevator_core::alarm::{
    FLASH_STEPS, PANEL_CLEAR_HOLD, descent_plan, residual_steps,
};
use elevator_core::cab::{ARRIVAL_SETTLE, BOARDING_DELAY, CabState, RequestInput};
use elevator_core::motion::{NoopCoilDriver, StepTracker, run_plan};
use elevator_core::panel::PanelFrame;
use elevator_core::telemetry::{EventKind, TelemetryRecorder};
use elevator_core::tone::{
    AlarmSweep, SWEEP_PULSES, SWEEP_START_HALF_PERIOD, Tone, alarm_sweep, sweep_half_period,
};

pub const DEFAULT_LOG_PATH: &str = "logs/elevator-session.log";

pub const HELP_TOPICS: &[(&str, &str)] = &[
    (
        "up",
        "up         - press the up call button (one floor up if possible)",
    ),
    (
        "down",
        "down       - press the down call button (one floor down if possible)",
    ),
    (
        "both",
        "both       - press both call buttons at once (cancels out)",
    ),
    (
        "alarm",
        "alarm      - trip the fire alarm: flash, siren, descend, reset",
    ),
    (
        "status",
        "status     - display floor, raw position, and simulated clock",
    ),
    (
        "telemetry",
        "telemetry  - list the retained controller events",
    ),
    ("help", "help [topic] - show help for a command"),
];

pub struct Session {
    cab: CabState,
    tracker: StepTracker,
    telemetry: TelemetryRecorder,
    transcript: TranscriptLogger,
    started_at: HostInstant,
    // Simulated wall clock; advances by the durations the firmware would
    // actually spend waiting, so timestamps are deterministic.
    clock: Duration,
}

impl Session {
    pub fn new(log_path: &str) -> io::Result<Self> {
        let transcript = TranscriptLogger::new(log_path)?;
        Ok(Self {
            cab: CabState::new(),
            tracker: StepTracker::new(),
            telemetry: TelemetryRecorder::new(),
            transcript,
            started_at: HostInstant::now(),
            clock: Duration::ZERO,
        })
    }

    pub fn handle_command(&mut self, line: &str) -> io::Result<Vec<String>> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let elapsed = self.started_at.elapsed();
        self.transcript
            .append_line(elapsed, TranscriptRole::Host, trimmed)?;

        if trimmed.eq_ignore_ascii_case("help") {
            return self.handle_help(None, elapsed);
        }
        if let Some(rest) = trimmed.strip_prefix("help ") {
            return self.handle_help(Some(rest.trim()), elapsed);
        }

        let lines = if trimmed.eq_ignore_ascii_case("up") {
            self.handle_request(RequestInput::new(true, false))
        } else if trimmed.eq_ignore_ascii_case("down") {
            self.handle_request(RequestInput::new(false, true))
        } else if trimmed.eq_ignore_ascii_case("both") {
            self.handle_request(RequestInput::new(true, true))
        } else if trimmed.eq_ignore_ascii_case("alarm") {
            self.handle_alarm()
        } else if trimmed.eq_ignore_ascii_case("status") {
            self.handle_status()
        } else if trimmed.eq_ignore_ascii_case("telemetry") {
            self.handle_telemetry()
        } else {
            vec![format!(
                "ERR unknown command `{trimmed}` (try `help`)"
            )]
        };

        self.record_output(elapsed, &lines)?;
        Ok(lines)
    }

    fn handle_request(&mut self, input: RequestInput) -> Vec<String> {
        let Some(plan) = self.cab.plan_travel(input) else {
            self.record_event(EventKind::RequestIgnored);
            return vec![
                "request ignored (out of range or both buttons held)".to_string(),
            ];
        };

        let origin = self.cab.floor();
        self.record_event(EventKind::TravelStarted(plan.direction));

        let mut lines = Vec::new();
        lines.push(format!(
            "OK travel floor {} -> {}",
            origin.as_number(),
            plan.destination.as_number()
        ));
        lines.push(format!(
            "  boarding hold {}",
            format_duration_short(BOARDING_DELAY)
        ));
        self.clock += BOARDING_DELAY;

        lines.push(format!(
            "  motor: {} phase changes over {}",
            plan.motion.phase_count(),
            format_duration_short(plan.motion.duration())
        ));
        let mut driver = NoopCoilDriver::new();
        let clock = &mut self.clock;
        run_plan(&plan.motion, &mut driver, &mut self.tracker, |pause| {
            *clock += pause;
        });

        lines.push(format!(
            "  settle {}",
            format_duration_short(ARRIVAL_SETTLE)
        ));
        self.clock += ARRIVAL_SETTLE;

        let tone = Tone::arrival();
        lines.push(format!(
            "  arrival tone: {} pulses over {}",
            tone.pulses,
            format_duration_short(tone.duration())
        ));
        self.clock += tone.duration();

        self.cab.arrive(plan.destination);
        self.record_event(EventKind::FloorArrived(plan.destination));
        lines.push(format!(
            "arrived: floor {} position={}",
            self.cab.floor().as_number(),
            self.tracker.position()
        ));
        lines
    }

    fn handle_alarm(&mut self) -> Vec<String> {
        self.record_event(EventKind::AlarmRaised);

        let mut lines = Vec::new();
        lines.push("ALARM fire input asserted, normal service stopped".to_string());

        lines.push(format!(
            "  panel blanked for {}",
            format_duration_short(PANEL_CLEAR_HOLD)
        ));
        self.clock += PANEL_CLEAR_HOLD;

        for step in &FLASH_STEPS {
            let indication = if step.frame.alarm_lamp {
                "lamp lit, display `F`"
            } else {
                "lamp dark, display blank"
            };
            lines.push(format!(
                "  flash: {indication} for {}",
                format_duration_short(step.hold)
            ));
            self.clock += step.hold;
        }

        let final_half = sweep_half_period(SWEEP_PULSES - 1);
        let mut siren = Duration::ZERO;
        for half in alarm_sweep() {
            siren += half * 2;
        }
        lines.push(format!(
            "  siren: {} pulses, half-period {} down to {}, over {}",
            AlarmSweep::total_pulses(),
            format_duration_short(SWEEP_START_HALF_PERIOD),
            format_duration_short(final_half),
            format_duration_short(siren)
        ));
        self.clock += siren;

        let position = self.tracker.position();
        let plan = descent_plan(position);
        self.record_event(EventKind::DescentStarted { cycles: plan.cycles });
        lines.push(format!(
            "  descent: {} cycles from position {} ({} micro-steps of drift left)",
            plan.cycles,
            position,
            residual_steps(position)
        ));
        let mut driver = NoopCoilDriver::new();
        let clock = &mut self.clock;
        run_plan(&plan, &mut driver, &mut self.tracker, |pause| {
            *clock += pause;
        });
        lines.push(format!(
            "  descent complete at position {}",
            self.tracker.position()
        ));

        self.record_event(EventKind::ResetIssued);
        // The reset re-runs initialization from scratch: ground floor, zero
        // position. The host-side telemetry log survives.
        self.cab = CabState::new();
        self.tracker = StepTracker::new();
        lines.push("RESET controller restarted at floor 1, position 0".to_string());
        lines
    }

    fn handle_status(&mut self) -> Vec<String> {
        let frame = PanelFrame::for_floor(self.cab.floor());
        let lamps: Vec<String> = frame
            .floor_lamps
            .iter()
            .map(|lit| if *lit { "*".to_string() } else { ".".to_string() })
            .collect();
        vec![
            format!("floor     {}", self.cab.floor().as_number()),
            format!("position  {} micro-steps", self.tracker.position()),
            format!("lamps     [{}]", lamps.join(" ")),
            format!("clock     +{}", format_duration_short(self.clock)),
        ]
    }

    fn handle_telemetry(&mut self) -> Vec<String> {
        if self.telemetry.is_empty() {
            return vec!["no events recorded".to_string()];
        }
        self.telemetry
            .iter()
            .map(|record| {
                format!(
                    "[{:>3}] +{:>9}us {}",
                    record.id, record.timestamp_us, record.event
                )
            })
            .collect()
    }

    fn handle_help(&mut self, topic: Option<&str>, elapsed: Duration) -> io::Result<Vec<String>> {
        let mut lines = Vec::new();
        match topic {
            Some(target) if !target.is_empty() => {
                if let Some((_, detail)) = HELP_TOPICS
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(target))
                {
                    lines.push((*detail).to_string());
                } else {
                    lines.push(format!("No help available for `{target}`."));
                    lines.push(format!("Available topics: {}", help_topic_list()));
                }
            }
            _ => {
                lines.push("Available commands:".to_string());
                for (_, detail) in HELP_TOPICS {
                    lines.push(format!("  {detail}"));
                }
                lines.push("Type `help <topic>` for a specific command.".to_string());
            }
        }

        self.record_output(elapsed, &lines)?;
        Ok(lines)
    }

    fn record_event(&mut self, event: EventKind) {
        let timestamp = u64::try_from(self.clock.as_micros()).unwrap_or(u64::MAX);
        self.telemetry.record(event, timestamp);
    }

    fn record_output(&mut self, elapsed: Duration, lines: &[String]) -> io::Result<()> {
        for line in lines {
            self.transcript
                .append_line(elapsed, TranscriptRole::Emulator, line)?;
        }
        Ok(())
    }
}

struct TranscriptLogger {
    writer: BufWriter<std::fs::File>,
}

impl TranscriptLogger {
    fn new(log_path: &str) -> io::Result<Self> {
        let path = Path::new(log_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut logger = Self {
            writer: BufWriter::new(file),
        };

        logger.write_header()?;
        Ok(logger)
    }

    fn write_header(&mut self) -> io::Result<()> {
        writeln!(self.writer, "# Elevator Emulator session transcript")?;
        writeln!(
            self.writer,
            "# Timestamps are milliseconds since session start"
        )?;
        writeln!(self.writer)?;
        self.writer.flush()
    }

    fn append_line(
        &mut self,
        elapsed: Duration,
        role: TranscriptRole,
        line: &str,
    ) -> io::Result<()> {
        writeln!(
            self.writer,
            "[+{:>6} ms] {} {}",
            elapsed.as_millis(),
            role.prefix(),
            line
        )?;
        self.writer.flush()
    }
}

enum TranscriptRole {
    Host,
    Emulator,
}

impl TranscriptRole {
    fn prefix(&self) -> &'static str {
        match self {
            TranscriptRole::Host => "HOST>",
            TranscriptRole::Emulator => "EMU <",
        }
    }
}

fn help_topic_list() -> String {
    let mut buffer = String::new();
    for (index, (name, _)) in HELP_TOPICS.iter().enumerate() {
        if index > 0 {
            buffer.push_str(", ");
        }
        buffer.push_str(name);
    }
    buffer
}

fn format_duration_short(duration: Duration) -> String {
    if duration.as_secs() == 0 && duration.subsec_nanos() % 1_000_000 == 0 {
        format!("{}ms", duration.as_millis())
    } else if duration.as_secs() == 0 {
        format!("{}us", duration.as_micros())
    } else {
        format!("{:.3}s", duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session(name: &str) -> Session {
        let path = std::env::temp_dir().join(format!("elevator-emulator-{name}.log"));
        Session::new(path.to_str().expect("temp path is valid UTF-8")).expect("session opens")
    }

    #[test]
    fn travel_moves_one_floor_and_reports_arrival() {
        let mut session = test_session("travel");
        let lines = session.handle_command("up").expect("command runs");
        assert!(lines[0].contains("floor 1 -> 2"));
        assert!(lines.last().expect("has output").contains("position=144"));
    }

    #[test]
    fn out_of_range_request_is_ignored() {
        let mut session = test_session("ignored");
        let lines = session.handle_command("down").expect("command runs");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("ignored"));
    }

    #[test]
    fn both_buttons_cancel_out() {
        let mut session = test_session("both");
        let lines = session.handle_command("both").expect("command runs");
        assert!(lines[0].contains("ignored"));
    }

    #[test]
    fn alarm_descends_and_restarts_at_ground() {
        let mut session = test_session("alarm");
        session.handle_command("up").expect("command runs");
        session.handle_command("up").expect("command runs");
        let lines = session.handle_command("alarm").expect("command runs");
        assert!(
            lines
                .iter()
                .any(|line| line.contains("descent: 72 cycles from position 288"))
        );
        assert!(lines.last().expect("has output").contains("floor 1, position 0"));

        let status = session.handle_command("status").expect("command runs");
        assert!(status[0].ends_with('1'));
        assert!(status[1].contains("0 micro-steps"));
    }

    #[test]
    fn telemetry_lists_events_oldest_first() {
        let mut session = test_session("telemetry");
        session.handle_command("up").expect("command runs");
        session.handle_command("both").expect("command runs");
        let lines = session.handle_command("telemetry").expect("command runs");
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("travel-started up"));
        assert!(lines[1].contains("floor-arrived 2"));
        assert!(lines[2].contains("request-ignored"));
    }

    #[test]
    fn unknown_commands_report_an_error() {
        let mut session = test_session("unknown");
        let lines = session.handle_command("open doors").expect("command runs");
        assert!(lines[0].starts_with("ERR unknown command"));
    }
}
