//! Typed event log shared by firmware and host targets.
//!
//! The controller has no diagnostics transport; the recorder exists so the
//! firmware can mirror events to its log output and the emulator can replay
//! them in its REPL, both from the same bounded buffer.

use core::fmt;

use heapless::HistoryBuf;

use crate::cab::Floor;
use crate::motion::Direction;

/// Identifier assigned to each recorded event, monotonically increasing.
pub type EventId = u32;

/// Canonical timestamp units for telemetry records (microseconds).
pub type TimestampMicros = u64;

/// Records retained before the oldest is overwritten.
pub const TELEMETRY_CAPACITY: usize = 16;

/// Discriminated controller events.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EventKind {
    TravelStarted(Direction),
    FloorArrived(Floor),
    RequestIgnored,
    AlarmRaised,
    DescentStarted { cycles: u32 },
    ResetIssued,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::TravelStarted(Direction::Up) => f.write_str("travel-started up"),
            EventKind::TravelStarted(Direction::Down) => f.write_str("travel-started down"),
            EventKind::FloorArrived(floor) => {
                write!(f, "floor-arrived {}", floor.as_number())
            }
            EventKind::RequestIgnored => f.write_str("request-ignored"),
            EventKind::AlarmRaised => f.write_str("alarm-raised"),
            EventKind::DescentStarted { cycles } => {
                write!(f, "descent-started {cycles} cycles")
            }
            EventKind::ResetIssued => f.write_str("reset-issued"),
        }
    }
}

/// A single timestamped event.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TelemetryRecord {
    pub id: EventId,
    pub event: EventKind,
    pub timestamp_us: TimestampMicros,
}

/// Bounded event recorder; the oldest record is dropped once full.
#[derive(Default)]
pub struct TelemetryRecorder {
    records: HistoryBuf<TelemetryRecord, TELEMETRY_CAPACITY>,
    next_id: EventId,
}

impl TelemetryRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self {
            records: HistoryBuf::new(),
            next_id: 0,
        }
    }

    /// Appends an event and returns its identifier.
    pub fn record(&mut self, event: EventKind, timestamp_us: TimestampMicros) -> EventId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.records.write(TelemetryRecord {
            id,
            event,
            timestamp_us,
        });
        id
    }

    /// Number of records currently retained.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when no records are retained.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recently recorded event, if any.
    pub fn latest(&self) -> Option<&TelemetryRecord> {
        self.records.recent()
    }

    /// Iterates retained records from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &TelemetryRecord> {
        self.records.oldest_ordered()
    }
}
