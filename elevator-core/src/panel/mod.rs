//! Indicator lamp and 7-segment frame computation.
//!
//! A [`PanelFrame`] is a pure function of the cab state: one floor lamp lit,
//! the matching digit glyph on the display. Applying the same frame twice is
//! harmless; the control loop refreshes the panel every pass.

use crate::cab::Floor;

/// Number of floor indicator lamps.
pub const FLOOR_LAMP_COUNT: usize = 3;

/// Number of display segment lines (a through g).
pub const SEGMENT_COUNT: usize = 7;

/// A 7-segment glyph. Stored as logical "segment lit" flags; the wiring is
/// active-low, so [`SegmentPattern::line_levels`] inverts on the way out.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SegmentPattern {
    lit: [bool; SEGMENT_COUNT],
}

impl SegmentPattern {
    /// Glyph with every segment dark.
    pub const BLANK: Self = Self::from_lit([false; SEGMENT_COUNT]);

    /// Digit `1`: segments b and c.
    pub const DIGIT_1: Self = Self::from_lit([false, true, true, false, false, false, false]);

    /// Digit `2`: segments a, b, d, e, and g.
    pub const DIGIT_2: Self = Self::from_lit([true, true, false, true, true, false, true]);

    /// Digit `3`: segments a, b, c, d, and g.
    pub const DIGIT_3: Self = Self::from_lit([true, true, true, true, false, false, true]);

    /// Letter `F`: segments a, e, f, and g. Shown during the fire alarm.
    pub const LETTER_F: Self = Self::from_lit([true, false, false, false, true, true, true]);

    /// Builds a pattern from logical segment states (`true` = lit).
    pub const fn from_lit(lit: [bool; SEGMENT_COUNT]) -> Self {
        Self { lit }
    }

    /// Glyph for a floor number.
    pub const fn for_floor(floor: Floor) -> Self {
        match floor {
            Floor::First => Self::DIGIT_1,
            Floor::Second => Self::DIGIT_2,
            Floor::Third => Self::DIGIT_3,
        }
    }

    /// Logical segment states in a..g order (`true` = lit).
    pub const fn lit_segments(self) -> [bool; SEGMENT_COUNT] {
        self.lit
    }

    /// Electrical levels for the segment lines in a..g order. The display is
    /// active-low: `false` drives the line low and lights the segment.
    pub const fn line_levels(self) -> [bool; SEGMENT_COUNT] {
        let mut levels = [true; SEGMENT_COUNT];
        let mut index = 0;
        while index < SEGMENT_COUNT {
            levels[index] = !self.lit[index];
            index += 1;
        }
        levels
    }
}

/// Complete output state of the indicator panel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PanelFrame {
    /// Floor lamps for floors 1..=3 (`true` = lit, active-high).
    pub floor_lamps: [bool; FLOOR_LAMP_COUNT],
    /// Fire alarm lamp (`true` = lit, active-high).
    pub alarm_lamp: bool,
    /// Glyph on the 7-segment display.
    pub glyph: SegmentPattern,
}

impl PanelFrame {
    /// Frame with every lamp dark and the display blank.
    pub const fn blank() -> Self {
        Self {
            floor_lamps: [false; FLOOR_LAMP_COUNT],
            alarm_lamp: false,
            glyph: SegmentPattern::BLANK,
        }
    }

    /// Normal-operation frame: exactly one floor lamp lit plus the digit
    /// glyph for that floor.
    pub const fn for_floor(floor: Floor) -> Self {
        let mut floor_lamps = [false; FLOOR_LAMP_COUNT];
        floor_lamps[(floor.as_number() - 1) as usize] = true;
        Self {
            floor_lamps,
            alarm_lamp: false,
            glyph: SegmentPattern::for_floor(floor),
        }
    }

    /// One phase of the fire-alarm flash: lamp off with a blank display, or
    /// lamp on with the letter `F`.
    pub const fn alarm_flash(lamp_on: bool) -> Self {
        Self {
            floor_lamps: [false; FLOOR_LAMP_COUNT],
            alarm_lamp: lamp_on,
            glyph: if lamp_on {
                SegmentPattern::LETTER_F
            } else {
                SegmentPattern::BLANK
            },
        }
    }
}

/// Abstraction over the physical lamp and segment outputs.
pub trait PanelDriver {
    /// Writes a frame to the panel outputs. Fire-and-forget; cannot fail.
    fn apply(&mut self, frame: &PanelFrame);
}

/// Panel driver that performs no hardware interaction.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopPanelDriver;

impl NoopPanelDriver {
    /// Creates a new no-op panel driver.
    pub const fn new() -> Self {
        Self
    }
}

impl PanelDriver for NoopPanelDriver {
    fn apply(&mut self, _: &PanelFrame) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_count(pattern: SegmentPattern) -> usize {
        pattern.lit_segments().iter().filter(|lit| **lit).count()
    }

    #[test]
    fn floor_frames_light_exactly_one_lamp() {
        for floor in [Floor::First, Floor::Second, Floor::Third] {
            let frame = PanelFrame::for_floor(floor);
            let lit = frame.floor_lamps.iter().filter(|on| **on).count();
            assert_eq!(lit, 1);
            assert!(frame.floor_lamps[(floor.as_number() - 1) as usize]);
            assert!(!frame.alarm_lamp);
        }
    }

    #[test]
    fn frame_computation_is_idempotent() {
        assert_eq!(
            PanelFrame::for_floor(Floor::Second),
            PanelFrame::for_floor(Floor::Second)
        );
    }

    #[test]
    fn digit_glyphs_match_their_segments() {
        assert_eq!(lit_count(SegmentPattern::DIGIT_1), 2);
        assert_eq!(lit_count(SegmentPattern::DIGIT_2), 5);
        assert_eq!(lit_count(SegmentPattern::DIGIT_3), 5);
        assert_eq!(lit_count(SegmentPattern::LETTER_F), 4);
        assert_eq!(lit_count(SegmentPattern::BLANK), 0);
    }

    #[test]
    fn line_levels_are_active_low() {
        let levels = SegmentPattern::DIGIT_1.line_levels();
        // Segments b and c are lit, so their lines sit low.
        assert_eq!(levels, [true, false, false, true, true, true, true]);
        assert_eq!(
            SegmentPattern::BLANK.line_levels(),
            [true; SEGMENT_COUNT],
            "a blank display releases every line high"
        );
    }

    #[test]
    fn alarm_flash_frames_alternate_lamp_and_glyph() {
        let dark = PanelFrame::alarm_flash(false);
        assert!(!dark.alarm_lamp);
        assert_eq!(dark.glyph, SegmentPattern::BLANK);

        let lit = PanelFrame::alarm_flash(true);
        assert!(lit.alarm_lamp);
        assert_eq!(lit.glyph, SegmentPattern::LETTER_F);
        assert_eq!(lit.floor_lamps, [false; FLOOR_LAMP_COUNT]);
    }
}
