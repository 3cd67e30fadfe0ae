//! Town world clock and time-of-day periods.

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Time-of-day period keying NPC schedules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimePeriod {
    /// 06:00 - 12:00
    Morning,
    /// 12:00 - 18:00
    Afternoon,
    /// 18:00 - 22:00
    Evening,
    /// 22:00 - 06:00
    Night,
}

impl TimePeriod {
    pub const fn from_minute(minute_of_day: u32) -> Self {
        match minute_of_day / 60 {
            6..=11 => TimePeriod::Morning,
            12..=17 => TimePeriod::Afternoon,
            18..=21 => TimePeriod::Evening,
            _ => TimePeriod::Night,
        }
    }
}

/// Result of advancing the clock by one turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ClockAdvance {
    /// Set when the turn crossed into a new period.
    pub period_changed: Option<TimePeriod>,
    /// Set when the turn crossed midnight.
    pub new_day: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldClock {
    day: u32,
    minute: u32,
}

impl WorldClock {
    /// Sessions start on day 1 at 08:00.
    pub const START_MINUTE: u32 = 8 * 60;

    pub const fn new(day: u32, minute: u32) -> Self {
        Self {
            day,
            minute: minute % MINUTES_PER_DAY,
        }
    }

    pub const fn day(&self) -> u32 {
        self.day
    }

    pub const fn minute(&self) -> u32 {
        self.minute
    }

    pub const fn period(&self) -> TimePeriod {
        TimePeriod::from_minute(self.minute)
    }

    pub fn advance(&mut self, minutes: u32) -> ClockAdvance {
        let before = self.period();
        let total = self.minute + minutes;
        let mut advance = ClockAdvance::default();
        if total >= MINUTES_PER_DAY {
            self.day += total / MINUTES_PER_DAY;
            advance.new_day = Some(self.day);
        }
        self.minute = total % MINUTES_PER_DAY;
        let after = self.period();
        if after != before {
            advance.period_changed = Some(after);
        }
        advance
    }
}

impl Default for WorldClock {
    fn default() -> Self {
        Self::new(1, Self::START_MINUTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periods_cover_the_day() {
        assert_eq!(TimePeriod::from_minute(0), TimePeriod::Night);
        assert_eq!(TimePeriod::from_minute(6 * 60), TimePeriod::Morning);
        assert_eq!(TimePeriod::from_minute(12 * 60), TimePeriod::Afternoon);
        assert_eq!(TimePeriod::from_minute(21 * 60 + 59), TimePeriod::Evening);
        assert_eq!(TimePeriod::from_minute(22 * 60), TimePeriod::Night);
    }

    #[test]
    fn reports_period_boundary_once() {
        let mut clock = WorldClock::new(1, 11 * 60 + 55);
        let first = clock.advance(5);
        assert_eq!(first.period_changed, Some(TimePeriod::Afternoon));
        let second = clock.advance(5);
        assert_eq!(second.period_changed, None);
    }

    #[test]
    fn rolls_over_midnight() {
        let mut clock = WorldClock::new(1, 23 * 60 + 58);
        let advance = clock.advance(5);
        assert_eq!(advance.new_day, Some(2));
        assert_eq!(clock.minute(), 3);
        assert_eq!(advance.period_changed, None);
    }
}
