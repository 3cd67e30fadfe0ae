use crate::env::NarrativeOracle;
use crate::rules::{Condition, RuleList};
use crate::state::{GoalKind, TimePeriod};

/// Goal per time-of-day period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DailySchedule {
    pub morning: GoalKind,
    pub afternoon: GoalKind,
    pub evening: GoalKind,
    pub night: GoalKind,
}

impl DailySchedule {
    pub const fn new(morning: GoalKind, afternoon: GoalKind, evening: GoalKind, night: GoalKind) -> Self {
        Self {
            morning,
            afternoon,
            evening,
            night,
        }
    }

    /// Same goal all day.
    pub const fn constant(goal: GoalKind) -> Self {
        Self::new(goal, goal, goal, goal)
    }

    pub const fn goal(&self, period: TimePeriod) -> GoalKind {
        match period {
            TimePeriod::Morning => self.morning,
            TimePeriod::Afternoon => self.afternoon,
            TimePeriod::Evening => self.evening,
            TimePeriod::Night => self.night,
        }
    }
}

impl Default for DailySchedule {
    fn default() -> Self {
        Self::new(GoalKind::Cafe, GoalKind::Wander, GoalKind::Garden, GoalKind::Home)
    }
}

/// Scheduled goal for the current period: first schedule whose condition holds.
pub fn scheduled_goal(
    schedules: &RuleList<Condition, DailySchedule>,
    narrative: &dyn NarrativeOracle,
    period: TimePeriod,
) -> GoalKind {
    schedules
        .evaluate(|condition| condition.holds(narrative))
        .goal(period)
}
