//! Goal-directed town characters.
//!
//! Each NPC follows a daily schedule chosen by its profile's rule list, which
//! is re-evaluated against narrative state on every period change, and when a
//! variable or graph its rules read has changed. A talk override lets an NPC
//! seek out the player for a few ticks before giving up.
mod schedule;
mod scheduler;

pub use schedule::{DailySchedule, scheduled_goal};
pub use scheduler::{
    NpcContext, reselect_affected, reselect_all, reselect_goal, start_new_day, talk, tick_npc,
    tick_npcs,
};
