//! Ordered "first matching rule wins" tables.
//!
//! One evaluator serves every prioritized table in the simulation: enemy slot
//! selection during population and NPC schedule selection. A [`RuleList`]
//! cannot be built without its unconditional fallback, so evaluation always
//! produces a value.

use crate::env::{NarrativeOracle, NarrativeValue};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule<C, T> {
    pub when: C,
    pub then: T,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleList<C, T> {
    rules: Vec<Rule<C, T>>,
    fallback: T,
}

impl<C, T> RuleList<C, T> {
    pub fn new(fallback: T) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    #[must_use]
    pub fn with_rule(mut self, when: C, then: T) -> Self {
        self.rules.push(Rule { when, then });
        self
    }

    pub fn push(&mut self, when: C, then: T) {
        self.rules.push(Rule { when, then });
    }

    /// Returns the result of the first rule whose condition holds, else the fallback.
    pub fn evaluate(&self, mut holds: impl FnMut(&C) -> bool) -> &T {
        self.rules
            .iter()
            .find(|rule| holds(&rule.when))
            .map_or(&self.fallback, |rule| &rule.then)
    }

    pub fn rules(&self) -> &[Rule<C, T>] {
        &self.rules
    }

    pub fn fallback(&self) -> &T {
        &self.fallback
    }
}

/// Predicate over narrative state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    Always,
    /// Variable is set and truthy.
    Flag(String),
    Equals(String, NarrativeValue),
    /// Integer variable is at least the given value (unset counts as 0).
    AtLeast(String, i64),
    AtNode { graph: String, node: String },
    Not(Box<Condition>),
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

impl Condition {
    pub fn holds(&self, narrative: &dyn NarrativeOracle) -> bool {
        match self {
            Condition::Always => true,
            Condition::Flag(name) => narrative
                .get_variable(name)
                .is_some_and(|value| value.is_truthy()),
            Condition::Equals(name, expected) => {
                narrative.get_variable(name).as_ref() == Some(expected)
            }
            Condition::AtLeast(name, min) => {
                narrative.get_variable(name).map_or(0, |value| value.as_int()) >= *min
            }
            Condition::AtNode { graph, node } => {
                narrative.current_node(graph).as_deref() == Some(node.as_str())
            }
            Condition::Not(inner) => !inner.holds(narrative),
            Condition::All(all) => all.iter().all(|c| c.holds(narrative)),
            Condition::Any(any) => any.iter().any(|c| c.holds(narrative)),
        }
    }

    /// Whether the condition reads `subject`, a variable or graph name.
    pub fn mentions(&self, subject: &str) -> bool {
        match self {
            Condition::Always => false,
            Condition::Flag(name) | Condition::Equals(name, _) | Condition::AtLeast(name, _) => {
                name == subject
            }
            Condition::AtNode { graph, .. } => graph == subject,
            Condition::Not(inner) => inner.mentions(subject),
            Condition::All(all) | Condition::Any(all) => all.iter().any(|c| c.mentions(subject)),
        }
    }
}

/// Enemy slot predicate: `depth >= min_depth && slot % modulus == remainder`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotRule {
    pub min_depth: u32,
    pub modulus: u32,
    pub remainder: u32,
}

impl SlotRule {
    pub const fn new(min_depth: u32, modulus: u32, remainder: u32) -> Self {
        Self {
            min_depth,
            modulus,
            remainder,
        }
    }

    pub fn matches(&self, slot: u32, depth: u32) -> bool {
        depth >= self.min_depth && self.modulus > 0 && slot % self.modulus == self.remainder
    }
}

/// Slot-and-depth table choosing an enemy template id per spawn slot.
pub type EnemyTable = RuleList<SlotRule, String>;

/// Table used when content provides none: trackers from depth 4, sentinels from depth 2.
pub fn default_enemy_table() -> EnemyTable {
    RuleList::new("drone".to_string())
        .with_rule(SlotRule::new(4, 4, 3), "tracker".to_string())
        .with_rule(SlotRule::new(2, 3, 1), "sentinel".to_string())
}
