//! Narrative-state collaborator interface.
//!
//! The simulation reads narrative variables to gate rule tables and writes
//! milestones back (kills, meetings, visits). It never waits on narrative
//! timing; notifications are drained synchronously once per turn.

use std::collections::{HashMap, HashSet};
use std::fmt;

/// Value stored in a narrative variable.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NarrativeValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl NarrativeValue {
    pub fn is_truthy(&self) -> bool {
        match self {
            NarrativeValue::Bool(flag) => *flag,
            NarrativeValue::Int(value) => *value != 0,
            NarrativeValue::Text(text) => !text.is_empty(),
        }
    }

    /// Integer view; booleans map to 0/1 and text to 0.
    pub fn as_int(&self) -> i64 {
        match self {
            NarrativeValue::Bool(flag) => i64::from(*flag),
            NarrativeValue::Int(value) => *value,
            NarrativeValue::Text(_) => 0,
        }
    }
}

impl fmt::Display for NarrativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NarrativeValue::Bool(flag) => write!(f, "{flag}"),
            NarrativeValue::Int(value) => write!(f, "{value}"),
            NarrativeValue::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    VariableChanged,
    NodeTransition,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    /// Variable name or graph name.
    pub subject: String,
}

pub trait NarrativeOracle {
    fn get_variable(&self, name: &str) -> Option<NarrativeValue>;

    fn set_variable(&mut self, name: &str, value: NarrativeValue, reason: &str);

    fn current_node(&self, graph: &str) -> Option<String>;

    fn subscribe(&mut self, kind: NotificationKind);

    /// Pending notifications for subscribed kinds, oldest first.
    fn drain_notifications(&mut self) -> Vec<Notification>;

    /// Adds one to an integer variable (unset counts as 0) and returns the new value.
    fn increment(&mut self, name: &str, reason: &str) -> i64 {
        let next = self.get_variable(name).map_or(0, |value| value.as_int()) + 1;
        self.set_variable(name, NarrativeValue::Int(next), reason);
        next
    }
}

/// In-memory narrative store for tests and the headless runner.
#[derive(Clone, Debug, Default)]
pub struct NarrativeMemory {
    variables: HashMap<String, NarrativeValue>,
    nodes: HashMap<String, String>,
    subscriptions: HashSet<NotificationKind>,
    pending: Vec<Notification>,
    history: Vec<(String, String)>,
}

impl NarrativeMemory {
    /// Moves a graph to `node`, notifying subscribers.
    pub fn set_node(&mut self, graph: &str, node: &str) {
        self.nodes.insert(graph.to_string(), node.to_string());
        self.notify(NotificationKind::NodeTransition, graph);
    }

    /// `(variable, reason)` pairs in write order.
    pub fn history(&self) -> &[(String, String)] {
        &self.history
    }

    fn notify(&mut self, kind: NotificationKind, subject: &str) {
        if self.subscriptions.contains(&kind) {
            self.pending.push(Notification {
                kind,
                subject: subject.to_string(),
            });
        }
    }
}

impl NarrativeOracle for NarrativeMemory {
    fn get_variable(&self, name: &str) -> Option<NarrativeValue> {
        self.variables.get(name).cloned()
    }

    fn set_variable(&mut self, name: &str, value: NarrativeValue, reason: &str) {
        self.history.push((name.to_string(), reason.to_string()));
        let changed = self.variables.get(name) != Some(&value);
        self.variables.insert(name.to_string(), value);
        if changed {
            self.notify(NotificationKind::VariableChanged, name);
        }
    }

    fn current_node(&self, graph: &str) -> Option<String> {
        self.nodes.get(graph).cloned()
    }

    fn subscribe(&mut self, kind: NotificationKind) {
        self.subscriptions.insert(kind);
    }

    fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }
}
