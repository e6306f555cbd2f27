//! Transition history tracking.
//!
//! The machine keeps a bounded, ordered log of committed transitions. Records
//! hold names rather than states so the log can be serialized and handed to
//! other systems.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use uuid::Uuid;

/// Number of records a machine keeps unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Record of one committed transition.
///
/// # Example
///
/// ```rust
/// use krypton::core::TransitionRecord;
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let record = TransitionRecord {
///     id: Uuid::new_v4(),
///     event: "Arm".to_string(),
///     from: "Disarmed".to_string(),
///     to: "Armed".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.to, "Armed");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Identifier of the firing, shared with the `Transition` passed to hooks
    pub id: Uuid,
    /// Name of the event that fired
    pub event: String,
    /// Name of the state the machine left
    pub from: String,
    /// Name of the state the machine entered
    pub to: String,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of transitions.
///
/// Once the limit is reached the oldest record is dropped for each new one.
/// A limit of zero disables recording.
///
/// # Example
///
/// ```rust
/// use krypton::core::{History, TransitionRecord};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let mut history = History::with_limit(2);
/// for (from, to) in [("A", "B"), ("B", "C"), ("C", "D")] {
///     history.record(TransitionRecord {
///         id: Uuid::new_v4(),
///         event: format!("{from}-to-{to}"),
///         from: from.to_string(),
///         to: to.to_string(),
///         timestamp: Utc::now(),
///     });
/// }
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.get_path(), vec!["B", "C", "D"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct History {
    limit: usize,
    records: VecDeque<TransitionRecord>,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// Create an empty history with the default limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty history that keeps at most `limit` records.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            records: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT)),
        }
    }

    /// Append a record, evicting the oldest one when full.
    pub fn record(&mut self, record: TransitionRecord) {
        if self.limit == 0 {
            return;
        }
        if self.records.len() == self.limit {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Maximum number of retained records; zero disables recording.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent record, if any.
    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    /// Records from oldest to newest.
    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord> + '_ {
        self.records.iter()
    }

    /// State names traversed: the first retained `from`, then each `to`.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(first.from.as_str());
        }
        for record in &self.records {
            path.push(record.to.as_str());
        }
        path
    }

    /// Time between the oldest and newest retained records.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.front(), self.records.back()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }
}
