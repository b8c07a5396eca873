//! Undo/redo history of committed transitions.
//!
//! History is linear: recording from an undone position discards every
//! entry after the cursor, so there is never more than one redo branch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// The `(state, value)` pair captured when a transition committed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    /// The state that was entered
    pub state: String,
    /// That state's value right after the commit
    pub value: Value,
    /// When the transition committed
    pub timestamp: DateTime<Utc>,
}

impl Snapshot {
    /// Capture `state` and `value`, stamped with the current time.
    pub fn new(state: impl Into<String>, value: Value) -> Self {
        Self {
            state: state.into(),
            value,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered snapshots plus a cursor marking "now".
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use stated::{History, Snapshot};
///
/// let mut history = History::new();
/// history.record(Snapshot::new("water", json!("60F")));
/// history.record(Snapshot::new("ice", json!("32F")));
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.position(), 1);
/// assert_eq!(history.path(), vec!["water", "ice"]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "HistoryParts")]
pub struct History {
    entries: Vec<Snapshot>,
    current: usize,
    limit: Option<usize>,
}

/// Wire form of [`History`], checked before it becomes one.
#[derive(Deserialize)]
struct HistoryParts {
    entries: Vec<Snapshot>,
    current: usize,
    limit: Option<usize>,
}

impl TryFrom<HistoryParts> for History {
    type Error = String;

    fn try_from(parts: HistoryParts) -> Result<Self, Self::Error> {
        if let Some(limit) = parts.limit {
            if parts.entries.len() > limit {
                return Err(format!(
                    "history holds {} entries but its limit is {limit}",
                    parts.entries.len()
                ));
            }
        }
        let in_bounds = if parts.entries.is_empty() {
            parts.current == 0
        } else {
            parts.current < parts.entries.len()
        };
        if !in_bounds {
            return Err(format!(
                "history cursor {} is outside {} entries",
                parts.current,
                parts.entries.len()
            ));
        }
        Ok(Self {
            entries: parts.entries,
            current: parts.current,
            limit: parts.limit,
        })
    }
}

impl History {
    /// Create an unbounded, empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// History keeping at most `limit` snapshots; the oldest are evicted.
    ///
    /// A limit of zero keeps nothing: every recorded snapshot is evicted
    /// immediately.
    ///
    /// # Example
    ///
    /// ```rust
    /// use serde_json::json;
    /// use stated::{History, Snapshot};
    ///
    /// let mut history = History::with_limit(2);
    /// for state in ["a", "b", "c"] {
    ///     history.record(Snapshot::new(state, json!(null)));
    /// }
    ///
    /// assert_eq!(history.path(), vec!["b", "c"]);
    /// ```
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Append a snapshot after the cursor and move the cursor onto it.
    ///
    /// Any entries after the cursor (a stale redo branch) are dropped first.
    pub fn record(&mut self, snapshot: Snapshot) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.current + 1);
        }
        self.entries.push(snapshot);

        if let Some(limit) = self.limit {
            if self.entries.len() > limit {
                let excess = self.entries.len() - limit;
                self.entries.drain(..excess);
            }
        }

        self.current = self.entries.len().saturating_sub(1);
    }

    /// Index of the cursor. Zero for an empty history.
    pub fn position(&self) -> usize {
        self.current
    }

    /// The snapshot under the cursor.
    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.current)
    }

    /// Number of recorded snapshots, including any redo branch.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` until the first snapshot is recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Capacity, if the history is bounded.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Whether an older snapshot exists before the cursor.
    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.current > 0
    }

    /// Whether a newer snapshot exists after the cursor.
    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.current < self.entries.len() - 1
    }

    pub(crate) fn step_back(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.current -= 1;
        self.entries.get(self.current)
    }

    pub(crate) fn step_forward(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.current += 1;
        self.entries.get(self.current)
    }

    /// All snapshots, oldest first.
    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }

    /// State names of every recorded snapshot, oldest first.
    pub fn path(&self) -> Vec<&str> {
        self.entries.iter().map(|s| s.state.as_str()).collect()
    }

    /// Time between the oldest and newest snapshot.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.entries.first(), self.entries.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Drop every snapshot and rewind the cursor.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current = 0;
    }
}
