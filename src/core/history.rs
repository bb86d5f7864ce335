//! Transition history tracking.
//!
//! A machine records every effective transition, including the initial
//! `start`, in a bounded log of state names and timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single effective transition.
///
/// # Example
///
/// ```rust
/// use stance::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: None,
///     to: "closed".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert!(record.is_initial());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Name of the state being left; `None` for the first entry
    pub from: Option<String>,
    /// Name of the state being entered
    pub to: String,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    /// Check whether this record is the machine's first entry.
    pub fn is_initial(&self) -> bool {
        self.from.is_none()
    }
}

/// Bounded, ordered log of transitions.
///
/// Once `limit` records are held, the oldest is discarded for each new one.
/// A limit of 0 keeps nothing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionHistory {
    limit: usize,
    records: VecDeque<TransitionRecord>,
}

impl TransitionHistory {
    /// Create an empty history that keeps at most `limit` records.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            records: VecDeque::new(),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Append a record, evicting the oldest if the limit is reached.
    pub fn record(&mut self, record: TransitionRecord) {
        if self.limit == 0 {
            return;
        }
        while self.records.len() >= self.limit {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Get the names of the states traversed, oldest first.
    ///
    /// The `from` of the oldest retained record leads the path when present,
    /// followed by the `to` of each record.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stance::core::{TransitionHistory, TransitionRecord};
    /// use chrono::Utc;
    ///
    /// let mut history = TransitionHistory::with_limit(8);
    /// history.record(TransitionRecord { from: None, to: "red".into(), timestamp: Utc::now() });
    /// history.record(TransitionRecord {
    ///     from: Some("red".into()),
    ///     to: "green".into(),
    ///     timestamp: Utc::now(),
    /// });
    ///
    /// assert_eq!(history.path(), vec!["red", "green"]);
    /// ```
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(from) = self.records.front().and_then(|r| r.from.as_deref()) {
            path.push(from);
        }
        for record in &self.records {
            path.push(record.to.as_str());
        }
        path
    }

    /// Calculate the time between the oldest and newest retained records.
    ///
    /// Returns `None` if the history is empty.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(from: Option<&str>, to: &str) -> TransitionRecord {
        TransitionRecord {
            from: from.map(str::to_string),
            to: to.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = TransitionHistory::with_limit(4);
        assert!(history.is_empty());
        assert!(history.path().is_empty());
        assert!(history.duration().is_none());
        assert!(history.last().is_none());
    }

    #[test]
    fn path_follows_records() {
        let mut history = TransitionHistory::with_limit(8);
        history.record(record(None, "closed"));
        history.record(record(Some("closed"), "moving"));
        history.record(record(Some("moving"), "open"));

        assert_eq!(history.len(), 3);
        assert_eq!(history.path(), vec!["closed", "moving", "open"]);
        assert!(history.records().next().unwrap().is_initial());
    }

    #[test]
    fn oldest_records_are_evicted() {
        let mut history = TransitionHistory::with_limit(2);
        history.record(record(None, "a"));
        history.record(record(Some("a"), "b"));
        history.record(record(Some("b"), "c"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.path(), vec!["a", "b", "c"]);
        assert_eq!(history.last().unwrap().to, "c");
    }

    #[test]
    fn zero_limit_disables_recording() {
        let mut history = TransitionHistory::with_limit(0);
        history.record(record(None, "a"));
        assert!(history.is_empty());
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let mut history = TransitionHistory::with_limit(4);
        history.record(record(None, "a"));

        std::thread::sleep(Duration::from_millis(10));
        history.record(record(Some("a"), "b"));

        let duration = history.duration().unwrap();
        assert!(duration >= Duration::from_millis(10));
    }

    #[test]
    fn single_record_has_duration_zero() {
        let mut history = TransitionHistory::with_limit(4);
        history.record(record(None, "a"));
        assert_eq!(history.duration(), Some(Duration::from_secs(0)));
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history = TransitionHistory::with_limit(4);
        history.record(record(None, "red"));
        history.record(record(Some("red"), "green"));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: TransitionHistory = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.limit(), 4);
        assert_eq!(deserialized.path(), history.path());
    }
}
