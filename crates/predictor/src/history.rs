//! Sliding window of recent keystrokes fed to the prompt.

use shared::keys::KeyEvent;
use std::collections::VecDeque;

/// Default number of keystrokes kept
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub struct InputHistory {
    keys: VecDeque<String>,
    limit: usize,
}

impl InputHistory {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            keys: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Append a key-down if it belongs in the history.
    ///
    /// Pointer buttons and Alt are never recorded. Returns whether the
    /// key was appended.
    pub fn record(&mut self, event: &KeyEvent) -> bool {
        if !event.is_down() || event.name.is_empty() || event.is_pointer() || event.is_alt() {
            return false;
        }
        if self.keys.len() == self.limit {
            self.keys.pop_front();
        }
        self.keys.push_back(event.name.clone());
        true
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Copy of the window; later recordings do not affect it.
    pub fn snapshot(&self) -> Vec<String> {
        self.keys.iter().cloned().collect()
    }

    /// JSON array form embedded in the prompt
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.keys).unwrap_or_else(|_| "[]".to_string())
    }
}

impl Default for InputHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut history = InputHistory::new();
        for key in ["H", "e", "l", "l", "o"] {
            assert!(history.record(&KeyEvent::down(key)));
        }
        assert_eq!(history.snapshot(), vec!["H", "e", "l", "l", "o"]);
        assert_eq!(history.to_json(), r#"["H","e","l","l","o"]"#);
    }

    #[test]
    fn test_excludes_pointer_alt_empty_and_up() {
        let mut history = InputHistory::new();
        assert!(!history.record(&KeyEvent::down("MOUSE LEFT")));
        assert!(!history.record(&KeyEvent::down("LEFT ALT")));
        assert!(!history.record(&KeyEvent::down("")));
        assert!(!history.record(&KeyEvent::up("a")));
        // Other modifiers still land in the history
        assert!(history.record(&KeyEvent::down("LEFT SHIFT")));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_evicts_oldest_past_limit() {
        let mut history = InputHistory::new();
        for i in 0..101 {
            history.record(&KeyEvent::down(format!("k{}", i)));
        }
        assert_eq!(history.len(), 100);
        let snapshot = history.snapshot();
        assert_eq!(snapshot.first().map(String::as_str), Some("k1"));
        assert_eq!(snapshot.last().map(String::as_str), Some("k100"));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut history = InputHistory::with_limit(3);
        history.record(&KeyEvent::down("a"));
        let snapshot = history.snapshot();
        history.record(&KeyEvent::down("b"));
        assert_eq!(snapshot, vec!["a"]);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_zero_limit_keeps_one() {
        let mut history = InputHistory::with_limit(0);
        history.record(&KeyEvent::down("a"));
        history.record(&KeyEvent::down("b"));
        assert_eq!(history.snapshot(), vec!["b"]);
    }
}
