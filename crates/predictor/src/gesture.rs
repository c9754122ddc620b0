//! Double-press confirmation on the dedicated key.
//!
//! The confirmation key doubles as an ordinary modifier elsewhere, so a
//! single press never commits. Two presses in a row while a prediction is
//! ready do; any other key in between loses the gesture.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Nothing to do for this key
    Ignored,
    /// First press seen, waiting for the second
    Armed,
    /// Second press: commit the prediction
    Commit,
}

#[derive(Debug, Default)]
pub struct ConfirmGesture {
    armed: bool,
}

impl ConfirmGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Feed one key-down. `ready` is whether a prediction is waiting.
    pub fn on_key_down(&mut self, is_confirm_key: bool, ready: bool) -> GestureOutcome {
        if !is_confirm_key {
            self.armed = false;
            return GestureOutcome::Ignored;
        }
        if !ready {
            return GestureOutcome::Ignored;
        }
        if self.armed {
            self.armed = false;
            GestureOutcome::Commit
        } else {
            self.armed = true;
            GestureOutcome::Armed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_presses_commit() {
        let mut gesture = ConfirmGesture::new();
        assert_eq!(gesture.on_key_down(true, true), GestureOutcome::Armed);
        assert!(gesture.is_armed());
        assert_eq!(gesture.on_key_down(true, true), GestureOutcome::Commit);
        assert!(!gesture.is_armed());
    }

    #[test]
    fn test_other_key_loses_gesture() {
        let mut gesture = ConfirmGesture::new();
        gesture.on_key_down(true, true);
        assert_eq!(gesture.on_key_down(false, true), GestureOutcome::Ignored);
        assert!(!gesture.is_armed());
        // Must re-arm
        assert_eq!(gesture.on_key_down(true, true), GestureOutcome::Armed);
    }

    #[test]
    fn test_not_ready_does_nothing() {
        let mut gesture = ConfirmGesture::new();
        assert_eq!(gesture.on_key_down(true, false), GestureOutcome::Ignored);
        assert_eq!(gesture.on_key_down(true, false), GestureOutcome::Ignored);
        assert!(!gesture.is_armed());
    }
}
