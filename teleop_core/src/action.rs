//! Discrete action selected by the left hand.

use crate::joint::Point;
use crate::region::RegionClassifier;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActionState {
    #[default]
    None,
    Fire,
    Intake,
}

impl ActionState {
    pub fn name(&self) -> &'static str {
        match self {
            ActionState::None   => "NONE",
            ActionState::Fire   => "FIRE",
            ActionState::Intake => "INTAKE",
        }
    }
}

impl std::fmt::Display for ActionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Holds the current action.  Only a tracked left hand can change it, and
/// when it does the state is recomputed from scratch.
///
/// A trigger selected while tracked stays selected after tracking is lost;
/// nothing times it out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionStateMachine {
    state: ActionState,
}

impl ActionStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ActionState { self.state }

    /// Recompute from a tracked left-hand position.  Returns true if the
    /// action changed.
    pub fn set(&mut self, left: Point, classifier: &RegionClassifier) -> bool {
        let next = classifier.classify_left(left);
        let changed = next != self.state;
        self.state = next;
        changed
    }
}
