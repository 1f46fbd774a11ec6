//! Per-(user, subject) difficulty state machine.
//!
//! Correct answers count toward promotion; a single incorrect answer demotes
//! immediately. Movement is one level at a time and clamped to
//! `[Beginner, top]`.

use serde::{Deserialize, Serialize};

use waypoint_core::config::AdaptiveSettings;
use waypoint_core::types::Difficulty;

/// What one outcome did to the target difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    Promoted { from: Difficulty, to: Difficulty },
    Demoted { from: Difficulty, to: Difficulty },
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptiveState {
    current: Difficulty,
    consecutive_correct: u32,
    consecutive_incorrect: u32,
    top: Difficulty,
    promote_after: u32,
}

impl AdaptiveState {
    /// Start at `start` on a beginner..advanced ladder, promoting after two
    /// consecutive correct answers.
    pub fn new(start: Difficulty) -> Self {
        Self::from_settings(start, &AdaptiveSettings::default())
    }

    pub fn from_settings(start: Difficulty, settings: &AdaptiveSettings) -> Self {
        Self {
            current: start,
            consecutive_correct: 0,
            consecutive_incorrect: 0,
            top: settings.top.max(start),
            promote_after: settings.promote_after.max(1),
        }
    }

    /// Raise the ceiling of the ladder (e.g. to `Expert` for banks that have
    /// expert items). A ceiling below the current level is lifted to it.
    pub fn with_top(mut self, top: Difficulty) -> Self {
        self.top = top.max(self.current);
        self
    }

    pub fn current(&self) -> Difficulty { self.current }

    pub fn top(&self) -> Difficulty { self.top }

    pub fn consecutive_correct(&self) -> u32 { self.consecutive_correct }

    pub fn consecutive_incorrect(&self) -> u32 { self.consecutive_incorrect }

    /// Apply one answer outcome.
    pub fn record(&mut self, correct: bool) -> Transition {
        let from = self.current;
        if correct {
            self.consecutive_correct += 1;
            self.consecutive_incorrect = 0;
            if self.consecutive_correct >= self.promote_after && self.current < self.top {
                if let Some(to) = self.current.harder() {
                    self.current = to;
                    self.consecutive_correct = 0;
                    return Transition::Promoted { from, to };
                }
            }
            Transition::Unchanged
        } else {
            self.consecutive_correct = 0;
            self.consecutive_incorrect += 1;
            match self.current.easier() {
                Some(to) => {
                    self.current = to;
                    Transition::Demoted { from, to }
                }
                None => Transition::Unchanged,
            }
        }
    }
}
