//! Per-tick movement candidate evaluation
//!
//! Candidates are registered in a fixed order, tagged blocked/unblocked,
//! and partitioned against a rectangular bound. The first valid candidate
//! in registration order is the chosen move: pure first-match, no scoring.

use crate::core::types::{MoveVector, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCandidate {
    pub delta: MoveVector,
    pub blocked: bool,
}

#[derive(Debug, Clone)]
pub struct EvaluationState {
    bound_width: i32,
    bound_height: i32,
    candidates: Vec<MoveCandidate>,
    valid: Vec<usize>,
    invalid: Vec<usize>,
    chosen: Option<usize>,
}

impl EvaluationState {
    pub fn new(bound_width: i32, bound_height: i32) -> Self {
        Self {
            bound_width,
            bound_height,
            candidates: Vec::new(),
            valid: Vec::new(),
            invalid: Vec::new(),
            chosen: None,
        }
    }

    pub fn set_bounds(&mut self, width: i32, height: i32) {
        self.bound_width = width;
        self.bound_height = height;
    }

    pub fn bounds(&self) -> (i32, i32) {
        (self.bound_width, self.bound_height)
    }

    /// Clear candidates and the last partition
    pub fn reset(&mut self) {
        self.candidates.clear();
        self.valid.clear();
        self.invalid.clear();
        self.chosen = None;
    }

    pub fn register(&mut self, dx: i32, dy: i32, blocked: bool) {
        self.candidates.push(MoveCandidate {
            delta: MoveVector::new(dx, dy),
            blocked,
        });
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Partition candidates into valid (unblocked and in-bounds from
    /// `origin`) and invalid; the first valid in registration order
    /// becomes the chosen move.
    pub fn rebuild(&mut self, origin: Position) {
        self.valid.clear();
        self.invalid.clear();
        self.chosen = None;

        for (idx, candidate) in self.candidates.iter().enumerate() {
            let target = origin.offset(candidate.delta.dx, candidate.delta.dy);
            let in_bounds = target.x >= 0
                && target.x < self.bound_width
                && target.y >= 0
                && target.y < self.bound_height;

            if !candidate.blocked && in_bounds {
                if self.chosen.is_none() {
                    self.chosen = Some(idx);
                }
                self.valid.push(idx);
            } else {
                self.invalid.push(idx);
            }
        }
    }

    pub fn valid_count(&self) -> usize {
        self.valid.len()
    }

    pub fn invalid_count(&self) -> usize {
        self.invalid.len()
    }

    /// The first valid candidate in registration order, if any
    pub fn chosen_move(&self) -> Option<MoveVector> {
        self.chosen.map(|idx| self.candidates[idx].delta)
    }
}
