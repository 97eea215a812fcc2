// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Search Policy
//!
//! Two small pieces of pure decision logic drive the main loop:
//!
//! - `select_phase` chooses how the next active node is picked, trading off
//!   fast incumbent discovery (depth-first dives) against bound improvement
//!   (best-first selection) and memory (depth-first once the pool gets close
//!   to its budget).
//! - `CutoffRule` decides whether a bound can still improve on the incumbent.
//!
//! ## Phase rules
//!
//! Rules are evaluated in order, the first match wins:
//!
//! 1. The pool holds at least 90% of the node budget: `ExhaustiveDfs`.
//! 2. Not in exhaustive mode and fewer than `5 * depth` iterations ran:
//!    `InitialDfs`.
//! 3. Exhaustive mode, or the pool holds more than two thirds of the budget:
//!    `ExhaustiveBfs`.
//! 4. A dive is in progress (`0 < dfs_streak < depth`) or the iteration is a
//!    multiple of `2 * depth + 1`: `ExhaustiveDfs`.
//! 5. Otherwise: `ConstructBfs`.
//!
//! ## Cutoff
//!
//! A bound improves on the incumbent if the sign-adjusted gap
//! `adjust(incumbent) - adjust(bound)` is at least `margin - epsilon` once a
//! feasible solution is known, and at least `-epsilon` before that. The margin
//! encodes integrality of the objective: with integer objectives nothing
//! within one unit of the incumbent can be strictly better.

use crate::config::SearchLevel;
use cleft_search::{num::ObjectiveValue, sense::ObjectiveSense};

/// How the next active node is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchPhase {
    /// Early depth-first dive to find a first incumbent.
    InitialDfs,
    /// Best-first selection while still looking for good solutions.
    ConstructBfs,
    /// Depth-first selection, used for periodic dives and to cap memory.
    ExhaustiveDfs,
    /// Best-first selection to close the gap.
    ExhaustiveBfs,
}

impl SearchPhase {
    /// Returns `true` if the phase pops the most recently queued node.
    #[inline]
    pub fn is_depth_first(self) -> bool {
        matches!(self, SearchPhase::InitialDfs | SearchPhase::ExhaustiveDfs)
    }

    /// Returns `true` if the phase removes the node with the best bound.
    #[inline]
    pub fn is_best_first(self) -> bool {
        !self.is_depth_first()
    }
}

impl std::fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchPhase::InitialDfs => write!(f, "InitialDfs"),
            SearchPhase::ConstructBfs => write!(f, "ConstructBfs"),
            SearchPhase::ExhaustiveDfs => write!(f, "ExhaustiveDfs"),
            SearchPhase::ExhaustiveBfs => write!(f, "ExhaustiveBfs"),
        }
    }
}

/// The loop state the phase decision depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyInputs {
    pub level: SearchLevel,
    /// Number of completed iterations.
    pub iteration: u64,
    /// Number of unfixed variables at the root.
    pub depth: usize,
    /// Current number of active nodes.
    pub active: usize,
    pub node_limit: usize,
    /// Consecutive depth-first selections since the last best-first
    /// selection or incumbent update.
    pub dfs_streak: u64,
}

/// Chooses the selection phase for the next iteration.
pub fn select_phase(inputs: &PolicyInputs) -> SearchPhase {
    let active = inputs.active as u128;
    let node_limit = inputs.node_limit as u128;
    let depth = inputs.depth as u64;

    if active * 10 >= node_limit * 9 {
        return SearchPhase::ExhaustiveDfs;
    }

    if inputs.level != SearchLevel::Exhaustive && inputs.iteration < depth.saturating_mul(5) {
        return SearchPhase::InitialDfs;
    }

    if inputs.level == SearchLevel::Exhaustive || active * 3 > node_limit * 2 {
        return SearchPhase::ExhaustiveBfs;
    }

    let diving = inputs.dfs_streak > 0 && inputs.dfs_streak < depth;
    let probe_period = depth.saturating_mul(2).saturating_add(1);
    if diving || inputs.iteration % probe_period == 0 {
        return SearchPhase::ExhaustiveDfs;
    }

    SearchPhase::ConstructBfs
}

/// Bound-versus-incumbent test with a pruning margin and a tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutoffRule<T> {
    pub sense: ObjectiveSense,
    /// Sentinel the nodes report for an empty sub-tree.
    pub infeasibility: T,
    pub incumbent: T,
    pub found_feasible: bool,
    pub margin: T,
    pub epsilon: T,
}

impl<T> CutoffRule<T>
where
    T: ObjectiveValue,
{
    /// Returns `true` if a node with relaxation bound `bound` may still lead
    /// to a solution better than the incumbent.
    ///
    /// The infeasibility sentinel and NaN never improve.
    #[inline]
    pub fn improves(&self, bound: T) -> bool {
        if self.is_infeasible(bound) {
            return false;
        }

        let gap = self.sense.adjust(self.incumbent) - self.sense.adjust(bound);
        if gap.is_nan() {
            return false;
        }

        let required = if self.found_feasible {
            self.margin - self.epsilon
        } else {
            -self.epsilon
        };
        gap >= required
    }

    /// Returns `true` if `bound` is NaN, the nodes' sentinel, or the sense's
    /// own sentinel.
    #[inline]
    pub fn is_infeasible(&self, bound: T) -> bool {
        bound.is_nan() || bound == self.infeasibility || bound == self.sense.infeasibility()
    }
}
