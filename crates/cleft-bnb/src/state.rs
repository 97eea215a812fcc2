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

//! Search progress snapshot
//!
//! `SearchProgress` is the read-only view of the main loop that monitors
//! receive. It is a small `Copy` value rebuilt once per iteration, so monitors
//! never hold a borrow into the engine.

use crate::policy::SearchPhase;
use cleft_search::{num::ObjectiveValue, sense::ObjectiveSense};

/// Snapshot of the loop state at the top of an iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchProgress<T> {
    pub sense: ObjectiveSense,
    /// Selection phase chosen for this iteration.
    pub phase: SearchPhase,
    /// Number of completed iterations.
    pub iteration: u64,
    /// Number of unfixed variables at the root.
    pub depth: usize,
    /// Number of active nodes.
    pub active: usize,
    /// Best objective found so far, or the a-priori bound.
    pub incumbent: T,
    /// Weakest relaxation bound over all active nodes.
    pub global_bound: T,
    pub found_feasible: bool,
}

impl<T> SearchProgress<T>
where
    T: ObjectiveValue,
{
    /// Returns the current proven lower bound on the optimum.
    #[inline]
    pub fn lower_bound(&self) -> T {
        self.sense.lower_and_upper(self.global_bound, self.incumbent).0
    }

    /// Returns the current upper bound on the optimum.
    #[inline]
    pub fn upper_bound(&self) -> T {
        self.sense.lower_and_upper(self.global_bound, self.incumbent).1
    }

    /// Returns the absolute gap between incumbent and global bound, or
    /// infinity while either is unbounded.
    #[inline]
    pub fn gap(&self) -> T {
        let gap = self.sense.adjust(self.incumbent) - self.sense.adjust(self.global_bound);
        if gap.is_finite() {
            gap.max(T::zero())
        } else {
            T::infinity()
        }
    }
}

impl<T> std::fmt::Display for SearchProgress<T>
where
    T: ObjectiveValue,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchProgress(iteration: {}, phase: {}, active: {}, bounds: [{}, {}])",
            self.iteration,
            self.phase,
            self.active,
            self.lower_bound(),
            self.upper_bound()
        )
    }
}
