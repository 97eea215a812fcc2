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

//! # Solver Results
//!
//! The objective-level outcome of a search and the reason it stopped.
//! Engines pair these with their own statistics and with whatever solution
//! representation their problems save.

use crate::num::ObjectiveValue;

/// Objective-level result of a search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolverResult<T> {
    /// We have proven that no solution exists (better than the a-priori bound).
    Infeasible,
    /// We have found a solution and proven its optimality.
    Optimal(T),
    /// We have found a feasible solution, but not proven its optimality.
    Feasible(T),
    /// The solver terminated without finding a solution and
    /// without proving infeasibility.
    Unknown,
}

impl<T> SolverResult<T>
where
    T: ObjectiveValue,
{
    /// Returns the objective of the best solution, if any was found.
    #[inline]
    pub fn objective(&self) -> Option<T> {
        match *self {
            SolverResult::Optimal(objective) | SolverResult::Feasible(objective) => {
                Some(objective)
            }
            SolverResult::Infeasible | SolverResult::Unknown => None,
        }
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolverResult::Optimal(_))
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        matches!(self, SolverResult::Feasible(_))
    }

    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self, SolverResult::Infeasible)
    }

    #[inline]
    pub fn has_solution(&self) -> bool {
        matches!(self, SolverResult::Optimal(_) | SolverResult::Feasible(_))
    }

    /// Returns the optimal objective.
    ///
    /// # Panics
    ///
    /// Panics if the result is not `Optimal`.
    #[inline]
    pub fn unwrap_optimal(&self) -> T {
        match *self {
            SolverResult::Optimal(objective) => objective,
            ref other => panic!(
                "called `SolverResult::unwrap_optimal()` on a non-optimal result: {}",
                other
            ),
        }
    }
}

impl<T> std::fmt::Display for SolverResult<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Infeasible => write!(f, "Infeasible"),
            SolverResult::Optimal(objective) => write!(f, "Optimal(objective={})", objective),
            SolverResult::Feasible(objective) => write!(f, "Feasible(objective={})", objective),
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Why a search stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The solver found and proved optimality of a solution.
    OptimalityProven,
    /// The solver proved that no solution exists.
    InfeasibilityProven,
    /// The solver aborted due to a search limit (nodes, iterations,
    /// cancellation, first solution, etc.).
    /// The string contains information about the reason for abortion.
    Aborted(String),
}

impl TerminationReason {
    /// Returns `true` if the search ran to a proof rather than being cut short.
    #[inline]
    pub fn is_proven(&self) -> bool {
        !matches!(self, TerminationReason::Aborted(_))
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}
