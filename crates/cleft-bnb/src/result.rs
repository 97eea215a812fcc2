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

use crate::stats::BnbStatistics;
use cleft_search::{
    num::ObjectiveValue,
    result::{SolverResult, TerminationReason},
};

/// Result of a branch-and-bound run.
///
/// `lower_bound` and `upper_bound` are the final bounds the run proved (for a
/// proven run both equal the incumbent value). `solution` holds what the node
/// of the final incumbent returned from `save_solution`.
#[derive(Debug, Clone)]
pub struct BnbOutcome<T, S> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    statistics: BnbStatistics<T>,
    solution: Option<S>,
    lower_bound: T,
    upper_bound: T,
}

impl<T, S> BnbOutcome<T, S>
where
    T: ObjectiveValue,
{
    /// A run that proved `objective` optimal.
    #[inline]
    pub fn optimal(objective: T, solution: S, statistics: BnbStatistics<T>) -> Self {
        Self {
            result: SolverResult::Optimal(objective),
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
            solution: Some(solution),
            lower_bound: objective,
            upper_bound: objective,
        }
    }

    /// A run that proved no solution better than `bound` exists.
    ///
    /// `bound` is the a-priori bound of the run, or the infeasibility
    /// sentinel if none was given.
    #[inline]
    pub fn infeasible(bound: T, statistics: BnbStatistics<T>) -> Self {
        Self {
            result: SolverResult::Infeasible,
            termination_reason: TerminationReason::InfeasibilityProven,
            statistics,
            solution: None,
            lower_bound: bound,
            upper_bound: bound,
        }
    }

    /// A run stopped before a proof.
    ///
    /// `solution` carries the incumbent objective and solution if one was found.
    #[inline]
    pub fn aborted<R>(
        solution: Option<(T, S)>,
        reason: R,
        bounds: (T, T),
        statistics: BnbStatistics<T>,
    ) -> Self
    where
        R: Into<String>,
    {
        let (result, solution) = match solution {
            Some((objective, solution)) => (SolverResult::Feasible(objective), Some(solution)),
            None => (SolverResult::Unknown, None),
        };

        Self {
            result,
            termination_reason: TerminationReason::Aborted(reason.into()),
            statistics,
            solution,
            lower_bound: bounds.0,
            upper_bound: bounds.1,
        }
    }

    /// Returns the solver result.
    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    /// Returns the termination reason.
    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    /// Returns the run statistics.
    #[inline]
    pub fn statistics(&self) -> &BnbStatistics<T> {
        &self.statistics
    }

    /// Returns the incumbent solution, if any.
    #[inline]
    pub fn solution(&self) -> Option<&S> {
        self.solution.as_ref()
    }

    /// Consumes the outcome and returns the incumbent solution, if any.
    #[inline]
    pub fn into_solution(self) -> Option<S> {
        self.solution
    }

    /// Returns the incumbent objective, if any.
    #[inline]
    pub fn objective(&self) -> Option<T> {
        self.result.objective()
    }

    #[inline]
    pub fn lower_bound(&self) -> T {
        self.lower_bound
    }

    #[inline]
    pub fn upper_bound(&self) -> T {
        self.upper_bound
    }

    /// Returns `true` if the run finished with a proof.
    #[inline]
    pub fn is_proven(&self) -> bool {
        self.termination_reason.is_proven()
    }
}

impl<T, S> std::fmt::Display for BnbOutcome<T, S>
where
    T: ObjectiveValue,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}), bounds [{}, {}]",
            self.result, self.termination_reason, self.lower_bound, self.upper_bound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Outcome = BnbOutcome<f64, Vec<bool>>;

    #[test]
    fn test_optimal() {
        let outcome = Outcome::optimal(11.0, vec![false, true, false, true], BnbStatistics::default());
        assert!(outcome.is_proven());
        assert_eq!(outcome.result(), &SolverResult::Optimal(11.0));
        assert_eq!(outcome.objective(), Some(11.0));
        assert_eq!(outcome.lower_bound(), 11.0);
        assert_eq!(outcome.upper_bound(), 11.0);
        assert_eq!(outcome.solution(), Some(&vec![false, true, false, true]));
    }

    #[test]
    fn test_infeasible() {
        let outcome = Outcome::infeasible(f64::INFINITY, BnbStatistics::default());
        assert!(outcome.is_proven());
        assert!(outcome.result().is_infeasible());
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::InfeasibilityProven
        );
        assert_eq!(outcome.objective(), None);
        assert!(outcome.solution().is_none());
        assert_eq!(outcome.lower_bound(), f64::INFINITY);
    }

    #[test]
    fn test_aborted_with_and_without_solution() {
        let outcome = Outcome::aborted(
            Some((12.0, vec![true])),
            "node limit of 10 reached",
            (10.4, 12.0),
            BnbStatistics::default(),
        );
        assert!(!outcome.is_proven());
        assert_eq!(outcome.result(), &SolverResult::Feasible(12.0));
        assert_eq!(outcome.lower_bound(), 10.4);
        assert_eq!(outcome.upper_bound(), 12.0);
        match outcome.termination_reason() {
            TerminationReason::Aborted(msg) => assert_eq!(msg, "node limit of 10 reached"),
            other => panic!("expected Aborted, got {:?}", other),
        }
        assert_eq!(outcome.into_solution(), Some(vec![true]));

        let outcome = Outcome::aborted(
            None,
            "search cancelled",
            (10.4, f64::INFINITY),
            BnbStatistics::default(),
        );
        assert_eq!(outcome.result(), &SolverResult::Unknown);
        assert!(outcome.solution().is_none());
    }

    #[test]
    fn test_display() {
        let outcome = Outcome::optimal(11.0, vec![], BnbStatistics::default());
        let s = format!("{}", outcome);
        assert!(s.contains("bounds [11, 11]"), "unexpected display: {s}");
    }
}
