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

//! Branch node contract
//!
//! A `BranchNode` is one sub-problem of the search: the original problem with
//! some of its branching variables fixed. Concrete problem families (integer
//! programs, graph colouring, maximum cut, stable sets) implement the trait;
//! the engine itself never looks inside a node.
//!
//! `Subproblem` is the engine-side record wrapped around every user node. It
//! memoizes the relaxation bound and invalidates the memo whenever the fixed
//! variable set changes, so `solve_relaxation` runs at most once per distinct
//! sub-problem.

use cleft_search::{num::ObjectiveValue, sense::ObjectiveSense};

/// Which child of a branching step is explored first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchDirection {
    /// Explore the child with the variable fixed to its upper extreme first.
    RaiseFirst,
    /// Explore the child with the variable fixed to its lower extreme first.
    LowerFirst,
}

impl std::fmt::Display for BranchDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BranchDirection::RaiseFirst => write!(f, "RaiseFirst"),
            BranchDirection::LowerFirst => write!(f, "LowerFirst"),
        }
    }
}

/// Collaborator contract every problem family implements.
///
/// `Clone` is the deep copy used by branching: the clone must be
/// indistinguishable from the original except that mutating one never
/// affects the other.
pub trait BranchNode<T>: Clone
where
    T: ObjectiveValue,
{
    /// The solution representation handed out by `save_solution`.
    type Solution;

    /// Total number of branching variables. Identical for every node
    /// derived from the same root.
    fn variable_count(&self) -> usize;

    /// Number of variables not yet fixed to a single value.
    /// Never increases through `raise` or `lower`.
    fn unfixed(&self) -> usize;

    /// Direction of optimisation of the problem family.
    fn objective_sense(&self) -> ObjectiveSense;

    /// Chooses the variable to branch on among the unfixed ones.
    ///
    /// Only called on nodes that are not feasible. Returning `None` there is
    /// a contract violation that aborts the search with
    /// `SchemeError::NoBranchingVariable`.
    fn select_variable(&self) -> Option<usize>;

    /// Child to explore first while no feasible solution is known.
    fn direction_constructive(&self, variable: usize) -> BranchDirection;

    /// Child to explore first once a feasible solution is known.
    fn direction_exhaustive(&self, variable: usize) -> BranchDirection {
        self.direction_constructive(variable)
    }

    /// Fixes `variable` to its upper extreme.
    fn raise(&mut self, variable: usize);

    /// Fixes `variable` to its lower extreme.
    fn lower(&mut self, variable: usize);

    /// Solves the relaxation of this sub-problem and returns its bound,
    /// or `infeasibility()` if no solution is obtainable from here.
    fn solve_relaxation(&mut self) -> T;

    /// Sentinel bound of a sub-problem without solutions.
    fn infeasibility(&self) -> T {
        self.objective_sense().infeasibility()
    }

    /// Returns `true` if the last relaxation result is already a solution of
    /// the original, non-relaxed problem.
    fn is_feasible(&self) -> bool;

    /// Cheap post-processing of a just-found feasible solution with the given
    /// objective. Returns the objective after improvement.
    fn local_search(&mut self, objective: T) -> T {
        objective
    }

    /// Extracts the solution of this node. Called exactly once per accepted
    /// incumbent.
    fn save_solution(&self) -> Self::Solution;
}

/// Engine-side record of a node: the user node plus its memoized bound.
#[derive(Debug, Clone)]
pub struct Subproblem<N, T> {
    node: N,
    cached_objective: T,
    solved: bool,
}

impl<N, T> Subproblem<N, T>
where
    N: BranchNode<T>,
    T: ObjectiveValue,
{
    /// Wraps a node whose relaxation has not been solved yet.
    #[inline]
    pub fn new(node: N) -> Self {
        let cached_objective = node.infeasibility();
        Self {
            node,
            cached_objective,
            solved: false,
        }
    }

    /// Returns the wrapped node.
    #[inline]
    pub fn node(&self) -> &N {
        &self.node
    }

    /// Consumes the record and returns the wrapped node.
    #[inline]
    pub fn into_inner(self) -> N {
        self.node
    }

    /// Returns `true` if the relaxation bound is memoized.
    #[inline]
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Returns the relaxation bound, solving the relaxation on first access.
    #[inline]
    pub fn objective(&mut self) -> T {
        if !self.solved {
            self.cached_objective = self.node.solve_relaxation();
            self.solved = true;
        }
        self.cached_objective
    }

    /// Returns the memoized bound without solving.
    ///
    /// Nodes inside the active pool are always solved; for an unsolved node
    /// this is the infeasibility sentinel.
    #[inline]
    pub fn bound(&self) -> T {
        debug_assert!(
            self.solved,
            "called `Subproblem::bound` on a node whose relaxation has not been solved"
        );
        self.cached_objective
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.node.is_feasible()
    }

    #[inline]
    pub fn local_search(&mut self, objective: T) -> T {
        self.node.local_search(objective)
    }

    #[inline]
    pub fn save_solution(&self) -> N::Solution {
        self.node.save_solution()
    }

    /// Fixes `variable` up and invalidates the memoized bound.
    #[inline]
    pub fn raise(&mut self, variable: usize) {
        self.fix_with(variable, N::raise);
    }

    /// Fixes `variable` down and invalidates the memoized bound.
    #[inline]
    pub fn lower(&mut self, variable: usize) {
        self.fix_with(variable, N::lower);
    }

    #[inline(always)]
    fn fix_with<F>(&mut self, variable: usize, fix: F)
    where
        F: FnOnce(&mut N, usize),
    {
        let variable_count = self.node.variable_count();
        let unfixed = self.node.unfixed();

        fix(&mut self.node, variable);
        self.solved = false;

        debug_assert_eq!(
            self.node.variable_count(),
            variable_count,
            "fixing variable {} changed the variable count",
            variable
        );
        debug_assert!(
            self.node.unfixed() <= unfixed,
            "fixing variable {} increased the unfixed count from {} to {}",
            variable,
            unfixed,
            self.node.unfixed()
        );
    }

    /// Splits this node on `variable`.
    ///
    /// Returns `(lowered, raised)`: this node fixed down and a clone of it
    /// fixed up. This is the only place the engine clones a node.
    #[inline]
    pub fn split(mut self, variable: usize) -> (Self, Self) {
        let mut raised = Self {
            node: self.node.clone(),
            cached_objective: self.cached_objective,
            solved: false,
        };
        raised.raise(variable);
        self.lower(variable);
        (self, raised)
    }
}
