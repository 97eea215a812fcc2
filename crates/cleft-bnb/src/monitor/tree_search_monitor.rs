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

//! Tree search monitoring interface
//!
//! Declares the `TreeSearchMonitor` trait together with the `Inspection` and
//! `PruneReason` event payloads. Callbacks follow the lifecycle of a
//! branch-and-bound run, and a monitor can stop the run by returning
//! `SearchCommand::Terminate` from `search_command`.
//!
//! Lifecycle
//! - enter, then per iteration: command, step, branch, inspections of both
//!   children, prunes, incumbents and bound changes; finally exit.
//! - `BnbStatistics` is passed to every callback for telemetry.
//!
//! Notes
//! - Methods take `&mut self`; monitors are single-threaded.
//! - Keep callbacks lightweight; they run inside the main loop.

use crate::{node::BranchDirection, state::SearchProgress, stats::BnbStatistics};
use cleft_search::{
    monitor::search_monitor::SearchCommand, num::ObjectiveValue, sense::ObjectiveSense,
};

/// What the engine did with a freshly inspected node.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Inspection {
    /// The bound could not beat the incumbent; the node was discarded.
    Cutoff,
    /// The node was feasible and became the new incumbent.
    Saved,
    /// The node was kept for further branching.
    Queued,
}

impl std::fmt::Display for Inspection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Inspection::Cutoff => write!(f, "Cutoff"),
            Inspection::Saved => write!(f, "Saved"),
            Inspection::Queued => write!(f, "Queued"),
        }
    }
}

/// Reasons for discarding nodes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum PruneReason {
    /// The relaxation has no solution.
    Infeasible,
    /// The bound cannot beat the incumbent.
    BoundDominated,
    /// A new incumbent made previously kept nodes useless.
    Stripped,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruneReason::Infeasible => write!(f, "Infeasible"),
            PruneReason::BoundDominated => write!(f, "BoundDominated"),
            PruneReason::Stripped => write!(f, "Stripped"),
        }
    }
}

/// Trait for monitoring and controlling a branch-and-bound run.
pub trait TreeSearchMonitor<T>
where
    T: ObjectiveValue,
{
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called when the search starts.
    fn on_enter_search(&mut self, sense: ObjectiveSense, statistics: &BnbStatistics<T>);
    /// Called when the search ends.
    fn on_exit_search(&mut self, statistics: &BnbStatistics<T>);
    /// Called at the top of every iteration to determine whether to go on.
    fn search_command(
        &mut self,
        _progress: &SearchProgress<T>,
        _statistics: &BnbStatistics<T>,
    ) -> SearchCommand {
        SearchCommand::Continue
    }
    /// Called once per iteration, after the selection phase is known.
    fn on_step(&mut self, progress: &SearchProgress<T>, statistics: &BnbStatistics<T>);
    /// Called after a node's relaxation was solved and classified.
    fn on_node_inspected(
        &mut self,
        objective: T,
        inspection: Inspection,
        statistics: &BnbStatistics<T>,
    );
    /// Called when `count` nodes are discarded for `reason`.
    fn on_prune(&mut self, reason: PruneReason, count: usize, statistics: &BnbStatistics<T>);
    /// Called when a node is split on `variable`.
    fn on_branch(
        &mut self,
        variable: usize,
        direction: BranchDirection,
        statistics: &BnbStatistics<T>,
    );
    /// Called when the incumbent improves.
    fn on_incumbent(&mut self, objective: T, statistics: &BnbStatistics<T>);
    /// Called whenever the published bounds change.
    fn on_bounds(&mut self, lower: T, upper: T, statistics: &BnbStatistics<T>);
}

impl<T, M> TreeSearchMonitor<T> for &mut M
where
    T: ObjectiveValue,
    M: TreeSearchMonitor<T> + ?Sized,
{
    #[inline(always)]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline(always)]
    fn on_enter_search(&mut self, sense: ObjectiveSense, statistics: &BnbStatistics<T>) {
        (**self).on_enter_search(sense, statistics);
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &BnbStatistics<T>) {
        (**self).on_exit_search(statistics);
    }

    #[inline(always)]
    fn search_command(
        &mut self,
        progress: &SearchProgress<T>,
        statistics: &BnbStatistics<T>,
    ) -> SearchCommand {
        (**self).search_command(progress, statistics)
    }

    #[inline(always)]
    fn on_step(&mut self, progress: &SearchProgress<T>, statistics: &BnbStatistics<T>) {
        (**self).on_step(progress, statistics);
    }

    #[inline(always)]
    fn on_node_inspected(
        &mut self,
        objective: T,
        inspection: Inspection,
        statistics: &BnbStatistics<T>,
    ) {
        (**self).on_node_inspected(objective, inspection, statistics);
    }

    #[inline(always)]
    fn on_prune(&mut self, reason: PruneReason, count: usize, statistics: &BnbStatistics<T>) {
        (**self).on_prune(reason, count, statistics);
    }

    #[inline(always)]
    fn on_branch(
        &mut self,
        variable: usize,
        direction: BranchDirection,
        statistics: &BnbStatistics<T>,
    ) {
        (**self).on_branch(variable, direction, statistics);
    }

    #[inline(always)]
    fn on_incumbent(&mut self, objective: T, statistics: &BnbStatistics<T>) {
        (**self).on_incumbent(objective, statistics);
    }

    #[inline(always)]
    fn on_bounds(&mut self, lower: T, upper: T, statistics: &BnbStatistics<T>) {
        (**self).on_bounds(lower, upper, statistics);
    }
}

impl<T> std::fmt::Debug for dyn TreeSearchMonitor<T>
where
    T: ObjectiveValue,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn TreeSearchMonitor<T>
where
    T: ObjectiveValue,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_of_event_payloads() {
        assert_eq!(format!("{}", Inspection::Cutoff), "Cutoff");
        assert_eq!(format!("{}", Inspection::Saved), "Saved");
        assert_eq!(format!("{}", Inspection::Queued), "Queued");
        assert_eq!(format!("{}", PruneReason::Infeasible), "Infeasible");
        assert_eq!(format!("{}", PruneReason::BoundDominated), "BoundDominated");
        assert_eq!(format!("{}", PruneReason::Stripped), "Stripped");
    }
}
