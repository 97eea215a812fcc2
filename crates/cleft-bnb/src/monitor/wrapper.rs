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

//! Adapter for engine-independent search monitors
//!
//! `WrapperMonitor` bridges this crate's `TreeSearchMonitor` with a generic
//! `SearchMonitor` from `cleft_search`, so budgets such as
//! `TimeLimitMonitor` or `SolutionLimitMonitor` plug into a branch-and-bound
//! run unchanged.
//!
//! Behavior
//! - Delegates: enter, step, incumbent (as `on_solution_found`), exit, and
//!   `search_command`.
//! - No-ops: inspections, prunes, branches, and bound changes.
//! - `name()` is `WrapperMonitor(inner.name())`.

use crate::{
    monitor::tree_search_monitor::{Inspection, PruneReason, TreeSearchMonitor},
    node::BranchDirection,
    state::SearchProgress,
    stats::BnbStatistics,
};
use cleft_search::{
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    num::ObjectiveValue,
    sense::ObjectiveSense,
};

/// A tree search monitor that wraps a general search monitor.
pub struct WrapperMonitor<'a, T> {
    inner: &'a mut dyn SearchMonitor<T>,
    name: String,
}

impl<'a, T> WrapperMonitor<'a, T>
where
    T: ObjectiveValue,
{
    /// Creates a new `WrapperMonitor` that wraps the given search monitor.
    #[inline(always)]
    pub fn new(inner: &'a mut dyn SearchMonitor<T>) -> Self {
        let name = format!("WrapperMonitor({})", inner.name());
        Self { inner, name }
    }
}

impl<'a, T> TreeSearchMonitor<T> for WrapperMonitor<'a, T>
where
    T: ObjectiveValue,
{
    #[inline(always)]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    fn on_enter_search(&mut self, _sense: ObjectiveSense, _statistics: &BnbStatistics<T>) {
        self.inner.on_enter_search();
    }

    #[inline(always)]
    fn on_exit_search(&mut self, _statistics: &BnbStatistics<T>) {
        self.inner.on_exit_search();
    }

    #[inline(always)]
    fn search_command(
        &mut self,
        _progress: &SearchProgress<T>,
        _statistics: &BnbStatistics<T>,
    ) -> SearchCommand {
        self.inner.search_command()
    }

    #[inline(always)]
    fn on_step(&mut self, _progress: &SearchProgress<T>, _statistics: &BnbStatistics<T>) {
        self.inner.on_step();
    }

    #[inline(always)]
    fn on_node_inspected(
        &mut self,
        _objective: T,
        _inspection: Inspection,
        _statistics: &BnbStatistics<T>,
    ) {
    }

    #[inline(always)]
    fn on_prune(&mut self, _reason: PruneReason, _count: usize, _statistics: &BnbStatistics<T>) {}

    #[inline(always)]
    fn on_branch(
        &mut self,
        _variable: usize,
        _direction: BranchDirection,
        _statistics: &BnbStatistics<T>,
    ) {
    }

    #[inline(always)]
    fn on_incumbent(&mut self, objective: T, _statistics: &BnbStatistics<T>) {
        self.inner.on_solution_found(objective);
    }

    #[inline(always)]
    fn on_bounds(&mut self, _lower: T, _upper: T, _statistics: &BnbStatistics<T>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::SearchPhase;
    use cleft_search::monitor::solution_limit::SolutionLimitMonitor;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn progress() -> SearchProgress<f64> {
        SearchProgress {
            sense: ObjectiveSense::Minimize,
            phase: SearchPhase::InitialDfs,
            iteration: 0,
            depth: 3,
            active: 1,
            incumbent: f64::INFINITY,
            global_bound: 1.0,
            found_feasible: false,
        }
    }

    #[test]
    fn test_forwards_incumbents_and_commands() {
        let counter = AtomicU64::new(0);
        let mut inner = SolutionLimitMonitor::<f64>::new(&counter, 2);
        let mut wrapper = WrapperMonitor::new(&mut inner);
        let stats = BnbStatistics::default();

        assert_eq!(wrapper.name(), "WrapperMonitor(SolutionLimitMonitor)");
        assert_eq!(
            wrapper.search_command(&progress(), &stats),
            SearchCommand::Continue
        );

        wrapper.on_incumbent(5.0, &stats);
        wrapper.on_prune(PruneReason::Stripped, 3, &stats);
        assert_eq!(counter.load(Ordering::Relaxed), 1);

        wrapper.on_incumbent(4.0, &stats);
        assert!(matches!(
            wrapper.search_command(&progress(), &stats),
            SearchCommand::Terminate(_)
        ));
    }
}
