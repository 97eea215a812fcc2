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

use crate::{
    monitor::tree_search_monitor::{Inspection, PruneReason, TreeSearchMonitor},
    node::BranchDirection,
    state::SearchProgress,
    stats::BnbStatistics,
};
use cleft_search::{
    monitor::search_monitor::SearchCommand, num::ObjectiveValue, sense::ObjectiveSense,
};

/// A no-operation monitor that implements the `TreeSearchMonitor` trait
/// but does nothing on any of the events, always returning `Continue` for the
/// search command.
#[repr(transparent)]
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct NoOperationMonitor<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> NoOperationMonitor<T> {
    /// Creates a new `NoOperationMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T> TreeSearchMonitor<T> for NoOperationMonitor<T>
where
    T: ObjectiveValue,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "NoOperationMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, _sense: ObjectiveSense, _statistics: &BnbStatistics<T>) {}

    #[inline(always)]
    fn on_exit_search(&mut self, _statistics: &BnbStatistics<T>) {}

    #[inline(always)]
    fn search_command(
        &mut self,
        _progress: &SearchProgress<T>,
        _statistics: &BnbStatistics<T>,
    ) -> SearchCommand {
        SearchCommand::Continue
    }

    #[inline(always)]
    fn on_step(&mut self, _progress: &SearchProgress<T>, _statistics: &BnbStatistics<T>) {}

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
    fn on_incumbent(&mut self, _objective: T, _statistics: &BnbStatistics<T>) {}

    #[inline(always)]
    fn on_bounds(&mut self, _lower: T, _upper: T, _statistics: &BnbStatistics<T>) {}
}
