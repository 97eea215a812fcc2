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

//! Monitoring combinators for tree search
//!
//! Provides `CompositeTreeSearchMonitor`, a fan-out monitor that forwards every
//! event to its children. This lets logging, metrics and early stopping be
//! combined without coupling them to the engine.
//!
//! Behavior
//! - Events are dispatched to child monitors in insertion order.
//! - `search_command` short-circuits on the first non-`Continue` response;
//!   put stricter stop conditions first.
//! - Other callbacks always fan out to all children.

use crate::{
    monitor::tree_search_monitor::{Inspection, PruneReason, TreeSearchMonitor},
    node::BranchDirection,
    state::SearchProgress,
    stats::BnbStatistics,
};
use cleft_search::{
    monitor::search_monitor::SearchCommand, num::ObjectiveValue, sense::ObjectiveSense,
};

/// A tree search monitor that aggregates multiple monitors and forwards events to all of them.
pub struct CompositeTreeSearchMonitor<'a, T>
where
    T: ObjectiveValue,
{
    monitors: Vec<Box<dyn TreeSearchMonitor<T> + 'a>>,
}

impl<'a, T> Default for CompositeTreeSearchMonitor<'a, T>
where
    T: ObjectiveValue,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeTreeSearchMonitor<'a, T>
where
    T: ObjectiveValue,
{
    /// Creates a new empty `CompositeTreeSearchMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    /// Creates a new `CompositeTreeSearchMonitor` with room for `capacity` monitors.
    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a new monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a boxed monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn TreeSearchMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    /// Returns a slice of the monitors contained in the composite monitor.
    #[inline(always)]
    pub fn monitors(&self) -> &[Box<dyn TreeSearchMonitor<T> + 'a>] {
        &self.monitors
    }

    /// Clears all monitors from the composite monitor.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.monitors.clear();
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, T> FromIterator<Box<dyn TreeSearchMonitor<T> + 'a>> for CompositeTreeSearchMonitor<'a, T>
where
    T: ObjectiveValue,
{
    #[inline(always)]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn TreeSearchMonitor<T> + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> TreeSearchMonitor<T> for CompositeTreeSearchMonitor<'a, T>
where
    T: ObjectiveValue,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, sense: ObjectiveSense, statistics: &BnbStatistics<T>) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(sense, statistics);
        }
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &BnbStatistics<T>) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(statistics);
        }
    }

    #[inline(always)]
    fn search_command(
        &mut self,
        progress: &SearchProgress<T>,
        statistics: &BnbStatistics<T>,
    ) -> SearchCommand {
        for monitor in &mut self.monitors {
            let cmd = monitor.search_command(progress, statistics);
            if !matches!(cmd, SearchCommand::Continue) {
                return cmd;
            }
        }
        SearchCommand::Continue
    }

    #[inline(always)]
    fn on_step(&mut self, progress: &SearchProgress<T>, statistics: &BnbStatistics<T>) {
        for monitor in &mut self.monitors {
            monitor.on_step(progress, statistics);
        }
    }

    #[inline(always)]
    fn on_node_inspected(
        &mut self,
        objective: T,
        inspection: Inspection,
        statistics: &BnbStatistics<T>,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_node_inspected(objective, inspection, statistics);
        }
    }

    #[inline(always)]
    fn on_prune(&mut self, reason: PruneReason, count: usize, statistics: &BnbStatistics<T>) {
        for monitor in &mut self.monitors {
            monitor.on_prune(reason, count, statistics);
        }
    }

    #[inline(always)]
    fn on_branch(
        &mut self,
        variable: usize,
        direction: BranchDirection,
        statistics: &BnbStatistics<T>,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_branch(variable, direction, statistics);
        }
    }

    #[inline(always)]
    fn on_incumbent(&mut self, objective: T, statistics: &BnbStatistics<T>) {
        for monitor in &mut self.monitors {
            monitor.on_incumbent(objective, statistics);
        }
    }

    #[inline(always)]
    fn on_bounds(&mut self, lower: T, upper: T, statistics: &BnbStatistics<T>) {
        for monitor in &mut self.monitors {
            monitor.on_bounds(lower, upper, statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{monitor::no_op::NoOperationMonitor, policy::SearchPhase};

    struct Counting<'c> {
        calls: &'c mut Vec<&'static str>,
        tag: &'static str,
        command: SearchCommand,
    }

    impl<'c> TreeSearchMonitor<f64> for Counting<'c> {
        fn name(&self) -> &str {
            self.tag
        }
        fn on_enter_search(&mut self, _sense: ObjectiveSense, _statistics: &BnbStatistics<f64>) {
            self.calls.push(self.tag);
        }
        fn on_exit_search(&mut self, _statistics: &BnbStatistics<f64>) {}
        fn search_command(
            &mut self,
            _progress: &SearchProgress<f64>,
            _statistics: &BnbStatistics<f64>,
        ) -> SearchCommand {
            self.calls.push(self.tag);
            self.command.clone()
        }
        fn on_step(&mut self, _progress: &SearchProgress<f64>, _statistics: &BnbStatistics<f64>) {}
        fn on_node_inspected(&mut self, _: f64, _: Inspection, _: &BnbStatistics<f64>) {}
        fn on_prune(&mut self, _: PruneReason, _: usize, _: &BnbStatistics<f64>) {}
        fn on_branch(&mut self, _: usize, _: BranchDirection, _: &BnbStatistics<f64>) {}
        fn on_incumbent(&mut self, _: f64, _: &BnbStatistics<f64>) {}
        fn on_bounds(&mut self, _: f64, _: f64, _: &BnbStatistics<f64>) {}
    }

    fn progress() -> SearchProgress<f64> {
        SearchProgress {
            sense: ObjectiveSense::Minimize,
            phase: SearchPhase::ExhaustiveBfs,
            iteration: 1,
            depth: 2,
            active: 1,
            incumbent: 3.0,
            global_bound: 1.0,
            found_feasible: true,
        }
    }

    #[test]
    fn test_fan_out_in_insertion_order() {
        let mut first = Vec::new();
        let mut second = Vec::new();
        let stats = BnbStatistics::default();
        {
            let mut composite = CompositeTreeSearchMonitor::new();
            composite.add_monitor(Counting {
                calls: &mut first,
                tag: "a",
                command: SearchCommand::Continue,
            });
            composite.add_monitor(Counting {
                calls: &mut second,
                tag: "b",
                command: SearchCommand::Continue,
            });
            composite.add_monitor(NoOperationMonitor::new());
            assert_eq!(composite.len(), 3);

            composite.on_enter_search(ObjectiveSense::Minimize, &stats);
            assert_eq!(
                composite.search_command(&progress(), &stats),
                SearchCommand::Continue
            );
        }
        assert_eq!(first, vec!["a", "a"]);
        assert_eq!(second, vec!["b", "b"]);
    }

    #[test]
    fn test_search_command_short_circuits() {
        let mut first = Vec::new();
        let mut second = Vec::new();
        let stats = BnbStatistics::default();
        {
            let mut composite = CompositeTreeSearchMonitor::with_capacity(2);
            composite.add_monitor(Counting {
                calls: &mut first,
                tag: "stop",
                command: SearchCommand::Terminate("budget".to_string()),
            });
            composite.add_monitor(Counting {
                calls: &mut second,
                tag: "never",
                command: SearchCommand::Continue,
            });
            assert_eq!(
                composite.search_command(&progress(), &stats),
                SearchCommand::Terminate("budget".to_string())
            );
        }
        assert_eq!(first, vec!["stop"]);
        assert!(second.is_empty());
    }

    #[test]
    fn test_from_iterator_and_clear() {
        let boxed: Vec<Box<dyn TreeSearchMonitor<f64>>> = vec![
            Box::new(NoOperationMonitor::new()),
            Box::new(NoOperationMonitor::new()),
        ];
        let mut composite: CompositeTreeSearchMonitor<'_, f64> = boxed.into_iter().collect();
        assert_eq!(composite.len(), 2);
        assert_eq!(composite.monitors()[0].name(), "NoOperationMonitor");
        composite.clear();
        assert!(composite.is_empty());
    }
}
