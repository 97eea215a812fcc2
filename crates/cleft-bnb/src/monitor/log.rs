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

//! Periodic progress logging
//!
//! `LogTreeSearchMonitor` writes a progress table through the `log` facade:
//! a header when the search starts, one line at most every `log_interval`
//! and a summary on exit. Incumbent improvements go to `debug`. The clock is
//! only read on iterations whose low bits are zero under `clock_check_mask`.

use crate::{
    monitor::tree_search_monitor::{Inspection, PruneReason, TreeSearchMonitor},
    node::BranchDirection,
    state::SearchProgress,
    stats::BnbStatistics,
};
use cleft_search::{num::ObjectiveValue, sense::ObjectiveSense};
use log::{debug, info};
use std::time::{Duration, Instant};

const RULE_WIDTH: usize = 86;

#[derive(Debug, Clone)]
pub struct LogTreeSearchMonitor<T> {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_objective: Option<T>,
    lines_written: u64,
}

impl<T> LogTreeSearchMonitor<T>
where
    T: ObjectiveValue,
{
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            best_objective: None,
            lines_written: 0,
        }
    }

    /// Returns the number of progress lines written during the last search.
    #[inline]
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    #[inline(always)]
    fn log_header(&self) {
        info!(
            "{:<9} | {:<12} | {:<8} | {:<14} | {:<14} | {:<13}",
            "Elapsed", "Iterations", "Active", "Incumbent", "Bound", "Phase"
        );
        info!("{}", "-".repeat(RULE_WIDTH));
    }

    #[inline(always)]
    fn log_line(&mut self, progress: &SearchProgress<T>, stats: &BnbStatistics<T>) {
        let now = Instant::now();
        let elapsed = format!("{:.1}s", now.duration_since(self.start_time).as_secs_f32());
        let incumbent = match self.best_objective {
            Some(objective) => format!("{}", objective),
            None => "-".to_string(),
        };

        info!(
            "{:<9} | {:<12} | {:<8} | {:<14} | {:<14} | {:<13}",
            elapsed,
            stats.iterations,
            progress.active,
            incumbent,
            progress.global_bound,
            progress.phase
        );

        self.last_log_time = now;
        self.lines_written = self.lines_written.saturating_add(1);
    }
}

impl<T> Default for LogTreeSearchMonitor<T>
where
    T: ObjectiveValue,
{
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 255)
    }
}

impl<T> std::fmt::Display for LogTreeSearchMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogTreeSearchMonitor(log_interval: {:.3}s, clock_check_mask: {})",
            self.log_interval.as_secs_f64(),
            self.clock_check_mask
        )
    }
}

impl<T> TreeSearchMonitor<T> for LogTreeSearchMonitor<T>
where
    T: ObjectiveValue,
{
    fn name(&self) -> &str {
        "LogTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, sense: ObjectiveSense, _statistics: &BnbStatistics<T>) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_objective = None;
        self.lines_written = 0;
        info!("branch-and-bound search started ({})", sense);
        self.log_header();
    }

    fn on_exit_search(&mut self, statistics: &BnbStatistics<T>) {
        info!("{}", "-".repeat(RULE_WIDTH));
        info!(
            "search finished after {} iterations in {:.2?}",
            statistics.iterations, statistics.time_total
        );
        debug!("{}", statistics);
    }

    fn on_step(&mut self, progress: &SearchProgress<T>, statistics: &BnbStatistics<T>) {
        if (progress.iteration & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(progress, statistics);
        }
    }

    fn on_node_inspected(
        &mut self,
        _objective: T,
        _inspection: Inspection,
        _statistics: &BnbStatistics<T>,
    ) {
    }

    fn on_prune(&mut self, reason: PruneReason, count: usize, _statistics: &BnbStatistics<T>) {
        if reason == PruneReason::Stripped && count > 0 {
            debug!("stripped {} active nodes", count);
        }
    }

    fn on_branch(
        &mut self,
        _variable: usize,
        _direction: BranchDirection,
        _statistics: &BnbStatistics<T>,
    ) {
    }

    fn on_incumbent(&mut self, objective: T, statistics: &BnbStatistics<T>) {
        self.best_objective = Some(objective);
        debug!(
            "new incumbent {} after {} iterations",
            objective, statistics.iterations
        );
    }

    fn on_bounds(&mut self, lower: T, upper: T, _statistics: &BnbStatistics<T>) {
        debug!("bounds [{}, {}]", lower, upper);
    }
}
