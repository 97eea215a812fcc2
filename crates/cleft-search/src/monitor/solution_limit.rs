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
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    num::ObjectiveValue,
};
use std::{
    marker::PhantomData,
    sync::atomic::{AtomicU64, Ordering},
};

/// Stops a search once `limit` incumbents were accepted.
///
/// The tally is an `AtomicU64` borrowed from the caller, so several searches
/// (nested solves, restarts) can draw from one shared allowance. Each monitor
/// also remembers how many of those incumbents its own search contributed.
#[derive(Debug)]
pub struct SolutionLimitMonitor<'a, T> {
    tally: &'a AtomicU64,
    limit: u64,
    own: u64,
    _objective: PhantomData<T>,
}

impl<'a, T> SolutionLimitMonitor<'a, T>
where
    T: ObjectiveValue,
{
    #[inline]
    pub fn new(tally: &'a AtomicU64, limit: u64) -> Self {
        Self {
            tally,
            limit,
            own: 0,
            _objective: PhantomData,
        }
    }

    /// Returns the number of incumbents allowed across all sharing searches.
    #[inline]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Returns the number of incumbents accepted by the monitored search.
    #[inline]
    pub fn own_solutions(&self) -> u64 {
        self.own
    }
}

impl<'a, T> SearchMonitor<T> for SolutionLimitMonitor<'a, T>
where
    T: ObjectiveValue,
{
    fn name(&self) -> &str {
        "SolutionLimitMonitor"
    }

    fn on_enter_search(&mut self) {
        self.own = 0;
    }

    fn on_exit_search(&mut self) {}

    fn on_solution_found(&mut self, _objective: T) {
        self.own = self.own.saturating_add(1);
        self.tally.fetch_add(1, Ordering::Relaxed);
    }

    fn on_step(&mut self) {}

    fn search_command(&self) -> SearchCommand {
        match self.tally.load(Ordering::Relaxed) {
            found if found >= self.limit => SearchCommand::Terminate(format!(
                "solution limit of {} reached",
                self.limit
            )),
            _ => SearchCommand::Continue,
        }
    }
}
