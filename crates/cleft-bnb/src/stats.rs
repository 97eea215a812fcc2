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

use std::time::Duration;

/// Statistics collected during a branch-and-bound run.
#[derive(Debug, Clone, PartialEq)]
pub struct BnbStatistics<T> {
    /// Main-loop iterations, one per branched node.
    pub iterations: u64,
    /// Relaxations solved, root included.
    pub nodes_inspected: u64,
    /// Branching steps. Equals the number of node clones.
    pub branchings: u64,
    /// Nodes that entered the active pool.
    pub nodes_queued: u64,
    /// Largest number of simultaneously active nodes.
    pub max_active: usize,
    /// Nodes discarded on inspection because their relaxation was infeasible.
    pub prunings_infeasible: u64,
    /// Nodes discarded on inspection because their bound could not beat the incumbent.
    pub prunings_bound: u64,
    /// Queued or about-to-be-queued nodes removed after an incumbent update.
    pub prunings_stripped: u64,
    /// Incumbent updates.
    pub solutions_found: u64,
    /// Incumbent updates improved further by the node's local search.
    pub local_search_improvements: u64,
    /// Selections that popped the most recent node.
    pub dfs_selections: u64,
    /// Selections that took the node with the best bound.
    pub bfs_selections: u64,
    /// Relaxation bound of the root node.
    pub root_bound: Option<T>,
    /// Total time spent in the search.
    pub time_total: Duration,
}

impl<T> Default for BnbStatistics<T> {
    fn default() -> Self {
        Self {
            iterations: 0,
            nodes_inspected: 0,
            branchings: 0,
            nodes_queued: 0,
            max_active: 0,
            prunings_infeasible: 0,
            prunings_bound: 0,
            prunings_stripped: 0,
            solutions_found: 0,
            local_search_improvements: 0,
            dfs_selections: 0,
            bfs_selections: 0,
            root_bound: None,
            time_total: Duration::ZERO,
        }
    }
}

impl<T> BnbStatistics<T> {
    #[inline]
    pub fn on_iteration(&mut self) {
        self.iterations = self.iterations.saturating_add(1);
    }

    #[inline]
    pub fn on_node_inspected(&mut self) {
        self.nodes_inspected = self.nodes_inspected.saturating_add(1);
    }

    #[inline]
    pub fn on_branching(&mut self) {
        self.branchings = self.branchings.saturating_add(1);
    }

    #[inline]
    pub fn on_node_queued(&mut self, active: usize) {
        self.nodes_queued = self.nodes_queued.saturating_add(1);
        self.max_active = self.max_active.max(active);
    }

    #[inline]
    pub fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_stripped(&mut self, count: usize) {
        self.prunings_stripped = self.prunings_stripped.saturating_add(count as u64);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn on_local_search_improvement(&mut self) {
        self.local_search_improvements = self.local_search_improvements.saturating_add(1);
    }

    #[inline]
    pub fn on_dfs_selection(&mut self) {
        self.dfs_selections = self.dfs_selections.saturating_add(1);
    }

    #[inline]
    pub fn on_bfs_selection(&mut self) {
        self.bfs_selections = self.bfs_selections.saturating_add(1);
    }

    /// Total number of nodes discarded without branching.
    #[inline]
    pub fn prunings_total(&self) -> u64 {
        self.prunings_infeasible
            .saturating_add(self.prunings_bound)
            .saturating_add(self.prunings_stripped)
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    #[inline]
    pub fn set_root_bound(&mut self, bound: T) {
        self.root_bound = Some(bound);
    }
}

impl<T> std::fmt::Display for BnbStatistics<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Cleft-BnB Statistics:")?;
        writeln!(f, "  Iterations:           {}", self.iterations)?;
        writeln!(f, "  Nodes inspected:      {}", self.nodes_inspected)?;
        writeln!(f, "  Branchings:           {}", self.branchings)?;
        writeln!(f, "  Nodes queued:         {}", self.nodes_queued)?;
        writeln!(f, "  Max active nodes:     {}", self.max_active)?;
        writeln!(f, "  Prunings (infeasible):{}", self.prunings_infeasible)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Prunings (stripped):  {}", self.prunings_stripped)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Local search gains:   {}", self.local_search_improvements)?;
        writeln!(
            f,
            "  Selections (DFS/BFS): {}/{}",
            self.dfs_selections, self.bfs_selections
        )?;
        match &self.root_bound {
            Some(bound) => writeln!(f, "  Root bound:           {}", bound)?,
            None => writeln!(f, "  Root bound:           -")?,
        }
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}
