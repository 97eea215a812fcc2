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

//! Branch-and-bound engine
//!
//! `BranchScheme` drives a generic best-first/depth-first hybrid search over
//! `BranchNode` implementations. It owns the reusable active pool; every call
//! to `solve` runs a `SchemeSearchSession` that holds the per-run state
//! (incumbent, global bound, counters, timing) and clears the pool afterwards.
//!
//! ## Loop
//!
//! The root is inspected and, if it needs branching, queued. Each iteration
//! then checks the termination conditions, picks a selection phase, removes
//! one active node, splits it on the variable the node selects and inspects
//! both children in declared order. Children that survive inspection are
//! pushed so the first-explored one ends up on top of the pool.
//!
//! ## Bounding
//!
//! A bound survives if `CutoffRule::improves` holds against the incumbent.
//! Every incumbent update strips the pool, and every deferred child is
//! re-checked right before it is pushed. The global bound is the weakest
//! bound over all active nodes (including the one being branched), only ever
//! tightens, and never passes the incumbent. Each tightening and each
//! incumbent update is reported to the `BoundSink`.
//!
//! ## Termination
//!
//! Checked at the top of every iteration, in this order: the pool is empty or
//! the gap is closed (both proven), cancellation, first feasible solution
//! under `SearchLevel::FeasibleOnly`, the node limit, the iteration limit,
//! and finally the monitor's command.

use crate::{
    config::{SchemeConfig, SchemeConfigBuilder, SearchLevel},
    error::SchemeError,
    monitor::tree_search_monitor::{Inspection, PruneReason, TreeSearchMonitor},
    node::{BranchDirection, BranchNode, Subproblem},
    policy::{CutoffRule, PolicyInputs, SearchPhase, select_phase},
    pool::ActivePool,
    result::BnbOutcome,
    state::SearchProgress,
    stats::BnbStatistics,
};
use cleft_search::{
    bounds::{BoundSink, NoBoundSink},
    cancel::{CancellationSource, NeverCancel},
    monitor::search_monitor::SearchCommand,
    num::ObjectiveValue,
    sense::ObjectiveSense,
};
use log::{debug, trace, warn};
use std::time::Instant;

/// Branch-and-bound engine over user-supplied `BranchNode`s.
///
/// The engine itself is problem-agnostic: relaxations, branching variables
/// and feasibility all come from the nodes. It can be reused for any number
/// of solves; the pool keeps its allocation between runs.
pub struct BranchScheme<N, T>
where
    N: BranchNode<T>,
    T: ObjectiveValue,
{
    config: SchemeConfig<T>,
    pool: ActivePool<Subproblem<N, T>>,
}

impl<N, T> Default for BranchScheme<N, T>
where
    N: BranchNode<T>,
    T: ObjectiveValue,
{
    fn default() -> Self {
        Self::new(SchemeConfig::default())
    }
}

impl<N, T> std::fmt::Debug for BranchScheme<N, T>
where
    N: BranchNode<T>,
    T: ObjectiveValue,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BranchScheme")
            .field("config", &self.config)
            .field("active", &self.pool.len())
            .finish()
    }
}

impl<N, T> BranchScheme<N, T>
where
    N: BranchNode<T>,
    T: ObjectiveValue,
{
    /// Creates a new engine with the given configuration.
    #[inline]
    pub fn new(config: SchemeConfig<T>) -> Self {
        Self {
            config,
            pool: ActivePool::new(),
        }
    }

    /// Validates `builder` and creates an engine from the result.
    #[inline]
    pub fn from_builder(builder: SchemeConfigBuilder<T>) -> Result<Self, SchemeError> {
        Ok(Self::new(builder.build()?))
    }

    /// Returns the configuration used by every solve.
    #[inline]
    pub fn config(&self) -> &SchemeConfig<T> {
        &self.config
    }

    /// Solves from `root` without cancellation and without bound reporting.
    #[inline]
    pub fn solve<M>(
        &mut self,
        root: N,
        monitor: M,
    ) -> Result<BnbOutcome<T, N::Solution>, SchemeError>
    where
        M: TreeSearchMonitor<T>,
    {
        self.solve_with(root, monitor, &NeverCancel, &NoBoundSink)
    }

    /// Solves from `root`, polling `cancellation` once per iteration and
    /// publishing every bound change to `sink`.
    ///
    /// Returns an error only if a node breaks the `BranchNode` contract.
    pub fn solve_with<M, C, S>(
        &mut self,
        root: N,
        mut monitor: M,
        cancellation: &C,
        sink: &S,
    ) -> Result<BnbOutcome<T, N::Solution>, SchemeError>
    where
        M: TreeSearchMonitor<T>,
        C: CancellationSource + ?Sized,
        S: BoundSink<T> + ?Sized,
    {
        let session = SchemeSearchSession::new(
            &self.config,
            &mut self.pool,
            &mut monitor,
            cancellation,
            sink,
            &root,
        );
        let res = session.run(root);
        self.reset();
        res
    }

    /// Drops every remaining active node, keeping the pool allocation.
    #[inline]
    fn reset(&mut self) {
        self.pool.clear();
    }
}

/// Why the main loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Halt {
    /// No active node can improve on the incumbent any more.
    Proven,
    /// A limit, cancellation or monitor cut the search short.
    Aborted(String),
}

/// A single run of the engine.
struct SchemeSearchSession<'a, N, T, M, C, S>
where
    N: BranchNode<T>,
    T: ObjectiveValue,
    C: ?Sized,
    S: ?Sized,
{
    config: &'a SchemeConfig<T>,
    pool: &'a mut ActivePool<Subproblem<N, T>>,
    monitor: &'a mut M,
    cancellation: &'a C,
    sink: &'a S,
    sense: ObjectiveSense,
    /// Sentinel reported by the nodes for an empty sub-tree.
    infeasibility: T,
    variable_count: usize,
    /// Unfixed variables at the root; scales the phase rules.
    depth: usize,
    incumbent: T,
    global_bound: T,
    found_feasible: bool,
    iteration: u64,
    dfs_streak: u64,
    solution: Option<N::Solution>,
    stats: BnbStatistics<T>,
    start_time: Instant,
}

impl<'a, N, T, M, C, S> std::fmt::Display for SchemeSearchSession<'a, N, T, M, C, S>
where
    N: BranchNode<T>,
    T: ObjectiveValue,
    C: ?Sized,
    S: ?Sized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SchemeSearchSession(incumbent: {}, global_bound: {}, active: {}, iteration: {})",
            self.incumbent,
            self.global_bound,
            self.pool.len(),
            self.iteration
        )
    }
}

impl<'a, N, T, M, C, S> SchemeSearchSession<'a, N, T, M, C, S>
where
    N: BranchNode<T>,
    T: ObjectiveValue,
    M: TreeSearchMonitor<T>,
    C: CancellationSource + ?Sized,
    S: BoundSink<T> + ?Sized,
{
    #[inline]
    fn new(
        config: &'a SchemeConfig<T>,
        pool: &'a mut ActivePool<Subproblem<N, T>>,
        monitor: &'a mut M,
        cancellation: &'a C,
        sink: &'a S,
        root: &N,
    ) -> Self {
        let sense = root.objective_sense();
        let infeasibility = root.infeasibility();
        let incumbent = config.a_priori_bound().unwrap_or(infeasibility);

        Self {
            config,
            pool,
            monitor,
            cancellation,
            sink,
            sense,
            infeasibility,
            variable_count: root.variable_count(),
            depth: root.unfixed(),
            incumbent,
            global_bound: -sense.infeasibility::<T>(),
            found_feasible: false,
            iteration: 0,
            dfs_streak: 0,
            solution: None,
            stats: BnbStatistics::default(),
            start_time: Instant::now(),
        }
    }

    /// Runs the search to completion and builds the outcome.
    fn run(mut self, root: N) -> Result<BnbOutcome<T, N::Solution>, SchemeError> {
        self.monitor.on_enter_search(self.sense, &self.stats);
        debug!(
            "branch-and-bound over {} variables ({}), {}",
            self.variable_count, self.sense, self.config
        );

        match self.search(root) {
            Ok(halt) => Ok(self.finalize(halt)),
            Err(err) => {
                warn!("branch-and-bound aborted: {}", err);
                self.stats.set_total_time(self.start_time.elapsed());
                self.monitor.on_exit_search(&self.stats);
                Err(err)
            }
        }
    }

    fn search(&mut self, root: N) -> Result<Halt, SchemeError> {
        let mut root = Subproblem::new(root);
        let root_bound = root.objective();
        self.stats.set_root_bound(root_bound);
        self.tighten_global_bound(root_bound);
        if let Some(root) = self.inspect(root) {
            self.enqueue(root);
        }

        loop {
            let phase = self.phase();
            let progress = self.progress(phase);
            if let Some(halt) = self.check_termination(&progress) {
                return Ok(halt);
            }

            self.monitor.on_step(&progress, &self.stats);
            let Some(node) = self.select_active_node(phase) else {
                return Ok(Halt::Proven);
            };
            self.iteration += 1;
            self.stats.on_iteration();

            self.branch(node)?;
            self.refresh_global_bound(None);
        }
    }

    /// Builds the outcome and publishes the final bounds.
    fn finalize(mut self, halt: Halt) -> BnbOutcome<T, N::Solution> {
        if halt == Halt::Proven {
            // A proof closes the bound on the incumbent
            self.tighten_global_bound(self.incumbent);
        }

        self.stats.max_active = self.stats.max_active.max(self.pool.max_len());
        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);

        let (lower, upper) = self
            .sense
            .lower_and_upper(self.global_bound, self.incumbent);
        let outcome = match (halt, self.solution) {
            (Halt::Proven, Some(solution)) => {
                BnbOutcome::optimal(self.incumbent, solution, self.stats)
            }
            (Halt::Proven, None) => BnbOutcome::infeasible(self.incumbent, self.stats),
            (Halt::Aborted(reason), solution) => BnbOutcome::aborted(
                solution.map(|solution| (self.incumbent, solution)),
                reason,
                (lower, upper),
                self.stats,
            ),
        };

        debug!("branch-and-bound finished: {}", outcome);
        outcome
    }

    /// Returns the reason to stop, if any.
    fn check_termination(&mut self, progress: &SearchProgress<T>) -> Option<Halt> {
        if self.pool.is_empty() {
            return Some(Halt::Proven);
        }
        if !self.cutoff_rule().improves(self.global_bound) {
            return Some(Halt::Proven);
        }
        if !self.cancellation.is_running() {
            return Some(Halt::Aborted("search cancelled".to_string()));
        }
        if self.config.search_level() == SearchLevel::FeasibleOnly && self.found_feasible {
            return Some(Halt::Aborted("first feasible solution found".to_string()));
        }
        if self.pool.len() >= self.config.node_limit() {
            return Some(Halt::Aborted(format!(
                "node limit of {} reached",
                self.config.node_limit()
            )));
        }
        if let Some(limit) = self.config.iteration_limit()
            && self.iteration >= limit
        {
            return Some(Halt::Aborted(format!(
                "iteration limit of {} reached",
                limit
            )));
        }
        if let SearchCommand::Terminate(msg) = self.monitor.search_command(progress, &self.stats)
        {
            return Some(Halt::Aborted(msg));
        }
        None
    }

    #[inline]
    fn phase(&self) -> SearchPhase {
        select_phase(&PolicyInputs {
            level: self.config.search_level(),
            iteration: self.iteration,
            depth: self.depth,
            active: self.pool.len(),
            node_limit: self.config.node_limit(),
            dfs_streak: self.dfs_streak,
        })
    }

    #[inline]
    fn progress(&self, phase: SearchPhase) -> SearchProgress<T> {
        SearchProgress {
            sense: self.sense,
            phase,
            iteration: self.iteration,
            depth: self.depth,
            active: self.pool.len(),
            incumbent: self.incumbent,
            global_bound: self.global_bound,
            found_feasible: self.found_feasible,
        }
    }

    #[inline]
    fn cutoff_rule(&self) -> CutoffRule<T> {
        CutoffRule {
            sense: self.sense,
            infeasibility: self.infeasibility,
            incumbent: self.incumbent,
            found_feasible: self.found_feasible,
            margin: self.config.pruning_margin(),
            epsilon: self.config.epsilon(),
        }
    }

    /// Removes the next node to branch on according to `phase`.
    fn select_active_node(&mut self, phase: SearchPhase) -> Option<Subproblem<N, T>> {
        let node = if phase.is_depth_first() {
            self.stats.on_dfs_selection();
            self.dfs_streak = self.dfs_streak.saturating_add(1);
            self.pool.pop_front()?
        } else {
            self.stats.on_bfs_selection();
            self.dfs_streak = 0;
            let sense = self.sense;
            self.pool
                .take_best_by(|entry| sense.adjust(entry.bound()))?
        };

        self.refresh_global_bound(Some(node.bound()));
        Some(node)
    }

    /// Splits `node` and inspects both children.
    fn branch(&mut self, node: Subproblem<N, T>) -> Result<(), SchemeError> {
        let variable = node.node().select_variable().ok_or_else(|| {
            SchemeError::NoBranchingVariable {
                unfixed: node.node().unfixed(),
                variable_count: self.variable_count,
            }
        })?;
        if variable >= self.variable_count {
            return Err(SchemeError::VariableOutOfRange {
                variable,
                variable_count: self.variable_count,
            });
        }

        let direction = if self.found_feasible {
            node.node().direction_exhaustive(variable)
        } else {
            node.node().direction_constructive(variable)
        };
        self.stats.on_branching();
        self.monitor.on_branch(variable, direction, &self.stats);
        trace!(
            "branching on variable {} ({}) at bound {}",
            variable,
            direction,
            node.bound()
        );

        let (lowered, raised) = node.split(variable);
        let (first, second) = match direction {
            BranchDirection::RaiseFirst => (raised, lowered),
            BranchDirection::LowerFirst => (lowered, raised),
        };

        let first = self.inspect(first);
        let second = self.inspect(second);

        // The first-explored child goes on top of the pool
        for child in [second, first].into_iter().flatten() {
            self.enqueue(child);
        }
        Ok(())
    }

    /// Solves the relaxation of `node` and classifies it.
    ///
    /// Returns the node if it needs branching; cut and saved nodes are
    /// consumed.
    fn inspect(&mut self, mut node: Subproblem<N, T>) -> Option<Subproblem<N, T>> {
        let objective = node.objective();
        self.stats.on_node_inspected();
        trace!(
            "inspecting node with bound {} ({} unfixed)",
            objective,
            node.node().unfixed()
        );

        let rule = self.cutoff_rule();
        if !rule.improves(objective) {
            let reason = if rule.is_infeasible(objective) {
                self.stats.on_pruning_infeasible();
                PruneReason::Infeasible
            } else {
                self.stats.on_pruning_bound();
                PruneReason::BoundDominated
            };
            self.monitor
                .on_node_inspected(objective, Inspection::Cutoff, &self.stats);
            self.monitor.on_prune(reason, 1, &self.stats);
            return None;
        }

        if node.is_feasible() {
            let value = self.polish(&mut node, objective);
            if self.found_feasible && !self.sense.is_better(value, self.incumbent) {
                self.stats.on_pruning_bound();
                self.monitor
                    .on_node_inspected(objective, Inspection::Cutoff, &self.stats);
                self.monitor
                    .on_prune(PruneReason::BoundDominated, 1, &self.stats);
                return None;
            }

            self.monitor
                .on_node_inspected(objective, Inspection::Saved, &self.stats);
            self.store_incumbent(&node, value);
            return None;
        }

        self.monitor
            .on_node_inspected(objective, Inspection::Queued, &self.stats);
        Some(node)
    }

    /// Runs the node's local search and returns the accepted objective.
    /// Results that are worse than `objective` are ignored.
    #[inline]
    fn polish(&mut self, node: &mut Subproblem<N, T>, objective: T) -> T {
        let improved = node.local_search(objective);
        if improved.is_nan() || !self.sense.is_better(improved, objective) {
            return objective;
        }
        self.stats.on_local_search_improvement();
        improved
    }

    /// Installs a new incumbent and strips the pool against it.
    fn store_incumbent(&mut self, node: &Subproblem<N, T>, value: T) {
        self.incumbent = value;
        self.found_feasible = true;
        self.solution = Some(node.save_solution());
        self.dfs_streak = 0;
        self.stats.on_solution_found();

        trace!("new incumbent {} at iteration {}", value, self.iteration);
        self.monitor.on_incumbent(value, &self.stats);
        self.publish_incumbent();
        self.strip_queue();
    }

    /// Removes every active node that can no longer beat the incumbent.
    fn strip_queue(&mut self) {
        let rule = self.cutoff_rule();
        let removed = self.pool.retain(|entry| rule.improves(entry.bound()));
        if removed > 0 {
            self.stats.on_pruning_stripped(removed);
            self.monitor
                .on_prune(PruneReason::Stripped, removed, &self.stats);
        }
    }

    /// Pushes `node` unless an incumbent found since its inspection
    /// already rules it out.
    #[inline]
    fn enqueue(&mut self, node: Subproblem<N, T>) {
        if !self.cutoff_rule().improves(node.bound()) {
            self.stats.on_pruning_stripped(1);
            self.monitor.on_prune(PruneReason::Stripped, 1, &self.stats);
            return;
        }
        self.pool.push_front(node);
        self.stats.on_node_queued(self.pool.len());
    }

    /// Recomputes the weakest bound over the pool, plus `selected` if a node
    /// is currently out of the pool, and tightens the global bound to it.
    fn refresh_global_bound(&mut self, selected: Option<T>) {
        let sense = self.sense;
        let pooled = self.pool.min_key_by(|entry| sense.adjust(entry.bound()));
        let selected = selected.map(|bound| sense.adjust(bound));

        let adjusted = match (pooled, selected) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => sense.adjust(self.incumbent),
        };
        // The sign is its own inverse
        self.tighten_global_bound(sense.adjust(adjusted));
    }

    /// Moves the global bound to `candidate` if that tightens it.
    fn tighten_global_bound(&mut self, candidate: T) {
        if candidate.is_nan() {
            return;
        }
        let candidate = self.sense.best(candidate, self.incumbent);
        if self.sense.adjust(candidate) > self.sense.adjust(self.global_bound) {
            self.global_bound = candidate;
            self.publish_global_bound();
        }
    }

    #[inline]
    fn publish_global_bound(&mut self) {
        match self.sense {
            ObjectiveSense::Minimize => self.sink.report_lower_bound(self.global_bound),
            ObjectiveSense::Maximize => self.sink.report_upper_bound(self.global_bound),
        }
        self.notify_bounds();
    }

    #[inline]
    fn publish_incumbent(&mut self) {
        match self.sense {
            ObjectiveSense::Minimize => self.sink.report_upper_bound(self.incumbent),
            ObjectiveSense::Maximize => self.sink.report_lower_bound(self.incumbent),
        }
        self.notify_bounds();
    }

    #[inline]
    fn notify_bounds(&mut self) {
        let (lower, upper) = self
            .sense
            .lower_and_upper(self.global_bound, self.incumbent);
        self.monitor.on_bounds(lower, upper, &self.stats);
    }
}
