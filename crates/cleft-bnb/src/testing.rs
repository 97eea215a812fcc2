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

//! Test fixtures shared by the unit tests of this crate.
//!
//! `KnapsackNode` is a complete `BranchNode` over 0/1 knapsack problems with
//! the Dantzig LP relaxation, in a covering (minimize cost, weight at least a
//! demand) and a packing (maximize value, weight at most a capacity) flavour.
//! It counts constructions, clones, drops and relaxations so tests can check
//! the engine's node bookkeeping.

use crate::{
    monitor::tree_search_monitor::{Inspection, PruneReason, TreeSearchMonitor},
    node::{BranchDirection, BranchNode},
    state::SearchProgress,
    stats::BnbStatistics,
};
use cleft_search::{
    bounds::BoundSink, cancel::CancellationSource, monitor::search_monitor::SearchCommand,
    sense::ObjectiveSense,
};
use rand::{Rng, rngs::StdRng};
use std::{
    cell::Cell,
    rc::Rc,
    sync::{
        Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item {
    /// Cost when covering, value when packing.
    pub cost: f64,
    pub weight: f64,
}

impl Item {
    pub fn new(cost: f64, weight: f64) -> Self {
        Self { cost, weight }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnapsackKind {
    /// minimize sum(cost * x) subject to sum(weight * x) >= rhs
    Covering,
    /// maximize sum(cost * x) subject to sum(weight * x) <= rhs
    Packing,
}

impl KnapsackKind {
    fn sense(self) -> ObjectiveSense {
        match self {
            KnapsackKind::Covering => ObjectiveSense::Minimize,
            KnapsackKind::Packing => ObjectiveSense::Maximize,
        }
    }
}

#[derive(Debug, Default)]
pub struct NodeCounters {
    created: Cell<usize>,
    clones: Cell<usize>,
    drops: Cell<usize>,
    relaxations: Cell<usize>,
}

impl NodeCounters {
    pub fn created(&self) -> usize {
        self.created.get()
    }

    pub fn clones(&self) -> usize {
        self.clones.get()
    }

    pub fn drops(&self) -> usize {
        self.drops.get()
    }

    pub fn relaxations(&self) -> usize {
        self.relaxations.get()
    }

    pub fn live(&self) -> usize {
        self.created() - self.drops()
    }

    fn bump(cell: &Cell<usize>) {
        cell.set(cell.get() + 1);
    }
}

#[derive(Debug)]
pub struct KnapsackNode {
    kind: KnapsackKind,
    items: Rc<[Item]>,
    /// Item indices in LP greedy order.
    order: Rc<[usize]>,
    rhs: f64,
    fixed: Vec<Option<bool>>,
    unfixed: usize,
    values: Vec<f64>,
    fractional: Option<usize>,
    feasible: bool,
    counters: Rc<NodeCounters>,
}

impl KnapsackNode {
    pub fn covering(items: &[Item], demand: f64) -> Self {
        Self::with_counters(
            KnapsackKind::Covering,
            items,
            demand,
            Rc::new(NodeCounters::default()),
        )
    }

    pub fn packing(items: &[Item], capacity: f64) -> Self {
        Self::with_counters(
            KnapsackKind::Packing,
            items,
            capacity,
            Rc::new(NodeCounters::default()),
        )
    }

    pub fn with_counters(
        kind: KnapsackKind,
        items: &[Item],
        rhs: f64,
        counters: Rc<NodeCounters>,
    ) -> Self {
        let mut order: Vec<usize> = (0..items.len()).collect();
        let ratio = |i: usize| items[i].cost / items[i].weight;
        match kind {
            KnapsackKind::Covering => order.sort_by(|&a, &b| ratio(a).total_cmp(&ratio(b))),
            KnapsackKind::Packing => order.sort_by(|&a, &b| ratio(b).total_cmp(&ratio(a))),
        }

        NodeCounters::bump(&counters.created);
        Self {
            kind,
            items: items.into(),
            order: order.into(),
            rhs,
            fixed: vec![None; items.len()],
            unfixed: items.len(),
            values: vec![0.0; items.len()],
            fractional: None,
            feasible: false,
            counters,
        }
    }

    pub fn counters(&self) -> Rc<NodeCounters> {
        Rc::clone(&self.counters)
    }

    pub fn fixed(&self, variable: usize) -> Option<bool> {
        self.fixed[variable]
    }

    fn fix(&mut self, variable: usize, value: bool) {
        if self.fixed[variable].is_none() {
            self.unfixed -= 1;
        }
        self.fixed[variable] = Some(value);
    }

    fn objective_of_values(&self) -> f64 {
        self.items
            .iter()
            .zip(&self.values)
            .map(|(item, x)| item.cost * x)
            .sum()
    }

    fn weight_of_values(&self) -> f64 {
        self.items
            .iter()
            .zip(&self.values)
            .map(|(item, x)| item.weight * x)
            .sum()
    }
}

impl Clone for KnapsackNode {
    fn clone(&self) -> Self {
        NodeCounters::bump(&self.counters.clones);
        NodeCounters::bump(&self.counters.created);
        Self {
            kind: self.kind,
            items: Rc::clone(&self.items),
            order: Rc::clone(&self.order),
            rhs: self.rhs,
            fixed: self.fixed.clone(),
            unfixed: self.unfixed,
            values: self.values.clone(),
            fractional: self.fractional,
            feasible: self.feasible,
            counters: Rc::clone(&self.counters),
        }
    }
}

impl Drop for KnapsackNode {
    fn drop(&mut self) {
        NodeCounters::bump(&self.counters.drops);
    }
}

impl BranchNode<f64> for KnapsackNode {
    type Solution = Vec<bool>;

    fn variable_count(&self) -> usize {
        self.items.len()
    }

    fn unfixed(&self) -> usize {
        self.unfixed
    }

    fn objective_sense(&self) -> ObjectiveSense {
        self.kind.sense()
    }

    fn select_variable(&self) -> Option<usize> {
        self.fractional
    }

    fn direction_constructive(&self, _variable: usize) -> BranchDirection {
        BranchDirection::RaiseFirst
    }

    fn direction_exhaustive(&self, variable: usize) -> BranchDirection {
        if self.values[variable] >= 0.5 {
            BranchDirection::RaiseFirst
        } else {
            BranchDirection::LowerFirst
        }
    }

    fn raise(&mut self, variable: usize) {
        self.fix(variable, true);
    }

    fn lower(&mut self, variable: usize) {
        self.fix(variable, false);
    }

    fn solve_relaxation(&mut self) -> f64 {
        NodeCounters::bump(&self.counters.relaxations);
        self.fractional = None;
        self.feasible = false;
        for (x, fixed) in self.values.iter_mut().zip(&self.fixed) {
            *x = if *fixed == Some(true) { 1.0 } else { 0.0 };
        }

        let used = self.weight_of_values();
        let mut remaining = match self.kind {
            KnapsackKind::Covering => self.rhs - used,
            KnapsackKind::Packing => {
                if used > self.rhs {
                    return self.infeasibility();
                }
                self.rhs - used
            }
        };

        for &i in self.order.iter() {
            if remaining <= 0.0 {
                break;
            }
            if self.fixed[i].is_some() {
                continue;
            }
            let weight = self.items[i].weight;
            if weight <= remaining {
                self.values[i] = 1.0;
                remaining -= weight;
            } else {
                self.values[i] = remaining / weight;
                self.fractional = Some(i);
                remaining = 0.0;
            }
        }

        if self.kind == KnapsackKind::Covering && remaining > 0.0 {
            return self.infeasibility();
        }

        self.feasible = self.fractional.is_none();
        self.objective_of_values()
    }

    fn is_feasible(&self) -> bool {
        self.feasible
    }

    fn local_search(&mut self, objective: f64) -> f64 {
        let mut by_cost: Vec<usize> = (0..self.items.len()).collect();
        match self.kind {
            KnapsackKind::Covering => {
                // Drop redundant items, most expensive first
                by_cost.sort_by(|&a, &b| self.items[b].cost.total_cmp(&self.items[a].cost));
                for i in by_cost {
                    if self.values[i] == 1.0
                        && self.weight_of_values() - self.items[i].weight >= self.rhs
                    {
                        self.values[i] = 0.0;
                    }
                }
            }
            KnapsackKind::Packing => {
                // Add items that still fit, most valuable first
                by_cost.sort_by(|&a, &b| self.items[a].cost.total_cmp(&self.items[b].cost));
                for i in by_cost.into_iter().rev() {
                    if self.values[i] == 0.0
                        && self.weight_of_values() + self.items[i].weight <= self.rhs
                    {
                        self.values[i] = 1.0;
                    }
                }
            }
        }

        let improved = self.objective_of_values();
        if self.kind.sense().is_better(improved, objective) {
            improved
        } else {
            objective
        }
    }

    fn save_solution(&self) -> Vec<bool> {
        self.values.iter().map(|&x| x > 0.5).collect()
    }
}

/// Objective of `selection`, or `None` if it violates the knapsack constraint.
pub fn evaluate(kind: KnapsackKind, items: &[Item], rhs: f64, selection: &[bool]) -> Option<f64> {
    let (cost, weight) = items
        .iter()
        .zip(selection)
        .filter(|(_, taken)| **taken)
        .fold((0.0, 0.0), |(c, w), (item, _)| (c + item.cost, w + item.weight));
    let feasible = match kind {
        KnapsackKind::Covering => weight >= rhs,
        KnapsackKind::Packing => weight <= rhs,
    };
    feasible.then_some(cost)
}

/// Optimal objective by enumeration, or `None` if the instance has no solution.
pub fn brute_force(kind: KnapsackKind, items: &[Item], rhs: f64) -> Option<f64> {
    let n = items.len();
    let mut best: Option<f64> = None;
    for mask in 0u32..(1u32 << n) {
        let selection: Vec<bool> = (0..n).map(|i| mask & (1 << i) != 0).collect();
        if let Some(value) = evaluate(kind, items, rhs, &selection) {
            best = Some(match best {
                Some(current) => kind.sense().best(current, value),
                None => value,
            });
        }
    }
    best
}

/// Items with integer costs in `1..=30` and weights in `1..=20`.
pub fn random_items(rng: &mut StdRng, n: usize) -> Vec<Item> {
    (0..n)
        .map(|_| {
            Item::new(
                f64::from(rng.gen_range(1..=30u32)),
                f64::from(rng.gen_range(1..=20u32)),
            )
        })
        .collect()
}

/// The covering instance used across the tests:
/// min 5a + 4b + 3c + 7d subject to 4a + 3b + 2c + 5d >= 8.
/// LP root bound 10.4, optimum 11 with {b, d}.
pub fn small_covering_items() -> [Item; 4] {
    [
        Item::new(5.0, 4.0),
        Item::new(4.0, 3.0),
        Item::new(3.0, 2.0),
        Item::new(7.0, 5.0),
    ]
}

/// A node that violates the contract: never feasible, and branching on
/// `variable` (which may be `None` or out of range).
#[derive(Debug, Clone)]
pub struct BrokenNode {
    pub variable: Option<usize>,
}

impl BranchNode<f64> for BrokenNode {
    type Solution = ();

    fn variable_count(&self) -> usize {
        2
    }

    fn unfixed(&self) -> usize {
        2
    }

    fn objective_sense(&self) -> ObjectiveSense {
        ObjectiveSense::Minimize
    }

    fn select_variable(&self) -> Option<usize> {
        self.variable
    }

    fn direction_constructive(&self, _variable: usize) -> BranchDirection {
        BranchDirection::LowerFirst
    }

    fn raise(&mut self, _variable: usize) {}

    fn lower(&mut self, _variable: usize) {}

    fn solve_relaxation(&mut self) -> f64 {
        0.0
    }

    fn is_feasible(&self) -> bool {
        false
    }

    fn save_solution(&self) {}
}

/// One-variable minimization node with its own infeasibility sentinel.
///
/// With `infeasible_when` set, only the child fixing the variable to that
/// value is infeasible (the other child is a solution of value 3); with
/// `None` every node is infeasible.
#[derive(Debug, Clone)]
pub struct SentinelNode {
    pub infeasible_when: Option<bool>,
    pub fixed: Option<bool>,
}

impl SentinelNode {
    pub const SENTINEL: f64 = 1e50;
}

impl BranchNode<f64> for SentinelNode {
    type Solution = Option<bool>;

    fn variable_count(&self) -> usize {
        1
    }

    fn unfixed(&self) -> usize {
        usize::from(self.fixed.is_none())
    }

    fn objective_sense(&self) -> ObjectiveSense {
        ObjectiveSense::Minimize
    }

    fn select_variable(&self) -> Option<usize> {
        self.fixed.is_none().then_some(0)
    }

    fn direction_constructive(&self, _variable: usize) -> BranchDirection {
        BranchDirection::RaiseFirst
    }

    fn raise(&mut self, _variable: usize) {
        self.fixed = Some(true);
    }

    fn lower(&mut self, _variable: usize) {
        self.fixed = Some(false);
    }

    fn solve_relaxation(&mut self) -> f64 {
        match (self.infeasible_when, self.fixed) {
            (None, _) => self.infeasibility(),
            (Some(dead), Some(value)) if dead == value => self.infeasibility(),
            (_, None) => 0.0,
            (_, Some(_)) => 3.0,
        }
    }

    fn infeasibility(&self) -> f64 {
        Self::SENTINEL
    }

    fn is_feasible(&self) -> bool {
        self.fixed.is_some()
    }

    fn save_solution(&self) -> Option<bool> {
        self.fixed
    }
}

/// Cancellation source that reports "running" for a fixed number of polls.
#[derive(Debug)]
pub struct StopAfter {
    remaining: AtomicU64,
    polls: AtomicU64,
}

impl StopAfter {
    pub fn new(polls: u64) -> Self {
        Self {
            remaining: AtomicU64::new(polls),
            polls: AtomicU64::new(0),
        }
    }

    pub fn polls(&self) -> u64 {
        self.polls.load(Ordering::Relaxed)
    }
}

impl CancellationSource for StopAfter {
    fn is_running(&self) -> bool {
        self.polls.fetch_add(1, Ordering::Relaxed);
        self.remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |r| r.checked_sub(1))
            .is_ok()
    }
}

/// Bound sink that records every report in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub lower: Mutex<Vec<f64>>,
    pub upper: Mutex<Vec<f64>>,
}

impl RecordingSink {
    pub fn lower_reports(&self) -> Vec<f64> {
        self.lower.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn upper_reports(&self) -> Vec<f64> {
        self.upper.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl BoundSink<f64> for RecordingSink {
    fn report_lower_bound(&self, value: f64) {
        if let Ok(mut v) = self.lower.lock() {
            v.push(value);
        }
    }

    fn report_upper_bound(&self, value: f64) {
        if let Ok(mut v) = self.upper.lock() {
            v.push(value);
        }
    }
}

/// Monitor that records the events tests assert on.
#[derive(Debug, Default)]
pub struct RecordingMonitor {
    pub entered: usize,
    pub exited: usize,
    pub steps: u64,
    pub incumbents: Vec<f64>,
    pub bounds: Vec<(f64, f64)>,
    pub branches: Vec<(usize, BranchDirection)>,
    pub inspections: Vec<(f64, Inspection)>,
    pub prunes: Vec<(PruneReason, usize)>,
    /// Request termination once this many steps happened.
    pub terminate_after: Option<u64>,
}

impl RecordingMonitor {
    pub fn terminating_after(steps: u64) -> Self {
        Self {
            terminate_after: Some(steps),
            ..Default::default()
        }
    }

    pub fn pruned(&self, reason: PruneReason) -> usize {
        self.prunes
            .iter()
            .filter(|(r, _)| *r == reason)
            .map(|(_, count)| count)
            .sum()
    }
}

impl TreeSearchMonitor<f64> for RecordingMonitor {
    fn name(&self) -> &str {
        "RecordingMonitor"
    }

    fn on_enter_search(&mut self, _sense: ObjectiveSense, _statistics: &BnbStatistics<f64>) {
        self.entered += 1;
    }

    fn on_exit_search(&mut self, _statistics: &BnbStatistics<f64>) {
        self.exited += 1;
    }

    fn search_command(
        &mut self,
        _progress: &SearchProgress<f64>,
        _statistics: &BnbStatistics<f64>,
    ) -> SearchCommand {
        match self.terminate_after {
            Some(limit) if self.steps >= limit => {
                SearchCommand::Terminate(format!("stopped after {} steps", limit))
            }
            _ => SearchCommand::Continue,
        }
    }

    fn on_step(&mut self, _progress: &SearchProgress<f64>, _statistics: &BnbStatistics<f64>) {
        self.steps += 1;
    }

    fn on_node_inspected(
        &mut self,
        objective: f64,
        inspection: Inspection,
        _statistics: &BnbStatistics<f64>,
    ) {
        self.inspections.push((objective, inspection));
    }

    fn on_prune(&mut self, reason: PruneReason, count: usize, _statistics: &BnbStatistics<f64>) {
        self.prunes.push((reason, count));
    }

    fn on_branch(
        &mut self,
        variable: usize,
        direction: BranchDirection,
        _statistics: &BnbStatistics<f64>,
    ) {
        self.branches.push((variable, direction));
    }

    fn on_incumbent(&mut self, objective: f64, _statistics: &BnbStatistics<f64>) {
        self.incumbents.push(objective);
    }

    fn on_bounds(&mut self, lower: f64, upper: f64, _statistics: &BnbStatistics<f64>) {
        self.bounds.push((lower, upper));
    }
}

/// Returns `true` if `values` never decreases.
pub fn is_non_decreasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

/// Returns `true` if `values` never increases.
pub fn is_non_increasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] >= w[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_covering_lp_bound_and_brute_force() {
        let items = small_covering_items();
        let mut node = KnapsackNode::covering(&items, 8.0);
        let bound = node.solve_relaxation();
        assert!((bound - 10.4).abs() < 1e-9);
        assert!(!node.is_feasible());
        assert_eq!(node.select_variable(), Some(3));

        assert_eq!(brute_force(KnapsackKind::Covering, &items, 8.0), Some(11.0));
        assert_eq!(
            evaluate(KnapsackKind::Covering, &items, 8.0, &[false, true, false, true]),
            Some(11.0)
        );
        assert_eq!(
            evaluate(KnapsackKind::Covering, &items, 8.0, &[true, true, false, false]),
            None
        );
    }

    #[test]
    fn test_packing_relaxation() {
        // max 10a + 7b + 4c s.t. 5a + 4b + 3c <= 9
        let items = [Item::new(10.0, 5.0), Item::new(7.0, 4.0), Item::new(4.0, 3.0)];
        let mut node = KnapsackNode::packing(&items, 9.0);
        assert_eq!(node.solve_relaxation(), 17.0);
        assert!(node.is_feasible());
        assert_eq!(node.save_solution(), vec![true, true, false]);

        node.raise(2);
        node.raise(0);
        // 5 + 3 used, 1 left for b: 14 + 7/4
        assert!((node.solve_relaxation() - 15.75).abs() < 1e-9);
        assert_eq!(node.select_variable(), Some(1));

        node.raise(1);
        assert_eq!(node.solve_relaxation(), f64::NEG_INFINITY);
        assert!(!node.is_feasible());
    }

    #[test]
    fn test_counters_track_clones_and_drops() {
        let counters = Rc::new(NodeCounters::default());
        {
            let node = KnapsackNode::with_counters(
                KnapsackKind::Covering,
                &small_covering_items(),
                8.0,
                Rc::clone(&counters),
            );
            let _copy = node.clone();
            assert_eq!(counters.created(), 2);
            assert_eq!(counters.clones(), 1);
            assert_eq!(counters.live(), 2);
        }
        assert_eq!(counters.drops(), 2);
        assert_eq!(counters.live(), 0);
    }

    #[test]
    fn test_covering_local_search_drops_redundant_items() {
        let items = small_covering_items();
        let mut node = KnapsackNode::covering(&items, 8.0);
        node.raise(0);
        node.raise(1);
        node.raise(2);
        node.raise(3);
        assert_eq!(node.solve_relaxation(), 19.0);
        assert!(node.is_feasible());

        // Dropping d leaves weight 9, after that every item is needed
        let improved = node.local_search(19.0);
        assert_eq!(improved, 12.0);
        assert_eq!(
            evaluate(KnapsackKind::Covering, &items, 8.0, &node.save_solution()),
            Some(12.0)
        );
    }

    #[test]
    fn test_stop_after_polls() {
        let source = StopAfter::new(2);
        assert!(source.is_running());
        assert!(source.is_running());
        assert!(!source.is_running());
        assert!(!source.is_running());
        assert_eq!(source.polls(), 4);
    }

    #[test]
    fn test_random_items_are_integral() {
        let mut rng = StdRng::seed_from_u64(7);
        let items = random_items(&mut rng, 10);
        assert_eq!(items.len(), 10);
        assert!(items.iter().all(|i| i.cost.fract() == 0.0 && i.weight >= 1.0));
    }
}
