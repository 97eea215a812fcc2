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

//! Cleft-BnB: a reusable branch-and-bound engine
//!
//! Problem-agnostic hybrid depth-first/best-first branch-and-bound over binary
//! decision variables. Everything problem-specific lives in the `BranchNode`
//! implementation, which owns the partial assignment and its relaxation.
//! The engine only decides which node to explore next and what to prune.
//!
//! Core flow
//! - Implement `node::BranchNode<T>` for your sub-problem.
//! - Build a `config::SchemeConfig` (search level, limits, margin, epsilon).
//! - Run `scheme::BranchScheme::solve`, or `solve_with` to add cooperative
//!   cancellation and a `BoundSink` that receives every bound change.
//!
//! Design highlights
//! - One code path for both senses: comparisons use sign-adjusted values.
//! - Phase selection mixes an initial dive, constructive best-first with
//!   periodic probing dives, and exhaustive best-first near completion.
//! - Nodes are only cloned when they are split; each clone is one child.
//! - The active pool is an arena-backed stack reused across solves.
//!
//! Assumptions and guarantees
//! - Relaxation bounds must be admissible (never better than any solution
//!   in the sub-tree); pruning relies on this for correctness.
//! - With integral objectives the default margin of 1 keeps results exact.
//!
//! Module map
//! - `scheme`: the engine and per-run session.
//! - `node`: the `BranchNode` contract and the `Subproblem` wrapper.
//! - `policy`: search phases and the cutoff rule.
//! - `config`: validated engine configuration and its builder.
//! - `monitor`: tree-search monitors (log, composite, wrappers).
//! - `result`: outcomes with termination reasons and final bounds.
//! - `state`: read-only progress snapshots handed to monitors.
//! - `stats`: lightweight counters and timing.
//! - `error`: contract violations reported by a run.

pub mod config;
pub mod error;
pub mod monitor;
pub mod node;
pub mod policy;
mod pool;
pub mod result;
pub mod scheme;
pub mod state;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;
