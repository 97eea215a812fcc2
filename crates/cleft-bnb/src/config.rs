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

//! Scheme configuration
//!
//! `SchemeConfig` bundles the knobs of a search. It is only obtainable through
//! `Default` or a validating `SchemeConfigBuilder`, so an engine holding a
//! config never has to re-check it.

use cleft_search::num::ObjectiveValue;
use thiserror::Error;

/// How hard the search tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchLevel {
    /// Stop at the first feasible solution.
    FeasibleOnly,
    /// Dive for good solutions first, then close the gap.
    #[default]
    Constructive,
    /// Best-first from the start, aiming at a proof of optimality.
    Exhaustive,
}

impl std::fmt::Display for SearchLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchLevel::FeasibleOnly => write!(f, "FeasibleOnly"),
            SearchLevel::Constructive => write!(f, "Constructive"),
            SearchLevel::Exhaustive => write!(f, "Exhaustive"),
        }
    }
}

/// Errors reported when building a `SchemeConfig`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("node limit must be positive")]
    ZeroNodeLimit,
    #[error("iteration limit must be positive when set")]
    ZeroIterationLimit,
    #[error("pruning margin must be finite and non-negative, got {0}")]
    InvalidPruningMargin(f64),
    #[error("epsilon must be finite and non-negative, got {0}")]
    InvalidEpsilon(f64),
    #[error("a-priori bound must not be NaN")]
    NanAprioriBound,
}

/// Validated configuration of a `BranchScheme`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchemeConfig<T> {
    search_level: SearchLevel,
    node_limit: usize,
    iteration_limit: Option<u64>,
    a_priori_bound: Option<T>,
    pruning_margin: T,
    epsilon: T,
}

impl<T> SchemeConfig<T>
where
    T: ObjectiveValue,
{
    pub const DEFAULT_NODE_LIMIT: usize = 1_000_000;
    pub const DEFAULT_PRUNING_MARGIN: f64 = 1.0;
    pub const DEFAULT_EPSILON: f64 = 1e-6;

    /// Returns a builder initialised with the defaults.
    #[inline]
    pub fn builder() -> SchemeConfigBuilder<T> {
        SchemeConfigBuilder::new()
    }

    #[inline]
    pub fn search_level(&self) -> SearchLevel {
        self.search_level
    }

    /// Capacity of the active pool. The search stops as soon as the pool
    /// holds this many nodes, and the memory-pressure phase rules scale
    /// with it.
    #[inline]
    pub fn node_limit(&self) -> usize {
        self.node_limit
    }

    /// Maximum number of iterations, unlimited if `None`.
    #[inline]
    pub fn iteration_limit(&self) -> Option<u64> {
        self.iteration_limit
    }

    /// Objective value no solution of interest can be worse than.
    #[inline]
    pub fn a_priori_bound(&self) -> Option<T> {
        self.a_priori_bound
    }

    /// Minimum improvement a bound has to promise over the incumbent.
    #[inline]
    pub fn pruning_margin(&self) -> T {
        self.pruning_margin
    }

    #[inline]
    pub fn epsilon(&self) -> T {
        self.epsilon
    }
}

impl<T> Default for SchemeConfig<T>
where
    T: ObjectiveValue,
{
    fn default() -> Self {
        Self {
            search_level: SearchLevel::default(),
            node_limit: Self::DEFAULT_NODE_LIMIT,
            iteration_limit: None,
            a_priori_bound: None,
            pruning_margin: T::constant(Self::DEFAULT_PRUNING_MARGIN),
            epsilon: T::constant(Self::DEFAULT_EPSILON),
        }
    }
}

impl<T> std::fmt::Display for SchemeConfig<T>
where
    T: ObjectiveValue,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SchemeConfig(level: {}, node limit: {}, margin: {}, epsilon: {}",
            self.search_level, self.node_limit, self.pruning_margin, self.epsilon
        )?;
        if let Some(limit) = self.iteration_limit {
            write!(f, ", iteration limit: {}", limit)?;
        }
        if let Some(bound) = self.a_priori_bound {
            write!(f, ", a-priori bound: {}", bound)?;
        }
        write!(f, ")")
    }
}

/// Builder for `SchemeConfig`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchemeConfigBuilder<T> {
    config: SchemeConfig<T>,
}

impl<T> Default for SchemeConfigBuilder<T>
where
    T: ObjectiveValue,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SchemeConfigBuilder<T>
where
    T: ObjectiveValue,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            config: SchemeConfig::default(),
        }
    }

    #[inline]
    pub fn search_level(mut self, level: SearchLevel) -> Self {
        self.config.search_level = level;
        self
    }

    /// Sets the active pool capacity; reaching it stops the search.
    #[inline]
    pub fn node_limit(mut self, node_limit: usize) -> Self {
        self.config.node_limit = node_limit;
        self
    }

    #[inline]
    pub fn iteration_limit(mut self, iteration_limit: u64) -> Self {
        self.config.iteration_limit = Some(iteration_limit);
        self
    }

    #[inline]
    pub fn a_priori_bound(mut self, bound: T) -> Self {
        self.config.a_priori_bound = Some(bound);
        self
    }

    #[inline]
    pub fn pruning_margin(mut self, margin: T) -> Self {
        self.config.pruning_margin = margin;
        self
    }

    #[inline]
    pub fn epsilon(mut self, epsilon: T) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    /// Validates the settings and returns the configuration.
    pub fn build(self) -> Result<SchemeConfig<T>, ConfigError> {
        let config = self.config;

        if config.node_limit == 0 {
            return Err(ConfigError::ZeroNodeLimit);
        }
        if config.iteration_limit == Some(0) {
            return Err(ConfigError::ZeroIterationLimit);
        }
        if !is_finite_non_negative(config.pruning_margin) {
            return Err(ConfigError::InvalidPruningMargin(as_f64(
                config.pruning_margin,
            )));
        }
        if !is_finite_non_negative(config.epsilon) {
            return Err(ConfigError::InvalidEpsilon(as_f64(config.epsilon)));
        }
        if config.a_priori_bound.is_some_and(|bound| bound.is_nan()) {
            return Err(ConfigError::NanAprioriBound);
        }

        Ok(config)
    }
}

#[inline]
fn is_finite_non_negative<T: ObjectiveValue>(value: T) -> bool {
    value.is_finite() && value >= T::zero()
}

#[inline]
fn as_f64<T: ObjectiveValue>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
