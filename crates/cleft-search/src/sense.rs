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

//! # Objective Sense
//!
//! Minimisation and maximisation are handled through one code path: every
//! comparison is made on the sign-adjusted value `sign * value`, where the
//! sign is `+1` for `Minimize` and `-1` for `Maximize`. Smaller adjusted
//! values are always better.

use crate::num::ObjectiveValue;

/// Direction of optimisation of a problem family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObjectiveSense {
    /// Smaller objective values are better.
    #[default]
    Minimize,
    /// Larger objective values are better.
    Maximize,
}

impl ObjectiveSense {
    /// Returns `+1` for `Minimize` and `-1` for `Maximize`.
    #[inline]
    pub fn sign<T>(self) -> T
    where
        T: ObjectiveValue,
    {
        match self {
            ObjectiveSense::Minimize => T::one(),
            ObjectiveSense::Maximize => -T::one(),
        }
    }

    /// Returns the sentinel objective of a sub-problem without solutions:
    /// `+inf` when minimizing, `-inf` when maximizing.
    #[inline]
    pub fn infeasibility<T>(self) -> T
    where
        T: ObjectiveValue,
    {
        match self {
            ObjectiveSense::Minimize => T::infinity(),
            ObjectiveSense::Maximize => T::neg_infinity(),
        }
    }

    /// Returns the sign-adjusted value, for which smaller is always better.
    #[inline]
    pub fn adjust<T>(self, value: T) -> T
    where
        T: ObjectiveValue,
    {
        self.sign::<T>() * value
    }

    /// Returns `true` if `a` is strictly better than `b`.
    #[inline]
    pub fn is_better<T>(self, a: T, b: T) -> bool
    where
        T: ObjectiveValue,
    {
        self.adjust(a) < self.adjust(b)
    }

    /// Returns the better of the two values. Ties return `a`.
    #[inline]
    pub fn best<T>(self, a: T, b: T) -> T
    where
        T: ObjectiveValue,
    {
        if self.is_better(b, a) { b } else { a }
    }

    /// Maps a (relaxation bound, incumbent) pair onto a (lower, upper) pair.
    ///
    /// When minimizing the relaxation bound is the lower bound and the
    /// incumbent the upper bound; maximizing swaps the roles.
    #[inline]
    pub fn lower_and_upper<T>(self, bound: T, incumbent: T) -> (T, T)
    where
        T: ObjectiveValue,
    {
        match self {
            ObjectiveSense::Minimize => (bound, incumbent),
            ObjectiveSense::Maximize => (incumbent, bound),
        }
    }
}

impl std::fmt::Display for ObjectiveSense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectiveSense::Minimize => write!(f, "Minimize"),
            ObjectiveSense::Maximize => write!(f, "Maximize"),
        }
    }
}
