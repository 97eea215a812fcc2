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

//! # Objective Numerics
//!
//! Unified numeric bounds for objective values. `ObjectiveValue` collects the
//! floating point capabilities the search engines need into a single alias so
//! generic signatures stay short.
//!
//! ## Motivation
//!
//! Relaxation bounds are fractional even when the objective of the original
//! problem is integral, and infeasibility is naturally expressed as an
//! infinite objective. Floating point types cover both, while `num_traits`
//! keeps the engines generic over `f32` and `f64`.

use num_traits::{Float, FromPrimitive};

/// A trait alias for numeric types that can be used as objective values.
///
/// # Note
///
/// Implementations must provide signed infinities; they are used as the
/// infeasibility sentinels of the two objective senses.
pub trait ObjectiveValue:
    Float + FromPrimitive + std::fmt::Debug + std::fmt::Display + Send + Sync + 'static
{
    /// Converts a literal constant into the objective type.
    ///
    /// Every `ObjectiveValue` can represent small constants such as the
    /// pruning margin, so this never fails for the values used by the engines.
    #[inline]
    fn constant(value: f64) -> Self {
        Self::from_f64(value).unwrap_or_else(Self::nan)
    }
}

impl<T> ObjectiveValue for T where
    T: Float + FromPrimitive + std::fmt::Debug + std::fmt::Display + Send + Sync + 'static
{
}
