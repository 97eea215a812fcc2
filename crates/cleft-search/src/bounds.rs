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

//! # Bound Tracking
//!
//! Engines publish the bounds they prove to a `BoundSink`. Consumers such as
//! progress displays or nested solvers read them asynchronously, so a sink is
//! shared across threads and engines only ever report tightened bounds.
//!
//! ## Implementations
//!
//! - `NoBoundSink`: discards every report.
//! - `SharedBounds`: lock-free holder of the latest lower and upper bound.
//!   Bounds are stored as `f64` bit patterns in `AtomicU64`s and updated
//!   through compare-and-swap loops that reject loosening reports, so a
//!   concurrent reader can never observe a bound moving backwards.

use crate::num::ObjectiveValue;
use std::sync::atomic::{AtomicU64, Ordering};

/// A sink that receives the bounds proven by a search.
pub trait BoundSink<T>: Sync
where
    T: ObjectiveValue,
{
    /// Reports a proven lower bound on the optimal objective.
    fn report_lower_bound(&self, value: T);
    /// Reports a proven upper bound on the optimal objective.
    fn report_upper_bound(&self, value: T);
}

impl<T, S> BoundSink<T> for &S
where
    T: ObjectiveValue,
    S: BoundSink<T> + ?Sized,
{
    #[inline(always)]
    fn report_lower_bound(&self, value: T) {
        (**self).report_lower_bound(value);
    }

    #[inline(always)]
    fn report_upper_bound(&self, value: T) {
        (**self).report_upper_bound(value);
    }
}

/// A bound sink that ignores every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoBoundSink;

impl<T> BoundSink<T> for NoBoundSink
where
    T: ObjectiveValue,
{
    #[inline(always)]
    fn report_lower_bound(&self, _value: T) {}

    #[inline(always)]
    fn report_upper_bound(&self, _value: T) {}
}

/// A concurrent holder of the tightest bounds reported so far.
///
/// The lower bound starts at `-inf`, the upper bound at `+inf`. Reports that
/// would loosen a bound, as well as `NaN` reports, are ignored.
#[derive(Debug)]
pub struct SharedBounds {
    lower: AtomicU64,
    upper: AtomicU64,
}

impl Default for SharedBounds {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedBounds {
    /// Creates a new holder without any proven bound.
    #[inline]
    pub fn new() -> Self {
        Self {
            lower: AtomicU64::new(f64::NEG_INFINITY.to_bits()),
            upper: AtomicU64::new(f64::INFINITY.to_bits()),
        }
    }

    /// Returns the tightest lower bound reported so far.
    #[inline]
    pub fn lower_bound(&self) -> f64 {
        f64::from_bits(self.lower.load(Ordering::Relaxed))
    }

    /// Returns the tightest upper bound reported so far.
    #[inline]
    pub fn upper_bound(&self) -> f64 {
        f64::from_bits(self.upper.load(Ordering::Relaxed))
    }

    /// Returns `upper - lower`, or `+inf` while either bound is unknown.
    #[inline]
    pub fn gap(&self) -> f64 {
        let (lower, upper) = (self.lower_bound(), self.upper_bound());
        if lower.is_finite() && upper.is_finite() {
            upper - lower
        } else {
            f64::INFINITY
        }
    }

    /// Installs `value` if `tighter(value, current)` holds.
    /// Returns `true` if the stored bound changed.
    #[inline]
    fn tighten<F>(cell: &AtomicU64, value: f64, tighter: F) -> bool
    where
        F: Fn(f64, f64) -> bool,
    {
        if value.is_nan() {
            return false;
        }

        cell.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
            let current = f64::from_bits(bits);
            if tighter(value, current) {
                Some(value.to_bits())
            } else {
                None
            }
        })
        .is_ok()
    }
}

impl<T> BoundSink<T> for SharedBounds
where
    T: ObjectiveValue,
{
    #[inline]
    fn report_lower_bound(&self, value: T) {
        if let Some(value) = value.to_f64() {
            Self::tighten(&self.lower, value, |new, current| new > current);
        }
    }

    #[inline]
    fn report_upper_bound(&self, value: T) {
        if let Some(value) = value.to_f64() {
            Self::tighten(&self.upper, value, |new, current| new < current);
        }
    }
}

impl std::fmt::Display for SharedBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SharedBounds(lower: {}, upper: {})",
            self.lower_bound(),
            self.upper_bound()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_new_has_infinite_bounds() {
        let bounds = SharedBounds::new();
        assert_eq!(bounds.lower_bound(), f64::NEG_INFINITY);
        assert_eq!(bounds.upper_bound(), f64::INFINITY);
        assert_eq!(bounds.gap(), f64::INFINITY);
    }

    #[test]
    fn test_reports_only_tighten() {
        let bounds = SharedBounds::new();

        BoundSink::<f64>::report_lower_bound(&bounds, 10.0);
        BoundSink::<f64>::report_upper_bound(&bounds, 14.0);
        assert_eq!(bounds.lower_bound(), 10.0);
        assert_eq!(bounds.upper_bound(), 14.0);

        // Loosening reports are ignored
        BoundSink::<f64>::report_lower_bound(&bounds, 9.0);
        BoundSink::<f64>::report_upper_bound(&bounds, 15.0);
        assert_eq!(bounds.lower_bound(), 10.0);
        assert_eq!(bounds.upper_bound(), 14.0);

        // Tightening reports are installed
        BoundSink::<f64>::report_lower_bound(&bounds, 11.0);
        BoundSink::<f64>::report_upper_bound(&bounds, 12.0);
        assert_eq!(bounds.gap(), 1.0);
    }

    #[test]
    fn test_nan_reports_are_ignored() {
        let bounds = SharedBounds::new();
        BoundSink::<f64>::report_lower_bound(&bounds, f64::NAN);
        BoundSink::<f64>::report_upper_bound(&bounds, f64::NAN);
        assert_eq!(bounds.lower_bound(), f64::NEG_INFINITY);
        assert_eq!(bounds.upper_bound(), f64::INFINITY);
    }

    #[test]
    fn test_f32_reports_are_widened() {
        let bounds = SharedBounds::new();
        BoundSink::<f32>::report_upper_bound(&bounds, 2.5f32);
        assert_eq!(bounds.upper_bound(), 2.5);
    }

    #[test]
    fn test_concurrent_reports_keep_tightest_bound() {
        let bounds = Arc::new(SharedBounds::new());
        let handles = (0..4)
            .map(|t| {
                let bounds = Arc::clone(&bounds);
                std::thread::spawn(move || {
                    for i in 0..1000 {
                        let value = (t * 1000 + i) as f64;
                        BoundSink::<f64>::report_lower_bound(&*bounds, value);
                        BoundSink::<f64>::report_upper_bound(&*bounds, 10_000.0 - value);
                    }
                })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            handle.join().expect("reporting thread panicked");
        }

        assert_eq!(bounds.lower_bound(), 3999.0);
        assert_eq!(bounds.upper_bound(), 6001.0);
    }

    #[test]
    fn test_no_bound_sink_accepts_reports() {
        let sink = NoBoundSink;
        BoundSink::<f64>::report_lower_bound(&sink, 1.0);
        BoundSink::<f64>::report_upper_bound(&sink, 2.0);
    }

    #[test]
    fn test_display() {
        let bounds = SharedBounds::new();
        BoundSink::<f64>::report_lower_bound(&bounds, 1.5);
        assert_eq!(
            format!("{}", bounds),
            "SharedBounds(lower: 1.5, upper: inf)"
        );
    }
}
