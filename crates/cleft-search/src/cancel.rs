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

//! # Cooperative Cancellation
//!
//! Search loops poll a `CancellationSource` once per iteration and stop at
//! the next loop top when it reports that the search may no longer run.
//! The flag itself is owned by the caller and may be toggled from any
//! thread, for example by a UI stop action or a resource watchdog.
//!
//! ## Highlights
//!
//! - `NeverCancel`: a source that always allows the search to run.
//! - `AtomicBool`: a plain shared flag where `true` means "still running".
//! - `RunningFlag`: a cloneable handle around an `Arc<AtomicBool>` with
//!   `stop()`/`resume()` for cross-thread control.
//!
//! Reads and writes use `Ordering::Relaxed`; cancellation is coarse-grained
//! and only needs to become visible eventually.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// A source that decides whether a search is still permitted to run.
pub trait CancellationSource: Sync {
    /// Returns `true` while the search may continue.
    fn is_running(&self) -> bool;
}

/// A cancellation source that never cancels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NeverCancel;

impl CancellationSource for NeverCancel {
    #[inline(always)]
    fn is_running(&self) -> bool {
        true
    }
}

impl CancellationSource for AtomicBool {
    #[inline(always)]
    fn is_running(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<C> CancellationSource for &C
where
    C: CancellationSource + ?Sized,
{
    #[inline(always)]
    fn is_running(&self) -> bool {
        (**self).is_running()
    }
}

/// A shareable running flag. Clones observe and control the same flag.
#[derive(Debug, Clone)]
pub struct RunningFlag {
    running: Arc<AtomicBool>,
}

impl Default for RunningFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl RunningFlag {
    /// Creates a new flag in the running state.
    #[inline]
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Requests every search polling this flag to stop.
    #[inline]
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// Allows searches polling this flag to run again.
    #[inline]
    pub fn resume(&self) {
        self.running.store(true, Ordering::Relaxed);
    }
}

impl CancellationSource for RunningFlag {
    #[inline(always)]
    fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

impl std::fmt::Display for RunningFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RunningFlag(running: {})", self.is_running())
    }
}
