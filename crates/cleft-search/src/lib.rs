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

//! # Cleft Search
//!
//! Search-agnostic vocabulary for exact optimisation engines. This crate
//! collects the pieces every engine in the workspace shares but that know
//! nothing about how a particular engine explores its search space.
//!
//! ## Modules
//!
//! - `num`: The `ObjectiveValue` trait alias over floating point objectives.
//! - `sense`: Minimisation/maximisation handling through a single sign
//!   multiplier so comparison code never special-cases the direction.
//! - `bounds`: The bound-tracking sink (`BoundSink`) engines publish their
//!   lower and upper bounds to, plus a lock-free shared implementation.
//! - `cancel`: Cooperative cancellation sources polled by search loops.
//! - `result`: Solver results and termination reasons.
//! - `monitor`: Generic search monitors and budget enforcement.
//!
//! ## Motivation
//!
//! Keeping this vocabulary separate lets progress displays, nested solvers
//! and watchdogs interact with any engine through the same small set of
//! types, without depending on the engine itself.

pub mod bounds;
pub mod cancel;
pub mod monitor;
pub mod num;
pub mod result;
pub mod sense;
