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

//! # Gantry Core
//!
//! Foundational utilities for the Gantry storage-yard simulator. This crate
//! consolidates the small, reusable building blocks that underpin the domain
//! model and the retrieval policies.
//!
//! ## Modules
//!
//! - `math`: Closed-open interval `[start, end)` primitives with validation,
//!   containment and overlap predicates, and measurements. Arrival and
//!   delivery time windows are expressed with these.
//! - `utils`: Phantom-tagged, strongly typed indices (`TypedIndex<T>`) that
//!   keep item identifiers and yard slot positions from being mixed up.
//!
//! ## Purpose
//!
//! Yard simulation manipulates two index spaces (item identifiers, column
//! slots) and two kinds of half-open time windows per item. These primitives
//! make that code hard to get wrong while compiling down to plain integers.

pub mod math;
pub mod utils;
