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

//! # Gantry Sim
//!
//! The simulation core of the Gantry storage-yard simulator: the yard state
//! machine, the bucket addressing scheme, and the retrieval policies that
//! drive a yard through a manifest of arrivals.
//!
//! # Modules
//!
//! - [`yard`]: the finite-width yard of item stacks. Enforces the flat-rest
//!   placement and topmost-removal contract and owns the cash total.
//! - [`buckets`]: the fixed column map (primary/secondary buckets per
//!   footprint class, plus holding lanes and quarantine in the reserved
//!   layout).
//! - [`stats`]: per-run operation counters.
//! - [`policy`]: the [`policy::RetrievalPolicy`] trait, the shared clocked
//!   engine, and the baseline and priority-driven policies.
//!
//! # Architecture
//!
//! Policies never touch the yard directly; every mutation flows through
//! [`policy::engine::YardEngine`], which appends one move-log entry per
//! operation and advances the clock by one tick. That single choke point is
//! what makes runs replayable: the validator in `gantry-replay` re-executes
//! the log against a fresh yard and must land on the same final state.

pub mod buckets;
pub mod policy;
pub mod stats;
pub mod yard;
