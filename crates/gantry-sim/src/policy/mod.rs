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

//! Retrieval policies and their shared execution engine.
//!
//! # Modules
//!
//! - [`engine`]: the clocked yard driver all policies run on. Owns the yard,
//!   the monotonic clock, the move log, and the operation counters.
//! - [`baseline`]: the footprint-bucket policy. Digs through each class's
//!   primary/secondary pair in fixed rotation.
//! - [`priority`]: the priority-driven policy. Digs for the most urgent
//!   resident, relocates blockers by class and window length, and
//!   quarantines targets whose windows have not opened yet.
//!
//! # Contract
//!
//! A policy consumes arrivals one at a time in manifest order via
//! [`RetrievalPolicy::handle_arrival`] and must place each item inside its
//! arrival window, spending the rest of the window on removals and
//! relocations. Every mutation advances the clock by one tick and appends
//! one log entry; the clock never moves backwards across arrivals.

use crate::{
    buckets::BucketError,
    stats::PolicyStats,
    yard::{StorageYard, YardError},
};
use gantry_model::item::{Item, Money, TimeStamp};
use std::io;

pub mod baseline;
pub mod engine;
pub mod priority;

/// The error type for policy runs.
#[derive(Debug)]
pub enum PolicyError {
    /// The yard is too narrow for the policy's bucket layout.
    Bucket(BucketError),
    /// A yard mutation the policy attempted was illegal.
    Yard(YardError),
    /// The move log could not be written.
    Io(io::Error),
}

impl std::fmt::Display for PolicyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bucket(e) => write!(f, "{}", e),
            Self::Yard(e) => write!(f, "Illegal yard operation: {}", e),
            Self::Io(e) => write!(f, "Failed to write the move log: {}", e),
        }
    }
}

impl std::error::Error for PolicyError {}

impl From<BucketError> for PolicyError {
    fn from(e: BucketError) -> Self {
        Self::Bucket(e)
    }
}

impl From<YardError> for PolicyError {
    fn from(e: YardError) -> Self {
        Self::Yard(e)
    }
}

impl From<io::Error> for PolicyError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// The interface a retrieval policy exposes to the driver.
pub trait RetrievalPolicy {
    /// The name recorded in the log's `START` entry.
    fn name(&self) -> &'static str;

    /// Processes one arrival: places the item and spends the remainder of
    /// its arrival window on retrieval work.
    fn handle_arrival(&mut self, item: Item) -> Result<(), PolicyError>;

    /// The current clock value.
    fn clock(&self) -> TimeStamp;

    /// The cash realized so far.
    fn cash(&self) -> Money;

    /// The operation counters so far.
    fn stats(&self) -> &PolicyStats;

    /// The yard being operated on.
    fn yard(&self) -> &StorageYard;

    /// Flushes the move log. Call once after the last arrival.
    fn finish(&mut self) -> io::Result<()>;
}
