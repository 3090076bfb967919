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

//! The clocked yard driver shared by every retrieval policy.
//!
//! The engine enforces the bookkeeping a policy must not get wrong: each
//! mutation appends exactly one log entry stamped with the current clock,
//! then advances the clock by one tick. A profitable removal additionally
//! appends a `CASH` entry sharing the removal's timestamp; the cash
//! checkpoint is bookkeeping, not crane work, so it costs no tick.
//!
//! The clock is monotonic across the whole run. `begin_arrival` fast-forwards
//! to an arrival window that opens in the future but never rewinds for one
//! that opened in the past.

use crate::{
    stats::PolicyStats,
    yard::StorageYard,
};
use gantry_model::{
    event::{EventLog, LogEvent},
    index::{ItemId, SlotIndex},
    item::{Item, Money, TimeStamp},
};
use std::io::{self, Write};

/// Drives a yard under a monotonic clock, logging every mutation.
#[derive(Debug)]
pub struct YardEngine<W: Write> {
    yard: StorageYard,
    clock: TimeStamp,
    log: EventLog<W>,
    stats: PolicyStats,
}

impl<W: Write> YardEngine<W> {
    /// Creates an engine over an empty yard and records the `START` entry.
    pub fn new(policy: &str, width: usize, writer: W) -> io::Result<Self> {
        let mut log = EventLog::new(writer);
        log.record(&LogEvent::Start {
            time: 0,
            policy: policy.to_owned(),
            width,
        })?;
        Ok(Self {
            yard: StorageYard::new(width),
            clock: 0,
            log,
            stats: PolicyStats::new(),
        })
    }

    /// Returns the yard.
    #[inline]
    pub fn yard(&self) -> &StorageYard {
        &self.yard
    }

    /// Returns the current clock value.
    #[inline]
    pub fn clock(&self) -> TimeStamp {
        self.clock
    }

    /// Returns the cash realized so far.
    #[inline]
    pub fn cash(&self) -> Money {
        self.yard.cash()
    }

    /// Returns the operation counters.
    #[inline]
    pub fn stats(&self) -> &PolicyStats {
        &self.stats
    }

    /// Fast-forwards the clock to the opening of an arrival window. A window
    /// that opened in the past leaves the clock where it is.
    #[inline]
    pub fn begin_arrival(&mut self, arrival_start: TimeStamp) {
        self.clock = self.clock.max(arrival_start);
    }

    /// Jumps the clock forward to `t` without performing an operation.
    #[inline]
    pub fn advance_clock(&mut self, t: TimeStamp) {
        debug_assert!(
            t >= self.clock,
            "called `YardEngine::advance_clock` with a time in the past"
        );
        self.clock = self.clock.max(t);
    }

    /// Places an item, logs `ADD`, and ticks the clock.
    pub fn place(&mut self, item: Item, slot: SlotIndex) -> Result<(), super::PolicyError> {
        let id = item.id();
        self.yard.add(item, slot)?;
        self.log.record(&LogEvent::Add {
            time: self.clock,
            id,
            slot,
        })?;
        self.stats.placed += 1;
        self.clock += 1;
        Ok(())
    }

    /// Relocates an item, logs `MOVE`, and ticks the clock.
    pub fn relocate(&mut self, id: ItemId, slot: SlotIndex) -> Result<(), super::PolicyError> {
        self.yard.relocate(id, slot)?;
        self.log.record(&LogEvent::Move {
            time: self.clock,
            id,
            slot,
        })?;
        self.stats.relocations += 1;
        self.clock += 1;
        Ok(())
    }

    /// Removes an item, logs `REMOVE`, and ticks the clock. If the removal
    /// falls inside the item's delivery window its value is credited and a
    /// `CASH` checkpoint with the same timestamp follows the `REMOVE`.
    pub fn extract(&mut self, id: ItemId) -> Result<(), super::PolicyError> {
        let item = self.yard.remove(id)?;
        self.log.record(&LogEvent::Remove {
            time: self.clock,
            id,
        })?;
        self.stats.removals += 1;
        if item.is_removable(self.clock) && item.makes_profit(self.clock) {
            self.yard.add_cash(item.value());
            self.log.record(&LogEvent::Cash {
                time: self.clock,
                total: self.yard.cash(),
            })?;
            self.stats.profitable += 1;
        } else {
            self.stats.forfeited += 1;
        }
        self.clock += 1;
        Ok(())
    }

    /// Removes the item if its delivery window has opened, otherwise
    /// relocates it to `fallback`. The standard treatment of whatever sits
    /// on top of a bucket being dug through.
    pub fn treat(&mut self, id: ItemId, fallback: SlotIndex) -> Result<(), super::PolicyError> {
        let removable = self
            .yard
            .item(id)
            .map(|item| item.is_removable(self.clock))
            .unwrap_or(false);
        if removable {
            self.extract(id)
        } else {
            self.relocate(id, fallback)
        }
    }

    /// Flushes the move log.
    #[inline]
    pub fn finish(&mut self) -> io::Result<()> {
        self.log.flush()
    }

    /// Consumes the engine, returning the log's writer.
    #[inline]
    pub fn into_log(self) -> W {
        self.log.into_inner()
    }
}
