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

//! The priority-driven retrieval policy.
//!
//! Instead of sweeping buckets blindly, this policy always works on the most
//! urgent resident (earliest delivery-window start, identifier tie-break).
//! Each arrival window is spent in a loop:
//!
//! 1. Pick the most urgent resident as the target.
//! 2. Unbury it: treat every item stacked above it, choosing each blocker's
//!    destination by where it sits and how tight its own window is.
//! 3. If the target's window has opened, remove it and start over.
//! 4. Otherwise, if the window will open before the arrival window closes,
//!    park the target on the quarantine bucket, spend the wait unburying the
//!    runners-up (the most urgent resident of each footprint class), jump
//!    the clock to the window opening, and collect the target. If the window
//!    opens too late, give up on this arrival window.
//!
//! Placement steers by window length and bucket tops: short-window items go
//! straight to their class's holding lane; everything else lands on the
//! primary bucket unless that would bury a more urgent item, in which case
//! the secondary takes it.
//!
//! Requires the reserved layout, so a yard of at least 34 columns.

use crate::{
    buckets::{BucketTable, SHORT_WINDOW_THRESHOLD},
    policy::{engine::YardEngine, PolicyError, RetrievalPolicy},
    stats::PolicyStats,
    yard::StorageYard,
};
use gantry_model::{
    index::{ItemId, SlotIndex},
    item::{Item, Money, PriorityKey, TimeStamp, MAX_FOOTPRINT, MIN_FOOTPRINT},
};
use smallvec::SmallVec;
use std::io::{self, Write};

/// The name the priority policy records in its `START` entry.
pub const PRIORITY_POLICY_NAME: &str = "PriorityPolicy";

/// The priority-driven policy. Needs a yard at least 34 columns wide.
#[derive(Debug)]
pub struct PriorityPolicy<W: Write> {
    engine: YardEngine<W>,
    buckets: BucketTable,
}

impl<W: Write> PriorityPolicy<W> {
    /// Creates a priority run over an empty yard, writing the move log to
    /// `writer`.
    pub fn new(width: usize, writer: W) -> Result<Self, PolicyError> {
        let buckets = BucketTable::with_reserved_lanes(width)?;
        let engine = YardEngine::new(PRIORITY_POLICY_NAME, width, writer)?;
        Ok(Self { engine, buckets })
    }

    /// Consumes the policy, returning the move log's writer.
    #[inline]
    pub fn into_log(self) -> W {
        self.engine.into_log()
    }

    /// Chooses the slot an arrival lands on.
    ///
    /// Short-window items go to their holding lane. Others prefer the
    /// primary bucket, falling back to the secondary when the primary's
    /// topmost item is more urgent than the newcomer (stacking on it would
    /// force a dig later).
    fn placement_slot(&self, item: &Item) -> SlotIndex {
        let size = item.size();
        if item.has_short_window(SHORT_WINDOW_THRESHOLD) {
            return self.buckets.holding(size);
        }
        let primary = self.buckets.primary(size);
        match self.engine.yard().top_at(primary) {
            Some(top) => {
                let buries_more_urgent = self
                    .engine
                    .yard()
                    .item(top)
                    .map(|resident| resident.priority_key() < item.priority_key())
                    .unwrap_or(false);
                if buries_more_urgent {
                    self.buckets.secondary(size)
                } else {
                    primary
                }
            }
            None => primary,
        }
    }

    /// Chooses where a blocker goes when it is shoveled off a target.
    ///
    /// Holding-lane residents spill to their class's secondary bucket so the
    /// lane stays shallow; items with tight windows of their own move into
    /// the holding lane; everything else flips to the partner of the bucket
    /// it sits on.
    fn blocker_slot(&self, blocker: &Item, current: SlotIndex) -> SlotIndex {
        let size = blocker.size();
        if self.buckets.in_holding_lane(current) {
            self.buckets.secondary(size)
        } else if blocker.has_short_window(SHORT_WINDOW_THRESHOLD) {
            self.buckets.holding(size)
        } else {
            self.buckets.opposite(size, current)
        }
    }

    /// Treats blockers above `id` until it is topmost, the arrival window
    /// closes, or the clock reaches `stop_at`.
    fn unbury(
        &mut self,
        id: ItemId,
        window_end: TimeStamp,
        stop_at: Option<TimeStamp>,
    ) -> Result<(), PolicyError> {
        loop {
            if self.engine.clock() >= window_end {
                return Ok(());
            }
            if stop_at == Some(self.engine.clock()) {
                return Ok(());
            }
            let slot = match self.engine.yard().locate(id) {
                Some(location) => location.slot,
                None => return Ok(()),
            };
            let top = match self.engine.yard().top_at(slot) {
                Some(top) => top,
                None => return Ok(()),
            };
            if top == id {
                return Ok(());
            }
            let fallback = match self.engine.yard().item(top) {
                Some(blocker) => {
                    let blocker_slot = match self.engine.yard().locate(top) {
                        Some(location) => location.slot,
                        None => return Ok(()),
                    };
                    self.blocker_slot(blocker, blocker_slot)
                }
                None => return Ok(()),
            };
            self.engine.treat(top, fallback)?;
        }
    }

    /// The runners-up: the most urgent resident of each footprint class
    /// other than the current target, ordered by urgency.
    fn runners_up(&self, target: ItemId) -> SmallVec<[ItemId; MAX_FOOTPRINT]> {
        let mut keyed: SmallVec<[(PriorityKey, ItemId); MAX_FOOTPRINT]> = SmallVec::new();
        for size in MIN_FOOTPRINT..=MAX_FOOTPRINT {
            if let Some(item) = self.engine.yard().earliest_of_size(size, Some(target)) {
                keyed.push((item.priority_key(), item.id()));
            }
        }
        keyed.sort();
        keyed.into_iter().map(|(_, id)| id).collect()
    }

    /// Parks the target on the quarantine bucket, pre-digs the runners-up
    /// while its delivery window is still closed, then jumps the clock to
    /// the window opening and collects it.
    fn quarantine_and_collect(
        &mut self,
        target: ItemId,
        opens_at: TimeStamp,
        window_end: TimeStamp,
    ) -> Result<(), PolicyError> {
        self.engine.relocate(target, self.buckets.quarantine())?;

        for runner in self.runners_up(target) {
            if self.engine.clock() >= window_end || self.engine.clock() >= opens_at {
                break;
            }
            self.unbury(runner, window_end, Some(opens_at))?;
        }

        debug_assert!(
            self.engine.clock() <= opens_at,
            "pre-digging overshot the quarantined target's window opening"
        );
        self.engine.advance_clock(opens_at);
        self.engine.extract(target)
    }
}

impl<W: Write> RetrievalPolicy for PriorityPolicy<W> {
    fn name(&self) -> &'static str {
        PRIORITY_POLICY_NAME
    }

    fn handle_arrival(&mut self, item: Item) -> Result<(), PolicyError> {
        let window = item.arrival();
        self.engine.begin_arrival(window.start());

        // Placement is mandatory even when the window is already spent.
        let slot = self.placement_slot(&item);
        self.engine.place(item, slot)?;

        loop {
            if self.engine.clock() >= window.end() || self.engine.yard().is_empty() {
                return Ok(());
            }
            let (target, opens_at) = match self.engine.yard().highest_priority() {
                Some(item) => (item.id(), item.delivery().start()),
                None => return Ok(()),
            };

            self.unbury(target, window.end(), None)?;
            if self.engine.clock() >= window.end() {
                return Ok(());
            }

            if opens_at <= self.engine.clock() {
                self.engine.extract(target)?;
            } else if opens_at < window.end() {
                self.quarantine_and_collect(target, opens_at, window.end())?;
            } else {
                // The most urgent window opens after this arrival window
                // closes; nothing profitable is left to do.
                self.engine.advance_clock(window.end());
                return Ok(());
            }
        }
    }

    fn clock(&self) -> TimeStamp {
        self.engine.clock()
    }

    fn cash(&self) -> Money {
        self.engine.cash()
    }

    fn stats(&self) -> &PolicyStats {
        self.engine.stats()
    }

    fn yard(&self) -> &StorageYard {
        self.engine.yard()
    }

    fn finish(&mut self) -> io::Result<()> {
        self.engine.finish()
    }
}
