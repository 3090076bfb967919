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

//! The baseline retrieval policy.
//!
//! Arrivals always land on their footprint class's primary bucket. The rest
//! of each arrival window is spent sweeping the classes in ascending
//! footprint order: dig through the primary bucket treating each topmost
//! item (remove it if its delivery window has opened, otherwise shovel it
//! onto the secondary bucket), then dig the secondary bucket back the same
//! way. The sweep repeats until the window closes or the yard empties.
//!
//! Simple and oblivious: no urgency ordering, no reserved lanes, and digging
//! distance is bounded by the bucket pair of each class.

use crate::{
    buckets::BucketTable,
    policy::{engine::YardEngine, PolicyError, RetrievalPolicy},
    stats::PolicyStats,
    yard::StorageYard,
};
use gantry_model::{
    index::SlotIndex,
    item::{Item, Money, TimeStamp, MAX_FOOTPRINT, MIN_FOOTPRINT},
};
use std::io::{self, Write};

/// The name the baseline policy records in its `START` entry.
pub const BASELINE_POLICY_NAME: &str = "BaselinePolicy";

/// The footprint-bucket policy. Needs a yard at least 20 columns wide.
#[derive(Debug)]
pub struct BaselinePolicy<W: Write> {
    engine: YardEngine<W>,
    buckets: BucketTable,
}

impl<W: Write> BaselinePolicy<W> {
    /// Creates a baseline run over an empty yard, writing the move log to
    /// `writer`.
    pub fn new(width: usize, writer: W) -> Result<Self, PolicyError> {
        let buckets = BucketTable::baseline(width)?;
        let engine = YardEngine::new(BASELINE_POLICY_NAME, width, writer)?;
        Ok(Self { engine, buckets })
    }

    /// Consumes the policy, returning the move log's writer.
    #[inline]
    pub fn into_log(self) -> W {
        self.engine.into_log()
    }

    /// Digs through one bucket: treats its topmost item until the bucket is
    /// empty or the arrival window closes.
    fn dig(
        &mut self,
        from: SlotIndex,
        to: SlotIndex,
        window_end: TimeStamp,
    ) -> Result<(), PolicyError> {
        while self.engine.clock() < window_end {
            match self.engine.yard().top_at(from) {
                Some(id) => self.engine.treat(id, to)?,
                None => break,
            }
        }
        Ok(())
    }
}

impl<W: Write> RetrievalPolicy for BaselinePolicy<W> {
    fn name(&self) -> &'static str {
        BASELINE_POLICY_NAME
    }

    fn handle_arrival(&mut self, item: Item) -> Result<(), PolicyError> {
        let window = item.arrival();
        self.engine.begin_arrival(window.start());

        // Placement is mandatory even when the window is already spent.
        let slot = self.buckets.primary(item.size());
        self.engine.place(item, slot)?;

        while self.engine.clock() < window.end() && !self.engine.yard().is_empty() {
            for size in MIN_FOOTPRINT..=MAX_FOOTPRINT {
                let primary = self.buckets.primary(size);
                let secondary = self.buckets.secondary(size);
                self.dig(primary, secondary, window.end())?;
                self.dig(secondary, primary, window.end())?;
            }
        }
        Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_model::{index::ItemId, item::TimeWindow};

    fn item(id: usize, size: usize, value: Money, a: (i64, i64), d: (i64, i64)) -> Item {
        Item::new(
            ItemId::new(id),
            size,
            value,
            TimeWindow::new(a.0, a.1),
            TimeWindow::new(d.0, d.1),
        )
        .expect("valid item")
    }

    #[test]
    fn test_rejects_narrow_yard() {
        let err = BaselinePolicy::new(19, Vec::new()).unwrap_err();
        assert!(matches!(err, PolicyError::Bucket(_)));
    }

    #[test]
    fn test_single_item_dig_cycle() {
        let mut policy = BaselinePolicy::new(20, Vec::new()).unwrap();
        // Placed at t=0, bounced to the secondary bucket at t=1 (window not
        // open yet), removed from there at t=2 inside the delivery window.
        policy
            .handle_arrival(item(1, 1, 10, (0, 5), (2, 8)))
            .unwrap();
        assert!(policy.yard().is_empty());
        assert_eq!(policy.cash(), 10);
        assert_eq!(policy.stats().placed, 1);
        assert_eq!(policy.stats().relocations, 1);
        assert_eq!(policy.stats().removals, 1);
        assert_eq!(policy.clock(), 3);
    }

    #[test]
    fn test_item_left_behind_when_window_closes() {
        let mut policy = BaselinePolicy::new(20, Vec::new()).unwrap();
        // Arrival window is a single tick: the placement consumes it and no
        // retrieval work happens.
        policy
            .handle_arrival(item(1, 1, 10, (0, 1), (5, 20)))
            .unwrap();
        assert_eq!(policy.yard().len(), 1);
        assert_eq!(policy.cash(), 0);

        // The next arrival's window pays for digging it out.
        policy
            .handle_arrival(item(2, 1, 20, (1, 30), (1, 30)))
            .unwrap();
        assert!(policy.yard().is_empty());
        assert_eq!(policy.cash(), 30);
    }

    #[test]
    fn test_each_class_lands_on_its_primary_bucket() {
        let mut policy = BaselinePolicy::new(20, Vec::new()).unwrap();
        // Delivery far out so nothing is removed during these windows.
        policy
            .handle_arrival(item(1, 1, 10, (0, 1), (100, 200)))
            .unwrap();
        policy
            .handle_arrival(item(2, 2, 10, (1, 2), (100, 200)))
            .unwrap();
        policy
            .handle_arrival(item(3, 3, 10, (2, 3), (100, 200)))
            .unwrap();
        policy
            .handle_arrival(item(4, 4, 10, (3, 4), (100, 200)))
            .unwrap();

        let yard = policy.yard();
        assert_eq!(yard.locate(ItemId::new(1)).unwrap().slot.get(), 0);
        assert_eq!(yard.locate(ItemId::new(2)).unwrap().slot.get(), 2);
        assert_eq!(yard.locate(ItemId::new(3)).unwrap().slot.get(), 6);
        assert_eq!(yard.locate(ItemId::new(4)).unwrap().slot.get(), 12);
    }

    #[test]
    fn test_clock_is_monotonic_across_arrivals() {
        let mut policy = BaselinePolicy::new(20, Vec::new()).unwrap();
        policy
            .handle_arrival(item(1, 1, 10, (0, 5), (2, 8)))
            .unwrap();
        let after_first = policy.clock();
        // Second arrival's window opened in the past; the clock stays put.
        policy
            .handle_arrival(item(2, 1, 10, (1, 2), (100, 200)))
            .unwrap();
        assert!(policy.clock() >= after_first);
    }

    #[test]
    fn test_expired_item_is_still_placed() {
        let mut policy = BaselinePolicy::new(20, Vec::new()).unwrap();
        // Burn the clock far past item 2's arrival window.
        policy
            .handle_arrival(item(1, 1, 10, (0, 40), (30, 35)))
            .unwrap();
        assert!(policy.clock() >= 30);

        policy
            .handle_arrival(item(2, 1, 10, (3, 6), (100, 200)))
            .unwrap();
        assert!(policy.yard().contains(ItemId::new(2)));
    }
}
