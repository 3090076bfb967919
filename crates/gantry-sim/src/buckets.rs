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

//! Bucket addressing: the fixed column map the policies place items on.
//!
//! Every footprint class owns a primary and a secondary bucket; relocating
//! between the pair is how a policy digs without disturbing other classes.
//! The reserved layout additionally carves out one holding lane per class
//! for short-window items and a single quarantine bucket where the current
//! retrieval target is parked while the yard is tidied around it.
//!
//! Bucket positions are a pure function of the footprint:
//!
//! ```raw
//! primary(s)    = s * (s - 1)            -> 0, 2, 6, 12
//! secondary(s)  = s * s                  -> 1, 4, 9, 16
//! holding(s)    = 20 + s * (s - 1) / 2   -> 20, 21, 23, 26
//! quarantine    = 30
//! ```
//!
//! Adjacent buckets never overlap because each bucket of class `s` spans
//! exactly `s` columns starting at its position.

use gantry_core::math::interval::ClosedOpenInterval;
use gantry_model::{
    index::SlotIndex,
    item::{TimeStamp, MAX_FOOTPRINT, MIN_FOOTPRINT},
};

/// Delivery windows shorter than this many ticks classify an item as
/// short-window; the reserved layout keeps those in holding lanes.
pub const SHORT_WINDOW_THRESHOLD: TimeStamp = 10;

/// First column of the holding lanes in the reserved layout.
const HOLDING_BASE: usize = 20;

/// Leftmost column of the quarantine bucket in the reserved layout.
const QUARANTINE_SLOT: usize = 30;

/// The error type for bucket table construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketError {
    /// The yard has fewer columns than the layout needs.
    YardTooNarrow { required: usize, actual: usize },
}

impl std::fmt::Display for BucketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::YardTooNarrow { required, actual } => write!(
                f,
                "Yard width {} is below the {} columns the bucket layout needs",
                actual, required
            ),
        }
    }
}

impl std::error::Error for BucketError {}

/// The column map of a policy run.
///
/// Built once per run against a concrete yard width; accessors are
/// infallible afterwards. The reserved lanes exist only when the table was
/// built with [`BucketTable::with_reserved_lanes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketTable {
    primary: [SlotIndex; MAX_FOOTPRINT],
    secondary: [SlotIndex; MAX_FOOTPRINT],
    holding: Option<[SlotIndex; MAX_FOOTPRINT]>,
    holding_span: Option<ClosedOpenInterval<usize>>,
    quarantine: Option<SlotIndex>,
}

impl BucketTable {
    /// Builds the two-bucket layout the baseline policy uses.
    ///
    /// Requires the yard to fit the widest secondary bucket.
    pub fn baseline(width: usize) -> Result<Self, BucketError> {
        let required = Self::secondary_slot(MAX_FOOTPRINT) + MAX_FOOTPRINT;
        if width < required {
            return Err(BucketError::YardTooNarrow {
                required,
                actual: width,
            });
        }
        Ok(Self {
            primary: Self::build(Self::primary_slot),
            secondary: Self::build(Self::secondary_slot),
            holding: None,
            holding_span: None,
            quarantine: None,
        })
    }

    /// Builds the layout with holding lanes and a quarantine bucket, as the
    /// priority-driven policy uses.
    pub fn with_reserved_lanes(width: usize) -> Result<Self, BucketError> {
        let required = QUARANTINE_SLOT + MAX_FOOTPRINT;
        if width < required {
            return Err(BucketError::YardTooNarrow {
                required,
                actual: width,
            });
        }
        Ok(Self {
            primary: Self::build(Self::primary_slot),
            secondary: Self::build(Self::secondary_slot),
            holding: Some(Self::build(Self::holding_slot)),
            holding_span: Some(ClosedOpenInterval::new(HOLDING_BASE, QUARANTINE_SLOT)),
            quarantine: Some(SlotIndex::new(QUARANTINE_SLOT)),
        })
    }

    /// Returns whether the table carries holding lanes and a quarantine
    /// bucket.
    #[inline]
    pub fn has_reserved_lanes(&self) -> bool {
        self.holding.is_some()
    }

    /// Returns the primary bucket of a footprint class.
    #[inline]
    pub fn primary(&self, size: usize) -> SlotIndex {
        self.primary[Self::class(size)]
    }

    /// Returns the secondary bucket of a footprint class.
    #[inline]
    pub fn secondary(&self, size: usize) -> SlotIndex {
        self.secondary[Self::class(size)]
    }

    /// Returns the holding lane of a footprint class.
    ///
    /// # Panics
    /// Panics if the table was built without reserved lanes.
    #[inline]
    pub fn holding(&self, size: usize) -> SlotIndex {
        match self.holding {
            Some(lanes) => lanes[Self::class(size)],
            None => panic!("called `BucketTable::holding` on a table without reserved lanes"),
        }
    }

    /// Returns the quarantine bucket.
    ///
    /// # Panics
    /// Panics if the table was built without reserved lanes.
    #[inline]
    pub fn quarantine(&self) -> SlotIndex {
        match self.quarantine {
            Some(slot) => slot,
            None => panic!("called `BucketTable::quarantine` on a table without reserved lanes"),
        }
    }

    /// Returns the partner of a primary/secondary bucket: the secondary if
    /// `slot` is the class's primary, the primary otherwise.
    #[inline]
    pub fn opposite(&self, size: usize, slot: SlotIndex) -> SlotIndex {
        if slot == self.primary(size) {
            self.secondary(size)
        } else {
            self.primary(size)
        }
    }

    /// Returns whether a column lies inside the holding lanes. Always false
    /// for tables without reserved lanes.
    #[inline]
    pub fn in_holding_lane(&self, slot: SlotIndex) -> bool {
        self.holding_span
            .map(|span| span.contains(slot.get()))
            .unwrap_or(false)
    }

    #[inline]
    fn class(size: usize) -> usize {
        debug_assert!(
            (MIN_FOOTPRINT..=MAX_FOOTPRINT).contains(&size),
            "called `BucketTable` accessor with footprint {} outside {}..={}",
            size,
            MIN_FOOTPRINT,
            MAX_FOOTPRINT
        );
        size - MIN_FOOTPRINT
    }

    fn build(slot_of: fn(usize) -> usize) -> [SlotIndex; MAX_FOOTPRINT] {
        let mut slots = [SlotIndex::new(0); MAX_FOOTPRINT];
        for size in MIN_FOOTPRINT..=MAX_FOOTPRINT {
            slots[Self::class(size)] = SlotIndex::new(slot_of(size));
        }
        slots
    }

    #[inline]
    fn primary_slot(size: usize) -> usize {
        size * (size - 1)
    }

    #[inline]
    fn secondary_slot(size: usize) -> usize {
        size * size
    }

    #[inline]
    fn holding_slot(size: usize) -> usize {
        HOLDING_BASE + size * (size - 1) / 2
    }
}
