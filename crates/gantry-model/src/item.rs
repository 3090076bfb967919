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

use crate::index::ItemId;
use gantry_core::math::interval::ClosedOpenInterval;

/// A moment in simulation time. One tick per yard mutation.
pub type TimeStamp = i64;

/// A monetary amount (item values, cash totals).
pub type Money = i64;

/// A half-open window of simulation time.
pub type TimeWindow = ClosedOpenInterval<TimeStamp>;

/// The smallest and largest footprint an item may have.
pub const MIN_FOOTPRINT: usize = 1;
pub const MAX_FOOTPRINT: usize = 4;

/// The error type for item construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    /// The footprint is outside `MIN_FOOTPRINT..=MAX_FOOTPRINT`.
    InvalidFootprint { id: ItemId, size: usize },
    /// The reward is negative.
    NegativeValue { id: ItemId, value: Money },
    /// The delivery window closes before the arrival window opens, so the
    /// item could never be delivered.
    DeliveryBeforeArrival { id: ItemId },
}

impl std::fmt::Display for ItemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFootprint { id, size } => write!(
                f,
                "Item {}: footprint {} outside supported range {}..={}",
                id.get(),
                size,
                MIN_FOOTPRINT,
                MAX_FOOTPRINT
            ),
            Self::NegativeValue { id, value } => {
                write!(f, "Item {}: negative value {}", id.get(), value)
            }
            Self::DeliveryBeforeArrival { id } => write!(
                f,
                "Item {}: delivery window closes before arrival window opens",
                id.get()
            ),
        }
    }
}

impl std::error::Error for ItemError {}

/// The priority ordering key of an item: ascending delivery-window start,
/// tie-broken by identifier. The minimum key is the most urgent item.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PriorityKey {
    deadline: TimeStamp,
    id: ItemId,
}

impl PriorityKey {
    /// Creates a key from a delivery-window start and an identifier.
    #[inline]
    pub const fn new(deadline: TimeStamp, id: ItemId) -> Self {
        Self { deadline, id }
    }

    /// Returns the delivery-window start this key orders by.
    #[inline]
    pub const fn deadline(&self) -> TimeStamp {
        self.deadline
    }

    /// Returns the identifier used as tie-breaker.
    #[inline]
    pub const fn id(&self) -> ItemId {
        self.id
    }
}

/// A stackable resource unit: footprint, value, arrival window, delivery
/// window.
///
/// An item must enter the yard within its arrival window, may be removed at
/// or after its delivery window opens, and yields its value only if removed
/// strictly before the delivery window closes.
///
/// # Examples
///
/// ```rust
/// # use gantry_model::item::{Item, TimeWindow};
/// # use gantry_model::index::ItemId;
/// let item = Item::new(
///     ItemId::new(7),
///     1,
///     10,
///     TimeWindow::new(0, 5),
///     TimeWindow::new(2, 8),
/// )
/// .unwrap();
/// assert!(!item.is_removable(1));
/// assert!(item.is_removable(2));
/// assert!(item.makes_profit(7));
/// assert!(!item.makes_profit(8));
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Item {
    id: ItemId,
    size: usize,
    value: Money,
    arrival: TimeWindow,
    delivery: TimeWindow,
}

impl Item {
    /// Constructs a validated `Item`.
    ///
    /// The windows are well-formed by construction (`TimeWindow` enforces
    /// `start <= end`); this checks the remaining invariants: footprint in
    /// range, non-negative value, and `delivery.end >= arrival.start`.
    pub fn new(
        id: ItemId,
        size: usize,
        value: Money,
        arrival: TimeWindow,
        delivery: TimeWindow,
    ) -> Result<Self, ItemError> {
        if !(MIN_FOOTPRINT..=MAX_FOOTPRINT).contains(&size) {
            return Err(ItemError::InvalidFootprint { id, size });
        }
        if value < 0 {
            return Err(ItemError::NegativeValue { id, value });
        }
        if delivery.end() < arrival.start() {
            return Err(ItemError::DeliveryBeforeArrival { id });
        }
        Ok(Self {
            id,
            size,
            value,
            arrival,
            delivery,
        })
    }

    /// Returns the item's identifier.
    #[inline]
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Returns the item's footprint (number of contiguous columns).
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the item's monetary value.
    #[inline]
    pub fn value(&self) -> Money {
        self.value
    }

    /// Returns the arrival window `[start, end)`.
    #[inline]
    pub fn arrival(&self) -> TimeWindow {
        self.arrival
    }

    /// Returns the delivery window `[start, end)`.
    #[inline]
    pub fn delivery(&self) -> TimeWindow {
        self.delivery
    }

    /// Returns whether the item may legally be removed at time `t`.
    #[inline]
    pub fn is_removable(&self, t: TimeStamp) -> bool {
        self.delivery.start() <= t
    }

    /// Assuming the item is removable, returns whether removing it at time
    /// `t` realizes its value. A window with `start == end` is never
    /// profitable.
    #[inline]
    pub fn makes_profit(&self, t: TimeStamp) -> bool {
        t < self.delivery.end()
    }

    /// Returns whether the delivery window is shorter than `threshold`
    /// ticks. Short-window items are kept quickly reachable by the
    /// priority-driven policy.
    #[inline]
    pub fn has_short_window(&self, threshold: TimeStamp) -> bool {
        self.delivery.len() < threshold
    }

    /// Returns the item's priority key (delivery-start ascending, id
    /// tie-break).
    #[inline]
    pub fn priority_key(&self) -> PriorityKey {
        PriorityKey::new(self.delivery.start(), self.id)
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Item(id: {}, size: {}, value: {}, arrival: {}, delivery: {})",
            self.id.get(),
            self.size,
            self.value,
            self.arrival,
            self.delivery
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_rejects_invalid_footprint() {
        let err = Item::new(
            ItemId::new(1),
            5,
            10,
            TimeWindow::new(0, 5),
            TimeWindow::new(2, 8),
        )
        .unwrap_err();
        assert!(matches!(err, ItemError::InvalidFootprint { size: 5, .. }));

        let err = Item::new(
            ItemId::new(1),
            0,
            10,
            TimeWindow::new(0, 5),
            TimeWindow::new(2, 8),
        )
        .unwrap_err();
        assert!(matches!(err, ItemError::InvalidFootprint { size: 0, .. }));
    }

    #[test]
    fn test_rejects_negative_value() {
        let err = Item::new(
            ItemId::new(1),
            1,
            -1,
            TimeWindow::new(0, 5),
            TimeWindow::new(2, 8),
        )
        .unwrap_err();
        assert!(matches!(err, ItemError::NegativeValue { value: -1, .. }));
    }

    #[test]
    fn test_rejects_delivery_before_arrival() {
        let err = Item::new(
            ItemId::new(1),
            1,
            10,
            TimeWindow::new(10, 15),
            TimeWindow::new(2, 8),
        )
        .unwrap_err();
        assert!(matches!(err, ItemError::DeliveryBeforeArrival { .. }));
    }

    #[test]
    fn test_removability_and_profit() {
        let it = item(1, 1, 10, (0, 5), (2, 8));
        assert!(!it.is_removable(1));
        assert!(it.is_removable(2));
        assert!(it.is_removable(100));
        assert!(it.makes_profit(2));
        assert!(it.makes_profit(7));
        assert!(!it.makes_profit(8));
    }

    #[test]
    fn test_point_delivery_window_is_never_profitable() {
        // delivery.start == delivery.end: removable from t=5 on, but no
        // removal time is profitable. `makes_profit` assumes removability,
        // so only legal removal times are meaningful to check on their own.
        let it = item(1, 1, 10, (0, 5), (5, 5));
        assert!(!it.is_removable(4));
        assert!(it.is_removable(5));
        assert!(!(it.is_removable(4) && it.makes_profit(4)));
        assert!(!it.makes_profit(5));
        assert!(!it.makes_profit(6));
    }

    #[test]
    fn test_priority_ordering() {
        let early = item(9, 1, 10, (0, 5), (2, 8));
        let late = item(1, 1, 10, (0, 5), (4, 8));
        assert!(early.priority_key() < late.priority_key());

        // Equal deadlines tie-break by identifier.
        let a = item(1, 1, 10, (0, 5), (2, 8));
        let b = item(2, 1, 10, (0, 5), (2, 8));
        assert!(a.priority_key() < b.priority_key());
    }

    #[test]
    fn test_short_window_classification() {
        let short = item(1, 1, 10, (0, 5), (2, 8));
        let long = item(2, 1, 10, (0, 5), (2, 30));
        assert!(short.has_short_window(10));
        assert!(!long.has_short_window(10));

        // Exactly at the threshold is not short.
        let edge = item(3, 1, 10, (0, 5), (0, 10));
        assert!(!edge.has_short_window(10));
    }
}
