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

//! The storage yard: a finite row of columns holding stacked items.
//!
//! # Placement contract
//!
//! An item of footprint `s` placed at slot `p` occupies columns `[p, p + s)`.
//! A placement is legal only when every spanned column has the same current
//! height (the item must rest flat, never bridge a step). Removal is legal
//! only when the item is topmost on every column it spans. Relocation is a
//! remove immediately followed by an add and is atomic: if the target
//! placement is illegal the yard is left untouched.
//!
//! The yard also owns the cash total and a priority index over its resident
//! items (ascending delivery-window start, identifier tie-break), which the
//! retrieval policies query to decide what to dig for next.

use gantry_model::{
    index::{ItemId, SlotIndex},
    item::{Item, Money, PriorityKey},
};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// Where an item currently rests: its leftmost column and its tier (0 is the
/// floor).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Location {
    /// Height of the item above the floor.
    pub tier: usize,
    /// Leftmost column the item spans.
    pub slot: SlotIndex,
}

/// The error type for yard mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YardError {
    /// An item with this identifier is already resident.
    DuplicateItem(ItemId),
    /// No resident item has this identifier.
    NotPresent(ItemId),
    /// The placement would extend past the rightmost column.
    SlotOutOfBounds {
        slot: SlotIndex,
        size: usize,
        width: usize,
    },
    /// The spanned columns are not all the same height.
    UnevenPlacement { id: ItemId, slot: SlotIndex },
    /// The item is not topmost on every column it spans.
    NotTopmost(ItemId),
}

impl std::fmt::Display for YardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateItem(id) => {
                write!(f, "Item {} is already in the yard", id.get())
            }
            Self::NotPresent(id) => write!(f, "Item {} is not in the yard", id.get()),
            Self::SlotOutOfBounds { slot, size, width } => write!(
                f,
                "Placement at slot {} with footprint {} exceeds yard width {}",
                slot.get(),
                size,
                width
            ),
            Self::UnevenPlacement { id, slot } => write!(
                f,
                "Item {} cannot rest flat at slot {}",
                id.get(),
                slot.get()
            ),
            Self::NotTopmost(id) => write!(
                f,
                "Item {} is buried and cannot be removed",
                id.get()
            ),
        }
    }
}

impl std::error::Error for YardError {}

/// A finite-width yard of item stacks.
///
/// # Examples
///
/// ```rust
/// # use gantry_sim::yard::StorageYard;
/// # use gantry_model::item::{Item, TimeWindow};
/// # use gantry_model::index::{ItemId, SlotIndex};
/// let mut yard = StorageYard::new(8);
/// let item = Item::new(
///     ItemId::new(1),
///     2,
///     10,
///     TimeWindow::new(0, 5),
///     TimeWindow::new(2, 8),
/// )
/// .unwrap();
/// yard.add(item, SlotIndex::new(3)).unwrap();
/// assert_eq!(yard.top_at(SlotIndex::new(3)), Some(ItemId::new(1)));
/// assert_eq!(yard.top_at(SlotIndex::new(4)), Some(ItemId::new(1)));
/// let removed = yard.remove(ItemId::new(1)).unwrap();
/// assert_eq!(removed.id(), ItemId::new(1));
/// assert!(yard.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct StorageYard {
    /// One stack of identifiers per column, floor first. An item of
    /// footprint `s` appears in `s` adjacent stacks at the same tier.
    columns: Vec<Vec<ItemId>>,
    locations: FxHashMap<ItemId, Location>,
    items: FxHashMap<ItemId, Item>,
    /// Priority index over resident items; the minimum is the most urgent.
    queue: BTreeSet<PriorityKey>,
    cash: Money,
}

impl StorageYard {
    /// Creates an empty yard with the given number of columns.
    ///
    /// # Panics
    /// Panics if `width` is zero.
    pub fn new(width: usize) -> Self {
        assert!(width > 0, "called `StorageYard::new` with width 0");
        Self {
            columns: vec![Vec::new(); width],
            locations: FxHashMap::default(),
            items: FxHashMap::default(),
            queue: BTreeSet::new(),
            cash: 0,
        }
    }

    /// Returns the number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Returns the number of resident items.
    #[inline]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Returns whether the yard holds no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Returns the current cash total.
    #[inline]
    pub fn cash(&self) -> Money {
        self.cash
    }

    /// Credits a realized item value to the cash total.
    ///
    /// # Panics
    /// Panics if `amount` is negative; cash only ever grows.
    #[inline]
    pub fn add_cash(&mut self, amount: Money) {
        assert!(
            amount >= 0,
            "called `StorageYard::add_cash` with a negative amount"
        );
        self.cash += amount;
    }

    /// Returns the height of one column.
    ///
    /// # Panics
    /// Panics if `slot` is out of bounds.
    #[inline]
    pub fn column_height(&self, slot: SlotIndex) -> usize {
        self.columns[slot.get()].len()
    }

    /// Returns the height of the tallest column.
    #[inline]
    pub fn height(&self) -> usize {
        self.columns.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Returns the identifier of the topmost item on a column, if any.
    ///
    /// # Panics
    /// Panics if `slot` is out of bounds.
    #[inline]
    pub fn top_at(&self, slot: SlotIndex) -> Option<ItemId> {
        self.columns[slot.get()].last().copied()
    }

    /// Returns whether an item with this identifier is resident.
    #[inline]
    pub fn contains(&self, id: ItemId) -> bool {
        self.locations.contains_key(&id)
    }

    /// Returns a resident item by identifier.
    #[inline]
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Returns where a resident item currently rests.
    #[inline]
    pub fn locate(&self, id: ItemId) -> Option<Location> {
        self.locations.get(&id).copied()
    }

    /// Returns the most urgent resident item, if any.
    #[inline]
    pub fn highest_priority(&self) -> Option<&Item> {
        self.queue
            .iter()
            .next()
            .and_then(|key| self.items.get(&key.id()))
    }

    /// Returns the most urgent resident item of the given footprint,
    /// optionally skipping one identifier.
    pub fn earliest_of_size(&self, size: usize, skip: Option<ItemId>) -> Option<&Item> {
        self.queue
            .iter()
            .filter_map(|key| self.items.get(&key.id()))
            .find(|item| item.size() == size && skip != Some(item.id()))
    }

    /// Returns the resident items in priority order, most urgent first.
    pub fn items_by_priority(&self) -> impl Iterator<Item = &Item> + '_ {
        self.queue.iter().filter_map(move |key| self.items.get(&key.id()))
    }

    /// Places an item with its leftmost column at `slot`.
    pub fn add(&mut self, item: Item, slot: SlotIndex) -> Result<(), YardError> {
        if self.locations.contains_key(&item.id()) {
            return Err(YardError::DuplicateItem(item.id()));
        }
        self.check_flat(item.id(), item.size(), slot, None)?;
        self.commit_add(item, slot);
        Ok(())
    }

    /// Removes an item, returning it. The item must be topmost on every
    /// column it spans.
    pub fn remove(&mut self, id: ItemId) -> Result<Item, YardError> {
        let location = *self.locations.get(&id).ok_or(YardError::NotPresent(id))?;
        let size = self.footprint_of(id);
        if !self.is_topmost(id, location.slot, size) {
            return Err(YardError::NotTopmost(id));
        }
        Ok(self.commit_remove(id, location.slot, size))
    }

    /// Moves an item to a new leftmost column, atomically.
    ///
    /// The target span may overlap the item's current span; the flat-rest
    /// check is evaluated against the heights the columns would have after
    /// the item is lifted. On error the yard is unchanged.
    pub fn relocate(&mut self, id: ItemId, slot: SlotIndex) -> Result<(), YardError> {
        let location = *self.locations.get(&id).ok_or(YardError::NotPresent(id))?;
        let size = self.footprint_of(id);
        if !self.is_topmost(id, location.slot, size) {
            return Err(YardError::NotTopmost(id));
        }
        self.check_flat(id, size, slot, Some((location.slot, size)))?;

        let item = self.commit_remove(id, location.slot, size);
        self.commit_add(item, slot);
        Ok(())
    }

    #[inline]
    fn footprint_of(&self, id: ItemId) -> usize {
        debug_assert!(
            self.items.contains_key(&id),
            "location and item maps out of sync"
        );
        self.items.get(&id).map(Item::size).unwrap_or(0)
    }

    fn is_topmost(&self, id: ItemId, slot: SlotIndex, size: usize) -> bool {
        (slot.get()..slot.get() + size)
            .all(|column| self.columns[column].last() == Some(&id))
    }

    /// Checks that the span `[slot, slot + size)` is in bounds and that the
    /// spanned columns are level. `lifted` names a span whose topmost item is
    /// about to be picked up, so those columns count one shorter.
    fn check_flat(
        &self,
        id: ItemId,
        size: usize,
        slot: SlotIndex,
        lifted: Option<(SlotIndex, usize)>,
    ) -> Result<(), YardError> {
        let start = slot.get();
        if start + size > self.columns.len() {
            return Err(YardError::SlotOutOfBounds {
                slot,
                size,
                width: self.columns.len(),
            });
        }
        let effective = |column: usize| {
            let mut height = self.columns[column].len();
            if let Some((origin, span)) = lifted {
                if (origin.get()..origin.get() + span).contains(&column) {
                    height -= 1;
                }
            }
            height
        };
        let floor = effective(start);
        if (start + 1..start + size).any(|column| effective(column) != floor) {
            return Err(YardError::UnevenPlacement { id, slot });
        }
        Ok(())
    }

    fn commit_add(&mut self, item: Item, slot: SlotIndex) {
        let id = item.id();
        let size = item.size();
        for column in slot.get()..slot.get() + size {
            self.columns[column].push(id);
        }
        let tier = self.columns[slot.get()].len() - 1;
        self.locations.insert(id, Location { tier, slot });
        self.queue.insert(item.priority_key());
        self.items.insert(id, item);
    }

    fn commit_remove(&mut self, id: ItemId, slot: SlotIndex, size: usize) -> Item {
        for column in slot.get()..slot.get() + size {
            let top = self.columns[column].pop();
            debug_assert_eq!(top, Some(id), "column stacks out of sync");
        }
        self.locations.remove(&id);
        let item = match self.items.remove(&id) {
            Some(item) => item,
            // Unreachable: remove() checked residency before committing.
            None => unreachable!(),
        };
        self.queue.remove(&item.priority_key());
        item
    }
}

impl std::fmt::Display for StorageYard {
    /// Renders the yard as an ASCII grid, tallest tier first, with the cash
    /// total underneath.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for tier in (0..self.height()).rev() {
            for column in &self.columns {
                match column.get(tier) {
                    Some(id) => write!(f, "{:>4}", id.get())?,
                    None => write!(f, "   .")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "{}", "-".repeat(self.width() * 4))?;
        write!(f, "cash: {}", self.cash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_model::item::TimeWindow;

    fn item(id: usize, size: usize) -> Item {
        Item::new(
            ItemId::new(id),
            size,
            10,
            TimeWindow::new(0, 5),
            TimeWindow::new(2, 8),
        )
        .expect("valid item")
    }

    fn item_with_deadline(id: usize, size: usize, deadline: i64) -> Item {
        Item::new(
            ItemId::new(id),
            size,
            10,
            TimeWindow::new(0, 5),
            TimeWindow::new(deadline, deadline + 10),
        )
        .expect("valid item")
    }

    #[test]
    fn test_add_and_remove_single_column() {
        let mut yard = StorageYard::new(4);
        yard.add(item(1, 1), SlotIndex::new(0)).unwrap();
        assert_eq!(yard.len(), 1);
        assert_eq!(yard.top_at(SlotIndex::new(0)), Some(ItemId::new(1)));
        assert_eq!(
            yard.locate(ItemId::new(1)),
            Some(Location {
                tier: 0,
                slot: SlotIndex::new(0)
            })
        );

        let removed = yard.remove(ItemId::new(1)).unwrap();
        assert_eq!(removed.id(), ItemId::new(1));
        assert!(yard.is_empty());
        assert_eq!(yard.top_at(SlotIndex::new(0)), None);
    }

    #[test]
    fn test_rejects_duplicate_identifier() {
        let mut yard = StorageYard::new(4);
        yard.add(item(1, 1), SlotIndex::new(0)).unwrap();
        let err = yard.add(item(1, 1), SlotIndex::new(1)).unwrap_err();
        assert_eq!(err, YardError::DuplicateItem(ItemId::new(1)));
    }

    #[test]
    fn test_rejects_out_of_bounds_placement() {
        let mut yard = StorageYard::new(4);
        let err = yard.add(item(1, 3), SlotIndex::new(2)).unwrap_err();
        assert!(matches!(err, YardError::SlotOutOfBounds { .. }));
    }

    #[test]
    fn test_rejects_uneven_placement() {
        let mut yard = StorageYard::new(4);
        yard.add(item(1, 1), SlotIndex::new(0)).unwrap();
        // Columns 0 and 1 now differ in height; a 2-wide item cannot bridge.
        let err = yard.add(item(2, 2), SlotIndex::new(0)).unwrap_err();
        assert!(matches!(err, YardError::UnevenPlacement { .. }));

        // Level the span and the same placement succeeds.
        let mut yard = StorageYard::new(4);
        yard.add(item(1, 1), SlotIndex::new(0)).unwrap();
        yard.add(item(2, 1), SlotIndex::new(1)).unwrap();
        yard.add(item(3, 2), SlotIndex::new(0)).unwrap();
        assert_eq!(yard.top_at(SlotIndex::new(0)), Some(ItemId::new(3)));
        assert_eq!(yard.top_at(SlotIndex::new(1)), Some(ItemId::new(3)));
    }

    #[test]
    fn test_buried_item_cannot_be_removed() {
        let mut yard = StorageYard::new(4);
        yard.add(item(1, 1), SlotIndex::new(0)).unwrap();
        yard.add(item(2, 1), SlotIndex::new(0)).unwrap();
        let err = yard.remove(ItemId::new(1)).unwrap_err();
        assert_eq!(err, YardError::NotTopmost(ItemId::new(1)));

        yard.remove(ItemId::new(2)).unwrap();
        yard.remove(ItemId::new(1)).unwrap();
        assert!(yard.is_empty());
    }

    #[test]
    fn test_wide_item_must_be_topmost_everywhere() {
        let mut yard = StorageYard::new(4);
        yard.add(item(1, 2), SlotIndex::new(0)).unwrap();
        yard.add(item(2, 1), SlotIndex::new(2)).unwrap();
        yard.add(item(3, 1), SlotIndex::new(1)).unwrap();
        // Item 1 spans [0, 2); item 3 sits on top of its right column.
        let err = yard.remove(ItemId::new(1)).unwrap_err();
        assert_eq!(err, YardError::NotTopmost(ItemId::new(1)));
    }

    #[test]
    fn test_relocate_is_atomic() {
        let mut yard = StorageYard::new(4);
        yard.add(item(1, 1), SlotIndex::new(0)).unwrap();
        yard.add(item(2, 1), SlotIndex::new(2)).unwrap();
        yard.add(item(3, 1), SlotIndex::new(2)).unwrap();

        let err = yard.relocate(ItemId::new(1), SlotIndex::new(4)).unwrap_err();
        assert!(matches!(err, YardError::SlotOutOfBounds { .. }));
        // Yard untouched: item 1 still at its origin.
        assert_eq!(
            yard.locate(ItemId::new(1)),
            Some(Location {
                tier: 0,
                slot: SlotIndex::new(0)
            })
        );

        yard.relocate(ItemId::new(1), SlotIndex::new(1)).unwrap();
        assert_eq!(yard.top_at(SlotIndex::new(0)), None);
        assert_eq!(yard.top_at(SlotIndex::new(1)), Some(ItemId::new(1)));
    }

    #[test]
    fn test_relocate_may_overlap_own_span() {
        let mut yard = StorageYard::new(4);
        yard.add(item(1, 2), SlotIndex::new(0)).unwrap();
        // Shift one column right; columns 1 and 2 are level once the item is
        // lifted off column 1.
        yard.relocate(ItemId::new(1), SlotIndex::new(1)).unwrap();
        assert_eq!(yard.top_at(SlotIndex::new(0)), None);
        assert_eq!(yard.top_at(SlotIndex::new(1)), Some(ItemId::new(1)));
        assert_eq!(yard.top_at(SlotIndex::new(2)), Some(ItemId::new(1)));
    }

    #[test]
    fn test_relocate_buried_item_fails() {
        let mut yard = StorageYard::new(4);
        yard.add(item(1, 1), SlotIndex::new(0)).unwrap();
        yard.add(item(2, 1), SlotIndex::new(0)).unwrap();
        let err = yard.relocate(ItemId::new(1), SlotIndex::new(1)).unwrap_err();
        assert_eq!(err, YardError::NotTopmost(ItemId::new(1)));
    }

    #[test]
    fn test_cash_accumulates() {
        let mut yard = StorageYard::new(4);
        assert_eq!(yard.cash(), 0);
        yard.add_cash(10);
        yard.add_cash(0);
        yard.add_cash(25);
        assert_eq!(yard.cash(), 35);
    }

    #[test]
    fn test_priority_index_tracks_residents() {
        let mut yard = StorageYard::new(8);
        yard.add(item_with_deadline(1, 1, 9), SlotIndex::new(0)).unwrap();
        yard.add(item_with_deadline(2, 1, 3), SlotIndex::new(1)).unwrap();
        yard.add(item_with_deadline(3, 2, 5), SlotIndex::new(2)).unwrap();

        assert_eq!(yard.highest_priority().map(Item::id), Some(ItemId::new(2)));
        let order: Vec<usize> = yard.items_by_priority().map(|i| i.id().get()).collect();
        assert_eq!(order, vec![2, 3, 1]);

        yard.remove(ItemId::new(2)).unwrap();
        assert_eq!(yard.highest_priority().map(Item::id), Some(ItemId::new(3)));
    }

    #[test]
    fn test_earliest_of_size_with_skip() {
        let mut yard = StorageYard::new(8);
        yard.add(item_with_deadline(1, 1, 9), SlotIndex::new(0)).unwrap();
        yard.add(item_with_deadline(2, 1, 3), SlotIndex::new(1)).unwrap();
        yard.add(item_with_deadline(3, 2, 5), SlotIndex::new(2)).unwrap();

        assert_eq!(
            yard.earliest_of_size(1, None).map(Item::id),
            Some(ItemId::new(2))
        );
        assert_eq!(
            yard.earliest_of_size(1, Some(ItemId::new(2))).map(Item::id),
            Some(ItemId::new(1))
        );
        assert_eq!(
            yard.earliest_of_size(2, None).map(Item::id),
            Some(ItemId::new(3))
        );
        assert_eq!(yard.earliest_of_size(4, None).map(Item::id), None);
    }

    #[test]
    fn test_display_snapshot() {
        let mut yard = StorageYard::new(3);
        yard.add(item(1, 2), SlotIndex::new(0)).unwrap();
        yard.add(item(2, 1), SlotIndex::new(0)).unwrap();
        yard.add_cash(10);
        let rendered = format!("{}", yard);
        assert!(rendered.contains("cash: 10"));
        assert!(rendered.lines().count() >= 3);
    }
}
