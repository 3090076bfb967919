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

//! # Strongly Typed Indices (Zero-Cost)
//!
//! Phantom-typed wrappers around `usize` to prevent mixing values from
//! different domains. The yard simulator juggles two unrelated integer
//! spaces — item identifiers and column slot positions — and a raw `usize`
//! invites accidental swaps between them. `TypedIndex<T>` carries a tag type
//! `T: TypedIndexTag` that encodes intent at the type level while compiling
//! down to a transparent `usize`.
//!
//! Only the arithmetic the domain actually performs is provided: adding and
//! subtracting a `usize` offset (footprint spans, paired-bucket hops), plus
//! a checked subtraction for leftward hops that may underflow.
//!
//! ## Usage
//!
//! ```rust
//! use gantry_core::utils::index::{TypedIndex, TypedIndexTag};
//!
//! #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
//! struct SlotTag;
//! impl TypedIndexTag for SlotTag { const NAME: &'static str = "SlotIndex"; }
//!
//! type SlotIndex = TypedIndex<SlotTag>;
//! let slot = SlotIndex::new(6);
//! assert_eq!((slot + 3).get(), 9);
//! assert_eq!(format!("{}", slot), "SlotIndex(6)");
//! ```

/// A trait to tag typed indices with a name for debugging and display
/// purposes.
pub trait TypedIndexTag: Clone {
    const NAME: &'static str;
}

/// A strongly typed index associated with a specific tag type `T`.
///
/// Wraps a `usize` and uses a phantom type parameter to provide type safety
/// without runtime cost.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedIndex<T> {
    index: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T> TypedIndex<T> {
    /// Creates a new `TypedIndex` with the given `usize` value.
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: std::marker::PhantomData,
        }
    }

    /// Returns the underlying `usize` value.
    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.index
    }

    /// Subtracts `offset`, returning `None` on underflow.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use gantry_core::utils::index::{TypedIndex, TypedIndexTag};
    /// # #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    /// # struct SlotTag;
    /// # impl TypedIndexTag for SlotTag { const NAME: &'static str = "SlotIndex"; }
    /// # type SlotIndex = TypedIndex<SlotTag>;
    /// assert_eq!(SlotIndex::new(6).checked_sub(2), Some(SlotIndex::new(4)));
    /// assert_eq!(SlotIndex::new(1).checked_sub(2), None);
    /// ```
    #[inline]
    pub fn checked_sub(self, offset: usize) -> Option<Self> {
        self.index.checked_sub(offset).map(Self::new)
    }
}

impl<T> std::fmt::Debug for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> std::fmt::Display for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> From<usize> for TypedIndex<T> {
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl<T> From<TypedIndex<T>> for usize {
    fn from(typed_index: TypedIndex<T>) -> Self {
        typed_index.index
    }
}

impl<T> std::ops::Add<usize> for TypedIndex<T> {
    type Output = Self;

    fn add(self, rhs: usize) -> Self::Output {
        Self::new(self.index + rhs)
    }
}

impl<T> std::ops::Sub<usize> for TypedIndex<T> {
    type Output = Self;

    fn sub(self, rhs: usize) -> Self::Output {
        Self::new(self.index - rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    struct TestTag;

    impl TypedIndexTag for TestTag {
        const NAME: &'static str = "TestIdx";
    }

    type TestIndex = TypedIndex<TestTag>;

    #[test]
    fn test_new_and_get() {
        let idx = TestIndex::new(10);
        assert_eq!(idx.get(), 10);
    }

    #[test]
    fn test_conversions() {
        let idx: TestIndex = 42.into();
        assert_eq!(idx.get(), 42);

        let val: usize = idx.into();
        assert_eq!(val, 42);
    }

    #[test]
    fn test_debug_and_display() {
        let idx = TestIndex::new(7);
        assert_eq!(format!("{}", idx), "TestIdx(7)");
        assert_eq!(format!("{:?}", idx), "TestIdx(7)");
    }

    #[test]
    fn test_offset_arithmetic() {
        let idx = TestIndex::new(10);
        assert_eq!((idx + 5).get(), 15);
        assert_eq!((idx - 5).get(), 5);
        assert_eq!(idx.checked_sub(10), Some(TestIndex::new(0)));
        assert_eq!(idx.checked_sub(11), None);
    }

    #[test]
    fn test_ordering() {
        assert!(TestIndex::new(3) < TestIndex::new(4));
        assert_eq!(TestIndex::new(4), TestIndex::new(4));
    }
}
