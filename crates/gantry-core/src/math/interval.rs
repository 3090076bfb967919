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

use num_traits::PrimInt;
use std::ops::Range;

/// A half-open interval `[start, end)` defined by a start (inclusive) and
/// end (exclusive).
///
/// This is the time-window primitive of the yard simulator: an item's
/// arrival window and delivery window are both half-open, so a window with
/// `start == end` contains no instant at all.
///
/// # Invariants
/// `start` must always be less than or equal to `end`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClosedOpenInterval<T>
where
    T: PrimInt,
{
    start_inclusive: T,
    end_exclusive: T,
}

impl<T> ClosedOpenInterval<T>
where
    T: PrimInt,
{
    /// Creates a new `ClosedOpenInterval`.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use gantry_core::math::interval::ClosedOpenInterval;
    ///
    /// let window = ClosedOpenInterval::new(2, 8);
    /// assert_eq!(window.len(), 6);
    /// ```
    #[inline]
    pub fn new(start_inclusive: T, end_exclusive: T) -> Self {
        assert!(
            start_inclusive <= end_exclusive,
            "Invalid interval: start must be less than or equal to end"
        );
        Self {
            start_inclusive,
            end_exclusive,
        }
    }

    /// Creates a new `ClosedOpenInterval` if the inputs are valid.
    ///
    /// Returns `None` if `start > end`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use gantry_core::math::interval::ClosedOpenInterval;
    ///
    /// assert!(ClosedOpenInterval::try_new(0, 10).is_some());
    /// assert!(ClosedOpenInterval::try_new(10, 0).is_none());
    /// ```
    #[inline]
    pub fn try_new(start_inclusive: T, end_exclusive: T) -> Option<Self> {
        if start_inclusive <= end_exclusive {
            Some(Self {
                start_inclusive,
                end_exclusive,
            })
        } else {
            None
        }
    }

    /// Returns the inclusive start bound of the interval.
    #[inline]
    pub fn start(&self) -> T {
        self.start_inclusive
    }

    /// Returns the exclusive end bound of the interval.
    #[inline]
    pub fn end(&self) -> T {
        self.end_exclusive
    }

    /// Returns the number of integer points contained in the interval.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use gantry_core::math::interval::ClosedOpenInterval;
    ///
    /// assert_eq!(ClosedOpenInterval::new(2, 8).len(), 6);
    /// assert_eq!(ClosedOpenInterval::new(5, 5).len(), 0);
    /// ```
    #[inline]
    pub fn len(&self) -> T {
        self.end_exclusive - self.start_inclusive
    }

    /// Returns `true` if the interval contains no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start_inclusive == self.end_exclusive
    }

    /// Returns `true` if `point` lies within `[start, end)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use gantry_core::math::interval::ClosedOpenInterval;
    ///
    /// let window = ClosedOpenInterval::new(2, 8);
    /// assert!(window.contains(2));
    /// assert!(window.contains(7));
    /// assert!(!window.contains(8));
    /// ```
    #[inline]
    pub fn contains(&self, point: T) -> bool {
        self.start_inclusive <= point && point < self.end_exclusive
    }

    /// Returns `true` if this interval and `other` share at least one point.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_inclusive < other.end_exclusive && other.start_inclusive < self.end_exclusive
    }
}

impl<T> std::fmt::Debug for ClosedOpenInterval<T>
where
    T: PrimInt + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ClosedOpenInterval({:?}..{:?})",
            self.start_inclusive, self.end_exclusive
        )
    }
}

impl<T> std::fmt::Display for ClosedOpenInterval<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start_inclusive, self.end_exclusive)
    }
}

impl<T> From<Range<T>> for ClosedOpenInterval<T>
where
    T: PrimInt,
{
    fn from(range: Range<T>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl<T> From<ClosedOpenInterval<T>> for Range<T>
where
    T: PrimInt,
{
    fn from(interval: ClosedOpenInterval<T>) -> Self {
        interval.start_inclusive..interval.end_exclusive
    }
}
