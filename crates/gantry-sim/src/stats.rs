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

/// Operation counters of one policy run.
///
/// Every yard mutation the engine performs is tallied here; the cash total
/// itself lives on the yard. `removals` splits into `profitable` and
/// `forfeited` by whether the removal happened inside the item's delivery
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PolicyStats {
    /// Items placed into the yard.
    pub placed: u64,
    /// Items moved between columns.
    pub relocations: u64,
    /// Items removed from the yard.
    pub removals: u64,
    /// Removals that realized the item's value.
    pub profitable: u64,
    /// Removals after the delivery window had already closed.
    pub forfeited: u64,
}

impl PolicyStats {
    /// Creates zeroed counters.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total yard mutations (each one costs a tick).
    #[inline]
    pub fn operations(&self) -> u64 {
        self.placed + self.relocations + self.removals
    }
}

impl std::fmt::Display for PolicyStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "+----------------------+----------+")?;
        writeln!(f, "| {:<20} | {:>8} |", "Placed", self.placed)?;
        writeln!(f, "| {:<20} | {:>8} |", "Relocations", self.relocations)?;
        writeln!(f, "| {:<20} | {:>8} |", "Removals", self.removals)?;
        writeln!(f, "| {:<20} | {:>8} |", "  profitable", self.profitable)?;
        writeln!(f, "| {:<20} | {:>8} |", "  forfeited", self.forfeited)?;
        writeln!(f, "| {:<20} | {:>8} |", "Total operations", self.operations())?;
        write!(f, "+----------------------+----------+")
    }
}
