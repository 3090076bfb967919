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

//! Manifest loader for the storage-yard domain.
//!
//! A manifest is plain text, one item per line, all fields integers:
//!
//! ```raw
//! identifier size value arrival_start arrival_end delivery_start delivery_end
//! ```
//!
//! Tokens are whitespace-delimited and `#` introduces a comment running to
//! the end of its line, so instances can be annotated freely. Every item is
//! validated on load (footprint range, non-negative value, window sanity)
//! and duplicate identifiers are rejected; the policies and the validator
//! therefore never see an ill-formed item.
//!
//! The driver feeds items to a policy in manifest order and assumes the
//! manifest is pre-sorted by arrival start; the loader can optionally check
//! that assumption via `fail_on_unsorted`.

use crate::{
    index::ItemId,
    item::{Item, ItemError, Money, TimeStamp, TimeWindow},
};
use rustc_hash::FxHashSet;
use std::{
    fs::File,
    io::{self, BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

/// The error type for the manifest loading process.
#[derive(Debug)]
pub enum ManifestError {
    /// An I/O error occurred while reading the input stream.
    Io(io::Error),
    /// The input ended in the middle of an item record.
    UnexpectedEof,
    /// A token could not be parsed into the expected numeric type.
    Parse(ParseTokenError),
    /// A time window has `start > end`.
    InvalidWindow {
        id: ItemId,
        window: &'static str,
        start: TimeStamp,
        end: TimeStamp,
    },
    /// An item violates its own invariants.
    Item(ItemError),
    /// Two items share an identifier.
    DuplicateId(ItemId),
    /// The manifest is not sorted by arrival start (only checked when
    /// `fail_on_unsorted` is set).
    Unsorted { id: ItemId },
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The string token that failed to parse.
    pub token: String,
    /// The name of the field we tried to fill (e.g. "value").
    pub field: &'static str,
}

impl std::fmt::Display for ParseTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not parse token '{}' as field '{}'",
            self.token, self.field
        )
    }
}

impl std::error::Error for ParseTokenError {}

impl std::fmt::Display for ManifestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::UnexpectedEof => {
                write!(f, "Unexpected end of file in the middle of an item record")
            }
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::InvalidWindow {
                id,
                window,
                start,
                end,
            } => write!(
                f,
                "Item {}: {} window [{}, {}) has start after end",
                id.get(),
                window,
                start,
                end
            ),
            Self::Item(e) => write!(f, "Invalid item: {}", e),
            Self::DuplicateId(id) => write!(f, "Duplicate item identifier {}", id.get()),
            Self::Unsorted { id } => write!(
                f,
                "Manifest is not sorted by arrival start (first offender: item {})",
                id.get()
            ),
        }
    }
}

impl std::error::Error for ManifestError {}

impl From<io::Error> for ManifestError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseTokenError> for ManifestError {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

impl From<ItemError> for ManifestError {
    fn from(e: ItemError) -> Self {
        Self::Item(e)
    }
}

/// A configurable loader for item manifests.
///
/// # Configuration
/// * `fail_on_unsorted`: if true, the loader rejects manifests whose items
///   are not ordered by ascending arrival start. Off by default — the core
///   contract leaves ordering to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ManifestLoader {
    fail_on_unsorted: bool,
}

impl ManifestLoader {
    /// Creates a new `ManifestLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures whether to reject manifests not sorted by arrival start.
    #[inline]
    pub fn fail_on_unsorted(mut self, yes: bool) -> Self {
        self.fail_on_unsorted = yes;
        self
    }

    /// Loads a manifest from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, reader: R) -> Result<Vec<Item>, ManifestError> {
        let tokens = tokenize(reader)?;
        let mut items = Vec::new();
        let mut seen: FxHashSet<ItemId> = FxHashSet::default();
        let mut cursor = tokens.iter();

        loop {
            let id_token = match cursor.next() {
                Some(token) => token,
                None => break,
            };
            let id = ItemId::new(parse_token::<usize>(id_token, "identifier")?);
            let size: usize = next_field(&mut cursor, "size")?;
            let value: Money = next_field(&mut cursor, "value")?;
            let arrival_start: TimeStamp = next_field(&mut cursor, "arrival_start")?;
            let arrival_end: TimeStamp = next_field(&mut cursor, "arrival_end")?;
            let delivery_start: TimeStamp = next_field(&mut cursor, "delivery_start")?;
            let delivery_end: TimeStamp = next_field(&mut cursor, "delivery_end")?;

            let arrival = TimeWindow::try_new(arrival_start, arrival_end).ok_or(
                ManifestError::InvalidWindow {
                    id,
                    window: "arrival",
                    start: arrival_start,
                    end: arrival_end,
                },
            )?;
            let delivery = TimeWindow::try_new(delivery_start, delivery_end).ok_or(
                ManifestError::InvalidWindow {
                    id,
                    window: "delivery",
                    start: delivery_start,
                    end: delivery_end,
                },
            )?;

            let item = Item::new(id, size, value, arrival, delivery)?;
            if !seen.insert(id) {
                return Err(ManifestError::DuplicateId(id));
            }
            if self.fail_on_unsorted {
                if let Some(previous) = items.last() {
                    let previous: &Item = previous;
                    if item.arrival().start() < previous.arrival().start() {
                        return Err(ManifestError::Unsorted { id });
                    }
                }
            }
            items.push(item);
        }

        Ok(items)
    }

    /// Loads a manifest from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Item>, ManifestError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads a manifest from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, reader: R) -> Result<Vec<Item>, ManifestError> {
        self.from_bufread(BufReader::new(reader))
    }

    /// Loads a manifest from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<Vec<Item>, ManifestError> {
        self.from_reader(s.as_bytes())
    }
}

/// Splits the input into whitespace-delimited tokens, dropping `#` comments.
fn tokenize<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut tokens = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let content = match line.find('#') {
            Some(pos) => &line[..pos],
            None => &line[..],
        };
        tokens.extend(content.split_whitespace().map(str::to_owned));
    }
    Ok(tokens)
}

fn parse_token<T: FromStr>(token: &str, field: &'static str) -> Result<T, ParseTokenError> {
    token.parse::<T>().map_err(|_| ParseTokenError {
        token: token.to_owned(),
        field,
    })
}

fn next_field<'a, T, I>(cursor: &mut I, field: &'static str) -> Result<T, ManifestError>
where
    T: FromStr,
    I: Iterator<Item = &'a String>,
{
    let token = cursor.next().ok_or(ManifestError::UnexpectedEof)?;
    Ok(parse_token(token, field)?)
}
