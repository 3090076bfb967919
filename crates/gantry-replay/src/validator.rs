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

//! Replays a move log against a fresh yard and checks every step.
//!
//! The validator trusts nothing: each event must name a manifest item, obey
//! the yard's placement and removal contract, carry a non-decreasing
//! timestamp, and every `CASH` checkpoint must match the cash total the
//! replay itself accumulates (crediting an item's value exactly when its
//! removal timestamp falls inside its delivery window). A log that replays
//! cleanly is proof the producing policy never cheated the physics.

use gantry_model::{
    event::{read_events, LogEvent, LogReadError},
    index::ItemId,
    item::{Item, Money},
};
use gantry_sim::yard::{StorageYard, YardError};
use rustc_hash::FxHashMap;
use std::io::BufRead;

/// The error type for log validation. Event numbers are 1-based positions
/// in the event stream, blank lines excluded.
#[derive(Debug)]
pub enum ValidationError {
    /// The log could not be read or parsed at all.
    Log(LogReadError),
    /// Two manifest items share an identifier.
    DuplicateManifestId(ItemId),
    /// The log has no events.
    EmptyLog,
    /// The first event is not `START`.
    MissingStart,
    /// The `START` entry itself is malformed.
    BadStart { reason: &'static str },
    /// A `START` entry appears after the first event.
    UnexpectedStart { event: usize },
    /// An event's timestamp is earlier than its predecessor's.
    TimeRegression {
        event: usize,
        previous: i64,
        found: i64,
    },
    /// An event names an identifier the manifest does not contain.
    UnknownItem { event: usize, id: ItemId },
    /// An event asked the yard for an illegal mutation.
    Yard { event: usize, source: YardError },
    /// A `CASH` checkpoint disagrees with the replayed total.
    CashMismatch {
        event: usize,
        expected: Money,
        found: Money,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Log(e) => write!(f, "{}", e),
            Self::DuplicateManifestId(id) => {
                write!(f, "Manifest names item {} twice", id.get())
            }
            Self::EmptyLog => write!(f, "The log contains no events"),
            Self::MissingStart => write!(f, "The log does not begin with a START entry"),
            Self::BadStart { reason } => write!(f, "Malformed START entry: {}", reason),
            Self::UnexpectedStart { event } => {
                write!(f, "Event {}: START after the first event", event)
            }
            Self::TimeRegression {
                event,
                previous,
                found,
            } => write!(
                f,
                "Event {}: timestamp {} is earlier than its predecessor {}",
                event, found, previous
            ),
            Self::UnknownItem { event, id } => write!(
                f,
                "Event {}: item {} is not in the manifest",
                event,
                id.get()
            ),
            Self::Yard { event, source } => write!(f, "Event {}: {}", event, source),
            Self::CashMismatch {
                event,
                expected,
                found,
            } => write!(
                f,
                "Event {}: CASH checkpoint says {} but the replayed total is {}",
                event, found, expected
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<LogReadError> for ValidationError {
    fn from(e: LogReadError) -> Self {
        Self::Log(e)
    }
}

/// Summary of a clean replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    /// Policy name from the `START` entry.
    pub policy: String,
    /// Yard width from the `START` entry.
    pub width: usize,
    /// Number of events replayed, `START` included.
    pub events: usize,
    /// Cash total after the last event.
    pub final_cash: Money,
    /// Items still resident after the last event.
    pub remaining: usize,
}

/// Replays move logs against a manifest.
///
/// # Examples
///
/// ```rust
/// # use gantry_model::manifest::ManifestLoader;
/// # use gantry_replay::validator::ReplayValidator;
/// let items = ManifestLoader::new().from_str("1 1 10 0 5 2 8").unwrap();
/// let log = "0 START BaselinePolicy 20\n0 ADD 1 0\n2 REMOVE 1\n2 CASH 10\n";
/// let validator = ReplayValidator::new(&items).unwrap();
/// let report = validator.validate(log.as_bytes()).unwrap();
/// assert_eq!(report.final_cash, 10);
/// assert_eq!(report.remaining, 0);
/// ```
#[derive(Debug, Clone)]
pub struct ReplayValidator {
    items: FxHashMap<ItemId, Item>,
}

impl ReplayValidator {
    /// Creates a validator over a manifest, rejecting duplicate identifiers.
    pub fn new(items: &[Item]) -> Result<Self, ValidationError> {
        let mut map = FxHashMap::default();
        for item in items {
            if map.insert(item.id(), item.clone()).is_some() {
                return Err(ValidationError::DuplicateManifestId(item.id()));
            }
        }
        Ok(Self { items: map })
    }

    /// Replays a log, returning its summary on success.
    #[inline]
    pub fn validate<R: BufRead>(&self, reader: R) -> Result<ReplayReport, ValidationError> {
        self.validate_with(reader, |_, _| {})
    }

    /// Replays a log, invoking `observer` with the yard state after every
    /// applied event. Used by the CLI to animate a replay.
    pub fn validate_with<R, F>(
        &self,
        reader: R,
        mut observer: F,
    ) -> Result<ReplayReport, ValidationError>
    where
        R: BufRead,
        F: FnMut(&StorageYard, &LogEvent),
    {
        let events = read_events(reader)?;
        let mut cursor = events.iter().enumerate();

        let (policy, width) = match cursor.next() {
            Some((_, LogEvent::Start {
                time,
                policy,
                width,
            })) => {
                if *time != 0 {
                    return Err(ValidationError::BadStart {
                        reason: "timestamp is not 0",
                    });
                }
                if *width == 0 {
                    return Err(ValidationError::BadStart {
                        reason: "yard width is 0",
                    });
                }
                (policy.clone(), *width)
            }
            Some(_) => return Err(ValidationError::MissingStart),
            None => return Err(ValidationError::EmptyLog),
        };

        let mut yard = StorageYard::new(width);
        let mut last_time = 0;
        observer(&yard, &events[0]);

        for (index, event) in cursor {
            let number = index + 1;
            let time = event.time();
            if time < last_time {
                return Err(ValidationError::TimeRegression {
                    event: number,
                    previous: last_time,
                    found: time,
                });
            }
            last_time = time;

            match event {
                LogEvent::Start { .. } => {
                    return Err(ValidationError::UnexpectedStart { event: number })
                }
                LogEvent::Add { id, slot, .. } => {
                    let item = self
                        .items
                        .get(id)
                        .ok_or(ValidationError::UnknownItem {
                            event: number,
                            id: *id,
                        })?
                        .clone();
                    yard.add(item, *slot).map_err(|source| ValidationError::Yard {
                        event: number,
                        source,
                    })?;
                }
                LogEvent::Move { id, slot, .. } => {
                    yard.relocate(*id, *slot)
                        .map_err(|source| ValidationError::Yard {
                            event: number,
                            source,
                        })?;
                }
                LogEvent::Remove { id, .. } => {
                    let item = yard.remove(*id).map_err(|source| ValidationError::Yard {
                        event: number,
                        source,
                    })?;
                    // An item pays out exactly when its removal timestamp
                    // falls inside the delivery window.
                    if item.delivery().contains(time) {
                        yard.add_cash(item.value());
                    }
                }
                LogEvent::Cash { total, .. } => {
                    if *total != yard.cash() {
                        return Err(ValidationError::CashMismatch {
                            event: number,
                            expected: yard.cash(),
                            found: *total,
                        });
                    }
                }
            }
            observer(&yard, event);
        }

        Ok(ReplayReport {
            policy,
            width,
            events: events.len(),
            final_cash: yard.cash(),
            remaining: yard.len(),
        })
    }
}
