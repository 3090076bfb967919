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

//! Move-log events and their line-oriented wire codec.
//!
//! A policy run produces an append-only stream of timestamped events. The
//! wire format is one event per line, whitespace-delimited:
//!
//! ```raw
//! <t> START <policy> <width>     (first line, t = 0)
//! <t> ADD <id> <slot>
//! <t> REMOVE <id>
//! <t> MOVE <id> <slot>
//! <t> CASH <total>
//! ```
//!
//! `Display` renders the wire line and `FromStr` parses it; the two are
//! inverses. The codec itself is deliberately dumb: ordering constraints
//! (non-decreasing time, `START` first) are the replay validator's job, so a
//! corrupted log is parsed here and rejected there with a precise reason.

use crate::index::{ItemId, SlotIndex};
use crate::item::{Money, TimeStamp};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// A single timestamped entry of a move log.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum LogEvent {
    /// Declares the policy name and yard width. Always the first entry.
    Start {
        time: TimeStamp,
        policy: String,
        width: usize,
    },
    /// An item entered the yard at the given leftmost slot.
    Add {
        time: TimeStamp,
        id: ItemId,
        slot: SlotIndex,
    },
    /// An item left the yard.
    Remove { time: TimeStamp, id: ItemId },
    /// An item was relocated to the given leftmost slot.
    Move {
        time: TimeStamp,
        id: ItemId,
        slot: SlotIndex,
    },
    /// Checkpoint of the running cash total.
    Cash { time: TimeStamp, total: Money },
}

impl LogEvent {
    /// Returns the timestamp of the event.
    #[inline]
    pub fn time(&self) -> TimeStamp {
        match self {
            Self::Start { time, .. }
            | Self::Add { time, .. }
            | Self::Remove { time, .. }
            | Self::Move { time, .. }
            | Self::Cash { time, .. } => *time,
        }
    }
}

impl std::fmt::Display for LogEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start {
                time,
                policy,
                width,
            } => write!(f, "{} START {} {}", time, policy, width),
            Self::Add { time, id, slot } => {
                write!(f, "{} ADD {} {}", time, id.get(), slot.get())
            }
            Self::Remove { time, id } => write!(f, "{} REMOVE {}", time, id.get()),
            Self::Move { time, id, slot } => {
                write!(f, "{} MOVE {} {}", time, id.get(), slot.get())
            }
            Self::Cash { time, total } => write!(f, "{} CASH {}", time, total),
        }
    }
}

/// The error type for parsing a single log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventParseError {
    /// The line ended before all fields of the event were read.
    MissingField(&'static str),
    /// A field could not be parsed as a number.
    InvalidNumber { field: &'static str, token: String },
    /// The event tag is not one of START/ADD/REMOVE/MOVE/CASH.
    UnknownTag(String),
    /// The line carries tokens past the end of the event.
    TrailingTokens,
}

impl std::fmt::Display for EventParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing field '{}'", field),
            Self::InvalidNumber { field, token } => {
                write!(f, "could not parse '{}' as field '{}'", token, field)
            }
            Self::UnknownTag(tag) => write!(f, "unknown event tag '{}'", tag),
            Self::TrailingTokens => write!(f, "unexpected trailing tokens"),
        }
    }
}

impl std::error::Error for EventParseError {}

fn parse_field<T: FromStr>(
    tokens: &mut std::str::SplitWhitespace<'_>,
    field: &'static str,
) -> Result<T, EventParseError> {
    let token = tokens.next().ok_or(EventParseError::MissingField(field))?;
    token.parse::<T>().map_err(|_| EventParseError::InvalidNumber {
        field,
        token: token.to_owned(),
    })
}

impl FromStr for LogEvent {
    type Err = EventParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let time: TimeStamp = parse_field(&mut tokens, "time")?;
        let tag = tokens.next().ok_or(EventParseError::MissingField("tag"))?;

        let event = match tag {
            "START" => {
                let policy = tokens
                    .next()
                    .ok_or(EventParseError::MissingField("policy"))?
                    .to_owned();
                let width: usize = parse_field(&mut tokens, "width")?;
                Self::Start {
                    time,
                    policy,
                    width,
                }
            }
            "ADD" => {
                let id: usize = parse_field(&mut tokens, "id")?;
                let slot: usize = parse_field(&mut tokens, "slot")?;
                Self::Add {
                    time,
                    id: ItemId::new(id),
                    slot: SlotIndex::new(slot),
                }
            }
            "REMOVE" => {
                let id: usize = parse_field(&mut tokens, "id")?;
                Self::Remove {
                    time,
                    id: ItemId::new(id),
                }
            }
            "MOVE" => {
                let id: usize = parse_field(&mut tokens, "id")?;
                let slot: usize = parse_field(&mut tokens, "slot")?;
                Self::Move {
                    time,
                    id: ItemId::new(id),
                    slot: SlotIndex::new(slot),
                }
            }
            "CASH" => {
                let total: Money = parse_field(&mut tokens, "total")?;
                Self::Cash { time, total }
            }
            other => return Err(EventParseError::UnknownTag(other.to_owned())),
        };

        if tokens.next().is_some() {
            return Err(EventParseError::TrailingTokens);
        }
        Ok(event)
    }
}

/// The error type for reading a whole log stream.
#[derive(Debug)]
pub enum LogReadError {
    /// An I/O error occurred while reading the stream.
    Io(io::Error),
    /// A line could not be parsed as an event.
    Parse { line: usize, source: EventParseError },
}

impl std::fmt::Display for LogReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Parse { line, source } => write!(f, "log line {}: {}", line, source),
        }
    }
}

impl std::error::Error for LogReadError {}

impl From<io::Error> for LogReadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Reads every event from a log stream. Blank lines are skipped; any other
/// malformed line is an error naming its 1-based line number.
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<LogEvent>, LogReadError> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = line.parse::<LogEvent>().map_err(|source| LogReadError::Parse {
            line: index + 1,
            source,
        })?;
        events.push(event);
    }
    Ok(events)
}

/// An append-only sink of log events.
///
/// Wraps any `Write` destination and renders one wire line per recorded
/// event. The caller owns ordering; the sink never reorders or buffers
/// events beyond the underlying writer.
#[derive(Debug)]
pub struct EventLog<W: Write> {
    writer: W,
}

impl<W: Write> EventLog<W> {
    /// Creates a sink over the given writer.
    #[inline]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Appends one event as a wire line.
    #[inline]
    pub fn record(&mut self, event: &LogEvent) -> io::Result<()> {
        writeln!(self.writer, "{}", event)
    }

    /// Flushes the underlying writer.
    #[inline]
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consumes the sink, returning the underlying writer.
    #[inline]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_renders_wire_lines() {
        let cases = [
            (
                LogEvent::Start {
                    time: 0,
                    policy: "PriorityPolicy".to_owned(),
                    width: 34,
                },
                "0 START PriorityPolicy 34",
            ),
            (
                LogEvent::Add {
                    time: 3,
                    id: ItemId::new(7),
                    slot: SlotIndex::new(12),
                },
                "3 ADD 7 12",
            ),
            (
                LogEvent::Remove {
                    time: 5,
                    id: ItemId::new(7),
                },
                "5 REMOVE 7",
            ),
            (
                LogEvent::Move {
                    time: 4,
                    id: ItemId::new(7),
                    slot: SlotIndex::new(16),
                },
                "4 MOVE 7 16",
            ),
            (LogEvent::Cash { time: 5, total: 42 }, "5 CASH 42"),
        ];
        for (event, line) in cases {
            assert_eq!(format!("{}", event), line);
            assert_eq!(line.parse::<LogEvent>().unwrap(), event);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_tag() {
        let err = "0 FROB 1".parse::<LogEvent>().unwrap_err();
        assert_eq!(err, EventParseError::UnknownTag("FROB".to_owned()));
    }

    #[test]
    fn test_parse_rejects_missing_and_trailing_fields() {
        let err = "3 ADD 7".parse::<LogEvent>().unwrap_err();
        assert_eq!(err, EventParseError::MissingField("slot"));

        let err = "5 REMOVE 7 9".parse::<LogEvent>().unwrap_err();
        assert_eq!(err, EventParseError::TrailingTokens);
    }

    #[test]
    fn test_parse_rejects_bad_numbers() {
        let err = "x ADD 7 12".parse::<LogEvent>().unwrap_err();
        assert!(matches!(err, EventParseError::InvalidNumber { field: "time", .. }));
    }

    #[test]
    fn test_event_log_round_trip() {
        let mut log = EventLog::new(Vec::new());
        let events = vec![
            LogEvent::Start {
                time: 0,
                policy: "BaselinePolicy".to_owned(),
                width: 20,
            },
            LogEvent::Add {
                time: 0,
                id: ItemId::new(1),
                slot: SlotIndex::new(0),
            },
            LogEvent::Remove {
                time: 2,
                id: ItemId::new(1),
            },
            LogEvent::Cash { time: 2, total: 10 },
        ];
        for event in &events {
            log.record(event).unwrap();
        }
        let bytes = log.into_inner();
        let replayed = read_events(bytes.as_slice()).unwrap();
        assert_eq!(replayed, events);
    }

    #[test]
    fn test_read_events_reports_line_numbers() {
        let text = "0 START X 20\n\n1 BOGUS 3\n";
        let err = read_events(text.as_bytes()).unwrap_err();
        match err {
            LogReadError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
