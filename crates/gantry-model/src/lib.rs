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

//! # Gantry Model
//!
//! **The Core Domain Model for the Gantry Storage-Yard Simulator.**
//!
//! This crate defines the data structures shared by the retrieval policies
//! and the replay validator: stackable items with footprints and time
//! windows, the plain-text manifest they are read from, and the move-log
//! events a policy emits.
//!
//! ## Architecture
//!
//! * **`index`**: Strongly-typed wrappers (`ItemId`, `SlotIndex`) to prevent
//!   mixing item identifiers with yard column positions.
//! * **`item`**: The validated `Item` record, its removability and profit
//!   predicates, and the delivery-urgency ordering (`PriorityKey`).
//! * **`manifest`**: Loader for the one-item-per-line manifest format.
//! * **`event`**: The move-log event type, its line-oriented wire codec, and
//!   the append-only `EventLog` sink.
//!
//! ## Design Philosophy
//!
//! 1.  **Type Safety**: Identifiers and positions are distinct types.
//! 2.  **Fail-Fast**: Items and manifests are validated eagerly so the yard
//!     and the policies never see an ill-formed record.
//! 3.  **Plain Text**: Manifests and logs are flat, line-oriented text, so a
//!     run can be inspected and replayed with nothing but a pager.

pub mod event;
pub mod index;
pub mod item;
pub mod manifest;
