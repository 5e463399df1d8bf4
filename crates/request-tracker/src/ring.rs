// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fixed-capacity circular storage of call records.
//!
//! [`CallRing`] is the unguarded core: a pre-allocated slot vector, a write
//! cursor and a shared miss placeholder. [`RequestTracker`](crate::RequestTracker)
//! wraps it in a [`SyncMode`](crate::SyncMode).
//!
//! # Invariants
//!
//! - `slots.len()` is the capacity; slots are allocated up front.
//! - `cursor < capacity`, or `cursor == 0` when capacity is zero.
//! - Capacity zero disables tracking: writes are dropped, lookups miss.
//! - Every stored record carries a write sequence number, strictly increasing
//!   in write order. Recency is judged by it, never by slot position, since a
//!   shrink leaves the cursor on the newest surviving record.

use std::borrow::Cow;
use std::fmt::Display;

use tracing::{debug, trace};

use crate::args::ArgIndex;
use crate::exception::ExceptionCode;
use crate::record::CallRecord;

/// Where a lookup resolved to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Slot {
    /// A stored record at this index.
    Stored(usize),
    /// The shared miss placeholder.
    Placeholder,
}

/// Unsynchronized ring of call records.
#[derive(Debug, Default)]
pub(crate) struct CallRing {
    slots: Vec<CallRecord>,
    cursor: usize,
    next_seq: u64,
    placeholder: CallRecord,
}

impl CallRing {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, CallRecord::default);
        Self {
            slots,
            cursor: 0,
            next_seq: 0,
            placeholder: CallRecord::default(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of slots holding a real call.
    pub(crate) fn len(&self) -> usize {
        self.slots.iter().filter(|rec| !rec.is_empty()).count()
    }

    /// Write a call into the slot under the cursor and advance it.
    ///
    /// Calls without a label are dropped: they would be indistinguishable
    /// from a never-written slot.
    pub(crate) fn record<I>(&mut self, send_id: u32, label: Cow<'static, str>, args: I)
    where
        I: IntoIterator,
        I::Item: Display,
    {
        if label.is_empty() {
            trace!(send_id, "empty call label; call not recorded");
            return;
        }
        let capacity = self.slots.len();
        let Some(slot) = self.slots.get_mut(self.cursor) else {
            trace!(send_id, %label, "tracking disabled; call not recorded");
            return;
        };
        self.next_seq += 1;
        slot.overwrite(self.next_seq, send_id, label, args);
        trace!(send_id, slot = self.cursor, "recorded call");
        self.cursor = (self.cursor + 1) % capacity;
    }

    /// Find the newest record for `send_id` and annotate it, or fill the
    /// placeholder on a miss.
    pub(crate) fn lookup(
        &mut self,
        send_id: u32,
        exception: ExceptionCode,
        arg_index: ArgIndex,
    ) -> Slot {
        match self.position_of(send_id) {
            Some(ix) => {
                if let Some(rec) = self.slots.get_mut(ix) {
                    rec.annotate(exception, arg_index);
                }
                Slot::Stored(ix)
            }
            None => {
                debug!(send_id, %exception, capacity = self.slots.len(), "no record for send id");
                self.placeholder.make_placeholder(send_id, exception, arg_index);
                Slot::Placeholder
            }
        }
    }

    /// Latest write for `send_id`, so a recycled id resolves to its newest call.
    fn position_of(&self, send_id: u32) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, rec)| !rec.is_empty() && rec.send_id == send_id)
            .max_by_key(|(_, rec)| rec.seq)
            .map(|(ix, _)| ix)
    }

    pub(crate) fn get(&self, slot: Slot) -> &CallRecord {
        match slot {
            Slot::Stored(ix) => self.slots.get(ix).unwrap_or(&self.placeholder),
            Slot::Placeholder => &self.placeholder,
        }
    }

    /// Resize the ring.
    ///
    /// Growing keeps every record and the cursor's logical position. Shrinking
    /// drops every slot at or past the new capacity, newest records included,
    /// and clamps the cursor into range.
    pub(crate) fn set_capacity(&mut self, capacity: usize) {
        let old = self.slots.len();
        if capacity == old {
            return;
        }
        if capacity > old {
            // A ring that wrapped exactly onto slot 0 logically continues at
            // the end of the old storage.
            if self.cursor == 0 && self.slots.last().is_some_and(|rec| !rec.is_empty()) {
                self.cursor = old;
            }
            self.slots.resize_with(capacity, CallRecord::default);
            debug!(from = old, to = capacity, cursor = self.cursor, "grew request ring");
            return;
        }
        let dropped = self
            .slots
            .get(capacity..)
            .map_or(0, |tail| tail.iter().filter(|rec| !rec.is_empty()).count());
        self.slots.truncate(capacity);
        self.slots.shrink_to_fit();
        self.cursor = self.cursor.min(capacity.saturating_sub(1));
        debug!(from = old, to = capacity, dropped, cursor = self.cursor, "shrank request ring");
    }

    /// Live records, oldest first.
    pub(crate) fn records(&self) -> Vec<CallRecord> {
        let mut live: Vec<CallRecord> =
            self.slots.iter().filter(|rec| !rec.is_empty()).cloned().collect();
        live.sort_unstable_by_key(|rec| rec.seq);
        live
    }
}
