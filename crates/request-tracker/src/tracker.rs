// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The public request tracker.

use std::borrow::Cow;
use std::fmt::{self, Display};
use std::ops::Deref;

use tracing::warn;

use crate::args::ArgIndex;
use crate::config::TrackerConfig;
use crate::exception::ExceptionCode;
use crate::record::CallRecord;
use crate::ring::{CallRing, Slot};
use crate::sync::{SyncMode, Synchronized};

/// Capacity used by [`RequestTracker::default`] and [`TrackerConfig::default`].
pub const DEFAULT_CAPACITY: usize = 128;

/// Something that can report the send id of the call it issued last.
///
/// Implemented by the client link adapter; the tracker only reads from it.
pub trait SendIdSource {
    /// Error reported when the id cannot be read.
    type Error: Display;

    /// Send id assigned to the most recent outbound call.
    fn last_send_id(&self) -> Result<u32, Self::Error>;
}

/// A decoded exception notification from the client link.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ExceptionNotice {
    /// Send id of the failed call.
    pub send_id: u32,
    /// What went wrong.
    pub exception: ExceptionCode,
    /// Which argument was at fault.
    pub index: ArgIndex,
}

impl ExceptionNotice {
    /// Build a notice from the raw wire fields.
    pub fn from_raw(send_id: u32, exception: u32, index: u32) -> Self {
        Self {
            send_id,
            exception: ExceptionCode(exception),
            index: ArgIndex::from_raw(index),
        }
    }
}

/// Bounded cache correlating send ids with the calls that produced them.
///
/// Records live in a fixed ring of `capacity` slots. Each [`record`] overwrites
/// the oldest slot once the ring is full; [`lookup`] scans every slot and
/// annotates the match with the exception details. A capacity of zero turns
/// tracking off.
///
/// The type parameter picks the locking strategy. [`Synchronized`] (the
/// default) shares one mutex across all operations and makes the tracker
/// `Sync`. [`Unsynchronized`](crate::Unsynchronized) skips locking and the
/// tracker stays on one thread.
///
/// Instances are independent; a process-wide tracker is just a `static` or an
/// `Arc` chosen by the caller.
///
/// [`record`]: RequestTracker::record
/// [`lookup`]: RequestTracker::lookup
pub struct RequestTracker<M: SyncMode = Synchronized> {
    ring: M::Cell<CallRing>,
}

impl<M: SyncMode> RequestTracker<M> {
    /// Create a tracker with `capacity` pre-allocated slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: M::wrap(CallRing::with_capacity(capacity)),
        }
    }

    /// Create a tracker from a validated configuration.
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.capacity)
    }

    /// Record an outbound call under `send_id`.
    ///
    /// Call right after issuing the request, once its send id is known.
    /// Arguments are rendered to text immediately. No-op while disabled, and
    /// for an empty `label`, which would read back as an unwritten slot.
    pub fn record(
        &self,
        send_id: u32,
        label: impl Into<Cow<'static, str>>,
        args: &[&dyn Display],
    ) {
        self.record_iter(send_id, label, args);
    }

    /// Like [`record`](Self::record) for any iterator of displayable values.
    pub fn record_iter<I>(&self, send_id: u32, label: impl Into<Cow<'static, str>>, args: I)
    where
        I: IntoIterator,
        I::Item: Display,
    {
        M::enter(&self.ring).record(send_id, label.into(), args);
    }

    /// Run `call`, then record it under the send id reported by `source`.
    ///
    /// The call's own result is returned untouched. If the send id cannot be
    /// read the call is simply left untracked.
    pub fn track<S, R>(
        &self,
        source: &S,
        label: impl Into<Cow<'static, str>>,
        args: &[&dyn Display],
        call: impl FnOnce() -> R,
    ) -> R
    where
        S: SendIdSource + ?Sized,
    {
        let outcome = call();
        let label = label.into();
        match source.last_send_id() {
            Ok(send_id) => self.record_iter(send_id, label, args),
            Err(err) => warn!(%err, %label, "could not read send id; call not tracked"),
        }
        outcome
    }

    /// Resolve `send_id` to the call that produced it.
    ///
    /// On a hit the stored record is annotated with `exception` and
    /// `arg_index`. On a miss, or while disabled, the view shows the shared
    /// placeholder carrying just the requested id and error details.
    ///
    /// The view holds the tracker's guard until dropped: format or copy it
    /// right away. With [`Synchronized`] other callers wait on it; with
    /// [`Unsynchronized`](crate::Unsynchronized) calling back into the tracker
    /// while it is alive panics.
    pub fn lookup(
        &self,
        send_id: u32,
        exception: ExceptionCode,
        arg_index: ArgIndex,
    ) -> RecordView<'_, M> {
        let mut guard = M::enter(&self.ring);
        let slot = guard.lookup(send_id, exception, arg_index);
        RecordView { guard, slot }
    }

    /// [`lookup`](Self::lookup) driven by a decoded notification.
    pub fn lookup_notice(&self, notice: &ExceptionNotice) -> RecordView<'_, M> {
        self.lookup(notice.send_id, notice.exception, notice.index)
    }

    /// Render the diagnostic for `notice` and release the tracker at once.
    pub fn describe(&self, notice: &ExceptionNotice) -> String {
        self.lookup_notice(notice).to_string()
    }

    /// Change the number of slots.
    ///
    /// Growing keeps every record. Shrinking silently drops every slot at or
    /// past the new capacity, which can include the newest records. Zero
    /// disables tracking.
    pub fn set_capacity(&self, capacity: usize) {
        M::enter(&self.ring).set_capacity(capacity);
    }

    /// Current number of slots.
    pub fn capacity(&self) -> usize {
        M::enter(&self.ring).capacity()
    }

    /// Returns `false` when the capacity is zero.
    pub fn is_enabled(&self) -> bool {
        self.capacity() > 0
    }

    /// Number of slots holding a recorded call.
    pub fn len(&self) -> usize {
        M::enter(&self.ring).len()
    }

    /// Returns `true` if no call is currently recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies of the live records, oldest first.
    pub fn records(&self) -> Vec<CallRecord> {
        M::enter(&self.ring).records()
    }

    /// Consume the tracker, returning the live records oldest first.
    pub fn into_records(self) -> Vec<CallRecord> {
        M::unwrap(self.ring).records()
    }
}

impl<M: SyncMode> Default for RequestTracker<M> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<M: SyncMode> fmt::Debug for RequestTracker<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ring = M::enter(&self.ring);
        f.debug_struct("RequestTracker")
            .field("capacity", &ring.capacity())
            .field("len", &ring.len())
            .field("cursor", &ring.cursor())
            .finish()
    }
}

/// Transient, read-only view of a looked-up record.
///
/// Borrows the tracker's guard, so it cannot outlive the tracker and blocks
/// (or, unsynchronized, forbids) other access while alive. Use
/// [`to_record`](Self::to_record) to keep a copy.
pub struct RecordView<'a, M: SyncMode = Synchronized> {
    guard: M::Guard<'a, CallRing>,
    slot: Slot,
}

impl<M: SyncMode> RecordView<'_, M> {
    /// Returns `true` if the lookup missed and this is the placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.slot == Slot::Placeholder
    }

    /// Owned copy of the record.
    pub fn to_record(&self) -> CallRecord {
        (**self).clone()
    }
}

impl<M: SyncMode> Deref for RecordView<'_, M> {
    type Target = CallRecord;

    fn deref(&self) -> &CallRecord {
        self.guard.get(self.slot)
    }
}

impl<M: SyncMode> Display for RecordView<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&**self, f)
    }
}

impl<M: SyncMode> fmt::Debug for RecordView<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordView")
            .field("slot", &self.slot)
            .field("record", &**self)
            .finish()
    }
}
