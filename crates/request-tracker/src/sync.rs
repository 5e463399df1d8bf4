// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Synchronization strategies for the tracker.
//!
//! The tracker is generic over a [`SyncMode`] that decides how its storage is
//! guarded. [`Synchronized`] wraps the storage in a single mutex and is the
//! default. [`Unsynchronized`] uses a `RefCell`, which makes the tracker
//! `!Sync`: the compiler then rejects sharing it across threads, so callers
//! that opt out of locking cannot do so by accident.

use std::cell::{RefCell, RefMut};
use std::ops::DerefMut;
use std::sync::{Mutex, MutexGuard, PoisonError};

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Synchronized {}
    impl Sealed for super::Unsynchronized {}
}

/// How tracker storage is guarded.
///
/// Sealed; the two provided modes are the only implementations.
pub trait SyncMode: sealed::Sealed + 'static {
    /// Interior-mutable container holding the storage.
    type Cell<T>;
    /// Exclusive access to the contents of a [`Cell`](SyncMode::Cell).
    type Guard<'a, T: 'a>: DerefMut<Target = T>
    where
        Self: 'a;

    /// Wrap `value` for this mode.
    fn wrap<T>(value: T) -> Self::Cell<T>;

    /// Acquire exclusive access.
    fn enter<'a, T: 'a>(cell: &'a Self::Cell<T>) -> Self::Guard<'a, T>;

    /// Take the contents back out.
    fn unwrap<T>(cell: Self::Cell<T>) -> T;
}

/// One coarse mutex around all storage access.
///
/// Lookups annotate the matched slot, so reads and writes take the same lock.
/// A poisoned lock is entered anyway: every mutation leaves the ring in a
/// valid state, so a panic elsewhere never makes the data unusable.
#[derive(Clone, Copy, Debug, Default)]
pub struct Synchronized;

impl SyncMode for Synchronized {
    type Cell<T> = Mutex<T>;
    type Guard<'a, T: 'a> = MutexGuard<'a, T>
    where
        Self: 'a;

    fn wrap<T>(value: T) -> Mutex<T> {
        Mutex::new(value)
    }

    fn enter<'a, T: 'a>(cell: &'a Mutex<T>) -> MutexGuard<'a, T> {
        cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn unwrap<T>(cell: Mutex<T>) -> T {
        cell.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

/// No locking; the caller serializes access.
///
/// Holding a [`RecordView`](crate::RecordView) while calling back into the same
/// tracker panics, exactly as overlapping `RefCell` borrows do.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unsynchronized;

impl SyncMode for Unsynchronized {
    type Cell<T> = RefCell<T>;
    type Guard<'a, T: 'a> = RefMut<'a, T>
    where
        Self: 'a;

    fn wrap<T>(value: T) -> RefCell<T> {
        RefCell::new(value)
    }

    fn enter<'a, T: 'a>(cell: &'a RefCell<T>) -> RefMut<'a, T> {
        cell.borrow_mut()
    }

    fn unwrap<T>(cell: RefCell<T>) -> T {
        cell.into_inner()
    }
}
