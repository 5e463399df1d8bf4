// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory client link fake.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use request_tracker::{ExceptionNotice, SendIdSource};
use thiserror::Error;

/// Errors reported by [`FakeLink`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// The link was closed with [`FakeLink::close`].
    #[error("link closed")]
    Closed,
    /// No call has been sent yet, so there is no last send id.
    #[error("no call sent yet")]
    NothingSent,
}

/// In-memory stand-in for a simulator client link.
///
/// Each [`send`](Self::send) is assigned the next send id, starting at 1.
/// Clones share state, so a fake can be handed to several threads.
///
/// # Example
///
/// ```
/// use request_tracker::{RequestTracker, SendIdSource};
/// use request_tracker_dry_tests::FakeLink;
///
/// let link = FakeLink::new();
/// let tracker: RequestTracker = RequestTracker::new(8);
/// let sent = tracker.track(&link, "SimConnect_RequestSystemState", &[&"Sim"], || link.send());
/// assert_eq!(sent, Ok(1));
/// assert_eq!(link.last_send_id(), Ok(1));
/// assert_eq!(tracker.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct FakeLink {
    inner: Arc<Mutex<FakeLinkInner>>,
}

#[derive(Default)]
struct FakeLinkInner {
    last_send_id: u32,
    closed: bool,
    pending: VecDeque<ExceptionNotice>,
}

impl FakeLink {
    /// Create an open link with no calls sent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a call and return its send id.
    pub fn send(&self) -> Result<u32, LinkError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.closed {
            return Err(LinkError::Closed);
        }
        inner.last_send_id = inner.last_send_id.wrapping_add(1).max(1);
        Ok(inner.last_send_id)
    }

    /// Close the link; later sends and id reads fail.
    pub fn close(&self) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).closed = true;
    }

    /// Queue an exception notification for `send_id`.
    pub fn raise(&self, send_id: u32, exception: u32, index: u32) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pending
            .push_back(ExceptionNotice::from_raw(send_id, exception, index));
    }

    /// Take every queued notification, oldest first.
    pub fn drain_exceptions(&self) -> Vec<ExceptionNotice> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pending
            .drain(..)
            .collect()
    }
}

impl SendIdSource for FakeLink {
    type Error = LinkError;

    fn last_send_id(&self) -> Result<u32, LinkError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.closed {
            return Err(LinkError::Closed);
        }
        match inner.last_send_id {
            0 => Err(LinkError::NothingSent),
            id => Ok(id),
        }
    }
}
