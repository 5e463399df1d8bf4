// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Send-id correlation cache for simulator client links.
//!
//! The simulator link is fire-and-forget: a call returns immediately with a
//! send id, and if it later fails an exception notification arrives carrying
//! only that id, an exception code and an argument index. `request-tracker`
//! remembers recent calls by send id so that a notification can be turned back
//! into a readable diagnostic:
//!
//! ```
//! use request_tracker::{ExceptionNotice, RequestTracker};
//!
//! let tracker: RequestTracker = RequestTracker::new(64);
//! tracker.record(7, "SimConnect_AddToDataDefinition", &[&1, &"PLANE ALTITUDE", &"feet"]);
//!
//! let notice = ExceptionNotice::from_raw(7, 7, 2);
//! assert_eq!(
//!     tracker.describe(&notice),
//!     "SimConnect_AddToDataDefinition(1,PLANE ALTITUDE,feet) send_id=7 exception=NAME_UNRECOGNIZED(7) arg=2",
//! );
//! ```
//!
//! # Retention Policy
//!
//! Storage is a fixed ring: once full, every new record overwrites the oldest
//! slot. There is no TTL and no access-based eviction. Shrinking the ring drops
//! slots past the new end without notice. This is a diagnostic aid; losing an
//! old record only degrades a message to "unknown call".
//!
//! # Failure Policy
//!
//! No tracker operation fails. Misses and a disabled tracker (capacity zero)
//! yield a placeholder that still carries the send id and exception.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::module_name_repetitions,
    clippy::use_self
)]

mod args;
mod config;
mod exception;
mod record;
mod ring;
mod sync;
mod tracker;

pub use args::{join_args, write_args, ArgIndex};
pub use config::{ConfigError, TrackerConfig, MAX_CAPACITY};
pub use exception::{exception_name, ExceptionCode, UNKNOWN_EXCEPTION_NAME};
pub use record::{CallRecord, UNKNOWN_CALL_LABEL};
pub use sync::{SyncMode, Synchronized, Unsynchronized};
pub use tracker::{ExceptionNotice, RecordView, RequestTracker, SendIdSource, DEFAULT_CAPACITY};
