// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles for request-tracker.
#![forbid(unsafe_code)]
//!
//! - [`link`] - [`FakeLink`], an in-memory client link that hands out monotonically
//!   increasing send ids and lets tests queue exception notifications.

pub mod link;

// Re-export commonly used items at crate root for convenience
pub use link::{FakeLink, LinkError};
