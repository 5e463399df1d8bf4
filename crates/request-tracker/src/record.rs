// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Stored description of one outbound call.

use std::borrow::Cow;
use std::fmt::{self, Display};

use crate::args::{write_args, ArgIndex};
use crate::exception::ExceptionCode;

/// Label rendered when a record carries no call description.
pub const UNKNOWN_CALL_LABEL: &str = "unknown call";

/// Metadata about a single call made over the client link.
///
/// A record with an empty label and no arguments is *empty*: either a slot
/// that was never written or the placeholder returned by a lookup miss. Real
/// calls always carry a non-empty label.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CallRecord {
    pub(crate) label: Cow<'static, str>,
    pub(crate) args: String,
    pub(crate) send_id: u32,
    pub(crate) exception: Option<ExceptionCode>,
    pub(crate) arg_index: ArgIndex,
    pub(crate) arg_count: u8,
    /// Write order within the owning ring; `0` for records never stored there.
    pub(crate) seq: u64,
}

impl CallRecord {
    /// Build a standalone record, rendering `args` eagerly.
    pub fn new<I>(send_id: u32, label: impl Into<Cow<'static, str>>, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let mut record = Self::default();
        record.overwrite(0, send_id, label.into(), args);
        record
    }

    /// Reuse this record for a new call, keeping the argument buffer.
    pub(crate) fn overwrite<I>(
        &mut self,
        seq: u64,
        send_id: u32,
        label: Cow<'static, str>,
        args: I,
    ) where
        I: IntoIterator,
        I::Item: Display,
    {
        self.seq = seq;
        self.label = label;
        self.args.clear();
        self.arg_count = write_args(&mut self.args, args);
        self.send_id = send_id;
        self.exception = None;
        self.arg_index = ArgIndex::Unknown;
    }

    /// Turn this record into the miss placeholder for `send_id`.
    pub(crate) fn make_placeholder(
        &mut self,
        send_id: u32,
        exception: ExceptionCode,
        arg_index: ArgIndex,
    ) {
        self.label = Cow::Borrowed("");
        self.args.clear();
        self.arg_count = 0;
        self.seq = 0;
        self.send_id = send_id;
        self.annotate(exception, arg_index);
    }

    pub(crate) fn annotate(&mut self, exception: ExceptionCode, arg_index: ArgIndex) {
        self.exception = Some(exception);
        self.arg_index = arg_index;
    }

    /// Name or signature of the operation that was invoked.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Comma-joined argument text.
    pub fn args(&self) -> &str {
        &self.args
    }

    /// Number of arguments captured.
    pub fn arg_count(&self) -> u8 {
        self.arg_count
    }

    /// Send id assigned by the client link; `0` when unset.
    pub fn send_id(&self) -> u32 {
        self.send_id
    }

    /// Exception attached by the most recent matching lookup, if any.
    pub fn exception(&self) -> Option<ExceptionCode> {
        self.exception
    }

    /// Argument implicated by the attached exception.
    pub fn arg_index(&self) -> ArgIndex {
        self.arg_index
    }

    /// Returns `true` for never-written slots and miss placeholders.
    pub fn is_empty(&self) -> bool {
        self.label.is_empty() && self.arg_count == 0
    }
}

impl Display for CallRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str(UNKNOWN_CALL_LABEL)?;
        } else if self.label.is_empty() {
            write!(f, "{UNKNOWN_CALL_LABEL}({})", self.args)?;
        } else {
            write!(f, "{}({})", self.label, self.args)?;
        }
        write!(f, " send_id={}", self.send_id)?;
        if let Some(exception) = self.exception {
            write!(f, " exception={exception}")?;
        }
        if let Some(position) = self.arg_index.position() {
            write!(f, " arg={position}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_not_empty() {
        let rec = CallRecord::new(42, "SimConnect_MapClientEventToSimEvent", [7, 11]);
        assert!(!rec.is_empty());
        assert_eq!(rec.args(), "7,11");
        assert_eq!(rec.arg_count(), 2);
        assert_eq!(rec.exception(), None);
        assert_eq!(rec.arg_index(), ArgIndex::Unknown);
    }

    #[test]
    fn default_record_is_empty() {
        assert!(CallRecord::default().is_empty());
    }

    #[test]
    fn overwrite_clears_annotations() {
        let mut rec = CallRecord::new(1, "First", ["a"]);
        rec.annotate(ExceptionCode::ERROR, ArgIndex::from_raw(1));
        rec.overwrite(9, 2, Cow::Borrowed("Second"), Vec::<u8>::new());
        assert_eq!(rec.label(), "Second");
        assert_eq!(rec.args(), "");
        assert_eq!(rec.arg_count(), 0);
        assert_eq!(rec.send_id(), 2);
        assert_eq!(rec.exception(), None);
        assert_eq!(rec.arg_index(), ArgIndex::Unknown);
    }

    #[test]
    fn renders_full_diagnostic() {
        let mut rec = CallRecord::new(42, "Foo", [1, 2, 3]);
        rec.annotate(ExceptionCode::UNRECOGNIZED_ID, ArgIndex::from_raw(2));
        assert_eq!(
            rec.to_string(),
            "Foo(1,2,3) send_id=42 exception=UNRECOGNIZED_ID(3) arg=2"
        );
    }

    #[test]
    fn renders_placeholder_and_hides_sentinel_index() {
        let mut rec = CallRecord::default();
        rec.make_placeholder(999, ExceptionCode::ERROR, ArgIndex::NotApplicable);
        assert_eq!(rec.to_string(), "unknown call send_id=999 exception=ERROR(1)");
        rec.make_placeholder(5, ExceptionCode(500), ArgIndex::Unknown);
        assert_eq!(rec.to_string(), "unknown call send_id=5 exception=UNKNOWN(500)");
    }

    #[test]
    fn unlabelled_record_keeps_its_arguments() {
        let rec = CallRecord::new(8, "", [4, 5]);
        assert!(!rec.is_empty());
        assert_eq!(rec.to_string(), "unknown call(4,5) send_id=8");
    }

    #[test]
    fn unannotated_record_renders_without_exception() {
        let rec = CallRecord::new(3, "SimConnect_RequestDataOnSimObject", Vec::<u8>::new());
        assert_eq!(rec.to_string(), "SimConnect_RequestDataOnSimObject() send_id=3");
    }
}
