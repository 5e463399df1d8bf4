// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Argument text capture and the exception argument index.

use std::fmt::{self, Display, Write as _};
use std::num::NonZeroU32;

/// Join arguments into comma-separated text with no surrounding spaces.
///
/// Each argument is rendered through its own [`Display`] impl. An empty input
/// yields an empty string.
pub fn join_args<I>(args: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut out = String::new();
    write_args(&mut out, args);
    out
}

/// Append joined arguments to `out` and return how many were written.
///
/// The count saturates at `u8::MAX`; the text itself is never truncated.
pub fn write_args<I>(out: &mut String, args: I) -> u8
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut count: usize = 0;
    let written = args.into_iter().try_for_each(|arg| {
        if count > 0 {
            out.push(',');
        }
        count += 1;
        write!(out, "{arg}")
    });
    debug_assert!(written.is_ok(), "fmt::Write for String is infallible");
    u8::try_from(count).unwrap_or(u8::MAX)
}

/// Which argument an exception notification implicates.
///
/// The wire carries this as a bare `u32` where `0` means "unknown" and
/// `u32::MAX` means "no particular argument". Those two sentinels are lifted
/// into their own variants so a real position is never confused with either.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum ArgIndex {
    /// The notification did not identify an argument.
    #[default]
    Unknown,
    /// One-based position of the offending argument.
    Position(NonZeroU32),
    /// The failure concerns the call as a whole.
    NotApplicable,
}

impl ArgIndex {
    /// Decode the wire value.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            u32::MAX => Self::NotApplicable,
            n => NonZeroU32::new(n).map_or(Self::Unknown, Self::Position),
        }
    }

    /// Encode back to the wire value.
    pub fn as_raw(self) -> u32 {
        match self {
            Self::Unknown => 0,
            Self::Position(n) => n.get(),
            Self::NotApplicable => u32::MAX,
        }
    }

    /// The position, if the index names a real argument.
    pub fn position(self) -> Option<u32> {
        match self {
            Self::Position(n) => Some(n.get()),
            Self::Unknown | Self::NotApplicable => None,
        }
    }
}

impl From<u32> for ArgIndex {
    fn from(raw: u32) -> Self {
        Self::from_raw(raw)
    }
}

impl Display for ArgIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown"),
            Self::Position(n) => write!(f, "{n}"),
            Self::NotApplicable => f.write_str("n/a"),
        }
    }
}
