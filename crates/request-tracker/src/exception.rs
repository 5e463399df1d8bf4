// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Simulator exception codes and their symbolic names.
//!
//! The client link reports failures as a raw `u32` exception code. The table
//! below follows the simulator SDK numbering; values past the end of the table
//! are carried through untouched and render as `UNKNOWN`.

use std::fmt;

/// Name rendered for codes not present in the table.
pub const UNKNOWN_EXCEPTION_NAME: &str = "UNKNOWN";

/// Raw exception code delivered with an error notification.
///
/// Kept as a transparent newtype rather than a closed enum so that codes added
/// by newer simulator builds survive the round trip into diagnostics.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct ExceptionCode(pub u32);

macro_rules! exception_table {
    ($($(#[$doc:meta])* $name:ident = $value:literal,)+) => {
        impl ExceptionCode {
            $(
                $(#[$doc])*
                pub const $name: Self = Self($value);
            )+
        }

        /// Symbolic names indexed by code value.
        const EXCEPTION_NAMES: &[&str] = &[$(stringify!($name)),+];
    };
}

exception_table! {
    /// No exception.
    NONE = 0,
    /// Unspecified failure.
    ERROR = 1,
    /// Data size did not match the definition.
    SIZE_MISMATCH = 2,
    /// Id was not recognized.
    UNRECOGNIZED_ID = 3,
    /// Connection was not opened.
    UNOPENED = 4,
    /// Client/server version mismatch.
    VERSION_MISMATCH = 5,
    /// Notification group limit reached.
    TOO_MANY_GROUPS = 6,
    /// Name was not recognized.
    NAME_UNRECOGNIZED = 7,
    /// Event name limit reached.
    TOO_MANY_EVENT_NAMES = 8,
    /// Event id already in use.
    EVENT_ID_DUPLICATE = 9,
    /// Input map limit reached.
    TOO_MANY_MAPS = 10,
    /// Object limit reached.
    TOO_MANY_OBJECTS = 11,
    /// Request limit reached.
    TOO_MANY_REQUESTS = 12,
    /// Invalid weather port.
    WEATHER_INVALID_PORT = 13,
    /// Invalid METAR string.
    WEATHER_INVALID_METAR = 14,
    /// Weather observation unavailable.
    WEATHER_UNABLE_TO_GET_OBSERVATION = 15,
    /// Weather station could not be created.
    WEATHER_UNABLE_TO_CREATE_STATION = 16,
    /// Weather station could not be removed.
    WEATHER_UNABLE_TO_REMOVE_STATION = 17,
    /// Invalid data type.
    INVALID_DATA_TYPE = 18,
    /// Invalid data size.
    INVALID_DATA_SIZE = 19,
    /// Generic data error.
    DATA_ERROR = 20,
    /// Invalid array.
    INVALID_ARRAY = 21,
    /// Object creation failed.
    CREATE_OBJECT_FAILED = 22,
    /// Flight plan could not be loaded.
    LOAD_FLIGHTPLAN_FAILED = 23,
    /// Operation not valid for this object type.
    OPERATION_INVALID_FOR_OBJECT_TYPE = 24,
    /// Illegal operation.
    ILLEGAL_OPERATION = 25,
    /// Already subscribed.
    ALREADY_SUBSCRIBED = 26,
    /// Invalid enum value.
    INVALID_ENUM = 27,
    /// Data definition error.
    DEFINITION_ERROR = 28,
    /// Duplicate id.
    DUPLICATE_ID = 29,
    /// Unknown datum id.
    DATUM_ID = 30,
    /// Value out of bounds.
    OUT_OF_BOUNDS = 31,
    /// Already created.
    ALREADY_CREATED = 32,
    /// Object is outside the reality bubble.
    OBJECT_OUTSIDE_REALITY_BUBBLE = 33,
    /// Object container error.
    OBJECT_CONTAINER = 34,
    /// AI object error.
    OBJECT_AI = 35,
    /// ATC object error.
    OBJECT_ATC = 36,
    /// Object schedule error.
    OBJECT_SCHEDULE = 37,
    /// Jetway data error.
    JETWAY_DATA = 38,
    /// Action not found.
    ACTION_NOT_FOUND = 39,
    /// Not an action.
    NOT_AN_ACTION = 40,
    /// Incorrect action parameters.
    INCORRECT_ACTION_PARAMS = 41,
    /// Reading an input event failed.
    GET_INPUT_EVENT_FAILED = 42,
    /// Setting an input event failed.
    SET_INPUT_EVENT_FAILED = 43,
}

impl ExceptionCode {
    /// Raw wire value.
    pub fn as_raw(self) -> u32 {
        self.0
    }

    /// Symbolic name, or [`UNKNOWN_EXCEPTION_NAME`] for codes outside the table.
    pub fn name(self) -> &'static str {
        exception_name(self.0)
    }

    /// Returns `true` if the code has an entry in the name table.
    pub fn is_known(self) -> bool {
        usize::try_from(self.0).is_ok_and(|ix| ix < EXCEPTION_NAMES.len())
    }
}

impl From<u32> for ExceptionCode {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ExceptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.0)
    }
}

/// Resolve a raw exception code to its symbolic name.
///
/// Total: every input maps to some text, unknown codes to
/// [`UNKNOWN_EXCEPTION_NAME`].
pub fn exception_name(code: u32) -> &'static str {
    usize::try_from(code)
        .ok()
        .and_then(|ix| EXCEPTION_NAMES.get(ix))
        .copied()
        .unwrap_or(UNKNOWN_EXCEPTION_NAME)
}
