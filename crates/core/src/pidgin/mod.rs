//! Gaim and its successor Pidgin log a conversation as plain text, one file per session:
//!
//! ```text
//! Conversation with bob at 2009-01-02 10:15:30 on alice (yahoo)
//! (10:15:30) bob: hi
//! (10:15:41) alice: hello
//! ```
//!
//! The two programs differ in the date written in the header and in how message times are
//! shown, see [`Dialect`]. A message body that spans several lines is not reassembled, only
//! its first line is kept.

/// Contains code related to reading text logs
pub mod de;
/// Contains code related to writing text logs
pub mod ser;

pub use de::{parse_files, parse_reader};
pub use ser::{file_name, serialize};

/// The header and timestamp grammar of a text log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `Conversation with <buddy> at <YYYY-MM-DD> <HH:MM:SS> on <user> (yahoo)`
    ///
    /// Message times are on a 24 hour clock.
    Gaim,
    /// `Conversation with <buddy> at <Weekday>, <DD> <Month>, <YYYY> <hh:mm:ss> <AM|PM> <TZ> on <user> (yahoo)`
    ///
    /// Message times are on a 12 hour clock.
    Pidgin,
}

pub(crate) const HEADER_PREFIX: &str = "Conversation";
