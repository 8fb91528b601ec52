//! Kopete keeps one XML history per buddy and month:
//!
//! ```xml
//! <!DOCTYPE Kopete-History>
//! <kopete-history version="0.9" >
//!  <head>
//!   <date month="1" year="2009" />
//!   <contact contactId="alice" type="myself" />
//!   <contact contactId="bob" />
//!  </head>
//!  <msg nick="bob" in="1" from="bob" time="2 10:15:30" >hi</msg>
//! </kopete-history>
//! ```
//!
//! The year and month live in the head, each message only carries the day and time.
//! The writer reproduces the layout of the files Kopete itself writes, byte for byte.

/// Contains code related to reading histories
pub mod de;
/// Contains code related to writing histories
pub mod ser;

pub use de::{parse_file, parse_files, parse_reader};
pub use ser::{file_name, serialize};

pub(crate) const HISTORY_VERSION: &str = "0.9";
pub(crate) const DOCTYPE: &str = "Kopete-History";
pub(crate) const ROOT: &str = "kopete-history";
pub(crate) const MYSELF: &str = "myself";
