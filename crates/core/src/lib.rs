#![warn(missing_docs)]
//! # YaKoPi-Core
//!
//! YaKoPi-Core converts instant messenger conversation logs between Yahoo! Messenger
//! archives, Kopete XML histories and Gaim/Pidgin text logs.
//!
//! Every reader produces the same [`model::Archive`] and every writer consumes it, so any
//! input format can be converted to any supported output format. The format is always chosen
//! by the caller, it is never guessed from the content.
//!
//! ```no_run
//! use yakopi_core::{InputFormat, OutputFormat, ParseOptions};
//!
//! let files = ["Profiles/alice/Archive/Messages/bob/20090102-alice.dat"];
//! let archive = InputFormat::Yahoo.parse(&files, &ParseOptions::default())?;
//! let history = OutputFormat::Kopete.write(&archive, Vec::new())?;
//! # Ok::<(), yakopi_core::Error>(())
//! ```
//!
//! Yahoo! Messenger archives can only be read. Asking for one as output fails with
//! [`Error::Unsupported`].

/// Local wall-clock conversion of archive timestamps
pub mod clock;
/// Dispatch between the supported formats
pub mod format;
/// Kopete XML histories
pub mod kopete;
/// The canonical conversation model shared by every format
pub mod model;
/// Gaim and Pidgin text logs
pub mod pidgin;
/// Yahoo! Messenger binary archives
pub mod yahoo;

mod errors;

pub use clock::Clock;
pub use errors::{Error, Result};
pub use format::{InputFormat, OutputFormat, ParseOptions};
pub use model::{Archive, Message};

pub(crate) type NomErrorType<'a> = nom::error::VerboseError<&'a [u8]>;
