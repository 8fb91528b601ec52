//! A Yahoo! Messenger archive is a flat sequence of records with no file header:
//!
//! ```text
//! +-----------+----------+---------+-------------+-------------------+------------+
//! | timestamp | reserved | inbound | payload_len | payload           | terminator |
//! | i32 LE    | i32 LE   | i32 LE  | i32 LE      | payload_len bytes | i32 LE     |
//! +-----------+----------+---------+-------------+-------------------+------------+
//! ```
//!
//! The timestamp is in seconds since the epoch. A record with a zero length payload is a
//! separator and carries no message. Payloads are "encrypted" by XOR with the user id of the
//! archive owner, repeated for the length of the payload.
//!
//! The user id, the buddy and the display name of the owner are not stored in the file. The
//! client keeps them in the path instead:
//!
//! ```text
//! .../Profiles/<user id>/Archive/Messages/<buddy>/<YYYYMMDD>-<user nick>.dat
//! ```

/// Contains the structure of the records
pub mod model;

/// Contains code related to the deserialisation of archives
pub mod de;
/// Archives cannot be written, this holds the refusal
pub mod ser;

/// The repeating key cipher applied to payloads
pub mod crypto;
/// Identifiers derived from the location of an archive
pub mod path;

pub use de::{decode_file, decode_files, decode_reader};
pub use path::ArchivePath;
