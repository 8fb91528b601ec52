use crate::{Archive, Error, Result};
use std::io::Write;

/// Yahoo! Messenger archives are read only
///
/// Always fails with [`Error::Unsupported`] and never touches `buf`.
pub fn serialize<W: Write>(archive: &Archive, _buf: W) -> Result<W> {
    log::debug!(
        "Refusing to write {} messages as a Yahoo! Messenger archive",
        archive.messages.len()
    );
    Err(Error::Unsupported)
}
