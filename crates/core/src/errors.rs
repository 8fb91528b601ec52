use super::NomErrorType;
use err_derive::Error;

/// This is the primary error type of the library
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a required identifier is absent and cannot be derived from the path
    #[error(display = "Configuration error: {}", _0)]
    Config(String),

    /// Raised when an input is truncated, misses required fields or holds invalid values
    #[error(display = "Malformed input: {}", _0)]
    Malformed(String),

    /// Raised when asked to produce a Yahoo! Messenger archive
    #[error(display = "Writing Yahoo! Messenger archives is not supported")]
    Unsupported,

    /// An IO error such as a missing input file
    #[error(display = "I/O error")]
    Io(#[error(source)] std::io::Error),

    /// Raised by the XML reader on documents that are not well formed
    #[error(display = "XML error")]
    Xml(#[error(source)] xml::reader::Error),

    /// Raised when a date or time component is out of range
    #[error(display = "Timestamp out of range")]
    Time(#[error(source)] time::error::ComponentRange),

    /// Raised when a timestamp cannot be rendered
    #[error(display = "Timestamp formatting error")]
    TimeFormat(#[error(source)] time::error::Format),

    /// A Cookie Factory GenError raised by the writers
    #[error(display = "Serialization error")]
    Serialization(#[error(source)] cookie_factory::GenError),
}

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

impl<'a> From<nom::Err<NomErrorType<'a>>> for Error {
    fn from(k: nom::Err<NomErrorType<'a>>) -> Self {
        let reason = match k {
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                let contexts: Vec<&str> = e
                    .errors
                    .iter()
                    .filter_map(|(_, kind)| match kind {
                        nom::error::VerboseErrorKind::Context(ctx) => Some(*ctx),
                        _ => None,
                    })
                    .collect();
                if contexts.is_empty() {
                    format!("Nom Error: {:?}", e)
                } else {
                    contexts.join(": ")
                }
            }
            nom::Err::Incomplete(_) => "Record is incomplete".to_string(),
        };
        Error::Malformed(reason)
    }
}
