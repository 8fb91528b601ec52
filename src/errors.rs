use err_derive::Error;

/// The main error of the command line tool
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when the config file fails to deserialize
    #[error(display = "Configuration parsing error: {}", _0)]
    Config(#[error(source)] toml::de::Error),
    /// Raised when `yakopi_core` fails to read or write a log
    #[error(display = "Conversion error: {}", _0)]
    Conversion(#[error(source)] yakopi_core::Error),
    /// Raised when there is an IO error such as unable to find
    /// config file
    #[error(display = "I/O error: {}", _0)]
    Io(#[error(source)] std::io::Error),
    /// Raised when the config file fails validation
    #[error(display = "Validation error: {}", _0)]
    Validation(#[error(source)] validator::ValidationErrors),
    /// Raised when the options given do not make sense together
    #[error(display = "{}", _0)]
    Usage(String),
}
