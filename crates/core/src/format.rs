use crate::pidgin::Dialect;
use crate::{kopete, pidgin, yahoo};
use crate::{Archive, Clock, Error, Result};
use log::*;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

/// Settings shared by every reader
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Overrides the local user id found in the input
    ///
    /// For Yahoo! Messenger archives this is also the cipher key.
    pub user_id: Option<String>,
    /// Overrides the buddy found in the input
    pub buddy_nick: Option<String>,
    /// Turns the epoch seconds of Yahoo! Messenger archives into wall-clock time
    pub clock: Clock,
}

/// The formats that can be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Yahoo! Messenger `.dat` archives
    Yahoo,
    /// Kopete XML histories
    Kopete,
    /// Gaim text logs
    Gaim,
    /// Pidgin text logs
    Pidgin,
}

impl InputFormat {
    /// Read `paths` as a single conversation
    ///
    /// Ids given in `options` replace the ones found in the files.
    pub fn parse<P: AsRef<Path>>(self, paths: &[P], options: &ParseOptions) -> Result<Archive> {
        debug!("Reading {} {} file(s)", paths.len(), self);
        let mut archive = match self {
            // The ids are needed before decoding, they are the key
            InputFormat::Yahoo => return yahoo::decode_files(paths, options),
            InputFormat::Kopete => kopete::parse_files(paths)?,
            InputFormat::Gaim => pidgin::parse_files(paths, Dialect::Gaim)?,
            InputFormat::Pidgin => pidgin::parse_files(paths, Dialect::Pidgin)?,
        };
        apply_overrides(&mut archive, options);
        Ok(archive)
    }
}

fn apply_overrides(archive: &mut Archive, options: &ParseOptions) {
    if let Some(user_id) = &options.user_id {
        archive.user_id = user_id.clone();
    }
    if let Some(buddy_nick) = &options.buddy_nick {
        archive.buddy_nick = buddy_nick.clone();
    }
}

impl FromStr for InputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "yahoo" => Ok(InputFormat::Yahoo),
            "kopete" => Ok(InputFormat::Kopete),
            "gaim" => Ok(InputFormat::Gaim),
            "pidgin" => Ok(InputFormat::Pidgin),
            _ => Err(Error::Config(format!("Unknown input format {:?}", s))),
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            InputFormat::Yahoo => "yahoo",
            InputFormat::Kopete => "kopete",
            InputFormat::Gaim => "gaim",
            InputFormat::Pidgin => "pidgin",
        };
        write!(f, "{}", name)
    }
}

/// The formats that can be written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Kopete XML histories
    Kopete,
    /// Pidgin text logs
    Pidgin,
    /// Yahoo! Messenger archives, writing one always fails with [`Error::Unsupported`]
    Yahoo,
}

impl OutputFormat {
    /// Write `archive` into `buf`
    pub fn write<W: Write>(self, archive: &Archive, buf: W) -> Result<W> {
        match self {
            OutputFormat::Kopete => kopete::serialize(archive, buf),
            OutputFormat::Pidgin => pidgin::serialize(archive, buf),
            OutputFormat::Yahoo => yahoo::ser::serialize(archive, buf),
        }
    }

    /// The file name this format gives to `archive`
    pub fn file_name(self, archive: &Archive) -> Result<String> {
        match self {
            OutputFormat::Kopete => kopete::file_name(archive),
            OutputFormat::Pidgin => pidgin::file_name(archive),
            OutputFormat::Yahoo => Err(Error::Unsupported),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "kopete" => Ok(OutputFormat::Kopete),
            "pidgin" => Ok(OutputFormat::Pidgin),
            "yahoo" => Ok(OutputFormat::Yahoo),
            _ => Err(Error::Config(format!("Unknown output format {:?}", s))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            OutputFormat::Kopete => "kopete",
            OutputFormat::Pidgin => "pidgin",
            OutputFormat::Yahoo => "yahoo",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;
    use assert_matches::assert_matches;
    use time::macros::datetime;

    fn archive() -> Archive {
        Archive {
            user_id: "alice".to_string(),
            buddy_nick: "bob".to_string(),
            messages: vec![Message::new(true, datetime!(2009-01-02 10:15:30), "hi")],
            ..Default::default()
        }
    }

    #[test]
    fn test_names() {
        assert_eq!("yahoo".parse::<InputFormat>().unwrap(), InputFormat::Yahoo);
        assert_eq!("Pidgin".parse::<InputFormat>().unwrap(), InputFormat::Pidgin);
        assert_eq!("gaim".parse::<InputFormat>().unwrap(), InputFormat::Gaim);
        assert_matches!("msn".parse::<InputFormat>(), Err(Error::Config(_)));

        assert_eq!("KOPETE".parse::<OutputFormat>().unwrap(), OutputFormat::Kopete);
        assert_matches!("gaim".parse::<OutputFormat>(), Err(Error::Config(_)));

        for format in &[OutputFormat::Kopete, OutputFormat::Pidgin, OutputFormat::Yahoo] {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), *format);
        }
    }

    #[test]
    fn test_overrides() {
        let mut archive = archive();
        apply_overrides(&mut archive, &ParseOptions::default());
        assert_eq!(archive.user_id, "alice");
        assert_eq!(archive.buddy_nick, "bob");

        let options = ParseOptions {
            user_id: Some("carol".to_string()),
            buddy_nick: Some("dave".to_string()),
            clock: Clock::utc(),
        };
        apply_overrides(&mut archive, &options);
        assert_eq!(archive.user_id, "carol");
        assert_eq!(archive.buddy_nick, "dave");
    }

    #[test]
    fn test_write_dispatch() {
        let archive = archive();

        let xml = OutputFormat::Kopete.write(&archive, vec![]).unwrap();
        let xml = String::from_utf8(xml).unwrap();
        assert!(xml.starts_with("<!DOCTYPE Kopete-History>\n"));
        assert_eq!(OutputFormat::Kopete.file_name(&archive).unwrap(), "bob.200901.xml");

        let txt = OutputFormat::Pidgin.write(&archive, vec![]).unwrap();
        let txt = String::from_utf8(txt).unwrap();
        assert!(txt.starts_with("Conversation with bob at Friday"));
        assert_eq!(
            OutputFormat::Pidgin.file_name(&archive).unwrap(),
            "2009-01-02.101530.txt"
        );
    }

    #[test]
    fn test_yahoo_output_is_unsupported() {
        let archive = archive();
        let mut buf: Vec<u8> = Vec::new();
        assert_matches!(
            OutputFormat::Yahoo.write(&archive, &mut buf),
            Err(Error::Unsupported)
        );
        assert!(buf.is_empty());
        assert_matches!(OutputFormat::Yahoo.file_name(&archive), Err(Error::Unsupported));
    }

    #[test]
    fn test_missing_file() {
        let paths = ["/nonexistent/2009-01-02.101530.txt"];
        assert_matches!(
            InputFormat::Gaim.parse(&paths, &ParseOptions::default()),
            Err(Error::Io(_))
        );
    }
}
