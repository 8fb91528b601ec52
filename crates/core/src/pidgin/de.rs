use super::Dialect;
use crate::{Archive, Error, Message, Result};
use lazy_static::lazy_static;
use log::*;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime, Time};

lazy_static! {
    static ref RE_CLOCK: Regex = Regex::new(r"^\((\d{1,2}):(\d{1,2}):(\d{1,2})(\))?$").unwrap();
    static ref RE_GAIM_HEADER: Regex =
        Regex::new(r"^Conversation with \S+ at \d{4}-\d{1,2}-\d{1,2}(\s|$)").unwrap();
    static ref RE_PIDGIN_HEADER: Regex =
        Regex::new(r"^Conversation with \S+ at \S+, \d{1,2} \S+, \d{4}(\s|$)").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

impl FromStr for Meridiem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "AM" => Ok(Meridiem::Am),
            "PM" => Ok(Meridiem::Pm),
            _ => Err(Error::Malformed(format!("{:?} is neither AM nor PM", s))),
        }
    }
}

impl Meridiem {
    fn to_24h(self, hour: u8) -> u8 {
        match self {
            Meridiem::Am if hour == 12 => 0,
            Meridiem::Pm if hour < 12 => hour + 12,
            _ => hour,
        }
    }
}

/// The first line of a log
#[derive(Debug, PartialEq, Eq)]
struct Header {
    user_id: String,
    buddy_nick: String,
    date: Date,
    meridiem: Option<Meridiem>,
}

impl Header {
    /// A message body may start with "Conversation" too, only the date tells a header apart
    fn is_header(line: &str, dialect: Dialect) -> bool {
        match dialect {
            Dialect::Gaim => RE_GAIM_HEADER.is_match(line),
            Dialect::Pidgin => RE_PIDGIN_HEADER.is_match(line),
        }
    }

    fn parse(line: &str, dialect: Dialect) -> Result<Header> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let buddy_nick = token(&tokens, 3)?.to_string();

        match dialect {
            Dialect::Gaim => {
                let format = format_description!("[year]-[month]-[day]");
                let date_text = token(&tokens, 5)?;
                let date = Date::parse(date_text, &format).map_err(|e| {
                    Error::Malformed(format!("Header date {:?}: {}", date_text, e))
                })?;
                Ok(Header {
                    user_id: token(&tokens, 8)?.to_string(),
                    buddy_nick,
                    date,
                    meridiem: None,
                })
            }
            Dialect::Pidgin => {
                let format = format_description!("[day] [month repr:long], [year]");
                let date_text = format!(
                    "{} {} {}",
                    token(&tokens, 6)?,
                    token(&tokens, 7)?,
                    token(&tokens, 8)?
                );
                let date = Date::parse(&date_text, &format).map_err(|e| {
                    Error::Malformed(format!("Header date {:?}: {}", date_text, e))
                })?;
                let meridiem = token(&tokens, 10)?.parse()?;

                // A timezone may or may not sit between the time and "on"
                let user_id = tokens
                    .iter()
                    .skip(10)
                    .position(|t| *t == "on")
                    .and_then(|i| tokens.get(10 + i + 1))
                    .ok_or_else(|| Error::Malformed("The header names no user".to_string()))?;

                Ok(Header {
                    user_id: user_id.to_string(),
                    buddy_nick,
                    date,
                    meridiem: Some(meridiem),
                })
            }
        }
    }
}

/// Header tokens are counted from 1
fn token<'a>(tokens: &[&'a str], position: usize) -> Result<&'a str> {
    tokens
        .get(position - 1)
        .copied()
        .ok_or_else(|| Error::Malformed(format!("The header has no token {}", position)))
}

/// A line that looks like a message, before it is tied to a header
#[derive(Debug, PartialEq, Eq)]
struct MessageLine<'a> {
    hour: u8,
    minute: u8,
    second: u8,
    zone: Option<&'a str>,
    sender: &'a str,
    content: &'a str,
}

impl<'a> MessageLine<'a> {
    fn parse(line: &'a str, dialect: Dialect) -> Option<MessageLine<'a>> {
        let (clock, rest) = line.split_once(' ')?;
        let caps = RE_CLOCK.captures(clock)?;
        if dialect == Dialect::Gaim && caps.get(4).is_none() {
            return None;
        }
        let hour = caps[1].parse().ok()?;
        let minute = caps[2].parse().ok()?;
        let second = caps[3].parse().ok()?;

        let (zone, rest) = match dialect {
            Dialect::Gaim => (None, rest),
            Dialect::Pidgin => match rest.split_once(' ') {
                Some((zone, after)) if !zone.ends_with(':') => (Some(zone), after),
                _ => (None, rest),
            },
        };

        let (sender, content) = rest.split_once(' ').unwrap_or((rest, ""));
        if !sender.ends_with(':') {
            return None;
        }

        Some(MessageLine {
            hour,
            minute,
            second,
            zone,
            sender,
            content,
        })
    }

    /// Lines carrying a zone are on a 12 hour clock, the others on a 24 hour one
    fn timestamp(&self, header: &Header) -> Result<PrimitiveDateTime> {
        let hour = match self.zone {
            Some(zone) => zone
                .trim_end_matches(')')
                .parse::<Meridiem>()
                .ok()
                .or(header.meridiem)
                .map_or(self.hour, |meridiem| meridiem.to_24h(self.hour)),
            None => self.hour,
        };
        let time = Time::from_hms(hour, self.minute, self.second)?;
        Ok(PrimitiveDateTime::new(header.date, time))
    }
}

/// Append the messages of one log to `archive`
///
/// The header sets the identifiers of the archive, so a log of a group overrides the ones
/// before it. Lines that are not messages are dropped.
pub fn parse_reader<R: BufRead>(reader: R, dialect: Dialect, archive: &mut Archive) -> Result<()> {
    let mut header: Option<Header> = None;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end();

        if Header::is_header(line, dialect) {
            let parsed = Header::parse(line, dialect)?;
            debug!(
                "Conversation of {} with {} on {}",
                parsed.user_id, parsed.buddy_nick, parsed.date
            );
            archive.user_id = parsed.user_id.clone();
            archive.buddy_nick = parsed.buddy_nick.clone();
            archive.track_period(&PrimitiveDateTime::new(parsed.date, Time::MIDNIGHT));
            header = Some(parsed);
            continue;
        }

        let msg = match line.starts_with('(') {
            true => MessageLine::parse(line, dialect),
            false => None,
        };
        let msg = match msg {
            Some(msg) => msg,
            None => {
                trace!("Discarding {:?}", line);
                continue;
            }
        };

        let header = header.as_ref().ok_or_else(|| {
            Error::Config("A message comes before the Conversation header".to_string())
        })?;
        archive.messages.push(Message::new(
            msg.sender.starts_with(header.buddy_nick.as_str()),
            msg.timestamp(header)?,
            msg.content,
        ));
    }
    Ok(())
}

/// Read the logs of one conversation group into a single [`Archive`]
pub fn parse_files<P: AsRef<Path>>(paths: &[P], dialect: Dialect) -> Result<Archive> {
    let mut archive = Archive::new();
    for path in paths {
        let path = path.as_ref();
        info!("Reading {}", path.display());
        parse_reader(BufReader::new(File::open(path)?), dialect, &mut archive)?;
    }
    Ok(archive)
}
