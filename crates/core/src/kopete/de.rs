use super::{MYSELF, ROOT};
use crate::{Archive, Error, Message, Result};
use log::*;
use std::convert::TryFrom;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use time::{Date, Month, PrimitiveDateTime, Time};
use xml::attribute::OwnedAttribute;
use xml::reader::{ParserConfig, XmlEvent};

/// A `<msg>` element whose timestamp is resolved once the head has been read
struct PendingMsg {
    inbound: bool,
    time: String,
    text: Option<String>,
}

/// Read one Kopete history document
///
/// Messages without any text (buzzes and similar notifications) are dropped.
pub fn parse_reader<R: Read>(reader: R) -> Result<Archive> {
    let parser = ParserConfig::new()
        .whitespace_to_characters(true)
        .cdata_to_characters(true)
        .create_reader(reader);

    let mut root_seen = false;
    let mut period: Option<(i32, Month)> = None;
    let mut myself: Option<String> = None;
    let mut buddy: Option<String> = None;
    let mut current: Option<PendingMsg> = None;
    let mut pending: Vec<PendingMsg> = Vec::new();

    for event in parser {
        match event? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => match name.local_name.as_str() {
                ROOT => root_seen = true,
                "date" => {
                    if period.is_some() {
                        return Err(malformed("The head holds more than one <date>"));
                    }
                    let month: u8 = number(attribute(&attributes, "date", "month")?, "month")?;
                    let year: i32 = number(attribute(&attributes, "date", "year")?, "year")?;
                    period = Some((year, Month::try_from(month)?));
                }
                "contact" => {
                    let id = attribute(&attributes, "contact", "contactId")?.to_string();
                    let slot = if find_attribute(&attributes, "type") == Some(MYSELF) {
                        &mut myself
                    } else {
                        &mut buddy
                    };
                    if slot.replace(id).is_some() {
                        return Err(malformed("The head holds more than two contacts"));
                    }
                }
                "msg" => {
                    current = Some(PendingMsg {
                        inbound: attribute(&attributes, "msg", "in")? == "1",
                        time: attribute(&attributes, "msg", "time")?.to_string(),
                        text: None,
                    });
                }
                other => trace!("Ignoring <{}>", other),
            },
            XmlEvent::Characters(text) => {
                if let Some(msg) = current.as_mut() {
                    msg.text.get_or_insert_with(String::new).push_str(&text);
                }
            }
            XmlEvent::EndElement { name } if name.local_name == "msg" => {
                if let Some(msg) = current.take() {
                    pending.push(msg);
                }
            }
            _ => {}
        }
    }

    if !root_seen {
        return Err(malformed("Not a Kopete history, <kopete-history> is missing"));
    }
    let (year, month) = period.ok_or_else(|| malformed("The head has no <date>"))?;
    let user_id = myself.ok_or_else(|| malformed("The head has no contact of type myself"))?;
    let buddy_nick = buddy.ok_or_else(|| malformed("The head has no buddy contact"))?;

    let mut archive = Archive {
        user_id,
        buddy_nick,
        period: Some((year, month)),
        ..Default::default()
    };
    for msg in pending {
        match msg.text {
            Some(text) => {
                let timestamp = msg_timestamp(year, month, &msg.time)?;
                archive
                    .messages
                    .push(Message::new(msg.inbound, timestamp, text));
            }
            None => debug!("Skipping message without text at {}", msg.time),
        }
    }
    Ok(archive)
}

/// Read one Kopete history file
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Archive> {
    let path = path.as_ref();
    info!("Reading {}", path.display());
    parse_reader(BufReader::new(File::open(path)?))
}

/// Read several histories of the same conversation into one [`Archive`]
///
/// The period of the first file is kept, the contacts of the last one win.
pub fn parse_files<P: AsRef<Path>>(paths: &[P]) -> Result<Archive> {
    let mut archive = Archive::new();
    for path in paths {
        let mut next = parse_file(path)?;
        archive.period = archive.period.or(next.period);
        archive.messages.append(&mut next.messages);
        archive.user_id = next.user_id;
        archive.buddy_nick = next.buddy_nick;
    }
    Ok(archive)
}

/// `time="<day> <hour>:<minute>:<second>"`, numbers are not padded
fn msg_timestamp(year: i32, month: Month, time: &str) -> Result<PrimitiveDateTime> {
    let mut fields = time.split_whitespace();
    let (day, clock) = match (fields.next(), fields.next(), fields.next()) {
        (Some(day), Some(clock), None) => (day, clock),
        _ => return Err(malformed(&format!("Message time {:?} is not <day> <time>", time))),
    };
    let hms: Vec<&str> = clock.split(':').collect();
    if hms.len() != 3 {
        return Err(malformed(&format!("Message time {:?} is not H:M:S", time)));
    }

    let date = Date::from_calendar_date(year, month, number(day, "day")?)?;
    let time = Time::from_hms(
        number(hms[0], "hour")?,
        number(hms[1], "minute")?,
        number(hms[2], "second")?,
    )?;
    Ok(PrimitiveDateTime::new(date, time))
}

fn find_attribute<'a>(attributes: &'a [OwnedAttribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|attr| attr.name.local_name == name)
        .map(|attr| attr.value.as_str())
}

fn attribute<'a>(attributes: &'a [OwnedAttribute], element: &str, name: &str) -> Result<&'a str> {
    find_attribute(attributes, name)
        .ok_or_else(|| malformed(&format!("<{}> has no {} attribute", element, name)))
}

fn number<T: FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| malformed(&format!("{:?} is not a valid {}", value, what)))
}

fn malformed(why: &str) -> Error {
    Error::Malformed(why.to_string())
}
