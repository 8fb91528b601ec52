use super::HEADER_PREFIX;
use crate::{Archive, Error, Message, Result};
use cookie_factory::combinator::string;
use cookie_factory::multi::all;
use cookie_factory::sequence::tuple;
use cookie_factory::{gen, SerializeFn};
use std::io::Write;
use time::macros::format_description;

/// Write `archive` as a Pidgin log
///
/// The header takes the date of the first message. Message times are written on a 24 hour
/// clock without a zone, and the last line has no newline.
pub fn serialize<W: Write>(archive: &Archive, buf: W) -> Result<W> {
    let header = header(archive)?;
    let (buf, _n) = gen(
        tuple((
            string(header),
            all(archive.messages.iter().map(move |msg| message_line(archive, msg))),
        )),
        buf,
    )?;
    Ok(buf)
}

/// `<YYYY>-<MM>-<DD>.<HHMMSS>.txt`, after the first message
pub fn file_name(archive: &Archive) -> Result<String> {
    let first = first_message(archive)?;
    let format = format_description!("[year]-[month]-[day].[hour][minute][second].txt");
    Ok(first.timestamp.format(&format)?)
}

fn header(archive: &Archive) -> Result<String> {
    let first = first_message(archive)?;
    let format = format_description!(
        "[weekday], [day] [month repr:long], [year] [hour repr:12]:[minute]:[second] [period]"
    );
    Ok(format!(
        "{} with {} at {} on {} (yahoo)",
        HEADER_PREFIX,
        archive.buddy_nick,
        first.timestamp.format(&format)?,
        archive.user_id
    ))
}

fn first_message(archive: &Archive) -> Result<&Message> {
    archive.messages.first().ok_or_else(|| {
        Error::Malformed("An empty archive has no conversation to write".to_string())
    })
}

fn message_line<'a, W: Write + 'a>(
    archive: &'a Archive,
    msg: &'a Message,
) -> impl SerializeFn<W> + 'a {
    let ts = &msg.timestamp;
    string(format!(
        "\n({:02}:{:02}:{:02}) {}: {}",
        ts.hour(),
        ts.minute(),
        ts.second(),
        archive.speaker(msg),
        msg.content
    ))
}
