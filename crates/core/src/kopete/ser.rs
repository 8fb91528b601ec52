use super::{DOCTYPE, HISTORY_VERSION, MYSELF, ROOT};
use crate::{Archive, Error, Message, Result};
use cookie_factory::combinator::string;
use cookie_factory::multi::all;
use cookie_factory::sequence::tuple;
use cookie_factory::{gen, SerializeFn, WriteContext};
use std::io::Write;
use time::Month;
use xml::escape::{escape_str_attribute, escape_str_pcdata};

/// Write `archive` as a Kopete history
pub fn serialize<W: Write>(archive: &Archive, buf: W) -> Result<W> {
    let (year, month) = period(archive)?;
    let (buf, _n) = gen(kopete_history(archive, year, month), buf)?;
    Ok(buf)
}

/// `<buddy>.<YYYYMM>.xml`, the name Kopete gives its monthly histories
pub fn file_name(archive: &Archive) -> Result<String> {
    let (year, month) = period(archive)?;
    Ok(format!(
        "{}.{}{:02}.xml",
        archive.buddy_nick,
        year,
        u8::from(month)
    ))
}

fn period(archive: &Archive) -> Result<(i32, Month)> {
    archive.period().ok_or_else(|| {
        Error::Malformed("An empty archive has no month to write a history for".to_string())
    })
}

fn kopete_history<'a, W: Write + 'a>(
    archive: &'a Archive,
    year: i32,
    month: Month,
) -> impl SerializeFn<W> + 'a {
    tuple((
        string(format!("<!DOCTYPE {}>\n", DOCTYPE)),
        string(format!("<{}", ROOT)),
        attribute("version", HISTORY_VERSION),
        string(" >\n"),
        kopete_head(archive, year, month),
        all(archive.messages.iter().map(move |msg| kopete_msg(archive, msg))),
        string(format!("</{}>\n", ROOT)),
    ))
}

fn kopete_head<'a, W: Write + 'a>(
    archive: &'a Archive,
    year: i32,
    month: Month,
) -> impl SerializeFn<W> + 'a {
    tuple((
        string(" <head>\n"),
        tuple((
            string("  <date"),
            attribute("month", u8::from(month).to_string()),
            attribute("year", year.to_string()),
            string(" />\n"),
        )),
        tuple((
            string("  <contact"),
            attribute("contactId", archive.user_id.as_str()),
            attribute("type", MYSELF),
            string(" />\n"),
        )),
        tuple((
            string("  <contact"),
            attribute("contactId", archive.buddy_nick.as_str()),
            string(" />\n"),
        )),
        string(" </head>\n"),
    ))
}

fn kopete_msg<'a, W: Write + 'a>(archive: &'a Archive, msg: &'a Message) -> impl SerializeFn<W> + 'a {
    let speaker = archive.speaker(msg);
    let ts = &msg.timestamp;
    tuple((
        string(" <msg"),
        attribute("nick", speaker),
        attribute("in", if msg.inbound { "1" } else { "0" }),
        attribute("from", speaker),
        attribute(
            "time",
            format!("{} {}:{}:{}", ts.day(), ts.hour(), ts.minute(), ts.second()),
        ),
        string(" >"),
        string(escape_str_pcdata(&msg.content)),
        string("</msg>\n"),
    ))
}

/// ` name="value"` with the value escaped
fn attribute<W: Write, V: AsRef<str>>(name: &'static str, value: V) -> impl SerializeFn<W> {
    move |out: WriteContext<W>| {
        tuple((
            string(" "),
            string(name),
            string("=\""),
            string(escape_str_attribute(value.as_ref())),
            string("\""),
        ))(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kopete::parse_reader;
    use assert_matches::assert_matches;
    use indoc::indoc;
    use time::macros::datetime;

    fn sample_archive() -> Archive {
        Archive {
            user_id: "alice".to_string(),
            buddy_nick: "bob".to_string(),
            messages: vec![
                Message::new(true, datetime!(2009-01-02 10:15:30), "hi"),
                Message::new(false, datetime!(2009-01-02 10:16:05), "hello \"bob\" <3"),
                Message::new(true, datetime!(2009-01-03 09:05:07), "tom & jerry"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_exact_layout() {
        let archive = Archive {
            messages: sample_archive().messages[..1].to_vec(),
            ..sample_archive()
        };
        let buf = serialize(&archive, vec![]).unwrap();

        let expected = indoc! {r#"
            <!DOCTYPE Kopete-History>
            <kopete-history version="0.9" >
             <head>
              <date month="1" year="2009" />
              <contact contactId="alice" type="myself" />
              <contact contactId="bob" />
             </head>
             <msg nick="bob" in="1" from="bob" time="2 10:15:30" >hi</msg>
            </kopete-history>
        "#};
        assert_eq!(String::from_utf8(buf).unwrap(), expected);
    }

    #[test]
    fn test_messages_stay_on_one_line() {
        let buf = serialize(&sample_archive(), vec![]).unwrap();
        let doc = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = doc.lines().collect();

        assert_eq!(lines.len(), 11);
        assert_eq!(
            lines[8],
            r#" <msg nick="alice" in="0" from="alice" time="2 10:16:5" >hello "bob" &lt;3</msg>"#
        );
        assert_eq!(
            lines[9],
            r#" <msg nick="bob" in="1" from="bob" time="3 9:5:7" >tom &amp; jerry</msg>"#
        );
    }

    #[test]
    fn test_roundtrip() {
        let archive = sample_archive();
        let buf = serialize(&archive, vec![]).unwrap();
        let parsed = parse_reader(buf.as_slice()).unwrap();

        assert_eq!(parsed.user_id, archive.user_id);
        assert_eq!(parsed.buddy_nick, archive.buddy_nick);
        assert_eq!(parsed.messages, archive.messages);
    }

    #[test]
    fn test_tracked_period_wins() {
        let mut archive = sample_archive();
        archive.period = Some((2008, Month::December));
        assert_eq!(file_name(&archive).unwrap(), "bob.200812.xml");

        let doc = String::from_utf8(serialize(&archive, vec![]).unwrap()).unwrap();
        assert!(doc.contains(r#"<date month="12" year="2008" />"#));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(&sample_archive()).unwrap(), "bob.200901.xml");
    }

    #[test]
    fn test_empty_archive() {
        let archive = Archive::new();
        assert_matches!(serialize(&archive, vec![]), Err(Error::Malformed(_)));
        assert_matches!(file_name(&archive), Err(Error::Malformed(_)));
    }
}
