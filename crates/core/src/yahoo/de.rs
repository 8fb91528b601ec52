use super::crypto;
use super::model::*;
use super::path::ArchivePath;
use crate::{Archive, Clock, Error, Message, ParseOptions, Result};
use log::{debug, info, trace};
use nom::{
    bytes::streaming::take, combinator::*, error::context as error_context,
    number::streaming::le_i32,
};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

type IResult<I, O, E = nom::error::VerboseError<I>> = std::result::Result<(I, O), nom::Err<E>>;

/// Pull bytes from `rdr` until `parser` succeeds
///
/// Returns `Ok(None)` when the reader is exhausted before the first byte. Running dry after
/// that means the record was cut short.
fn read_from_reader<P, O, R>(mut parser: P, mut rdr: R) -> Result<Option<O>>
where
    R: Read,
    P: FnMut(&[u8]) -> IResult<&[u8], O>,
{
    let mut input: Vec<u8> = Vec::new();
    loop {
        let to_read = match parser(&input) {
            Ok((_, parsed)) => return Ok(Some(parsed)),
            Err(nom::Err::Incomplete(needed)) => {
                match needed {
                    nom::Needed::Unknown => 1, // read one byte
                    nom::Needed::Size(len) => len.get(),
                }
            }
            Err(e) => return Err(e.into()),
        };

        let read = (&mut rdr)
            .take(to_read as u64)
            .read_to_end(&mut input)?;
        if read == 0 {
            if input.is_empty() {
                return Ok(None);
            }
            return Err(Error::Malformed(format!(
                "Archive ends {} bytes into a record{}",
                input.len(),
                if input.len() < HEADER_SIZE {
                    ", inside the record header"
                } else {
                    ""
                }
            )));
        }
    }
}

impl Record {
    /// Read the next record, `None` at a clean end of the archive
    pub fn deserialize<R: Read>(r: R) -> Result<Option<Record>> {
        read_from_reader(record, r)
    }
}

fn record(buf: &[u8]) -> IResult<&[u8], Record> {
    let (buf, header) = record_header(buf)?;
    if header.is_separator() {
        let (buf, _terminator) = error_context("Separator terminator missing", le_i32)(buf)?;
        return Ok((buf, Record::Separator(header)));
    }

    let (buf, payload) = error_context(
        "Payload missing",
        map(take(header.payload_len as usize), |x: &[u8]| x.to_vec()),
    )(buf)?;
    let (buf, _terminator) = error_context("Terminator missing", le_i32)(buf)?;

    Ok((buf, Record::Message { header, payload }))
}

fn record_header(buf: &[u8]) -> IResult<&[u8], RecordHeader> {
    let (buf, timestamp) = error_context("Timestamp missing", le_i32)(buf)?;
    let (buf, reserved) = error_context("Reserved field missing", le_i32)(buf)?;
    let (buf, inbound) = error_context("Direction missing", le_i32)(buf)?;
    let (buf, payload_len) = error_context(
        "Payload length is negative",
        verify(le_i32, |len: &i32| *len >= 0),
    )(buf)?;

    Ok((
        buf,
        RecordHeader {
            timestamp,
            reserved,
            inbound,
            payload_len,
        },
    ))
}

/// Append every message of one archive stream to `archive`
///
/// `key` is the user id the payloads were ciphered with.
pub fn decode_reader<R: Read>(
    mut reader: R,
    key: &str,
    clock: Clock,
    archive: &mut Archive,
) -> Result<()> {
    if key.is_empty() {
        return Err(Error::Config(
            "The user id is empty and cannot be used as a key".to_string(),
        ));
    }

    while let Some(record) = Record::deserialize(&mut reader)? {
        match record {
            Record::Separator(header) => {
                debug!("Skipping separator at {}", header.timestamp);
            }
            Record::Message { header, payload } => {
                trace!("Record: {:?} with {} bytes", header, payload.len());
                let timestamp = clock.wall_clock(header.timestamp as i64)?;
                archive.track_period(&timestamp);

                let content = crypto::decode_payload(key.as_bytes(), &payload);
                let dropped = payload.len() - content.chars().count();
                if dropped > 0 {
                    debug!("Dropped {} undecodable bytes at {}", dropped, timestamp);
                }
                archive
                    .messages
                    .push(Message::new(header.is_inbound(), timestamp, content));
            }
        }
    }
    Ok(())
}

/// Decode a single archive file
pub fn decode_file<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Archive> {
    decode_files(&[path], options)
}

/// Decode several archive files of one conversation into a single [`Archive`]
///
/// Files are read in the given order. Identifiers come from `options` when set, otherwise
/// from each path; the last file decides the identifiers of the archive.
pub fn decode_files<P: AsRef<Path>>(paths: &[P], options: &ParseOptions) -> Result<Archive> {
    let mut archive = Archive::new();
    for path in paths {
        let path = path.as_ref();
        let ids = ArchivePath::resolve(
            path,
            options.user_id.as_deref(),
            options.buddy_nick.as_deref(),
        )?;
        info!(
            "Decoding {} ({} with {})",
            path.display(),
            ids.user_id,
            ids.buddy_nick
        );

        let file = BufReader::new(File::open(path)?);
        decode_reader(file, &ids.user_id, options.clock, &mut archive)?;

        archive.user_id = ids.user_id;
        archive.buddy_nick = ids.buddy_nick;
        archive.user_nick = ids.user_nick;
    }
    Ok(archive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yahoo::crypto::crypt;
    use assert_matches::assert_matches;
    use env_logger::Env;
    use time::macros::datetime;
    use time::Month;

    const KEY: &str = "alice";

    fn init() {
        let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
            .is_test(true)
            .try_init();
    }

    fn record_bytes(timestamp: i32, inbound: i32, payload: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&timestamp.to_le_bytes());
        buf.extend_from_slice(&0i32.to_le_bytes());
        buf.extend_from_slice(&inbound.to_le_bytes());
        buf.extend_from_slice(&(payload.len() as i32).to_le_bytes());
        buf.extend_from_slice(payload);
        buf.extend_from_slice(&0i32.to_le_bytes());
        buf
    }

    fn message_bytes(timestamp: i32, inbound: i32, text: &str) -> Vec<u8> {
        record_bytes(timestamp, inbound, &crypt(KEY.as_bytes(), text.as_bytes()))
    }

    fn decode(sample: &[u8]) -> Result<Archive> {
        init();
        let mut archive = Archive::new();
        decode_reader(sample, KEY, Clock::utc(), &mut archive)?;
        Ok(archive)
    }

    #[test]
    fn test_record_header() {
        let sample = message_bytes(1_230_891_330, 1, "hi");

        let (buf, header) = record_header(&sample[..]).unwrap();
        assert_eq!(header.timestamp, 1_230_891_330);
        assert_eq!(header.reserved, 0);
        assert!(header.is_inbound());
        assert_eq!(header.payload_len, 2);
        assert_eq!(buf.len(), 2 + 4);
    }

    #[test]
    fn test_decode_messages() {
        let mut sample = message_bytes(1_230_891_330, 1, "hi");
        sample.extend(message_bytes(1_230_891_345, 0, "hello bob"));
        sample.extend(message_bytes(1_230_891_400, 1, "how are you?"));

        let archive = decode(&sample).unwrap();
        assert_eq!(archive.period, Some((2009, Month::January)));
        assert_eq!(
            archive.messages,
            vec![
                Message::new(true, datetime!(2009-01-02 10:15:30), "hi"),
                Message::new(false, datetime!(2009-01-02 10:15:45), "hello bob"),
                Message::new(true, datetime!(2009-01-02 10:16:40), "how are you?"),
            ]
        );
    }

    #[test]
    fn test_separator_only() {
        let sample = record_bytes(1_230_891_330, 0, &[]);
        let archive = decode(&sample).unwrap();
        assert!(archive.messages.is_empty());
        assert_eq!(archive.period, None);
    }

    #[test]
    fn test_separator_between_messages() {
        let mut sample = message_bytes(1_230_891_330, 1, "hi");
        sample.extend(record_bytes(1_230_891_331, 0, &[]));
        sample.extend(message_bytes(1_230_891_332, 0, "yo"));

        let archive = decode(&sample).unwrap();
        assert_eq!(archive.messages.len(), 2);
        assert_eq!(archive.messages[1].content, "yo");
    }

    #[test]
    fn test_empty_stream() {
        let archive = decode(&[]).unwrap();
        assert!(archive.messages.is_empty());
    }

    #[test]
    fn test_eof_inside_header() {
        let mut sample = message_bytes(1_230_891_330, 1, "hi");
        sample.push(0x01);
        assert_matches!(decode(&sample), Err(Error::Malformed(_)));
        assert_matches!(decode(&[0x01]), Err(Error::Malformed(_)));
    }

    #[test]
    fn test_eof_inside_payload() {
        let sample = message_bytes(1_230_891_330, 1, "hello there");
        assert_matches!(decode(&sample[..20]), Err(Error::Malformed(_)));
    }

    #[test]
    fn test_missing_terminator() {
        let sample = message_bytes(1_230_891_330, 1, "hello there");
        assert_matches!(decode(&sample[..sample.len() - 4]), Err(Error::Malformed(_)));
    }

    #[test]
    fn test_negative_length() {
        let mut sample = Vec::new();
        for field in &[1_230_891_330i32, 0, 1, -5] {
            sample.extend_from_slice(&field.to_le_bytes());
        }
        assert_matches!(decode(&sample), Err(Error::Malformed(_)));
    }

    #[test]
    fn test_high_bytes_are_dropped() {
        let mut payload = crypt(KEY.as_bytes(), b"hi there");
        payload[2] = 0xe9;

        let archive = decode(&record_bytes(1_230_891_330, 1, &payload)).unwrap();
        assert_eq!(archive.messages[0].content, "hithere");
    }

    #[test]
    fn test_empty_key() {
        let mut archive = Archive::new();
        assert_matches!(
            decode_reader(&[][..], "", Clock::utc(), &mut archive),
            Err(Error::Config(_))
        );
    }

    #[test]
    fn test_decode_files_from_profile() {
        init();
        let root = std::env::temp_dir().join(format!("yakopi-profile-{}", std::process::id()));
        let dir = root
            .join("Profiles")
            .join(KEY)
            .join("Archive")
            .join("Messages")
            .join("bob");
        std::fs::create_dir_all(&dir).unwrap();
        let first = dir.join("20090102-ally.dat");
        let second = dir.join("20090103-ally.dat");
        std::fs::write(&first, message_bytes(1_230_891_330, 1, "hi")).unwrap();
        std::fs::write(&second, message_bytes(1_230_977_730, 0, "back again")).unwrap();

        let options = ParseOptions {
            clock: Clock::utc(),
            ..Default::default()
        };
        let decoded = decode_files(&[&first, &second], &options);
        std::fs::remove_dir_all(&root).unwrap();

        let archive = decoded.unwrap();
        assert_eq!(archive.user_id, KEY);
        assert_eq!(archive.buddy_nick, "bob");
        assert_eq!(archive.user_nick, "ally");
        assert_eq!(archive.period, Some((2009, Month::January)));
        assert_eq!(
            archive.messages,
            vec![
                Message::new(true, datetime!(2009-01-02 10:15:30), "hi"),
                Message::new(false, datetime!(2009-01-03 10:15:30), "back again"),
            ]
        );
    }

    #[test]
    fn test_decode_file_needs_ids() {
        let options = ParseOptions::default();
        assert_matches!(
            decode_file("20090102-alice.dat", &options),
            Err(Error::Config(_))
        );
    }
}
