/// Size of the fixed part of every record
pub const HEADER_SIZE: usize = 16;

/// The four integers that open every record
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct RecordHeader {
    /// Seconds since the epoch
    pub timestamp: i32,
    /// Meaning unknown, always ignored
    pub reserved: i32,
    /// Non zero when the buddy sent the message
    pub inbound: i32,
    /// Length of the ciphered payload following the header
    pub payload_len: i32,
}

/// A complete record of an archive
#[derive(Debug, PartialEq, Eq)]
pub enum Record {
    /// A zero length record that separates sessions
    Separator(RecordHeader),
    /// A message with its still ciphered payload
    Message {
        /// The fixed part of the record
        header: RecordHeader,
        /// Raw payload, undecoded
        payload: Vec<u8>,
    },
}

impl RecordHeader {
    /// Separators have no payload
    pub fn is_separator(&self) -> bool {
        self.payload_len == 0
    }

    /// True when the buddy sent the message
    pub fn is_inbound(&self) -> bool {
        self.inbound != 0
    }
}
