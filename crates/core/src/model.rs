use time::{Month, PrimitiveDateTime};

/// A single line of a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// True when the conversation partner wrote the message
    pub inbound: bool,
    /// Local wall-clock time the message was sent, there is no timezone
    pub timestamp: PrimitiveDateTime,
    /// The message body
    pub content: String,
}

impl Message {
    /// Convenience constructor
    pub fn new<T: Into<String>>(inbound: bool, timestamp: PrimitiveDateTime, content: T) -> Self {
        Message {
            inbound,
            timestamp,
            content: content.into(),
        }
    }
}

/// One conversation between the local user and a single buddy
///
/// Readers build an archive by appending to `messages` in the order they are found. Nothing
/// sorts or validates the order afterwards, writers expect it to already be chronological.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Archive {
    /// The local user. This is also the cipher key of Yahoo! Messenger archives
    pub user_id: String,
    /// Display name of the local user, may be empty
    pub user_nick: String,
    /// The conversation partner
    pub buddy_nick: String,
    /// Year and month recorded by the source, if it records one
    pub period: Option<(i32, Month)>,
    /// Messages in parse order
    pub messages: Vec<Message>,
}

impl Archive {
    /// An empty archive, ready to be filled in by a reader
    pub fn new() -> Self {
        Default::default()
    }

    /// The identifier of whoever wrote `msg`
    pub fn speaker(&self, msg: &Message) -> &str {
        if msg.inbound {
            &self.buddy_nick
        } else {
            &self.user_id
        }
    }

    /// The year and month of the conversation
    ///
    /// Uses the period tracked by the source and falls back to the first message.
    pub fn period(&self) -> Option<(i32, Month)> {
        self.period.or_else(|| {
            self.messages
                .first()
                .map(|msg| (msg.timestamp.year(), msg.timestamp.month()))
        })
    }

    pub(crate) fn track_period(&mut self, timestamp: &PrimitiveDateTime) {
        if self.period.is_none() {
            self.period = Some((timestamp.year(), timestamp.month()));
        }
    }
}
