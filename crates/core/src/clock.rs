use crate::Result;
use log::warn;
use std::sync::Once;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

static LOCAL_OFFSET_WARNING: Once = Once::new();

/// Decides which UTC offset turns epoch seconds into wall-clock time
///
/// Yahoo! Messenger stores epoch seconds and the client displays them in the local time of
/// the machine. [`Clock::Local`] does the same; [`Clock::Fixed`] pins the offset so output
/// does not depend on the machine doing the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Use the offset of the system timezone at each instant
    Local,
    /// Use the same offset for every instant
    Fixed(UtcOffset),
}

impl Default for Clock {
    fn default() -> Self {
        Clock::Local
    }
}

impl Clock {
    /// A clock that reads every timestamp as UTC
    pub fn utc() -> Self {
        Clock::Fixed(UtcOffset::UTC)
    }

    /// Convert `epoch` seconds since 1970 into a timezone-less wall-clock time
    pub fn wall_clock(&self, epoch: i64) -> Result<PrimitiveDateTime> {
        let instant = OffsetDateTime::from_unix_timestamp(epoch)?;
        let offset = match self {
            Clock::Fixed(offset) => *offset,
            Clock::Local => UtcOffset::local_offset_at(instant).unwrap_or_else(|_| {
                // The time crate refuses to read the local offset once other threads exist
                LOCAL_OFFSET_WARNING.call_once(|| {
                    warn!("Unable to determine the local UTC offset, timestamps will be UTC")
                });
                UtcOffset::UTC
            }),
        };
        let local = instant.to_offset(offset);
        Ok(PrimitiveDateTime::new(local.date(), local.time()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    #[test]
    fn test_utc_wall_clock() {
        let clock = Clock::utc();
        assert_eq!(
            clock.wall_clock(1_230_891_330).unwrap(),
            datetime!(2009-01-02 10:15:30)
        );
        assert_eq!(clock.wall_clock(0).unwrap(), datetime!(1970-01-01 00:00:00));
    }

    #[test]
    fn test_fixed_offset_crosses_midnight() {
        let clock = Clock::Fixed(offset!(-8));
        assert_eq!(
            clock.wall_clock(1_230_768_000).unwrap(),
            datetime!(2008-12-31 16:00:00)
        );
    }
}
