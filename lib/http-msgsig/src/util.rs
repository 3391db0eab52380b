use std::time::{Duration, SystemTime};

pub trait UnixTimestampExt {
    /// Point in time of the timestamp, `None` if it isn't representable
    fn from_unix_timestamp(timestamp: u64) -> Option<Self>
    where
        Self: Sized;

    /// Seconds since the epoch, saturating at zero for pre-epoch times
    fn to_unix_timestamp(&self) -> u64;
}

impl UnixTimestampExt for SystemTime {
    fn from_unix_timestamp(timestamp: u64) -> Option<Self> {
        SystemTime::UNIX_EPOCH.checked_add(Duration::from_secs(timestamp))
    }

    fn to_unix_timestamp(&self) -> u64 {
        self.duration_since(SystemTime::UNIX_EPOCH)
            .map_or(0, |duration| duration.as_secs())
    }
}

#[cfg(test)]
mod test {
    use super::UnixTimestampExt;
    use std::time::{Duration, SystemTime};

    #[test]
    fn timestamp_conversion() {
        let time = SystemTime::from_unix_timestamp(1_618_884_475).unwrap();
        assert_eq!(time.to_unix_timestamp(), 1_618_884_475);

        assert!(SystemTime::from_unix_timestamp(u64::MAX).is_none());

        let before_epoch = SystemTime::UNIX_EPOCH - Duration::from_secs(10);
        assert_eq!(before_epoch.to_unix_timestamp(), 0);
    }
}
