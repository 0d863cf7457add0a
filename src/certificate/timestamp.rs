//! Capture-time formatting.

use chrono::{DateTime, Local, Utc};

/// The three string forms of one generation instant.
///
/// `date` and `time` are the fr-FR forms printed on the form and carried by
/// the QR payload; `for_filename` keys the output file. All three must come
/// from the same sampled instant, never from separate clock reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    /// Short date, "15/03/2021".
    pub date: String,
    /// Hour and minute with an "h" separator, "14h30".
    pub time: String,
    /// Filesystem-safe UTC stamp, "2021-03-15_14-30-00".
    ///
    /// UTC keeps consecutive stamps non-decreasing across DST transitions;
    /// two calls within the same second still collide.
    pub for_filename: String,
}

impl Timestamp {
    pub fn from_instant(now: DateTime<Local>) -> Self {
        Self {
            date: now.format("%d/%m/%Y").to_string(),
            time: now.format("%Hh%M").to_string(),
            for_filename: now
                .with_timezone(&Utc)
                .format("%Y-%m-%d_%H-%M-%S")
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_instant() -> DateTime<Local> {
        Local.with_ymd_and_hms(2021, 3, 15, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_printed_forms() {
        let stamp = Timestamp::from_instant(fixed_instant());
        assert_eq!(stamp.date, "15/03/2021");
        assert_eq!(stamp.time, "14h30");
    }

    #[test]
    fn test_filename_form_is_filesystem_safe() {
        let stamp = Timestamp::from_instant(fixed_instant());
        assert_eq!(stamp.for_filename.len(), 19);
        assert!(!stamp.for_filename.contains(':'));
        assert!(!stamp.for_filename.contains('T'));
        assert_eq!(stamp.for_filename.as_bytes()[10], b'_');
        assert!(stamp.for_filename.starts_with("2021-03-1"));
    }

    #[test]
    fn test_same_instant_yields_same_stamp() {
        let a = Timestamp::from_instant(fixed_instant());
        let b = Timestamp::from_instant(fixed_instant());
        assert_eq!(a, b);
    }
}
