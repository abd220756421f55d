use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::RangeInclusive;

use crate::error::DecodeError;
use crate::record::TIMESTAMP_SIZE;

const YEARS: RangeInclusive<u16> = 1..=9999;

/// Record acquisition time.  No timezone; seconds are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// `year = b0·256 + b1`, then month, day, hour, minute verbatim.
    /// Calendar-invalid fields are rejected rather than normalised, as are
    /// years outside `1..=9999` (no four-digit rendering).
    pub fn decode(b: &[u8; TIMESTAMP_SIZE]) -> Result<Self, DecodeError> {
        let year   = u16::from_be_bytes([b[0], b[1]]);
        let (month, day, hour, minute) = (b[2], b[3], b[4], b[5]);
        let invalid = DecodeError::InvalidTimestamp { year, month, day, hour, minute };

        if !YEARS.contains(&year) {
            return Err(invalid);
        }
        NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
            .and_then(|d| d.and_hms_opt(u32::from(hour), u32::from(minute), 0))
            .map(Self)
            .ok_or(invalid)
    }

    pub fn year(&self)   -> u16 { self.0.year() as u16 }
    pub fn month(&self)  -> u8  { self.0.month() as u8 }
    pub fn day(&self)    -> u8  { self.0.day() as u8 }
    pub fn hour(&self)   -> u8  { self.0.hour() as u8 }
    pub fn minute(&self) -> u8  { self.0.minute() as u8 }

    /// Inverse of [`Timestamp::decode`].
    pub fn to_bytes(&self) -> [u8; TIMESTAMP_SIZE] {
        let [y0, y1] = self.year().to_be_bytes();
        [y0, y1, self.month(), self.day(), self.hour(), self.minute()]
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_reference_timestamp() {
        let ts = Timestamp::decode(&[0x07, 0xE8, 0x06, 0x0F, 0x0C, 0x1E]).unwrap();
        assert_eq!(ts.year(), 2024);
        assert_eq!(ts.month(), 6);
        assert_eq!(ts.day(), 15);
        assert_eq!(ts.hour(), 12);
        assert_eq!(ts.minute(), 30);
        assert_eq!(ts.to_string(), "2024-06-15 12:30:00");
    }

    #[test]
    fn bytes_roundtrip() {
        let raw = [0x07, 0xE7, 0x0C, 0x1F, 0x17, 0x3B];
        assert_eq!(Timestamp::decode(&raw).unwrap().to_bytes(), raw);
    }

    #[test]
    fn rejects_month_13() {
        let err = Timestamp::decode(&[0x07, 0xE8, 13, 1, 0, 0]).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidTimestamp { month: 13, .. }));
    }

    #[test]
    fn rejects_impossible_day_and_time() {
        assert!(Timestamp::decode(&[0x07, 0xE8, 2, 30, 0, 0]).is_err());
        assert!(Timestamp::decode(&[0x07, 0xE8, 1, 1, 24, 0]).is_err());
        assert!(Timestamp::decode(&[0x07, 0xE8, 1, 1, 0, 60]).is_err());
        assert!(Timestamp::decode(&[0, 0, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn rejects_years_without_four_digits() {
        let err = Timestamp::decode(&[0x27, 0x10, 1, 1, 0, 0]).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidTimestamp { year: 10000, .. }));
        let err = Timestamp::decode(&[0, 0, 1, 1, 0, 0]).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidTimestamp { year: 0, .. }));
        assert!(Timestamp::decode(&[0xFF, 0xFF, 1, 1, 0, 0]).is_err());
    }

    #[test]
    fn year_range_edges_render_four_digits() {
        let first = Timestamp::decode(&[0x00, 0x01, 1, 1, 0, 0]).unwrap();
        assert_eq!(first.to_string(), "0001-01-01 00:00:00");
        let last = Timestamp::decode(&[0x27, 0x0F, 12, 31, 23, 59]).unwrap();
        assert_eq!(last.to_string(), "9999-12-31 23:59:00");
    }

    #[test]
    fn leap_day_is_valid() {
        let ts = Timestamp::decode(&[0x07, 0xE8, 2, 29, 0, 0]).unwrap();
        assert_eq!(ts.to_string(), "2024-02-29 00:00:00");
    }

    #[test]
    fn serializes_as_display_string() {
        let ts = Timestamp::decode(&[0x07, 0xE8, 0x06, 0x0F, 0x0C, 0x1E]).unwrap();
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"2024-06-15 12:30:00\"");
    }
}
