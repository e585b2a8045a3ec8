use serde::Serialize;

/// A calendar date stored as a small fixed-size block.
///
/// Layouts by block size:
/// - 2 bytes: month, day
/// - 4 bytes: year (u16 BE), month, day
/// - 8 bytes: second, minute, hour, day, weekday, month, year (u16 BE)
///
/// Other sizes keep only the raw bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DateRecord {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub weekday: u8,
    raw: Vec<u8>,
}

impl DateRecord {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut date = Self {
            raw: bytes.to_vec(),
            ..Self::default()
        };

        match *bytes {
            [month, day] => {
                date.month = month;
                date.day = day;
            }
            [y0, y1, month, day] => {
                date.year = u16::from_be_bytes([y0, y1]);
                date.month = month;
                date.day = day;
            }
            [second, minute, hour, day, weekday, month, y0, y1] => {
                date.second = second;
                date.minute = minute;
                date.hour = hour;
                date.day = day;
                date.weekday = weekday;
                date.month = month;
                date.year = u16::from_be_bytes([y0, y1]);
            }
            _ => {}
        }

        date
    }

    pub fn month_day(month: u8, day: u8) -> Self {
        Self::from_bytes(&[month, day])
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn to_month_day_bytes(&self) -> [u8; 2] {
        [self.month, self.day]
    }
}
