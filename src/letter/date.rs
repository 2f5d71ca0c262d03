//! Letter dates: `DD.MM.YYYY` input and the long Russian form printed on the letter

use crate::{Error, Result};
use chrono::{Datelike, Local, NaiveDate};

/// `strftime` pattern of the date sent to the letter server.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// Current local date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a letter date.
///
/// The text must be exactly `DD.MM.YYYY`, name a real calendar day, and fall
/// strictly before `today`.
pub fn parse_letter_date(text: &str, today: NaiveDate) -> Result<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::ValidationError("date is required".into()));
    }

    let bytes = text.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'.',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(Error::ValidationError(format!(
            "date '{}' must be in DD.MM.YYYY format",
            text
        )));
    }

    // Shape check above guarantees these parse.
    let day: u32 = text[0..2].parse().unwrap_or(0);
    let month: u32 = text[3..5].parse().unwrap_or(0);
    let year: i32 = text[6..10].parse().unwrap_or(0);

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        Error::ValidationError(format!("'{}' is not a calendar date", text))
    })?;
    if date >= today {
        return Err(Error::ValidationError(format!(
            "date '{}' must be before today",
            text
        )));
    }
    Ok(date)
}

/// `1 января 1990 г.`
pub fn format_long_ru(date: NaiveDate) -> String {
    format!(
        "{} {} {} г.",
        date.day(),
        MONTHS_GENITIVE[date.month0() as usize],
        date.year()
    )
}
