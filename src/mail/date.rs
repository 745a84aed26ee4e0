use chrono::{DateTime, FixedOffset};

pub const UNKNOWN_DATE: &str = "Unknown Date";

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";
const RFC2822_LAYOUT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Date as found in a message: either understood by the parser or kept
/// as the raw header text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MailDate {
    Parsed(DateTime<FixedOffset>),
    Raw(String),
}

impl MailDate {
    pub fn from_header(value: &str) -> Self {
        match DateTime::parse_from_rfc2822(value.trim()) {
            Ok(dt) => MailDate::Parsed(dt),
            Err(_) => MailDate::Raw(value.to_string()),
        }
    }
}

/// Display form of a message date, `YYYY-MM-DD HH:MM` in the date's own
/// offset. Never fails.
pub fn normalize(date: Option<&MailDate>) -> String {
    match date {
        None => UNKNOWN_DATE.to_string(),
        Some(MailDate::Parsed(dt)) => dt.format(DISPLAY_FORMAT).to_string(),
        Some(MailDate::Raw(raw)) => match DateTime::parse_from_str(raw, RFC2822_LAYOUT) {
            Ok(dt) => dt.format(DISPLAY_FORMAT).to_string(),
            Err(e) => {
                log::debug!("unparseable date {raw:?}: {e}");
                UNKNOWN_DATE.to_string()
            }
        },
    }
}
