use chrono::{DateTime, FixedOffset, Utc};

const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// `Monday, 01 January 2024 14:30:00 IST`
pub fn format_ist(at: DateTime<Utc>) -> String {
    let offset = FixedOffset::east_opt(IST_OFFSET_SECS).expect("IST offset is within range");
    at.with_timezone(&offset)
        .format("%A, %d %B %Y %H:%M:%S IST")
        .to_string()
}

pub fn now_ist() -> String {
    format_ist(Utc::now())
}
