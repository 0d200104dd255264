//! Date grouping — calendar-day separators over the displayed sequence.
//!
//! Labels use calendar-day boundaries in an explicit UTC offset (the caller
//! passes the local offset), not elapsed-time buckets: a message from 23:59
//! is "Yesterday" at 00:01 even though two minutes old. Boundaries must be
//! computed over the post-filter view, since filtering changes adjacency.

#[cfg(test)]
#[path = "groups_test.rs"]
mod groups_test;

use time::{OffsetDateTime, UtcOffset};

use crate::net::types::Message;

/// Human label for the calendar day of `ts`, relative to `now`.
///
/// `Today`, `Yesterday`, or `<Weekday>, <Month> <day>` with the year
/// appended when it differs from the current year.
#[must_use]
pub fn group_label(ts: OffsetDateTime, now: OffsetDateTime, offset: UtcOffset) -> String {
    let day = ts.to_offset(offset).date();
    let today = now.to_offset(offset).date();

    if day == today {
        return "Today".to_owned();
    }
    if today.previous_day() == Some(day) {
        return "Yesterday".to_owned();
    }
    if day.year() == today.year() {
        format!("{}, {} {}", day.weekday(), day.month(), day.day())
    } else {
        format!("{}, {} {}, {}", day.weekday(), day.month(), day.day(), day.year())
    }
}

/// True at index 0 and wherever the day label changes from the previous
/// entry. `sequence` is whatever is currently displayed (full or filtered).
#[must_use]
pub fn is_group_boundary(sequence: &[Message], index: usize, now: OffsetDateTime, offset: UtcOffset) -> bool {
    if index >= sequence.len() {
        return false;
    }
    if index == 0 {
        return true;
    }
    group_label(sequence[index].created_at, now, offset)
        != group_label(sequence[index - 1].created_at, now, offset)
}
