//! Date and time helpers for the dashboard.
//!
//! A [`Clock`] pins "now" together with the city's UTC offset so that every
//! label computed during one render cycle agrees on what "today" is.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, NaiveTime, Offset, Utc, Weekday,
};

/// Format of the date-only grouping key. Sorts chronologically as a string.
pub const DATE_LABEL_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl Clock {
    pub fn fixed(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Offset of the machine's local time zone right now.
    pub fn local_offset() -> FixedOffset {
        Local::now().offset().fix()
    }

    pub fn now_epoch(&self) -> i64 {
        self.now.timestamp()
    }

    fn local_now(&self) -> DateTime<FixedOffset> {
        self.now.with_timezone(&self.offset)
    }

    pub fn today(&self) -> NaiveDate {
        self.local_now().date_naive()
    }

    pub fn current_date_label(&self) -> String {
        date_label(self.today())
    }

    /// Current UTC instant without any offset suffix, e.g. `Wed, 21 Oct 2026 15:30:05`.
    pub fn utc_display_string(&self) -> String {
        self.now.format("%a, %d %b %Y %H:%M:%S").to_string()
    }

    /// Day-of-month and month name for `epoch`, or for now when absent.
    pub fn day_month_label(&self, epoch: Option<i64>) -> String {
        let at = epoch
            .and_then(|ts| local_datetime(ts, self.offset))
            .unwrap_or_else(|| self.local_now());
        at.format("%-d %B").to_string()
    }

    /// Epoch seconds of local midnight on the most recent `target` weekday.
    ///
    /// When `target` is today's weekday this is today's midnight.
    pub fn weekday_offset_epoch(&self, target: Weekday) -> i64 {
        let today = self.today();
        let back = (today.weekday().num_days_from_sunday() + 7 - target.num_days_from_sunday()) % 7;
        midnight_epoch(today - Duration::days(i64::from(back)), self.offset)
    }
}

/// Converts provider epoch seconds to the given offset; `None` when either the
/// instant or its local wall time falls outside chrono's range.
pub fn local_datetime(epoch: i64, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let utc = DateTime::from_timestamp(epoch, 0)?;
    utc.naive_utc()
        .checked_add_signed(Duration::seconds(i64::from(offset.local_minus_utc())))?;
    Some(utc.with_timezone(&offset))
}

pub fn date_label(date: NaiveDate) -> String {
    date.format(DATE_LABEL_FORMAT).to_string()
}

pub fn midnight_epoch(date: NaiveDate, offset: FixedOffset) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp() - i64::from(offset.local_minus_utc())
}

/// Weekday for an index where 0 is Sunday and 6 is Saturday.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc() -> FixedOffset {
        Utc.fix()
    }

    fn utc_midnight(y: i32, m: u32, d: u32) -> i64 {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp()
    }

    // 2026-10-21 is a Wednesday.
    fn wednesday_afternoon() -> Clock {
        Clock::fixed(Utc.with_ymd_and_hms(2026, 10, 21, 15, 30, 5).unwrap(), utc())
    }

    #[test]
    fn labels_for_fixed_instant() {
        let clock = wednesday_afternoon();
        assert_eq!(clock.current_date_label(), "2026-10-21");
        assert_eq!(clock.utc_display_string(), "Wed, 21 Oct 2026 15:30:05");
        assert_eq!(clock.day_month_label(None), "21 October");
        assert_eq!(clock.day_month_label(Some(utc_midnight(2026, 3, 2))), "2 March");
    }

    #[test]
    fn day_month_label_falls_back_to_now_for_out_of_range_epoch() {
        let clock = wednesday_afternoon();
        assert_eq!(clock.day_month_label(Some(i64::MAX)), "21 October");
    }

    #[test]
    fn same_weekday_is_today_midnight() {
        let clock = wednesday_afternoon();
        let wed = weekday_from_index(3).unwrap();
        assert_eq!(clock.weekday_offset_epoch(wed), utc_midnight(2026, 10, 21));
    }

    #[test]
    fn earlier_weekday_goes_back_within_the_week() {
        let clock = wednesday_afternoon();
        let mon = weekday_from_index(1).unwrap();
        assert_eq!(clock.weekday_offset_epoch(mon), utc_midnight(2026, 10, 19));
    }

    #[test]
    fn later_weekday_means_previous_week() {
        let clock = wednesday_afternoon();
        assert_eq!(clock.weekday_offset_epoch(Weekday::Fri), utc_midnight(2026, 10, 16));
        assert_eq!(clock.weekday_offset_epoch(Weekday::Thu), utc_midnight(2026, 10, 15));
    }

    #[test]
    fn offset_shifts_today_and_midnight() {
        // 02:00 UTC on Thursday is still Wednesday 22:00 at UTC-4.
        let offset = FixedOffset::west_opt(4 * 3600).unwrap();
        let clock = Clock::fixed(Utc.with_ymd_and_hms(2026, 10, 22, 2, 0, 0).unwrap(), offset);

        assert_eq!(clock.current_date_label(), "2026-10-21");
        assert_eq!(
            clock.weekday_offset_epoch(Weekday::Wed),
            utc_midnight(2026, 10, 21) + 4 * 3600
        );
    }

    #[test]
    fn local_datetime_rejects_wall_times_past_the_range() {
        let east = FixedOffset::east_opt(14 * 3600).unwrap();
        let west = FixedOffset::west_opt(14 * 3600).unwrap();
        let max = DateTime::<Utc>::MAX_UTC.timestamp();
        let min = DateTime::<Utc>::MIN_UTC.timestamp();

        assert!(local_datetime(max, east).is_none());
        assert!(local_datetime(min, west).is_none());
        assert!(local_datetime(max, west).is_some());
        assert!(local_datetime(min, east).is_some());
        assert!(local_datetime(max, utc()).is_some());
    }

    #[test]
    fn weekday_indices() {
        assert_eq!(weekday_from_index(0), Some(Weekday::Sun));
        assert_eq!(weekday_from_index(6), Some(Weekday::Sat));
        assert_eq!(weekday_from_index(7), None);
    }
}
