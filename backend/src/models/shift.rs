//! Production shifts.
//!
//! Plants run three eight-hour shifts starting at 00:00, 08:00 and 16:00.
//! The hourly dashboard shows the shift in progress, from its start to now.

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::time::TimeWindow;

/// One of the three daily shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    /// 00:00 - 08:00
    Night,
    /// 08:00 - 16:00
    Day,
    /// 16:00 - 24:00
    Evening,
}

impl Shift {
    pub const HOURS: i64 = 8;

    /// Shift containing the given wall-clock time.
    pub fn containing(ts: NaiveDateTime) -> Self {
        match ts.hour() {
            8..=15 => Shift::Day,
            16..=23 => Shift::Evening,
            _ => Shift::Night,
        }
    }

    pub fn start_hour(self) -> u32 {
        match self {
            Shift::Night => 0,
            Shift::Day => 8,
            Shift::Evening => 16,
        }
    }

    /// Full window of this shift on the date of `ts`.
    pub fn window_on(self, ts: NaiveDateTime) -> TimeWindow {
        let start = ts
            .date()
            .and_time(NaiveTime::from_hms_opt(self.start_hour(), 0, 0).unwrap_or(NaiveTime::MIN));
        let end = start
            .checked_add_signed(Duration::hours(Self::HOURS))
            .unwrap_or(NaiveDateTime::MAX);
        TimeWindow::from_ordered(start, end)
    }
}

/// The shift in progress at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShiftWindow {
    pub shift: Shift,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub now: NaiveDateTime,
}

impl ShiftWindow {
    pub fn at(now: NaiveDateTime) -> Self {
        let shift = Shift::containing(now);
        let window = shift.window_on(now);
        Self {
            shift,
            start_time: window.start(),
            end_time: window.end(),
            now,
        }
    }

    /// Elapsed part of the shift, `[start, now)`; `None` exactly at the shift boundary.
    pub fn elapsed(&self) -> Option<TimeWindow> {
        TimeWindow::new(self.start_time, self.now).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_shift_containing() {
        assert_eq!(Shift::containing(at(0, 0)), Shift::Night);
        assert_eq!(Shift::containing(at(7, 59)), Shift::Night);
        assert_eq!(Shift::containing(at(8, 0)), Shift::Day);
        assert_eq!(Shift::containing(at(15, 59)), Shift::Day);
        assert_eq!(Shift::containing(at(16, 0)), Shift::Evening);
        assert_eq!(Shift::containing(at(23, 59)), Shift::Evening);
    }

    #[test]
    fn test_evening_shift_ends_at_midnight() {
        let window = Shift::Evening.window_on(at(18, 0));
        assert_eq!(window.start(), at(16, 0));
        assert_eq!(
            window.end(),
            NaiveDate::from_ymd_opt(2024, 3, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_shift_window_elapsed() {
        let current = ShiftWindow::at(at(10, 45));
        assert_eq!(current.shift, Shift::Day);
        assert_eq!(current.start_time, at(8, 0));
        assert_eq!(current.end_time, at(16, 0));

        let elapsed = current.elapsed().unwrap();
        assert_eq!(elapsed.start(), at(8, 0));
        assert_eq!(elapsed.end(), at(10, 45));
    }

    #[test]
    fn test_shift_window_at_boundary_has_no_elapsed_part() {
        assert!(ShiftWindow::at(at(16, 0)).elapsed().is_none());
    }

    #[test]
    fn test_last_representable_shift_is_clipped() {
        let late = NaiveDateTime::MAX - Duration::minutes(30);
        let window = Shift::Evening.window_on(late);
        assert_eq!(window.start(), late.date().and_hms_opt(16, 0, 0).unwrap());
        assert_eq!(window.end(), NaiveDateTime::MAX);
        assert!(ShiftWindow::at(late).elapsed().is_some());
    }

    #[test]
    fn test_shift_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Shift::Evening).unwrap(), "\"evening\"");
    }
}
