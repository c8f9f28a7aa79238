//! Work schedule model.
//!
//! A schedule is the expected daily time in and time out used to compute
//! lateness, undertime and overtime.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An expected daily work pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Internal identifier.
    pub id: Uuid,
    /// Schedule name, unique ignoring case.
    pub name: String,
    /// Expected time in.
    pub time_in: NaiveTime,
    /// Expected time out; at or before `time_in` means the next day.
    pub time_out: NaiveTime,
    /// Allowed unpaid break in minutes.
    pub break_minutes: i64,
    /// Minutes after `time_in` before lateness is counted.
    pub grace_minutes: i64,
    /// Days of the week this schedule is worked.
    pub work_days: Vec<Weekday>,
}

impl Schedule {
    /// Returns true if the shift ends on the following day.
    pub fn is_overnight(&self) -> bool {
        self.time_out <= self.time_in
    }

    /// Returns true if `date` is a scheduled work day.
    pub fn is_work_day(&self, date: NaiveDate) -> bool {
        self.work_days.contains(&date.weekday())
    }

    /// The date of the shift a clock event at `at` belongs to.
    ///
    /// Events before the scheduled end of an overnight shift belong to the
    /// shift that started the previous day.
    pub fn shift_date(&self, at: NaiveDateTime) -> NaiveDate {
        let date = at.date();
        if self.is_overnight() && at.time() < self.time_out {
            date - Duration::days(1)
        } else {
            date
        }
    }

    /// Scheduled start of the shift beginning on `date`.
    pub fn start_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.time_in)
    }

    /// Scheduled end of the shift beginning on `date`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hr_payroll::models::Schedule;
    /// use chrono::{NaiveDate, NaiveTime, Weekday};
    /// use uuid::Uuid;
    ///
    /// let night = Schedule {
    ///     id: Uuid::nil(),
    ///     name: "Night".to_string(),
    ///     time_in: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
    ///     time_out: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
    ///     break_minutes: 60,
    ///     grace_minutes: 10,
    ///     work_days: vec![Weekday::Mon],
    /// };
    /// let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    /// assert_eq!(night.end_on(date).date(), NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
    /// ```
    pub fn end_on(&self, date: NaiveDate) -> NaiveDateTime {
        let end = date.and_time(self.time_out);
        if self.is_overnight() {
            end + Duration::days(1)
        } else {
            end
        }
    }

    /// Scheduled working minutes per day, excluding the allowed break.
    pub fn work_minutes(&self) -> i64 {
        let date = NaiveDate::MIN;
        let span = (self.end_on(date) - self.start_on(date)).num_minutes();
        (span - self.break_minutes).max(0)
    }
}
