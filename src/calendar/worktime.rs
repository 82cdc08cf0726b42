// Working-minute calculation between two timestamps

use crate::calendar::holidays::HolidaySet;
use crate::calendar::schedule::WorkSchedule;
use crate::error::{AnalysisError, Result};
use chrono::{NaiveDateTime, Timelike};

/// Wall-clock minutes between two timestamps (negative if `to` precedes `from`)
pub fn raw_minutes(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}

/// Minutes elapsed since midnight, including fractional seconds
pub fn minute_of_day(ts: NaiveDateTime) -> f64 {
    let time = ts.time();
    let seconds = time.second() as f64 + time.nanosecond() as f64 / 1e9;
    (time.hour() * 60 + time.minute()) as f64 + seconds / 60.0
}

/// Working minutes with the default schedule
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use dynbottle::calendar::{work_minutes, HolidaySet};
///
/// let day = NaiveDate::from_ymd_opt(2021, 9, 1).unwrap(); // Wednesday
/// let from = day.and_hms_opt(11, 0, 0).unwrap();
/// let to = day.and_hms_opt(13, 0, 0).unwrap();
///
/// // Two hours wall clock, one of them is lunch
/// assert_eq!(work_minutes(from, to, &HolidaySet::new()).unwrap(), 60.0);
/// ```
pub fn work_minutes(from: NaiveDateTime, to: NaiveDateTime, holidays: &HolidaySet) -> Result<f64> {
    BusinessCalendar::new(holidays.clone()).work_minutes(from, to)
}

/// Holiday set plus work schedule; converts intervals to working minutes
#[derive(Debug, Clone, Default)]
pub struct BusinessCalendar {
    holidays: HolidaySet,
    schedule: WorkSchedule,
}

impl BusinessCalendar {
    /// Calendar with the default schedule
    pub fn new(holidays: HolidaySet) -> Self {
        Self {
            holidays,
            schedule: WorkSchedule::default(),
        }
    }

    /// Calendar with a custom schedule
    pub fn with_schedule(holidays: HolidaySet, schedule: WorkSchedule) -> Result<Self> {
        schedule.validate()?;
        Ok(Self { holidays, schedule })
    }

    /// Working minutes between `from` and `to`
    ///
    /// The result always lies in `[0, raw_minutes(from, to)]`.
    pub fn work_minutes(&self, from: NaiveDateTime, to: NaiveDateTime) -> Result<f64> {
        if from > to {
            return Err(AnalysisError::InvalidInterval { from, to });
        }

        let raw = raw_minutes(from, to);
        let worked = if from.date() == to.date() {
            self.same_day_minutes(from, to, raw)
        } else {
            self.multi_day_minutes(from, to)
        };

        Ok(worked.min(raw).max(0.0))
    }

    fn same_day_minutes(&self, from: NaiveDateTime, to: NaiveDateTime, raw: f64) -> f64 {
        let date = from.date();
        if !self.holidays.is_business_day(date) {
            return 0.0;
        }

        let s = &self.schedule;
        let from_mod = minute_of_day(from);
        let to_mod = minute_of_day(to);

        let mut worked = raw;
        if from_mod <= s.lunch_start && to_mod >= s.lunch_end {
            worked -= s.lunch_minutes();
        }
        worked - s.meeting_deduction(date, from_mod, to_mod)
    }

    fn multi_day_minutes(&self, from: NaiveDateTime, to: NaiveDateTime) -> f64 {
        let s = &self.schedule;
        let from_date = from.date();
        let to_date = to.date();

        // Start day: from `from` to end of the work window
        let head = if self.holidays.is_business_day(from_date) {
            let from_mod = minute_of_day(from);
            (s.window_minutes(from_mod, s.day_end)
                - s.meeting_deduction(from_date, from_mod, s.day_end))
            .max(0.0)
        } else {
            0.0
        };

        // End day: from start of the work window to `to`
        let tail = if self.holidays.is_business_day(to_date) {
            let to_mod = minute_of_day(to);
            (s.window_minutes(s.day_start, to_mod)
                - s.meeting_deduction(to_date, s.day_start, to_mod))
            .max(0.0)
        } else {
            0.0
        };

        // Full business days strictly between the endpoints
        let full_day = s.full_day_minutes();
        let body: f64 = from_date
            .iter_days()
            .skip(1)
            .take_while(|date| *date < to_date)
            .filter(|date| self.holidays.is_business_day(*date))
            .map(|date| full_day - s.meeting_deduction(date, s.day_start, s.day_end))
            .sum();

        head + body + tail
    }
}
