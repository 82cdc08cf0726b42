// Work window constants for the business calendar
//
// All values are minutes after midnight. The defaults describe the shop floor
// the analysis was built for: 08:00-17:00, unpaid lunch 12:00-13:00 and a
// 30-minute production meeting every Monday at 13:30.

use crate::error::{AnalysisError, Result};
use chrono::{Datelike, NaiveDate, Weekday};

/// Daily work window, lunch break and weekly meeting slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkSchedule {
    /// Start of the work window (default 08:00 = 480)
    pub day_start: f64,

    /// End of the work window (default 17:00 = 1020)
    pub day_end: f64,

    /// Start of the unpaid lunch break (default 12:00 = 720)
    pub lunch_start: f64,

    /// End of the unpaid lunch break (default 13:00 = 780)
    pub lunch_end: f64,

    /// Weekday carrying the recurring meeting
    pub meeting_day: Weekday,

    /// Minute of day the meeting starts (default 13:30 = 810)
    pub meeting_at: f64,

    /// Fixed deduction applied when the meeting slot is covered
    pub meeting_minutes: f64,
}

impl Default for WorkSchedule {
    fn default() -> Self {
        Self {
            day_start: 8.0 * 60.0,
            day_end: 17.0 * 60.0,
            lunch_start: 12.0 * 60.0,
            lunch_end: 13.0 * 60.0,
            meeting_day: Weekday::Mon,
            meeting_at: 13.0 * 60.0 + 30.0,
            meeting_minutes: 30.0,
        }
    }
}

impl WorkSchedule {
    /// Validate that lunch and meeting sit inside the work window
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1440.0).contains(&self.day_start)
            || !(0.0..=1440.0).contains(&self.day_end)
            || self.day_start >= self.day_end
        {
            return Err(AnalysisError::InvalidConfig(format!(
                "work window must be an increasing range within a day, got {}..{}",
                self.day_start, self.day_end
            )));
        }

        if self.lunch_start > self.lunch_end
            || self.lunch_start < self.day_start
            || self.lunch_end > self.day_end
        {
            return Err(AnalysisError::InvalidConfig(format!(
                "lunch break {}..{} must lie inside the work window",
                self.lunch_start, self.lunch_end
            )));
        }

        if self.meeting_minutes < 0.0
            || self.meeting_at < self.day_start
            || self.meeting_at > self.day_end
        {
            return Err(AnalysisError::InvalidConfig(format!(
                "meeting slot at {} must lie inside the work window",
                self.meeting_at
            )));
        }

        Ok(())
    }

    /// Length of the unpaid lunch break
    pub fn lunch_minutes(&self) -> f64 {
        self.lunch_end - self.lunch_start
    }

    /// Net working minutes between two minute-of-day marks
    ///
    /// Only the part overlapping the work window counts, minus whatever
    /// overlaps the lunch break.
    pub fn window_minutes(&self, from: f64, to: f64) -> f64 {
        let worked = overlap(from, to, self.day_start, self.day_end);
        let lunch = overlap(from, to, self.lunch_start, self.lunch_end);
        (worked - lunch).max(0.0)
    }

    /// Net minutes of a full business day (480 with the defaults)
    pub fn full_day_minutes(&self) -> f64 {
        self.window_minutes(self.day_start, self.day_end)
    }

    /// Meeting deduction for a time-of-day window on `date`
    pub fn meeting_deduction(&self, date: NaiveDate, from: f64, to: f64) -> f64 {
        if date.weekday() == self.meeting_day && from <= self.meeting_at && to >= self.meeting_at
        {
            self.meeting_minutes
        } else {
            0.0
        }
    }
}

fn overlap(from: f64, to: f64, lo: f64, hi: f64) -> f64 {
    (to.min(hi) - from.max(lo)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let schedule = WorkSchedule::default();
        assert_eq!(schedule.full_day_minutes(), 480.0);
        assert_eq!(schedule.lunch_minutes(), 60.0);
        assert_eq!(schedule.meeting_at, 810.0);
        assert!(schedule.validate().is_ok());
    }

    #[test]
    fn test_window_minutes_clips_to_work_window() {
        let schedule = WorkSchedule::default();
        // 06:00-09:00 only counts 08:00-09:00
        assert_eq!(schedule.window_minutes(360.0, 540.0), 60.0);
        // 11:30-13:30 loses the full lunch hour
        assert_eq!(schedule.window_minutes(690.0, 810.0), 60.0);
        // After hours
        assert_eq!(schedule.window_minutes(1030.0, 1200.0), 0.0);
    }

    #[test]
    fn test_meeting_deduction_only_on_meeting_day() {
        let schedule = WorkSchedule::default();
        let monday = NaiveDate::from_ymd_opt(2021, 9, 6).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2021, 9, 7).unwrap();

        assert_eq!(schedule.meeting_deduction(monday, 480.0, 1020.0), 30.0);
        assert_eq!(schedule.meeting_deduction(monday, 480.0, 809.0), 0.0);
        assert_eq!(schedule.meeting_deduction(monday, 811.0, 1020.0), 0.0);
        assert_eq!(schedule.meeting_deduction(tuesday, 480.0, 1020.0), 0.0);
    }

    #[test]
    fn test_invalid_lunch_outside_window() {
        let schedule = WorkSchedule {
            lunch_start: 400.0,
            ..WorkSchedule::default()
        };
        assert!(schedule.validate().is_err());
    }

    #[test]
    fn test_invalid_inverted_window() {
        let schedule = WorkSchedule {
            day_start: 1020.0,
            day_end: 480.0,
            ..WorkSchedule::default()
        };
        assert!(schedule.validate().is_err());
    }
}
