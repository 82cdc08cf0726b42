// Business calendar scenarios on the September 2021 shop-floor calendar
//
// 2021-09-01 is a Wednesday, 2021-09-06 a Monday and 2021-09-20..24 the
// Chuseok holiday week.

use super::*;
use crate::error::AnalysisError;
use chrono::{NaiveDate, NaiveDateTime};

fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn minutes(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    work_minutes(from, to, &HolidaySet::new()).unwrap()
}

fn chuseok() -> HolidaySet {
    HolidaySet::parse_strs(&[
        "2021-09-20",
        "2021-09-21",
        "2021-09-22",
        "2021-09-23",
        "2021-09-24",
    ])
    .unwrap()
}

#[test]
fn test_zero_length_interval() {
    let t = ts(2021, 9, 1, 10, 0);
    assert_eq!(minutes(t, t), 0.0);

    // Monday exactly at the meeting slot must not go negative
    let monday = ts(2021, 9, 6, 13, 30);
    assert_eq!(minutes(monday, monday), 0.0);
}

#[test]
fn test_same_day_morning() {
    assert_eq!(minutes(ts(2021, 9, 1, 9, 0), ts(2021, 9, 1, 11, 0)), 120.0);
}

#[test]
fn test_same_day_crosses_lunch() {
    assert_eq!(minutes(ts(2021, 9, 1, 11, 0), ts(2021, 9, 1, 13, 0)), 60.0);
    assert_eq!(minutes(ts(2021, 9, 1, 12, 0), ts(2021, 9, 1, 13, 0)), 0.0);
}

#[test]
fn test_same_day_partial_lunch_is_not_deducted() {
    // Interval ends inside lunch, so it does not span the break
    assert_eq!(minutes(ts(2021, 9, 1, 11, 0), ts(2021, 9, 1, 12, 30)), 90.0);
}

#[test]
fn test_same_day_monday_meeting() {
    // 5h wall clock - lunch - meeting
    assert_eq!(minutes(ts(2021, 9, 6, 9, 0), ts(2021, 9, 6, 14, 0)), 210.0);
    // Ends before 13:30: no meeting deduction
    assert_eq!(minutes(ts(2021, 9, 6, 9, 0), ts(2021, 9, 6, 13, 0)), 180.0);
    // Same window on a Tuesday only loses lunch
    assert_eq!(minutes(ts(2021, 9, 7, 9, 0), ts(2021, 9, 7, 14, 0)), 240.0);
}

#[test]
fn test_same_day_weekend_is_zero() {
    assert_eq!(minutes(ts(2021, 9, 4, 9, 0), ts(2021, 9, 4, 15, 0)), 0.0);
}

#[test]
fn test_same_day_holiday_is_zero() {
    let worked = work_minutes(ts(2021, 9, 21, 9, 0), ts(2021, 9, 21, 11, 0), &chuseok()).unwrap();
    assert_eq!(worked, 0.0);
}

#[test]
fn test_friday_evening_to_monday_morning() {
    assert_eq!(minutes(ts(2021, 9, 3, 17, 0), ts(2021, 9, 6, 8, 0)), 0.0);
}

#[test]
fn test_weekend_only_span() {
    assert_eq!(minutes(ts(2021, 9, 4, 10, 0), ts(2021, 9, 5, 15, 0)), 0.0);
}

#[test]
fn test_adjacent_business_days() {
    // 16:00-17:00 on Wednesday plus 08:00-09:00 on Thursday
    assert_eq!(minutes(ts(2021, 9, 1, 16, 0), ts(2021, 9, 2, 9, 0)), 120.0);
}

#[test]
fn test_intervening_full_day() {
    // Wed 09:00-17:00 (420 net) + Thu 480 + Fri 08:00-10:00 (120)
    assert_eq!(minutes(ts(2021, 9, 1, 9, 0), ts(2021, 9, 3, 10, 0)), 1020.0);
}

#[test]
fn test_intervening_monday_carries_meeting() {
    // Fri 10:00-17:00 (360) + Mon 450 + Tue 08:00-10:00 (120)
    assert_eq!(minutes(ts(2021, 9, 3, 10, 0), ts(2021, 9, 7, 10, 0)), 930.0);
}

#[test]
fn test_start_before_work_window() {
    assert_eq!(minutes(ts(2021, 9, 1, 6, 0), ts(2021, 9, 2, 8, 0)), 480.0);
}

#[test]
fn test_start_after_work_window() {
    assert_eq!(minutes(ts(2021, 9, 1, 18, 0), ts(2021, 9, 2, 10, 0)), 120.0);
}

#[test]
fn test_end_after_work_window() {
    assert_eq!(minutes(ts(2021, 9, 1, 16, 0), ts(2021, 9, 2, 18, 0)), 540.0);
}

#[test]
fn test_monday_start_day_meeting() {
    // Mon 09:00-17:00 (420 - 30) + Tue 08:00-09:00 (60)
    assert_eq!(minutes(ts(2021, 9, 6, 9, 0), ts(2021, 9, 7, 9, 0)), 450.0);
}

#[test]
fn test_monday_end_day_meeting() {
    // Fri 16:00-17:00 (60) + Mon 08:00-14:00 (300 - 30)
    assert_eq!(minutes(ts(2021, 9, 3, 16, 0), ts(2021, 9, 6, 14, 0)), 330.0);
}

#[test]
fn test_holiday_week_is_skipped() {
    let from = ts(2021, 9, 17, 10, 0);
    let to = ts(2021, 9, 27, 10, 0);

    // Fri 360 + Mon 27th 120, everything between is weekend or holiday
    assert_eq!(work_minutes(from, to, &chuseok()).unwrap(), 480.0);

    // Without holidays the week counts: 360 + 450 + 4 * 480 + 120
    assert_eq!(minutes(from, to), 2850.0);
}

#[test]
fn test_inverted_interval_fails() {
    let err = work_minutes(ts(2021, 9, 1, 11, 0), ts(2021, 9, 1, 9, 0), &HolidaySet::new())
        .unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidInterval { .. }));
}

#[test]
fn test_fractional_minutes() {
    let from = NaiveDate::from_ymd_opt(2021, 9, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let to = NaiveDate::from_ymd_opt(2021, 9, 1)
        .unwrap()
        .and_hms_opt(9, 0, 30)
        .unwrap();
    assert_eq!(minutes(from, to), 0.5);
}

#[test]
fn test_custom_schedule() {
    let schedule = WorkSchedule {
        day_start: 9.0 * 60.0,
        day_end: 18.0 * 60.0,
        ..WorkSchedule::default()
    };
    let calendar = BusinessCalendar::with_schedule(HolidaySet::new(), schedule).unwrap();
    // Wed 17:00-18:00 + Thu 09:00-10:00
    let worked = calendar
        .work_minutes(ts(2021, 9, 1, 17, 0), ts(2021, 9, 2, 10, 0))
        .unwrap();
    assert_eq!(worked, 120.0);
}

#[test]
fn test_raw_minutes_and_minute_of_day() {
    assert_eq!(raw_minutes(ts(2021, 9, 1, 9, 0), ts(2021, 9, 2, 9, 0)), 1440.0);
    assert_eq!(minute_of_day(ts(2021, 9, 1, 13, 30)), 810.0);
}
