// Business-calendar elapsed time
//
// Converts wall-clock intervals into working-time minutes. A business day is
// Monday to Friday minus the configured holidays; within a day only the work
// window counts, lunch is unpaid and the weekly meeting slot is deducted.

mod holidays;
mod schedule;
mod worktime;

pub use holidays::HolidaySet;
pub use schedule::WorkSchedule;
pub use worktime::{minute_of_day, raw_minutes, work_minutes, BusinessCalendar};

#[cfg(test)]
mod tests;
