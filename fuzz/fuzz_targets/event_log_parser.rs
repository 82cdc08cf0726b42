#![no_main]

use dynbottle::csv_input::{parse_interval_csv, parse_point_csv};
use dynbottle::event::point_events_from_intervals;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing must reject bad input with an error, never a panic
        if let Ok(intervals) = parse_interval_csv(input) {
            let _ = point_events_from_intervals(&intervals);
        }
        let _ = parse_point_csv(input);
    }
});
