#![no_main]

use dynbottle::calendar::HolidaySet;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = HolidaySet::parse_list(input);
    }
});
