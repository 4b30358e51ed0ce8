#![no_main]

use libfuzzer_sys::fuzz_target;
use respcheck::dates::{looks_like_date, parse_date_str};

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    let _ = looks_like_date(&s);
    let _ = parse_date_str(&s, None);
});
