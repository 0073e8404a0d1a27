#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz format detection on arbitrary input.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = cvrf_tools::parsers::detect_format(s);
    }
});
