#![no_main]

use libfuzzer_sys::fuzz_target;
use logwarden_analyzer::parser::JsonLogParser;
use logwarden_core::pipeline::LineParser;

fuzz_target!(|data: &[u8]| {
    let parser = JsonLogParser;
    let line = String::from_utf8_lossy(data);

    // can_parse 여부와 무관하게 parse 단독 호출도 안전해야 한다
    let _ = parser.parse(&line, 1);
});
