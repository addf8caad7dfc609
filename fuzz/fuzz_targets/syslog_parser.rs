#![no_main]

use libfuzzer_sys::fuzz_target;
use logwarden_analyzer::parser::SyslogParser;
use logwarden_core::pipeline::LineParser;

fuzz_target!(|data: &[u8]| {
    let parser = SyslogParser;
    let line = String::from_utf8_lossy(data);

    if parser.can_parse(&line) {
        let _ = parser.parse(&line, 1);
    }
});
