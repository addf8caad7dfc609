#![no_main]

use libfuzzer_sys::fuzz_target;
use logwarden_analyzer::rule::RuleEngine;

fuzz_target!(|data: &[u8]| {
    let engine = RuleEngine::new();
    let line = String::from_utf8_lossy(data);

    for detection in engine.analyze_line(&line, 1, None) {
        // 신뢰도 불변식은 임의 입력에서도 유지되어야 한다
        assert!((0.1..=1.0).contains(&detection.confidence));
    }
});
