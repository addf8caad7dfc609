#![no_main]

use libfuzzer_sys::fuzz_target;
use logwarden_analyzer::rule::RuleLoader;

fuzz_target!(|data: &[u8]| {
    let yaml = String::from_utf8_lossy(data);

    // 임의의 YAML 입력에 대해 Ok 또는 Err만 반환해야 한다
    let _ = RuleLoader::parse_yaml(&yaml, "fuzz.yml");
});
