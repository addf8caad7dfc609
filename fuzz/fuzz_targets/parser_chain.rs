#![no_main]

use libfuzzer_sys::fuzz_target;
use logwarden_analyzer::parser::ParserChain;

fuzz_target!(|data: &[u8]| {
    let chain = ParserChain::with_defaults();
    let line = String::from_utf8_lossy(data);

    // 크래시나 패닉 없이 Some 또는 None을 반환해야 한다
    let _ = chain.parse_line(&line, 1);
});
