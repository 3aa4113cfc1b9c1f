#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlmodel::{ParseConfig, XmlParser};

fuzz_target!(|data: &[u8]| {
    let mut parser = XmlParser::with_config(data, ParseConfig::new(64, 1024 * 1024));
    let _ = parser.parse();
});
