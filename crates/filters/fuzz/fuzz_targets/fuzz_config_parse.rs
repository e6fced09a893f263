#![no_main]

//! Fuzz target for the sectioned configuration parser.
//!
//! Configuration files are user supplied; parsing must report errors
//! instead of panicking, and anything that parses must survive a render and
//! reparse unchanged.

use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = filters::FilterConfig::parse(text, Path::new("<fuzz>")) else {
        return;
    };

    let set = filters::FilterSet::from_config(&config);
    let rendered = set.to_config().render();
    let reparsed = filters::FilterConfig::parse(&rendered, Path::new("<render>"))
        .expect("rendered configuration parses");
    assert_eq!(filters::FilterSet::from_config(&reparsed), set);
});
