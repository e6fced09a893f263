#![no_main]

//! Fuzz target for entity table merging.
//!
//! Merging must never introduce an exclusion that the receiving table did
//! not already hold.

use arbitrary::Arbitrary;
use filters::ObjectFilter;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    left: Vec<(String, bool)>,
    right: Vec<(String, bool)>,
    queries: Vec<(String, Option<String>)>,
}

fn table(entries: &[(String, bool)]) -> ObjectFilter {
    let mut filter = ObjectFilter::new();
    for (name, include) in entries {
        filter.insert(name, *include);
    }
    filter
}

fuzz_target!(|input: Input| {
    let before = table(&input.left);
    let mut merged = before.clone();
    merged.merge(&table(&input.right));

    for (name, predefined) in &input.queries {
        if merged.is_excluded(name, predefined.as_deref()) {
            assert!(before.is_excluded(name, predefined.as_deref()));
        }
    }
});
