#![no_main]

use libfuzzer_sys::fuzz_target;
use locsync::{assert_acyclic, TreeRef};

fuzz_target!(|data: &[u8]| {
    // Each byte pair is (node, parent); parent 0 is the root
    let edges: Vec<(String, TreeRef)> = data
        .chunks_exact(2)
        .map(|pair| {
            let parent = match pair[1] % 32 {
                0 => TreeRef::Root,
                p => TreeRef::code_of(format!("n{p}")),
            };
            (format!("n{}", pair[0] % 32), parent)
        })
        .collect();

    if let Err(err) = assert_acyclic(&edges) {
        assert!(!err.affected().is_empty());
    }
});
