//! Fuzz target: `LineDecoder::feed` followed by command parsing
//!
//! Splits the input at its first byte into two chunks, so partial lines
//! across reads are exercised.  Every yielded line must be bounded and
//! newline-free, and parsing it must never panic.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use oscbridge::app::commands;
use oscbridge::console::codec::{LineDecoder, MAX_LINE_LEN};

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let split = usize::from(split).min(rest.len());
    let (a, b) = rest.split_at(split);

    let mut decoder = LineDecoder::new();
    let mut check = |line: &str| {
        assert!(line.len() <= MAX_LINE_LEN, "line exceeds MAX_LINE_LEN");
        assert!(!line.contains('\n'), "line contains newline");
        let _ = commands::parse(line.trim());
    };
    decoder.feed(a, &mut check);
    decoder.feed(b, &mut check);
    assert!(decoder.pending() <= MAX_LINE_LEN);

    decoder.reset();
    assert_eq!(decoder.pending(), 0);
});
