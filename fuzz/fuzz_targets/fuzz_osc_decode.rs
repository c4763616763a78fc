//! Fuzz target: `osc::decode`
//!
//! Arbitrary datagrams must never panic the decoder, and anything it
//! accepts must re-encode into a packet that decodes to the same message.
//!
//! cargo fuzz run fuzz_osc_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use oscbridge::osc::{self, MAX_PACKET_SIZE};

fuzz_target!(|data: &[u8]| {
    let Ok(msg) = osc::decode(data) else {
        return;
    };

    let mut buf = [0u8; MAX_PACKET_SIZE];
    let n = osc::encode(&msg, &mut buf).expect("decoded message must re-encode");
    assert_eq!(n % 4, 0, "encoded length must be 4-byte aligned");

    let again = osc::decode(&buf[..n]).expect("re-encoded packet must decode");
    assert_eq!(again.address(), msg.address());
    assert_eq!(again.args().len(), msg.args().len());
});
