#![no_main]
use libfuzzer_sys::fuzz_target;
use ntp_packet::protocol::{PACKET_SIZE, Response};

fuzz_target!(|data: &[u8]| {
    // Every input must decode or be rejected on length alone.
    match Response::from_bytes(data) {
        Ok(_) => assert_eq!(data.len(), PACKET_SIZE),
        Err(_) => assert_ne!(data.len(), PACKET_SIZE),
    }
});
