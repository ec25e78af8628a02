#![no_main]
use libfuzzer_sys::fuzz_target;
use ntp_packet::protocol::{PACKET_SIZE, ReadBytes, Response};

fuzz_target!(|data: &[u8]| {
    let mut reader = data;
    match reader.read_bytes::<Response>() {
        Ok(response) => {
            assert!(data.len() >= PACKET_SIZE);
            let decoded = Response::from_bytes(&data[..PACKET_SIZE])
                .expect("a full packet always decodes");
            assert_eq!(response, decoded);
        }
        Err(_) => assert!(data.len() < PACKET_SIZE),
    }
});
