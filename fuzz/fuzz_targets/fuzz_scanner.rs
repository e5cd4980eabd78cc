#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Walk arbitrary bytes through the container cursor. Malformed input
    // must end the walk cleanly, never panic or read out of bounds.
    let mut file = helpq::scanner::ContainerFile::from_bytes(data.to_vec());
    while file.next_record() {
        while file.next_subrecord() {
            let _ = helpq::scanner::SubrecordTag::decode(file.subrecord_tag());
            let mut buf = [0u8; helpq::scanner::MAX_EDID_LEN];
            let _ = file.read_subrecord(&mut buf);
        }
    }
});
