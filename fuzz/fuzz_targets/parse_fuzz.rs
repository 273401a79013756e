#![no_main]
use libfuzzer_sys::fuzz_target;
use oxips::ips;

fuzz_target!(|data: &[u8]| {
    // The parser must never panic, only return errors.
    let Ok(patch) = ips::parse(data) else {
        return;
    };

    // Anything that parses re-serializes to a prefix of the input.
    let bytes = ips::serialize(&patch);
    assert_eq!(&data[..bytes.len()], &bytes[..]);
    assert_eq!(ips::parse(&bytes).unwrap(), patch);
});
