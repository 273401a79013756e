#![no_main]
use libfuzzer_sys::fuzz_target;
use oxips::ips::{self, Patch};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // Use first byte as control: low bits pick the split point.
    let flags = data[0];
    let payload = &data[1..];
    let split = payload.len() * usize::from(flags & 0x0F) / 16;
    let (source, target) = payload.split_at(split);

    let patch = Patch::create(source, target);
    let bytes = patch.to_bytes();
    assert_eq!(bytes.len(), patch.encoded_len());

    let parsed = ips::parse(&bytes).unwrap();
    assert_eq!(parsed, patch);

    if target.len() >= source.len() {
        let rebuilt = ips::apply_to_vec(&parsed, source).unwrap();
        assert_eq!(rebuilt, target);
    }
});
