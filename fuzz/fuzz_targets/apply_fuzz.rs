#![no_main]
use libfuzzer_sys::fuzz_target;
use oxips::ips;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte picks the split between source and patch bytes.
    let split = usize::from(data[0]).min(data.len() - 1);
    let (source, patch_bytes) = data[1..].split_at(split);

    if let Ok(patch) = ips::parse(patch_bytes) {
        // Out-of-order records are an error, never a panic.
        let _ = ips::apply_to_vec(&patch, source);
    }
});
