use oxips::ips::{self, Patch, Variant};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let source = b"Hello from the original build, v1.0".to_vec();
    let mut target = source.clone();
    target[32..35].copy_from_slice(b"2.0");
    target.extend_from_slice(b" (patched)");

    let patch = Patch::create(&source, &target);
    let bytes = patch.to_bytes();

    let parsed = ips::parse(&bytes)?;
    let restored = ips::apply_to_vec(&parsed, &source)?;
    assert_eq!(restored, target);

    let stats = parsed.stats();
    println!(
        "{} patch: {} records ({} literal, {} rle), {} bytes on the wire",
        parsed.variant(),
        stats.records,
        stats.literal_records,
        stats.rle_records,
        bytes.len()
    );

    // Hand-built patches work the same way.
    let mut manual = Patch::new(Variant::Classic);
    manual.add_record(0, &b"J"[..], None)?;
    manual.add_record(1, vec![b'o'], Some(3))?;
    let out = ips::apply_to_vec(&manual, b"Hello")?;
    println!("{}", String::from_utf8_lossy(&out));

    Ok(())
}
