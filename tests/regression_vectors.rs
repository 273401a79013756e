use oxips::ips::{self, Patch};

#[derive(Debug)]
struct Vector {
    name: String,
    source: Vec<u8>,
    target: Vec<u8>,
    patch: Vec<u8>,
}

fn hex_to_bytes(s: &str) -> Vec<u8> {
    let s = s.trim();
    if s.is_empty() {
        return Vec::new();
    }
    assert!(
        s.len().is_multiple_of(2),
        "hex string must have even length"
    );
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}

fn load_vectors() -> Vec<Vector> {
    let manifest = include_str!("vectors/manifest.tsv");
    manifest
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|line| {
            let parts: Vec<_> = line.split('|').collect();
            assert_eq!(parts.len(), 4, "invalid vector row: {line}");
            Vector {
                name: parts[0].to_string(),
                source: hex_to_bytes(parts[1]),
                target: hex_to_bytes(parts[2]),
                patch: hex_to_bytes(parts[3]),
            }
        })
        .collect()
}

#[test]
fn vector_database_is_non_empty() {
    let vectors = load_vectors();
    assert!(!vectors.is_empty());
}

#[test]
fn create_matches_expected_bytes() {
    for v in load_vectors() {
        let patch = Patch::create(&v.source, &v.target);
        assert_eq!(patch.to_bytes(), v.patch, "vector {}", v.name);
    }
}

#[test]
fn expected_bytes_apply_to_target() {
    for v in load_vectors() {
        let patch = ips::parse(&v.patch).unwrap_or_else(|e| panic!("vector {}: {e}", v.name));
        let rebuilt = ips::apply_to_vec(&patch, &v.source).unwrap();
        assert_eq!(rebuilt, v.target, "vector {}", v.name);
    }
}

#[test]
fn parse_then_serialize_is_identity() {
    for v in load_vectors() {
        let patch = ips::parse(&v.patch).unwrap();
        assert_eq!(ips::serialize(&patch), v.patch, "vector {}", v.name);
    }
}
