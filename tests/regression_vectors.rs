use fossil_delta::{DeltaStats, apply_delta, create_delta, delta_target_size};

#[derive(Debug)]
struct Vector {
    name: String,
    source: Vec<u8>,
    target: Vec<u8>,
    delta: Vec<u8>,
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
                delta: hex_to_bytes(parts[3]),
            }
        })
        .collect()
}

#[test]
fn vector_database_is_non_empty() {
    let vectors = load_vectors();
    assert!(vectors.len() >= 10);
}

#[test]
fn encoder_output_is_byte_exact() {
    for v in load_vectors() {
        let delta = create_delta(&v.source, &v.target);
        assert_eq!(
            delta,
            v.delta,
            "vector {}: got {:?}, want {:?}",
            v.name,
            String::from_utf8_lossy(&delta),
            String::from_utf8_lossy(&v.delta)
        );
    }
}

#[test]
fn fossil_deltas_decode() {
    for v in load_vectors() {
        let decoded =
            apply_delta(&v.source, &v.delta).unwrap_or_else(|e| panic!("vector {}: {e}", v.name));
        assert_eq!(decoded, v.target, "vector {}", v.name);
    }
}

#[test]
fn fossil_deltas_declare_target_size() {
    for v in load_vectors() {
        assert_eq!(
            delta_target_size(&v.delta).unwrap(),
            v.target.len(),
            "vector {}",
            v.name
        );
    }
}

#[test]
fn fossil_deltas_account_for_every_byte() {
    for v in load_vectors() {
        let stats = DeltaStats::from_delta(&v.delta).unwrap();
        assert_eq!(
            stats.literal_bytes + stats.copied_bytes,
            v.target.len() as u64,
            "vector {}",
            v.name
        );
        assert_eq!(stats.delta_len, v.delta.len());
    }
}

#[test]
fn dropping_last_byte_fails() {
    for v in load_vectors() {
        let truncated = &v.delta[..v.delta.len() - 1];
        assert!(
            apply_delta(&v.source, truncated).is_err(),
            "vector {} decoded without its terminator",
            v.name
        );
    }
}
