use std::process::Command;
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_fossil-delta").to_string()
}

#[test]
fn cli_encode_decode_roundtrip() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.bin");
    let target = dir.path().join("target.bin");
    let delta = dir.path().join("delta.fd");
    let output = dir.path().join("output.bin");

    std::fs::write(&source, b"abcde12345abcde12345abcde12345abcde12345").unwrap();
    std::fs::write(&target, b"abcdeXXXXXabcde12345abcde12345abcde12345!").unwrap();

    let st = Command::new(bin())
        .arg("--force")
        .args(["encode", "--source"])
        .arg(&source)
        .arg(&target)
        .arg(&delta)
        .status()
        .unwrap();
    assert!(st.success());

    let st = Command::new(bin())
        .arg("--force")
        .args(["decode", "--source"])
        .arg(&source)
        .arg(&delta)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(
        std::fs::read(&output).unwrap(),
        std::fs::read(&target).unwrap()
    );
}

#[test]
fn cli_stdout_matches_library() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.bin");
    let target = dir.path().join("target.bin");
    std::fs::write(&source, [b'a'; 64]).unwrap();
    let mut t = vec![b'a'; 64];
    t.insert(32, b'b');
    std::fs::write(&target, &t).unwrap();

    let out = Command::new(bin())
        .args(["encode", "--source"])
        .arg(&source)
        .arg(&target)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(out.stdout, b"11\nW@W,1:bW@W,1t5XOG;");
}

#[test]
fn cli_refuses_to_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.bin");
    let target = dir.path().join("target.bin");
    let delta = dir.path().join("delta.fd");
    std::fs::write(&source, b"source").unwrap();
    std::fs::write(&target, b"target").unwrap();
    std::fs::write(&delta, b"keep me").unwrap();

    let out = Command::new(bin())
        .args(["encode", "--source"])
        .arg(&source)
        .arg(&target)
        .arg(&delta)
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert_eq!(std::fs::read(&delta).unwrap(), b"keep me");
    assert!(String::from_utf8_lossy(&out.stderr).contains("use -f to overwrite"));
}

#[test]
fn cli_decode_rejects_corrupt_delta() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.bin");
    let delta = dir.path().join("delta.fd");
    let output = dir.path().join("output.bin");
    std::fs::write(&source, b"abcd").unwrap();
    std::fs::write(&delta, b"4\n4:abcd0;").unwrap();

    let out = Command::new(bin())
        .args(["decode", "--source"])
        .arg(&source)
        .arg(&delta)
        .arg(&output)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(!output.exists());
    assert!(String::from_utf8_lossy(&out.stderr).starts_with("fossil-delta: "));

    // Skipping verification accepts the same delta.
    let st = Command::new(bin())
        .args(["decode", "--no-checksum", "--source"])
        .arg(&source)
        .arg(&delta)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(std::fs::read(&output).unwrap(), b"abcd");
}

#[test]
fn cli_size_and_print() {
    let dir = tempdir().unwrap();
    let delta = dir.path().join("delta.fd");
    std::fs::write(&delta, b"11\nW@W,1:bW@W,1t5XOG;").unwrap();

    let out = Command::new(bin()).arg("size").arg(&delta).output().unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "65");

    let out = Command::new(bin()).arg("print").arg(&delta).output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.starts_with("TARGET 65\n"));
    assert_eq!(text.matches("COPY").count(), 2);
    assert!(text.contains("INSERT 1"));
}

#[test]
fn cli_json_stats() {
    let dir = tempdir().unwrap();
    let delta = dir.path().join("delta.fd");
    std::fs::write(&delta, b"11\nW@W,1:bW@W,1t5XOG;").unwrap();

    let out = Command::new(bin())
        .args(["--json", "print"])
        .arg(&delta)
        .output()
        .unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stderr).unwrap();
    assert_eq!(json["command"], "print");
    assert_eq!(json["copies"], 2);
    assert_eq!(json["literal_bytes"], 1);
}

#[test]
fn cli_config_works() {
    let out = Command::new(bin()).arg("config").output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("NHASH=16"));
}
