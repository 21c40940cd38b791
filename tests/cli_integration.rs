use std::process::Command;
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_wwcodec").to_string()
}

fn stdout_of(args: &[&str]) -> (i32, String) {
    let out = Command::new(bin()).args(args).output().unwrap();
    (
        out.status.code().unwrap_or(-1),
        String::from_utf8(out.stdout).unwrap(),
    )
}

#[test]
fn cli_decompress_hex_to_stdout() {
    let (code, stdout) = stdout_of(&["decompress", "-s", "6", "--hex", "83414243000380"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "414243414243");
}

#[test]
fn cli_decompress_file_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sprite.lcw");
    let output = dir.path().join("sprite.bin");
    std::fs::write(&input, [0xFE, 0x05, 0x00, 0x55, 0x80]).unwrap();

    let st = Command::new(bin())
        .args(["decompress", "--size", "5"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(std::fs::read(&output).unwrap(), vec![0x55; 5]);

    // Refuses to overwrite without --force.
    let st = Command::new(bin())
        .args(["decompress", "--size", "5"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .status()
        .unwrap();
    assert_eq!(st.code(), Some(1));

    let st = Command::new(bin())
        .args(["-f", "decompress", "--size", "5"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
}

#[test]
fn cli_relative_flag() {
    let (code, stdout) = stdout_of(&["decompress", "-s", "7", "-r", "--hex", "8441424344c0030080"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "41424344424344");

    let (code, stdout) = stdout_of(&["decompress", "-s", "7", "--hex", "8441424344c0030080"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "41424344444444");
}

#[test]
fn cli_format40_hex() {
    let (code, stdout) = stdout_of(&["format40", "--hex", "8201ff800000", "41424344"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "4142bc44");
}

#[test]
fn cli_inspect_lists_commands() {
    let (code, stdout) = stdout_of(&["inspect", "--hex", "83414243000380"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("transfer"));
    assert!(stdout.contains("short-copy  count=3 distance=3"));
    assert!(stdout.lines().last().unwrap().ends_with("end"));

    let (code, stdout) = stdout_of(&["inspect", "--codec", "delta", "--hex", "8002c020800000"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("long-fill-xor count=2 value=0x20"));
}

#[test]
fn cli_chain_writes_frames() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("f0.lcw");
    let delta = dir.path().join("f1.lcw");
    let frames = dir.path().join("frames");
    // "ABCD", then an LCW-wrapped delta flipping the third byte.
    std::fs::write(&base, [0x84, 0x41, 0x42, 0x43, 0x44, 0x80]).unwrap();
    std::fs::write(&delta, [0x86, 0x82, 0x01, 0xFF, 0x80, 0x00, 0x00, 0x80]).unwrap();

    let st = Command::new(bin())
        .args(["chain", "-s", "2x2"])
        .arg(format!("base:{}", base.display()))
        .arg(format!("delta:{}", delta.display()))
        .arg("-d")
        .arg(&frames)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(std::fs::read(frames.join("frame_0000.bin")).unwrap(), b"ABCD");
    assert_eq!(
        std::fs::read(frames.join("frame_0001.bin")).unwrap(),
        vec![0x41, 0x42, 0xBC, 0x44]
    );
}

#[test]
fn cli_chain_bad_delta_exits_2() {
    let dir = tempdir().unwrap();
    let delta = dir.path().join("f0.lcw");
    // Delta skipping past the end of a 4-byte canvas.
    std::fs::write(&delta, [0x84, 0x85, 0x80, 0x00, 0x00, 0x80]).unwrap();

    let st = Command::new(bin())
        .args(["chain", "-s", "4"])
        .arg(format!("delta:{}", delta.display()))
        .status()
        .unwrap();
    assert_eq!(st.code(), Some(2));
}

#[test]
fn cli_decode_errors_exit_2() {
    let (code, stdout) = stdout_of(&["decompress", "-s", "3", "--hex", "834142"]);
    assert_eq!(code, 2);
    assert!(stdout.is_empty());

    let (code, _) = stdout_of(&["format40", "--hex", "85800000", "41424344"]);
    assert_eq!(code, 2);

    let (code, _) = stdout_of(&["decompress", "-s", "3", "/nonexistent/input.lcw"]);
    assert_eq!(code, 2);
}

#[test]
fn cli_usage_errors_exit_1() {
    let (code, _) = stdout_of(&["decompress", "--hex", "80"]);
    assert_eq!(code, 1);

    let (code, _) = stdout_of(&["decompress", "-s", "1", "--hex", "abc"]);
    assert_eq!(code, 1);

    let (code, _) = stdout_of(&["decompress", "-s", "100000000M", "--hex", "80"]);
    assert_eq!(code, 1);
}

#[test]
fn cli_self_test_passes() {
    let out = Command::new(bin()).args(["-v", "test"]).output().unwrap();
    assert!(out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("0 failed"));
}

#[test]
fn cli_config_works() {
    let out = Command::new(bin()).arg("config").output().unwrap();
    assert!(out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("LCW_END_MARKER=0x80"));
}
