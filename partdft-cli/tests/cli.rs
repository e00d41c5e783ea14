use assert_cmd::Command;
use std::fs;

fn parse_rows(stdout: &[u8]) -> Vec<(usize, f64, f64)> {
    String::from_utf8(stdout.to_vec())
        .unwrap()
        .lines()
        .skip(1)
        .map(|l| {
            let mut it = l.split(' ');
            let k = it.next().unwrap().parse().unwrap();
            let re = it.next().unwrap().parse().unwrap();
            let im = it.next().unwrap().parse().unwrap();
            (k, re, im)
        })
        .collect()
}

#[test]
fn transforms_file_input() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("signal.txt");
    fs::write(&path, "1 1\n1 1\n").unwrap();
    let output = Command::cargo_bin("partdft")
        .unwrap()
        .arg(&path)
        .args(["--workers", "3"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rows = parse_rows(&output.stdout);
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].0, 0);
    assert!((rows[0].1 - 4.0).abs() < 1e-10);
    for &(_, re, im) in &rows[1..] {
        assert!(re.abs() < 1e-10 && im.abs() < 1e-10);
    }
}

#[test]
fn reads_stdin_and_writes_csv() {
    let output = Command::cargo_bin("partdft")
        .unwrap()
        .args(["-", "--workers", "2", "--format", "csv"])
        .write_stdin("1,0,0,0\n")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("k,re,im"));
    assert_eq!(lines.count(), 4);
}

#[test]
fn zero_workers_is_an_error() {
    Command::cargo_bin("partdft")
        .unwrap()
        .args(["--workers", "0"])
        .write_stdin("1 2 3")
        .assert()
        .failure();
}

#[test]
fn bad_sample_is_an_error() {
    Command::cargo_bin("partdft")
        .unwrap()
        .args(["--workers", "2"])
        .write_stdin("1 two 3")
        .assert()
        .failure();
}
