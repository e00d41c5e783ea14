// Test intent: verifies PARTDFT_WORKERS handling, run in child processes so
// the environment of the parent test binary stays untouched.
#![cfg(feature = "std")]

use std::process::Command;

use partdft::config::{workers_from_env, WORKERS_ENV};
use partdft::LocalCluster;

#[test]
fn print_workers() {
    match LocalCluster::from_env() {
        Ok(cluster) => println!("workers={}", cluster.workers()),
        Err(e) => {
            println!("error={}", e);
            panic!("invalid {}", WORKERS_ENV);
        }
    }
}

// Returns the child's `workers=`/`error=` report and whether it exited cleanly.
// libtest prints `test print_workers ... ` on the same line as the report.
fn run_print_workers(value: Option<&str>) -> (String, bool) {
    let exe = std::env::current_exe().unwrap();
    let mut cmd = Command::new(&exe);
    match value {
        Some(v) => cmd.env(WORKERS_ENV, v),
        None => cmd.env_remove(WORKERS_ENV),
    };
    let output = cmd
        .args(["--exact", "print_workers", "--nocapture", "--test-threads=1"])
        .output()
        .expect("run worker count test");
    let stdout = String::from_utf8(output.stdout).unwrap();
    let report = stdout
        .lines()
        .find_map(|l| {
            let at = l.find("workers=").or_else(|| l.find("error="))?;
            Some(l[at..].trim())
        })
        .unwrap_or_default()
        .to_string();
    (report, output.status.success())
}

#[test]
fn env_sets_worker_count() {
    assert_eq!(run_print_workers(Some("3")), ("workers=3".to_string(), true));
    assert_eq!(run_print_workers(Some(" 12 ")), ("workers=12".to_string(), true));
}

#[test]
fn unset_env_falls_back_to_cpu_count() {
    let (report, ok) = run_print_workers(None);
    assert!(ok, "{}", report);
    let n: usize = report
        .strip_prefix("workers=")
        .and_then(|v| v.parse().ok())
        .expect("worker count line");
    assert!(n >= 1);
}

#[test]
fn invalid_env_values_are_errors() {
    for bad in ["0", "-2", "four"] {
        let (report, ok) = run_print_workers(Some(bad));
        assert!(!ok, "{:?} exited cleanly", bad);
        assert!(report.starts_with("error="), "{:?} gave {:?}", bad, report);
        assert!(report.contains(WORKERS_ENV), "{}", report);
    }
}

#[test]
fn workers_from_env_never_returns_zero() {
    if let Ok(n) = workers_from_env() {
        assert!(n >= 1);
    }
}
