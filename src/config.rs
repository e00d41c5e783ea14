//! Environment-driven configuration.
//!
//! - `PARTDFT_WORKERS`: worker count for [`LocalCluster::from_env`](crate::cluster::LocalCluster::from_env).
//!   Defaults to the number of logical CPUs.
//! - `PARTDFT_PAR_SEGMENT_THRESHOLD`: minimum `(end - start) * N` work before a
//!   segment is computed on the Rayon pool (`parallel` feature only).
//!
//! Unparseable or zero values are reported as [`DftError::InvalidConfig`].

use alloc::string::{String, ToString};

use crate::error::DftError;

pub const WORKERS_ENV: &str = "PARTDFT_WORKERS";
pub const PAR_SEGMENT_THRESHOLD_ENV: &str = "PARTDFT_PAR_SEGMENT_THRESHOLD";

/// Work below which a segment stays on the calling thread.
pub const DEFAULT_PAR_SEGMENT_THRESHOLD: usize = 1 << 16;

/// Parse a strictly positive count.
pub fn parse_count(key: &'static str, value: &str) -> Result<usize, DftError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(DftError::InvalidConfig {
            key,
            value: value.to_string(),
        }),
    }
}

fn env_count(key: &'static str) -> Result<Option<usize>, DftError> {
    match std::env::var(key) {
        Ok(v) => parse_count(key, &v).map(Some),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(raw)) => Err(DftError::InvalidConfig {
            key,
            value: String::from(raw.to_string_lossy()),
        }),
    }
}

/// Worker count from `PARTDFT_WORKERS`, else the logical CPU count.
pub fn workers_from_env() -> Result<usize, DftError> {
    Ok(env_count(WORKERS_ENV)?.unwrap_or_else(|| num_cpus::get().max(1)))
}

/// Parallel segment threshold, read from the environment once per process.
#[cfg(feature = "parallel")]
pub fn segment_threshold_from_env() -> Result<usize, DftError> {
    use std::sync::OnceLock;
    static THRESHOLD: OnceLock<Result<usize, DftError>> = OnceLock::new();
    THRESHOLD
        .get_or_init(|| {
            Ok(env_count(PAR_SEGMENT_THRESHOLD_ENV)?.unwrap_or(DEFAULT_PAR_SEGMENT_THRESHOLD))
        })
        .clone()
}

#[cfg(all(feature = "internal-tests", test))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(WORKERS_ENV, " 8 "), Ok(8));
        assert!(parse_count(WORKERS_ENV, "0").is_err());
        assert!(parse_count(WORKERS_ENV, "-3").is_err());
        assert_eq!(
            parse_count(WORKERS_ENV, "many"),
            Err(DftError::InvalidConfig {
                key: WORKERS_ENV,
                value: "many".into()
            })
        );
    }
}
