//! Presale window arithmetic. All timestamps are Unix seconds.

/// The presale is over once wall-clock time reaches the end timestamp.
pub fn has_ended(end_timestamp: u64, now: u64) -> bool {
    now >= end_timestamp
}

/// Current wall-clock time in Unix seconds.
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_before_end() {
        assert!(!has_ended(1_000, 999));
    }

    #[test]
    fn test_boundary_instant_counts_as_ended() {
        assert!(has_ended(1_000, 1_000));
    }

    #[test]
    fn test_after_end() {
        assert!(has_ended(1_000, 1_001));
    }

    #[test]
    fn test_unset_end_timestamp_is_ended() {
        // A contract that never started the presale reports 0.
        assert!(has_ended(0, unix_now()));
    }

    #[test]
    fn test_far_future_end() {
        assert!(!has_ended(u64::MAX, unix_now()));
    }
}
