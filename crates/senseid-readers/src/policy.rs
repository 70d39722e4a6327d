//! Normalization policy shared by every reader backend.
//!
//! Out-of-range settings are corrected and reported with a `warn!` event,
//! never turned into errors.

use crate::error::{HardwareError, Result};
use senseid_core::ReaderDetails;
use tracing::warn;

/// Clamp a requested tx power into the reader's own range.
///
/// NaN is treated as a request for the minimum.
pub fn clamp_tx_power(dbm: f64, details: &ReaderDetails) -> f64 {
    let (min, max) = details.tx_power_range();
    if dbm.is_nan() {
        warn!("Invalid power requested, power set to min power: {}", min);
        min
    } else if dbm > max {
        warn!("Power set to max power: {}", max);
        max
    } else if dbm < min {
        warn!("Power set to min power: {}", min);
        min
    } else {
        dbm
    }
}

/// Make sure at least one antenna is enabled.
///
/// An all-disabled configuration gets antenna 1 forced on; an empty one
/// becomes a single enabled antenna.
pub fn normalize_antenna_config(config: &[bool]) -> Vec<bool> {
    if config.is_empty() {
        warn!("Empty antenna configuration. Enabling antenna 1.");
        return vec![true];
    }

    let mut config = config.to_vec();
    if !config.contains(&true) {
        config[0] = true;
        warn!("At least one antenna needs to be active. Enabling antenna 1.");
    }
    config
}

/// Configuration with only antenna 1 enabled, sized for `antenna_count` ports.
pub fn first_antenna_only(antenna_count: usize) -> Vec<bool> {
    let mut config = vec![false; antenna_count.max(1)];
    config[0] = true;
    config
}

/// Reject addresses no driver could use.
pub fn validate_address(address: &str) -> Result<&str> {
    let address = address.trim();
    if address.is_empty() {
        return Err(HardwareError::invalid_address("empty connection address"));
    }
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn details(min: f64, max: f64) -> ReaderDetails {
        ReaderDetails {
            model_name: "Test".to_string(),
            region: "EU".to_string(),
            firmware_version: "1.0".to_string(),
            antenna_count: 4,
            min_tx_power: min,
            max_tx_power: max,
        }
    }

    #[rstest]
    #[case(20.0, 20.0)]
    #[case(10.0, 10.0)]
    #[case(31.5, 31.5)]
    #[case(50.0, 31.5)]
    #[case(-100.0, 10.0)]
    #[case(f64::INFINITY, 31.5)]
    #[case(f64::NEG_INFINITY, 10.0)]
    #[case(f64::NAN, 10.0)]
    fn test_clamp_tx_power(#[case] requested: f64, #[case] expected: f64) {
        assert_eq!(clamp_tx_power(requested, &details(10.0, 31.5)), expected);
    }

    #[rstest]
    #[case(vec![false, false, false], vec![true, false, false])]
    #[case(vec![false, true], vec![false, true])]
    #[case(vec![true], vec![true])]
    #[case(vec![false], vec![true])]
    #[case(vec![], vec![true])]
    fn test_normalize_antenna_config(#[case] requested: Vec<bool>, #[case] expected: Vec<bool>) {
        assert_eq!(normalize_antenna_config(&requested), expected);
    }

    #[rstest]
    #[case(0, vec![true])]
    #[case(1, vec![true])]
    #[case(4, vec![true, false, false, false])]
    fn test_first_antenna_only(#[case] count: usize, #[case] expected: Vec<bool>) {
        assert_eq!(first_antenna_only(count), expected);
    }

    #[test]
    fn test_validate_address() {
        assert_eq!(validate_address(" /dev/ttyACM0 ").unwrap(), "/dev/ttyACM0");
        assert!(matches!(
            validate_address("   "),
            Err(HardwareError::InvalidAddress { .. })
        ));
    }
}
