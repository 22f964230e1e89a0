//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use marine_gateway::Timestamp;

/// Fixed timestamp used where the value itself is not under test
pub fn test_timestamp() -> Timestamp {
    Timestamp::from_millis(1_700_000_000_000)
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}
