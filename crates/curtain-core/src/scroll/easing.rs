//! Pure easing functions for smooth scrolling animations
//!
//! Maps input [0, 1] to output [0, 1] with various acceleration curves.

use serde::{Deserialize, Serialize};

/// Easing curve applied to scroll animation progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EasingType {
    /// Jump to the target at the end of the duration
    None,
    Linear,
    #[default]
    Cubic,
    Quintic,
    EaseOut,
}

impl EasingType {
    /// Apply the easing function to a progress value in [0, 1]
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::None => {
                if t < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
            EasingType::Linear => t,
            EasingType::Cubic => cubic_ease_out(t),
            EasingType::Quintic => quintic_ease_out(t),
            EasingType::EaseOut => exponential_ease_out(t),
        }
    }
}

/// Cubic ease-out: f(t) = 1 - (1-t)³
#[inline]
fn cubic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Quintic ease-out: f(t) = 1 - (1-t)⁵
#[inline]
fn quintic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv * inv
}

/// Exponential ease-out: f(t) = 1 - 2^(-10t)
#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for easing in [
            EasingType::None,
            EasingType::Linear,
            EasingType::Cubic,
            EasingType::Quintic,
            EasingType::EaseOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_monotonic() {
        for easing in [EasingType::Linear, EasingType::Cubic, EasingType::Quintic] {
            let mut prev = 0.0;
            for i in 1..=10 {
                let v = easing.apply(i as f64 / 10.0);
                assert!(v >= prev);
                prev = v;
            }
        }
    }

    #[test]
    fn test_cubic_midpoint() {
        // 1 - 0.5^3 = 0.875
        assert!((EasingType::Cubic.apply(0.5) - 0.875).abs() < 1e-9);
    }

    #[test]
    fn test_serde_lowercase() {
        let parsed: EasingType = toml::from_str::<std::collections::BTreeMap<String, EasingType>>(
            "easing = \"cubic\"",
        )
        .unwrap()["easing"];
        assert_eq!(parsed, EasingType::Cubic);
    }
}
