//! Scroll animation controller
//!
//! Combines easing and timing to drive the page scroll offset toward a
//! target. `scroll_to`/`scroll_by` set targets, then `update()` is called
//! on each animation frame to get the interpolated offset. Multiple
//! `scroll_by` deltas within one frame are batched.

use std::time::Duration;
use tokio::time::Instant;

use crate::config::ScrollConfig;

use super::easing::EasingType;
use super::timing::{is_complete, lerp, progress};

/// Active scroll animation state
#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: f64,
    to: f64,
    duration: Duration,
    easing: EasingType,
}

/// Scroll animation controller
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    animation: Option<ActiveAnimation>,
    config: ScrollConfig,
    /// Current scroll offset (always up-to-date)
    current: f64,
    /// Pending delta batched across one animation frame
    pending_delta: f64,
}

impl ScrollAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            animation: None,
            config,
            current: 0.0,
            pending_delta: 0.0,
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Whether scroll requests animate rather than jump
    #[inline]
    pub fn is_smooth(&self) -> bool {
        self.config.is_smooth()
    }

    /// Check if there's pending work (animation or batched delta)
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.animation.is_some() || self.pending_delta != 0.0
    }

    /// Final offset once the current animation lands
    pub fn target(&self) -> f64 {
        self.animation.as_ref().map(|a| a.to).unwrap_or(self.current)
    }

    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Set the offset immediately, dropping any animation
    pub fn set_position(&mut self, y: f64) {
        self.animation = None;
        self.current = y;
        self.pending_delta = 0.0;
    }

    /// Animate toward a target offset
    ///
    /// Jumps immediately when smooth scrolling is disabled.
    pub fn scroll_to(&mut self, target: f64, max_scroll: f64, now: Instant) {
        let target = target.clamp(0.0, max_scroll);

        if !self.config.is_smooth() {
            self.current = target;
            self.animation = None;
            return;
        }

        if (self.current - target).abs() < f64::EPSILON {
            self.animation = None;
            return;
        }

        self.animation = Some(ActiveAnimation {
            start: now,
            from: self.current,
            to: target,
            duration: self.config.animation_duration(),
            easing: self.config.easing,
        });
    }

    /// Scroll by a delta (positive = down); batched until the next frame
    pub fn scroll_by(&mut self, delta: f64, max_scroll: f64) {
        if !self.config.is_smooth() {
            self.current = (self.current + delta).clamp(0.0, max_scroll);
            self.animation = None;
            return;
        }

        self.pending_delta += delta;
    }

    /// Advance the animation; returns the current interpolated offset
    pub fn update(&mut self, max_scroll: f64, now: Instant) -> f64 {
        if self.pending_delta != 0.0 {
            let target = (self.target() + self.pending_delta).clamp(0.0, max_scroll);
            self.pending_delta = 0.0;

            if (target - self.current).abs() >= f64::EPSILON {
                self.animation = Some(ActiveAnimation {
                    start: now,
                    from: self.current,
                    to: target,
                    duration: self.config.animation_duration(),
                    easing: self.config.easing,
                });
            }
        }

        if let Some(ref anim) = self.animation {
            if is_complete(anim.start, now, anim.duration) {
                self.current = anim.to.min(max_scroll);
                self.animation = None;
            } else {
                let t = progress(anim.start, now, anim.duration);
                let eased = anim.easing.apply(t);
                self.current = lerp(anim.from, anim.to, eased).min(max_scroll);
            }
        }

        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smooth_config(duration_ms: u64) -> ScrollConfig {
        ScrollConfig {
            smooth_enabled: true,
            animation_duration_ms: duration_ms,
            easing: EasingType::Linear,
            ..Default::default()
        }
    }

    #[test]
    fn test_instant_jump_when_disabled() {
        let config = ScrollConfig {
            smooth_enabled: false,
            ..Default::default()
        };
        let mut animator = ScrollAnimator::new(config);
        animator.scroll_to(100.0, 200.0, Instant::now());
        assert_eq!(animator.current(), 100.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_animation_interpolates() {
        let mut animator = ScrollAnimator::new(smooth_config(100));
        let t0 = Instant::now();
        animator.scroll_to(100.0, 200.0, t0);
        assert!(animator.is_animating());

        let mid = animator.update(200.0, t0 + Duration::from_millis(50));
        assert!((mid - 50.0).abs() < 1e-9);

        let end = animator.update(200.0, t0 + Duration::from_millis(100));
        assert_eq!(end, 100.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_scroll_by_batches() {
        let mut animator = ScrollAnimator::new(smooth_config(100));
        animator.scroll_by(10.0, 200.0);
        animator.scroll_by(10.0, 200.0);
        animator.scroll_by(10.0, 200.0);

        let t0 = Instant::now();
        animator.update(200.0, t0);
        assert_eq!(animator.target(), 30.0);
    }

    #[test]
    fn test_target_clamped_to_max() {
        let mut animator = ScrollAnimator::new(smooth_config(100));
        animator.scroll_to(500.0, 120.0, Instant::now());
        assert!(animator.target() <= 120.0);
    }
}
