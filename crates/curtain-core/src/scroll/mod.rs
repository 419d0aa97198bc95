//! Smooth scrolling system
//!
//! Easing functions and timing utilities feed a frame-driven animation
//! controller; the anchor resolver turns in-page anchor clicks into scroll
//! decisions.

pub mod anchor;
pub mod easing;
pub mod timing;

mod animation;

pub use anchor::{resolve_click, ClickOutcome};
pub use animation::ScrollAnimator;
pub use easing::EasingType;
