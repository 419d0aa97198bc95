//! Viewport intersection math
//!
//! Pure functions over page-coordinate rects and a scrolled viewport.
//! The observation root is the viewport with its bottom edge pulled up by
//! a configurable margin; the geometry fallback pass uses an expanded
//! check with the top edge at a fraction of viewport height.

use super::models::Rect;

/// Element band relative to the viewport top: (top, bottom)
#[inline]
pub fn relative_band(rect: Rect, scroll_y: f64) -> (f64, f64) {
    (rect.top - scroll_y, rect.bottom() - scroll_y)
}

/// Geometry-pass check: bottom at or above zero, top at or above
/// `factor` of viewport height
pub fn in_expanded_viewport(rect: Rect, scroll_y: f64, viewport_height: f64, factor: f64) -> bool {
    let (top, bottom) = relative_band(rect, scroll_y);
    bottom >= 0.0 && top <= viewport_height * factor
}

/// Fraction of the element visible inside `[0, root_bottom]`
///
/// Zero-height elements count as fully visible while their top edge sits
/// inside the root, mirroring observer behavior for zero-area targets.
pub fn visible_ratio(rect: Rect, scroll_y: f64, root_bottom: f64) -> f64 {
    let (top, bottom) = relative_band(rect, scroll_y);
    if rect.height <= 0.0 {
        return if (0.0..=root_bottom).contains(&top) {
            1.0
        } else {
            0.0
        };
    }
    let overlap = bottom.min(root_bottom) - top.max(0.0);
    (overlap / rect.height).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expanded_viewport_bounds() {
        let vh = 800.0;
        // Fully above the viewport
        assert!(!in_expanded_viewport(Rect::new(0.0, 50.0), 200.0, vh, 0.9));
        // Straddling the top edge
        assert!(in_expanded_viewport(Rect::new(180.0, 50.0), 200.0, vh, 0.9));
        // Top exactly at 90% of viewport height
        assert!(in_expanded_viewport(Rect::new(920.0, 50.0), 200.0, vh, 0.9));
        // Just below the 90% line
        assert!(!in_expanded_viewport(Rect::new(921.0, 50.0), 200.0, vh, 0.9));
    }

    #[test]
    fn test_visible_ratio() {
        let root_bottom = 720.0; // 800 * (1 - 0.10)
        // Fully inside
        assert_eq!(visible_ratio(Rect::new(100.0, 100.0), 0.0, root_bottom), 1.0);
        // Half clipped by the viewport top
        let r = visible_ratio(Rect::new(-50.0, 100.0), 0.0, root_bottom);
        assert!((r - 0.5).abs() < 1e-9);
        // Below the shrunk root entirely
        assert_eq!(visible_ratio(Rect::new(730.0, 100.0), 0.0, root_bottom), 0.0);
        // Poking 10 units into the shrunk root
        let r = visible_ratio(Rect::new(710.0, 100.0), 0.0, root_bottom);
        assert!((r - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_zero_height_elements() {
        assert_eq!(visible_ratio(Rect::new(10.0, 0.0), 0.0, 720.0), 1.0);
        assert_eq!(visible_ratio(Rect::new(900.0, 0.0), 0.0, 720.0), 0.0);
    }
}
