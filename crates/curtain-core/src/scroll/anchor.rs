//! In-page anchor interception
//!
//! Resolves a click on an anchor element into a scroll decision: smooth
//! scroll to the target (minus the header offset), fall through to the
//! default jump for opted-out anchors, or ignore the click entirely.

use tracing::debug;

use crate::config::{MarkerConfig, ScrollConfig};
use crate::page::{Document, NodeId};

/// What a click on an anchor should do
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// Not an in-page anchor click we handle
    Ignored,
    /// Anchor opted out of smooth scrolling; jump straight to the target
    Default { target: f64 },
    /// Intercept: smooth-scroll to the offset and record the fragment
    Smooth { target: f64, fragment: String },
}

/// Resolve a click on the element `anchor`
///
/// Handles only anchors with a fragment href (`#...`). Unknown targets and
/// the bare `#` href are ignored, matching the interception contract.
pub fn resolve_click(
    doc: &Document,
    markers: &MarkerConfig,
    scroll: &ScrollConfig,
    anchor: NodeId,
) -> ClickOutcome {
    let Some(href) = doc.attr(anchor, "href") else {
        return ClickOutcome::Ignored;
    };
    let Some(fragment) = href.strip_prefix('#') else {
        return ClickOutcome::Ignored;
    };
    if fragment.is_empty() {
        return ClickOutcome::Ignored;
    }

    let Some(target) = doc.by_element_id(fragment) else {
        debug!("anchor target #{fragment} not found, ignoring click");
        return ClickOutcome::Ignored;
    };
    let Some(rect) = doc.rect(target) else {
        return ClickOutcome::Ignored;
    };

    if doc.attr(anchor, &markers.no_smooth_attr).is_some() {
        return ClickOutcome::Default {
            target: rect.top.max(0.0),
        };
    }

    ClickOutcome::Smooth {
        target: (rect.top - scroll.header_offset).max(0.0),
        fragment: format!("#{fragment}"),
    }
}
