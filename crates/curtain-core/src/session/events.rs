//! Session commands and events
//!
//! Commands are the page's inputs (load signal, user scrolling and clicks,
//! structural growth); events are the outward timeline a UI or test
//! harness can subscribe to.

use std::time::Duration;

use crate::page::{ElementDef, NodeId};
use crate::reveal::CompletionSource;

/// Inputs delivered to a running session
#[derive(Debug, Clone)]
pub enum PageCommand {
    /// The page finished loading
    LoadComplete,
    /// Jump or animate to an absolute scroll offset
    ScrollTo { y: f64 },
    /// Scroll by a delta (batched per animation frame when smooth)
    ScrollBy { dy: f64 },
    /// A click on the element with this id
    Click { anchor: String },
    /// Insert a subtree under the element with this id (root when absent)
    Insert {
        parent: Option<String>,
        element: ElementDef,
    },
    /// Detach the element with this id
    Remove { id: String },
}

/// How an element came to be revealed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealSource {
    /// Viewport intersection notification
    Intersection,
    /// Geometry re-evaluation pass
    Evaluate,
    /// Hero playback step
    Hero,
    /// Degraded-mode enablement
    Immediate,
}

/// Notifications emitted while a session runs
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Completion race decided; the hide hold starts now
    Completing {
        source: CompletionSource,
        elapsed: Duration,
    },
    /// Loader hidden after the minimum-display hold
    LoaderHidden,
    /// Loader detached after the fade
    LoaderRemoved,
    /// Reveal path opened
    RevealEnabled { degraded: bool },
    /// An element transitioned to visible
    Revealed { node: NodeId, source: RevealSource },
    /// A hero playback step fired
    HeroStep { index: usize, node: NodeId },
    /// Hero gate released after the settle delay
    GateReleased,
    /// Scroll position settled (instant jump or animation end)
    Scrolled { y: f64 },
    /// An insertion batch was processed
    Inserted { nodes: usize, watched: usize },
    /// A subtree was detached
    Removed { nodes: usize },
}
