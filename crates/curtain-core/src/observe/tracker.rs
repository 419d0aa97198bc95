//! Viewport membership tracker
//!
//! Wraps viewport-intersection observation over the page model. Membership
//! is a set (idempotent watch/unwatch, never a counter). A sweep pass is
//! edge-triggered: it reports only elements newly crossing the visibility
//! threshold inside the margin-shrunk root, the way an intersection
//! observer delivers entries.
//!
//! When the intersection capability is absent the tracker is degraded:
//! watch/unwatch become no-ops and the reveal engine falls back to
//! immediate reveals on enablement.

use std::collections::HashSet;

use tracing::debug;

use crate::config::RevealConfig;
use crate::page::{geometry, Document, NodeId};

pub struct ViewportTracker {
    enabled: bool,
    threshold: f64,
    bottom_margin: f64,
    watched: HashSet<NodeId>,
    /// Elements currently at or above the threshold (for edge-triggering)
    intersecting: HashSet<NodeId>,
}

impl ViewportTracker {
    pub fn new(config: &RevealConfig, enabled: bool) -> Self {
        if !enabled {
            debug!("intersection capability absent, tracker degraded");
        }
        Self {
            enabled,
            threshold: config.threshold,
            bottom_margin: config.bottom_margin,
            watched: HashSet::new(),
            intersecting: HashSet::new(),
        }
    }

    /// Degraded trackers never observe anything
    pub fn is_degraded(&self) -> bool {
        !self.enabled
    }

    /// Register an element; no-op if degraded or already watched
    pub fn watch(&mut self, id: NodeId) -> bool {
        if !self.enabled {
            return false;
        }
        self.watched.insert(id)
    }

    /// Deregister an element; no-op if not watched
    pub fn unwatch(&mut self, id: NodeId) {
        self.watched.remove(&id);
        self.intersecting.remove(&id);
    }

    pub fn is_watched(&self, id: NodeId) -> bool {
        self.watched.contains(&id)
    }

    pub fn watched_count(&self) -> usize {
        self.watched.len()
    }

    /// Drop membership for nodes detached from the document
    pub fn forget(&mut self, ids: &[NodeId]) {
        for id in ids {
            self.unwatch(*id);
        }
    }

    /// Compute threshold crossings since the last sweep
    ///
    /// Returns newly-intersecting watched elements in id order (ids are
    /// assigned in insertion order, so this matches document age).
    pub fn sweep(&mut self, doc: &Document) -> Vec<NodeId> {
        if !self.enabled {
            return Vec::new();
        }

        let root_bottom = doc.viewport_height() * (1.0 - self.bottom_margin);
        let mut ids: Vec<NodeId> = self.watched.iter().copied().collect();
        ids.sort_unstable();

        let mut entered = Vec::new();
        for id in ids {
            let now_in = doc.rect(id).is_some_and(|rect| {
                geometry::visible_ratio(rect, doc.scroll_y(), root_bottom) >= self.threshold
            });
            if now_in {
                if self.intersecting.insert(id) {
                    entered.push(id);
                }
            } else {
                self.intersecting.remove(&id);
            }
        }
        entered
    }
}
