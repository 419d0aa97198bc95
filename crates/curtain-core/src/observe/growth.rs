//! Document growth watcher
//!
//! Observes insertion batches: newly added elements matching the reveal
//! marker (the inserted node itself and any matching descendants) are
//! registered with the tracker, and one re-evaluation pass is requested,
//! coalesced so at most a single pass is pending at a time. Entirely a
//! no-op when the mutation capability is absent.

use tracing::debug;

use crate::config::MarkerConfig;
use crate::observe::ViewportTracker;
use crate::page::{Document, NodeId};

pub struct GrowthWatcher {
    enabled: bool,
    reveal_class: String,
    /// A coalesced re-evaluation pass is already scheduled
    pass_pending: bool,
}

impl GrowthWatcher {
    pub fn new(markers: &MarkerConfig, enabled: bool) -> Self {
        if !enabled {
            debug!("mutation capability absent, growth watcher disabled");
        }
        Self {
            enabled,
            reveal_class: markers.reveal_class.clone(),
            pass_pending: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Register reveal-eligible nodes from an insertion batch
    ///
    /// `inserted` is the batch in document order, the inserted roots
    /// included. Returns how many elements were newly watched.
    pub fn on_insertion(
        &mut self,
        doc: &Document,
        tracker: &mut ViewportTracker,
        inserted: &[NodeId],
    ) -> usize {
        if !self.enabled {
            return 0;
        }
        let mut watched = 0;
        for id in inserted {
            if doc.has_class(*id, &self.reveal_class) && tracker.watch(*id) {
                watched += 1;
            }
        }
        watched
    }

    /// Request a coalesced re-evaluation pass
    ///
    /// Returns true when the caller should schedule one; false while a
    /// pass is already pending.
    pub fn request_pass(&mut self) -> bool {
        if self.pass_pending {
            return false;
        }
        self.pass_pending = true;
        true
    }

    /// Mark the pending pass as fired
    pub fn pass_fired(&mut self) {
        self.pass_pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RevealConfig;
    use crate::page::ElementDef;

    fn watcher() -> GrowthWatcher {
        GrowthWatcher::new(&MarkerConfig::default(), true)
    }

    fn block() -> ElementDef {
        ElementDef {
            id: None,
            classes: vec!["reveal".to_string()],
            attrs: Default::default(),
            top: 100.0,
            height: 50.0,
            children: vec![
                ElementDef {
                    id: None,
                    classes: vec!["reveal".to_string()],
                    attrs: Default::default(),
                    top: 110.0,
                    height: 10.0,
                    children: Vec::new(),
                },
                ElementDef {
                    id: None,
                    classes: vec!["filler".to_string()],
                    attrs: Default::default(),
                    top: 130.0,
                    height: 10.0,
                    children: Vec::new(),
                },
            ],
        }
    }

    #[test]
    fn test_registers_node_and_matching_descendants() {
        let mut doc = Document::new(800.0);
        let mut tracker = ViewportTracker::new(&RevealConfig::default(), true);
        let mut growth = watcher();

        let inserted = doc.insert(doc.root(), &block()).unwrap();
        let watched = growth.on_insertion(&doc, &mut tracker, &inserted);
        assert_eq!(watched, 2);
        assert_eq!(tracker.watched_count(), 2);
    }

    #[test]
    fn test_disabled_watcher_registers_nothing() {
        let mut doc = Document::new(800.0);
        let mut tracker = ViewportTracker::new(&RevealConfig::default(), true);
        let mut growth = GrowthWatcher::new(&MarkerConfig::default(), false);

        let inserted = doc.insert(doc.root(), &block()).unwrap();
        assert_eq!(growth.on_insertion(&doc, &mut tracker, &inserted), 0);
        assert_eq!(tracker.watched_count(), 0);
    }

    #[test]
    fn test_pass_requests_coalesce() {
        let mut growth = watcher();
        assert!(growth.request_pass());
        assert!(!growth.request_pass());
        assert!(!growth.request_pass());
        growth.pass_fired();
        assert!(growth.request_pass());
    }
}
