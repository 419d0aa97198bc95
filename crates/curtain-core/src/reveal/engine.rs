//! Reveal engine
//!
//! The single authority over reveal state: every visible-class mutation and
//! every tracker deregistration goes through here. A reveal happens at most
//! once per element; hero-gated elements are refused on the tracker path
//! until the gate releases.

use tracing::{debug, info};

use crate::config::{MarkerConfig, RevealConfig};
use crate::observe::ViewportTracker;
use crate::page::{geometry, Document, NodeId};

use super::hero::HeroGate;

/// Result of enabling the reveal path
#[derive(Debug, Clone)]
pub struct EnableOutcome {
    /// Tracker was degraded; everything eligible was revealed outright
    pub degraded: bool,
    pub revealed: Vec<NodeId>,
}

pub struct RevealEngine {
    enabled: bool,
    reveal_class: String,
    visible_class: String,
    viewport_factor: f64,
}

impl RevealEngine {
    pub fn new(markers: &MarkerConfig, config: &RevealConfig) -> Self {
        Self {
            enabled: false,
            reveal_class: markers.reveal_class.clone(),
            visible_class: markers.visible_class.clone(),
            viewport_factor: config.viewport_factor,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Intersection notification entry point; dropped until enablement
    pub fn on_intersection(
        &mut self,
        doc: &mut Document,
        tracker: &mut ViewportTracker,
        gate: &HeroGate,
        id: NodeId,
    ) -> bool {
        if !self.enabled {
            return false;
        }
        self.reveal(doc, tracker, gate, id)
    }

    /// Reveal an element; idempotent, refuses hero-gated elements
    ///
    /// Detached or unknown ids are treated as not-in-viewport and ignored.
    pub fn reveal(
        &mut self,
        doc: &mut Document,
        tracker: &mut ViewportTracker,
        gate: &HeroGate,
        id: NodeId,
    ) -> bool {
        if !doc.contains(id) || doc.has_class(id, &self.visible_class) {
            return false;
        }
        if gate.is_gated(doc, id) {
            debug!("reveal of {id} refused, hero gate active");
            return false;
        }
        self.apply(doc, tracker, id)
    }

    /// Hero-playback path: reveals regardless of the gate
    pub fn force_reveal(
        &mut self,
        doc: &mut Document,
        tracker: &mut ViewportTracker,
        id: NodeId,
    ) -> bool {
        if !doc.contains(id) || doc.has_class(id, &self.visible_class) {
            return false;
        }
        self.apply(doc, tracker, id)
    }

    fn apply(&mut self, doc: &mut Document, tracker: &mut ViewportTracker, id: NodeId) -> bool {
        doc.add_class(id, &self.visible_class);
        tracker.unwatch(id);
        true
    }

    /// Geometry pass over every eligible, unrevealed, ungated element
    pub fn evaluate_all(
        &mut self,
        doc: &mut Document,
        tracker: &mut ViewportTracker,
        gate: &HeroGate,
    ) -> Vec<NodeId> {
        let mut revealed = Vec::new();
        for id in doc.with_class(&self.reveal_class) {
            if doc.has_class(id, &self.visible_class) || gate.is_gated(doc, id) {
                continue;
            }
            let in_view = doc.rect(id).is_some_and(|rect| {
                geometry::in_expanded_viewport(
                    rect,
                    doc.scroll_y(),
                    doc.viewport_height(),
                    self.viewport_factor,
                )
            });
            if in_view && self.reveal(doc, tracker, gate, id) {
                revealed.push(id);
            }
        }
        revealed
    }

    /// Open the reveal path
    ///
    /// Degraded tracker: every eligible element is marked revealed on the
    /// spot, with no registration traffic. Otherwise one geometry pass
    /// catches elements already in view.
    pub fn enable(
        &mut self,
        doc: &mut Document,
        tracker: &mut ViewportTracker,
        gate: &HeroGate,
    ) -> EnableOutcome {
        if self.enabled {
            return EnableOutcome {
                degraded: tracker.is_degraded(),
                revealed: Vec::new(),
            };
        }
        self.enabled = true;

        if tracker.is_degraded() {
            let mut revealed = Vec::new();
            for id in doc.with_class(&self.reveal_class) {
                if doc.add_class(id, &self.visible_class) {
                    revealed.push(id);
                }
            }
            info!("reveal enabled in degraded mode, {} elements shown", revealed.len());
            return EnableOutcome {
                degraded: true,
                revealed,
            };
        }

        let revealed = self.evaluate_all(doc, tracker, gate);
        info!("reveal enabled, {} elements in view", revealed.len());
        EnableOutcome {
            degraded: false,
            revealed,
        }
    }
}
