//! Hero gate controller
//!
//! Hero-section elements are marked before any other reveal logic runs and
//! held back from the ordinary intersection path until loading completes.
//! Playback is a single ordered schedule (one entry per hero element plus a
//! release step) executed by the session timeline, so the total duration is
//! computed in one place rather than implied by the last timer.

use std::time::Duration;

use tracing::debug;

use crate::config::{HeroConfig, MarkerConfig};
use crate::page::{Document, NodeId};

/// Attribute stamped on hero elements while they are gated
const HERO_MARK: &str = "data-hero";

/// One step of hero playback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroStep {
    pub index: usize,
    pub node: NodeId,
    pub at: Duration,
}

/// The full hero playback: staggered steps, then gate release
#[derive(Debug, Clone, PartialEq)]
pub struct HeroSchedule {
    pub steps: Vec<HeroStep>,
    pub release_at: Duration,
}

pub struct HeroGate {
    active: bool,
    prepared: bool,
    played: bool,
    heroes: Vec<NodeId>,
    hero_class: String,
    reveal_class: String,
    config: HeroConfig,
}

impl HeroGate {
    pub fn new(markers: &MarkerConfig, config: HeroConfig) -> Self {
        Self {
            active: false,
            prepared: false,
            played: false,
            heroes: Vec::new(),
            hero_class: markers.hero_class.clone(),
            reveal_class: markers.reveal_class.clone(),
            config,
        }
    }

    /// Mark hero elements and activate the gate; run once, before loading
    /// completes. Without a hero container the gate stays inactive forever.
    pub fn prepare(&mut self, doc: &mut Document) -> usize {
        if self.prepared {
            return self.heroes.len();
        }
        self.prepared = true;

        let Some(container) = doc.with_class(&self.hero_class).into_iter().next() else {
            debug!("no hero container, gate stays inactive");
            return 0;
        };

        self.heroes = doc.descendants_with_class(container, &self.reveal_class);
        for id in &self.heroes {
            doc.set_attr(*id, HERO_MARK, "1");
        }
        self.active = !self.heroes.is_empty();
        debug!("hero gate prepared: {} gated elements", self.heroes.len());
        self.heroes.len()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn heroes(&self) -> &[NodeId] {
        &self.heroes
    }

    /// Whether the tracker path must refuse to reveal this element
    pub fn is_gated(&self, doc: &Document, id: NodeId) -> bool {
        self.active && doc.attr(id, HERO_MARK).is_some()
    }

    /// Build the staggered playback; run once, after loading completes
    ///
    /// Step i fires at `i × stagger`; the gate releases at
    /// `count × stagger + settle`.
    pub fn play(&mut self) -> Option<HeroSchedule> {
        if self.played {
            return None;
        }
        self.played = true;

        if !self.active || self.heroes.is_empty() {
            self.active = false;
            return None;
        }

        let stagger = self.config.stagger();
        let steps = self
            .heroes
            .iter()
            .enumerate()
            .map(|(index, node)| HeroStep {
                index,
                node: *node,
                at: stagger * index as u32,
            })
            .collect();
        Some(HeroSchedule {
            steps,
            release_at: stagger * self.heroes.len() as u32 + self.config.settle(),
        })
    }

    /// Clear the hero mark once the element's playback step has fired
    pub fn clear_mark(&mut self, doc: &mut Document, id: NodeId) {
        doc.remove_attr(id, HERO_MARK);
    }

    /// Deactivate the gate after the settle step
    pub fn release(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{ElementDef, PageDef};

    fn hero_page(hero_children: usize) -> Document {
        let children = (0..hero_children)
            .map(|i| ElementDef {
                id: Some(format!("hero-{i}")),
                classes: vec!["reveal".to_string()],
                attrs: Default::default(),
                top: 50.0 * i as f64,
                height: 40.0,
                children: Vec::new(),
            })
            .collect();
        let def = PageDef {
            viewport_height: 800.0,
            elements: vec![
                ElementDef {
                    id: Some("hero".to_string()),
                    classes: vec!["hero".to_string()],
                    attrs: Default::default(),
                    top: 0.0,
                    height: 600.0,
                    children,
                },
                ElementDef {
                    id: Some("below".to_string()),
                    classes: vec!["reveal".to_string()],
                    attrs: Default::default(),
                    top: 900.0,
                    height: 100.0,
                    children: Vec::new(),
                },
            ],
        };
        Document::from_def(&def).unwrap()
    }

    fn gate() -> HeroGate {
        HeroGate::new(&MarkerConfig::default(), HeroConfig::default())
    }

    #[test]
    fn test_prepare_marks_only_hero_descendants() {
        let mut doc = hero_page(3);
        let mut gate = gate();
        assert_eq!(gate.prepare(&mut doc), 3);
        assert!(gate.is_active());

        for id in gate.heroes() {
            assert!(gate.is_gated(&doc, *id));
        }
        let below = doc.by_element_id("below").unwrap();
        assert!(!gate.is_gated(&doc, below));
    }

    #[test]
    fn test_no_hero_container_stays_inactive() {
        let mut doc = Document::new(800.0);
        let mut gate = gate();
        assert_eq!(gate.prepare(&mut doc), 0);
        assert!(!gate.is_active());
        assert!(gate.play().is_none());
    }

    #[test]
    fn test_schedule_timing() {
        let mut doc = hero_page(4);
        let mut gate = gate();
        gate.prepare(&mut doc);

        let schedule = gate.play().unwrap();
        assert_eq!(schedule.steps.len(), 4);
        for (i, step) in schedule.steps.iter().enumerate() {
            assert_eq!(step.index, i);
            assert_eq!(step.at, Duration::from_millis(120 * i as u64));
        }
        // 4 × 120 + 220
        assert_eq!(schedule.release_at, Duration::from_millis(700));
    }

    #[test]
    fn test_play_fires_once() {
        let mut doc = hero_page(2);
        let mut gate = gate();
        gate.prepare(&mut doc);
        assert!(gate.play().is_some());
        assert!(gate.play().is_none());
    }

    #[test]
    fn test_release_ungates() {
        let mut doc = hero_page(1);
        let mut gate = gate();
        gate.prepare(&mut doc);
        let hero = gate.heroes()[0];
        assert!(gate.is_gated(&doc, hero));
        gate.release();
        assert!(!gate.is_gated(&doc, hero));
    }

    #[test]
    fn test_clear_mark_ungates_single_element() {
        let mut doc = hero_page(2);
        let mut gate = gate();
        gate.prepare(&mut doc);
        let first = gate.heroes()[0];
        let second = gate.heroes()[1];
        gate.clear_mark(&mut doc, first);
        assert!(!gate.is_gated(&doc, first));
        assert!(gate.is_gated(&doc, second));
    }
}
