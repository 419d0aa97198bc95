//! Load sequencer
//!
//! Owns the loader's enable → complete lifecycle. Two timers race to
//! complete it (the page's load signal and a failsafe), guarded so the
//! downstream hide → fade → remove → enable sequence runs exactly once.
//! A minimum-display hold keeps the loader from flashing on fast loads.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::{LoaderConfig, MarkerConfig};
use crate::page::{Document, NodeId};
use crate::session::History;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    Pending,
    Completing,
    Hidden,
    Removed,
}

/// Which side of the completion race fired first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionSource {
    Load,
    Failsafe,
}

/// Outcome of starting the sequencer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BeginOutcome {
    /// Loader found; the failsafe should be armed with this delay
    WithLoader { failsafe: Duration },
    /// No loader in the document; skip straight to enablement
    NoLoader,
}

/// A completion that won the race
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Completion {
    pub elapsed: Duration,
    pub hide_delay: Duration,
}

pub struct LoadSequencer {
    state: LoaderState,
    loader: Option<NodeId>,
    started: Instant,
    fired: bool,
    config: LoaderConfig,
    loading_class: String,
    hide_class: String,
    loader_id: String,
}

impl LoadSequencer {
    pub fn new(markers: &MarkerConfig, config: LoaderConfig) -> Self {
        Self {
            state: LoaderState::Pending,
            loader: None,
            started: Instant::now(),
            fired: false,
            config,
            loading_class: markers.loading_class.clone(),
            hide_class: markers.hide_class.clone(),
            loader_id: markers.loader_id.clone(),
        }
    }

    /// Start load sequencing
    ///
    /// With a loader present: mark the root as loading, switch scroll
    /// restoration to manual and strip any location fragment (host
    /// rejections are ignored), reset the scroll offset, and report the
    /// failsafe delay to arm. Without one, loading orchestration is
    /// skipped entirely.
    pub fn begin(&mut self, doc: &mut Document, history: &mut History, now: Instant) -> BeginOutcome {
        let Some(loader) = doc.by_element_id(&self.loader_id) else {
            debug!("no loader node, skipping load orchestration");
            return BeginOutcome::NoLoader;
        };
        self.loader = Some(loader);
        self.started = now;

        doc.add_class(doc.root(), &self.loading_class);

        if let Err(e) = history.set_manual_restoration() {
            debug!("scroll restoration unavailable: {e}");
        }
        if history.fragment().is_some() {
            if let Err(e) = history.replace_fragment(None) {
                debug!("fragment strip rejected: {e}");
            }
        }
        doc.set_scroll(0.0);

        BeginOutcome::WithLoader {
            failsafe: self.config.failsafe(),
        }
    }

    /// First completion wins; later calls are no-ops
    ///
    /// Returns the delay to hold the loader visible so it stays up for at
    /// least the minimum-display duration.
    pub fn complete(&mut self, now: Instant, source: CompletionSource) -> Option<Completion> {
        if self.fired || self.loader.is_none() {
            debug!("completion via {source:?} ignored");
            return None;
        }
        self.fired = true;
        self.state = LoaderState::Completing;

        let elapsed = now.saturating_duration_since(self.started);
        let hide_delay = hide_delay(elapsed, self.config.min_show());
        info!("load completed via {source:?} after {}ms", elapsed.as_millis());
        Some(Completion { elapsed, hide_delay })
    }

    /// Apply the hide marking; returns the fade duration to wait out
    pub fn mark_hidden(&mut self, doc: &mut Document) -> Duration {
        self.state = LoaderState::Hidden;
        if let Some(loader) = self.loader {
            doc.add_class(loader, &self.hide_class);
        }
        doc.remove_class(doc.root(), &self.loading_class);
        self.config.fade()
    }

    /// Detach the loader node; returns the removed ids for tracker cleanup
    pub fn mark_removed(&mut self, doc: &mut Document) -> Vec<NodeId> {
        self.state = LoaderState::Removed;
        let Some(loader) = self.loader.take() else {
            return Vec::new();
        };
        match doc.detach(loader) {
            Ok(removed) => removed,
            Err(e) => {
                debug!("loader already gone: {e}");
                Vec::new()
            }
        }
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    pub fn settle(&self) -> Duration {
        self.config.settle()
    }
}

/// Remainder of the minimum-display duration
#[inline]
pub fn hide_delay(elapsed: Duration, min_show: Duration) -> Duration {
    min_show.saturating_sub(elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::ElementDef;

    fn loader_doc() -> Document {
        let mut doc = Document::new(800.0);
        doc.insert(
            doc.root(),
            &ElementDef {
                id: Some("loader".to_string()),
                classes: Vec::new(),
                attrs: Default::default(),
                top: 0.0,
                height: 0.0,
                children: Vec::new(),
            },
        )
        .unwrap();
        doc
    }

    fn sequencer() -> LoadSequencer {
        LoadSequencer::new(&MarkerConfig::default(), LoaderConfig::default())
    }

    #[test]
    fn test_hide_delay_math() {
        let min_show = Duration::from_millis(1600);
        assert_eq!(
            hide_delay(Duration::from_millis(400), min_show),
            Duration::from_millis(1200)
        );
        assert_eq!(hide_delay(Duration::from_millis(1600), min_show), Duration::ZERO);
        assert_eq!(hide_delay(Duration::from_millis(9000), min_show), Duration::ZERO);
    }

    #[test]
    fn test_begin_with_loader() {
        let mut doc = loader_doc();
        let mut history = History::new().with_fragment("#services");
        let mut seq = sequencer();

        let outcome = seq.begin(&mut doc, &mut history, Instant::now());
        assert_eq!(
            outcome,
            BeginOutcome::WithLoader {
                failsafe: Duration::from_millis(6000)
            }
        );
        assert!(doc.has_class(doc.root(), "is-loading"));
        assert!(history.manual_restoration());
        assert_eq!(history.fragment(), None);
        assert_eq!(seq.state(), LoaderState::Pending);
    }

    #[test]
    fn test_begin_without_loader() {
        let mut doc = Document::new(800.0);
        let mut history = History::new();
        let mut seq = sequencer();
        assert_eq!(seq.begin(&mut doc, &mut history, Instant::now()), BeginOutcome::NoLoader);
        assert!(!doc.has_class(doc.root(), "is-loading"));
    }

    #[test]
    fn test_begin_survives_unsupported_history() {
        let mut doc = loader_doc();
        let mut history = History::unsupported();
        let mut seq = sequencer();
        let outcome = seq.begin(&mut doc, &mut history, Instant::now());
        assert!(matches!(outcome, BeginOutcome::WithLoader { .. }));
    }

    #[test]
    fn test_completion_races_fire_once() {
        let mut doc = loader_doc();
        let mut history = History::new();
        let mut seq = sequencer();
        let t0 = Instant::now();
        seq.begin(&mut doc, &mut history, t0);

        let first = seq.complete(t0 + Duration::from_millis(400), CompletionSource::Load);
        let completion = first.unwrap();
        assert_eq!(completion.hide_delay, Duration::from_millis(1200));
        assert_eq!(seq.state(), LoaderState::Completing);

        // The loser of the race is a no-op
        assert!(seq
            .complete(t0 + Duration::from_millis(6000), CompletionSource::Failsafe)
            .is_none());
    }

    #[test]
    fn test_slow_load_hides_immediately() {
        let mut doc = loader_doc();
        let mut history = History::new();
        let mut seq = sequencer();
        let t0 = Instant::now();
        seq.begin(&mut doc, &mut history, t0);

        let completion = seq
            .complete(t0 + Duration::from_millis(3000), CompletionSource::Load)
            .unwrap();
        assert_eq!(completion.hide_delay, Duration::ZERO);
    }

    #[test]
    fn test_hide_and_remove_transitions() {
        let mut doc = loader_doc();
        let mut history = History::new();
        let mut seq = sequencer();
        let t0 = Instant::now();
        seq.begin(&mut doc, &mut history, t0);
        seq.complete(t0, CompletionSource::Load);

        let loader = doc.by_element_id("loader").unwrap();
        let fade = seq.mark_hidden(&mut doc);
        assert_eq!(fade, Duration::from_millis(600));
        assert_eq!(seq.state(), LoaderState::Hidden);
        assert!(doc.has_class(loader, "is-hiding"));
        assert!(!doc.has_class(doc.root(), "is-loading"));

        let removed = seq.mark_removed(&mut doc);
        assert_eq!(removed, vec![loader]);
        assert_eq!(seq.state(), LoaderState::Removed);
        assert!(!doc.contains(loader));
    }

    #[test]
    fn test_complete_without_begin_is_noop() {
        let mut seq = sequencer();
        assert!(seq.complete(Instant::now(), CompletionSource::Load).is_none());
    }
}
