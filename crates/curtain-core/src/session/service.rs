//! Page session service
//!
//! The single-threaded owner of the page model and every reveal component.
//! All "concurrency" is interleaved callbacks on one `select!` loop:
//! commands arrive on a channel, timers come due on the session timeline,
//! and a watch channel signals shutdown. Flags have exactly one writer:
//! the engine owns reveal state, the gate owns hero marks, the sequencer
//! owns loader state.

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::observe::{Capabilities, GrowthWatcher, ViewportTracker};
use crate::page::{Document, ElementDef};
use crate::reveal::{
    BeginOutcome, CompletionSource, HeroGate, LoadSequencer, LoaderState, RevealEngine,
};
use crate::scroll::{resolve_click, ClickOutcome, ScrollAnimator};

use super::events::{PageCommand, RevealSource, SessionEvent};
use super::history::History;
use super::timeline::{TimerAction, TimerId, Timeline};

pub struct PageSession {
    config: AppConfig,
    doc: Document,
    tracker: ViewportTracker,
    growth: GrowthWatcher,
    engine: RevealEngine,
    gate: HeroGate,
    sequencer: LoadSequencer,
    animator: ScrollAnimator,
    history: History,
    timeline: Timeline,
    failsafe: Option<TimerId>,
    frame_scheduled: bool,
    event_tx: Option<mpsc::UnboundedSender<SessionEvent>>,
    booted: bool,
}

impl PageSession {
    pub fn new(doc: Document, config: AppConfig, caps: Capabilities) -> Self {
        let mut scroll_config = config.scroll.clone();
        scroll_config.smooth_enabled &= caps.smooth_scroll;

        Self {
            tracker: ViewportTracker::new(&config.reveal, caps.intersection),
            growth: GrowthWatcher::new(&config.markers, caps.mutation),
            engine: RevealEngine::new(&config.markers, &config.reveal),
            gate: HeroGate::new(&config.markers, config.hero.clone()),
            sequencer: LoadSequencer::new(&config.markers, config.loader.clone()),
            animator: ScrollAnimator::new(scroll_config),
            history: History::new(),
            timeline: Timeline::new(),
            failsafe: None,
            frame_scheduled: false,
            event_tx: None,
            booted: false,
            doc,
            config,
        }
    }

    /// Set the event sender for timeline observers
    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Replace the history collaborator (hosts that reject manipulation,
    /// pages entered with a fragment)
    pub fn with_history(mut self, history: History) -> Self {
        self.history = history;
        self
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn loader_state(&self) -> LoaderState {
        self.sequencer.state()
    }

    pub fn is_reveal_enabled(&self) -> bool {
        self.engine.is_enabled()
    }

    pub fn hero_gate_active(&self) -> bool {
        self.gate.is_active()
    }

    fn send_event(&self, event: SessionEvent) {
        if let Some(ref tx) = self.event_tx {
            if tx.send(event).is_err() {
                warn!("Failed to send session event: receiver dropped");
            }
        }
    }

    /// Boot sequence, run once: reveal infrastructure, hero gate, anchor
    /// interception, load sequencing — in that order.
    pub fn boot(&mut self) {
        if self.booted {
            return;
        }
        self.booted = true;
        let now = Instant::now();

        let targets = self.doc.with_class(&self.config.markers.reveal_class);
        for id in &targets {
            self.tracker.watch(*id);
        }
        debug!("watching {} reveal targets", targets.len());
        if !self.tracker.is_degraded() {
            // Initial intersection delivery for already-visible targets
            self.schedule_frame();
        }

        self.gate.prepare(&mut self.doc);

        debug!(
            "anchor interception ready (smooth scrolling {})",
            if self.animator.is_smooth() { "on" } else { "off" }
        );

        match self.sequencer.begin(&mut self.doc, &mut self.history, now) {
            BeginOutcome::WithLoader { failsafe } => {
                self.animator.set_position(self.doc.scroll_y());
                self.failsafe = Some(self.timeline.schedule(failsafe, TimerAction::Failsafe));
            }
            BeginOutcome::NoLoader => {
                self.enable_reveal();
            }
        }
    }

    /// Drive the session until shutdown; returns the session for
    /// post-run inspection
    pub async fn run(
        mut self,
        mut shutdown: watch::Receiver<bool>,
        mut commands: mpsc::UnboundedReceiver<PageCommand>,
    ) -> Self {
        self.boot();
        info!("session started");

        loop {
            let deadline = self.timeline.next_deadline();
            let timer = async move {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("session received shutdown signal");
                        break;
                    }
                }

                cmd = commands.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd),
                        None => {
                            debug!("command channel closed");
                            break;
                        }
                    }
                }

                _ = timer => self.fire_due(),
            }
        }

        info!("session stopped");
        self
    }

    fn handle_command(&mut self, cmd: PageCommand) {
        match cmd {
            PageCommand::LoadComplete => self.complete(CompletionSource::Load),
            PageCommand::ScrollTo { y } => {
                let now = Instant::now();
                let max = self.doc.max_scroll();
                self.animator.scroll_to(y, max, now);
                self.sync_scroll();
            }
            PageCommand::ScrollBy { dy } => {
                let max = self.doc.max_scroll();
                self.animator.scroll_by(dy, max);
                self.sync_scroll();
            }
            PageCommand::Click { anchor } => self.handle_click(&anchor),
            PageCommand::Insert { parent, element } => self.handle_insert(parent, element),
            PageCommand::Remove { id } => self.handle_remove(&id),
        }
    }

    fn fire_due(&mut self) {
        let now = Instant::now();
        while let Some(action) = self.timeline.pop_due(now) {
            self.apply_timer(action, now);
        }
    }

    fn apply_timer(&mut self, action: TimerAction, now: Instant) {
        match action {
            TimerAction::Failsafe => {
                self.failsafe = None;
                self.complete(CompletionSource::Failsafe);
            }
            TimerAction::HideLoader => {
                let fade = self.sequencer.mark_hidden(&mut self.doc);
                self.send_event(SessionEvent::LoaderHidden);
                self.timeline.schedule(fade, TimerAction::RemoveLoader);
            }
            TimerAction::RemoveLoader => {
                let removed = self.sequencer.mark_removed(&mut self.doc);
                self.tracker.forget(&removed);
                self.send_event(SessionEvent::LoaderRemoved);
                // Fixed completion order: enable, hero playback, settle pass
                self.enable_reveal();
                self.play_hero();
                self.timeline
                    .schedule(self.sequencer.settle(), TimerAction::SettleEvaluate);
            }
            TimerAction::HeroStep(index) => {
                let Some(node) = self.gate.heroes().get(index).copied() else {
                    return;
                };
                if self
                    .engine
                    .force_reveal(&mut self.doc, &mut self.tracker, node)
                {
                    self.send_event(SessionEvent::Revealed {
                        node,
                        source: RevealSource::Hero,
                    });
                }
                self.gate.clear_mark(&mut self.doc, node);
                self.send_event(SessionEvent::HeroStep { index, node });
            }
            TimerAction::HeroSettle => {
                self.gate.release();
                self.send_event(SessionEvent::GateReleased);
                self.evaluate_and_report();
            }
            TimerAction::SettleEvaluate => self.evaluate_and_report(),
            TimerAction::GrowthPass => {
                self.growth.pass_fired();
                self.evaluate_and_report();
            }
            TimerAction::Frame => {
                self.frame_scheduled = false;
                self.on_frame(now);
            }
        }
    }

    /// Single-fire completion; both the load signal and the failsafe land
    /// here, whichever is first wins and defuses the other.
    fn complete(&mut self, source: CompletionSource) {
        let now = Instant::now();
        let Some(completion) = self.sequencer.complete(now, source) else {
            return;
        };
        if let Some(id) = self.failsafe.take() {
            self.timeline.cancel(id);
        }
        self.send_event(SessionEvent::Completing {
            source,
            elapsed: completion.elapsed,
        });
        self.timeline
            .schedule(completion.hide_delay, TimerAction::HideLoader);
    }

    fn enable_reveal(&mut self) {
        let outcome = self.engine.enable(&mut self.doc, &mut self.tracker, &self.gate);
        self.send_event(SessionEvent::RevealEnabled {
            degraded: outcome.degraded,
        });
        let source = if outcome.degraded {
            RevealSource::Immediate
        } else {
            RevealSource::Evaluate
        };
        for node in outcome.revealed {
            self.send_event(SessionEvent::Revealed { node, source });
        }
    }

    fn play_hero(&mut self) {
        let Some(schedule) = self.gate.play() else {
            return;
        };
        for step in &schedule.steps {
            self.timeline.schedule(step.at, TimerAction::HeroStep(step.index));
        }
        self.timeline
            .schedule(schedule.release_at, TimerAction::HeroSettle);
    }

    fn evaluate_and_report(&mut self) {
        let revealed = self
            .engine
            .evaluate_all(&mut self.doc, &mut self.tracker, &self.gate);
        for node in revealed {
            self.send_event(SessionEvent::Revealed {
                node,
                source: RevealSource::Evaluate,
            });
        }
    }

    fn sweep_and_dispatch(&mut self) {
        let hits = self.tracker.sweep(&self.doc);
        for id in hits {
            if self
                .engine
                .on_intersection(&mut self.doc, &mut self.tracker, &self.gate, id)
            {
                self.send_event(SessionEvent::Revealed {
                    node: id,
                    source: RevealSource::Intersection,
                });
            }
        }
    }

    /// Reflect the animator into the document: jump immediately for
    /// non-smooth scrolls, otherwise start ticking frames
    fn sync_scroll(&mut self) {
        if self.animator.needs_update() {
            self.schedule_frame();
            return;
        }
        let y = self.animator.current();
        if (y - self.doc.scroll_y()).abs() > f64::EPSILON {
            self.doc.set_scroll(y);
            self.send_event(SessionEvent::Scrolled {
                y: self.doc.scroll_y(),
            });
            self.sweep_and_dispatch();
        }
    }

    fn on_frame(&mut self, now: Instant) {
        if self.animator.needs_update() {
            let y = self.animator.update(self.doc.max_scroll(), now);
            self.doc.set_scroll(y);
            if !self.animator.is_animating() {
                self.send_event(SessionEvent::Scrolled {
                    y: self.doc.scroll_y(),
                });
            }
        }
        self.sweep_and_dispatch();
        if self.animator.needs_update() {
            self.schedule_frame();
        }
    }

    fn schedule_frame(&mut self) {
        if self.frame_scheduled {
            return;
        }
        self.frame_scheduled = true;
        self.timeline
            .schedule(self.config.reveal.frame_interval(), TimerAction::Frame);
    }

    fn handle_click(&mut self, anchor: &str) {
        let Some(node) = self.doc.by_element_id(anchor) else {
            debug!("click on unknown element '{anchor}', ignoring");
            return;
        };
        match resolve_click(&self.doc, &self.config.markers, &self.config.scroll, node) {
            ClickOutcome::Ignored => {}
            ClickOutcome::Default { target } => {
                self.doc.set_scroll(target);
                self.animator.set_position(self.doc.scroll_y());
                self.send_event(SessionEvent::Scrolled {
                    y: self.doc.scroll_y(),
                });
                self.sweep_and_dispatch();
            }
            ClickOutcome::Smooth { target, fragment } => {
                if let Err(e) = self.history.replace_fragment(Some(fragment)) {
                    debug!("history replace rejected: {e}");
                }
                let now = Instant::now();
                let max = self.doc.max_scroll();
                self.animator.scroll_to(target, max, now);
                self.sync_scroll();
            }
        }
    }

    fn handle_insert(&mut self, parent: Option<String>, element: ElementDef) {
        let parent_id = match parent {
            Some(ref pid) => match self.doc.by_element_id(pid) {
                Some(p) => p,
                None => {
                    warn!("insert parent '{pid}' not found, dropping batch");
                    return;
                }
            },
            None => self.doc.root(),
        };
        let inserted = match self.doc.insert(parent_id, &element) {
            Ok(ids) => ids,
            Err(e) => {
                warn!("insert failed: {e}");
                return;
            }
        };
        let watched = self
            .growth
            .on_insertion(&self.doc, &mut self.tracker, &inserted);
        self.send_event(SessionEvent::Inserted {
            nodes: inserted.len(),
            watched,
        });

        if self.growth.is_enabled()
            && !self.tracker.is_degraded()
            && self.engine.is_enabled()
            && self.growth.request_pass()
        {
            self.timeline
                .schedule(self.config.reveal.frame_interval(), TimerAction::GrowthPass);
        }
    }

    fn handle_remove(&mut self, id: &str) {
        let Some(node) = self.doc.by_element_id(id) else {
            debug!("remove of unknown element '{id}', ignoring");
            return;
        };
        match self.doc.detach(node) {
            Ok(removed) => {
                self.tracker.forget(&removed);
                self.send_event(SessionEvent::Removed {
                    nodes: removed.len(),
                });
            }
            Err(e) => warn!("remove failed: {e}"),
        }
    }
}
