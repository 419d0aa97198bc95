use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::info;

use curtain_core::observe::Capabilities;
use curtain_core::reveal::CompletionSource;
use curtain_core::session::RevealSource;
use curtain_core::{parse_page, AppConfig, PageSession, SessionEvent};

use crate::scenario::{self, StepAction};

pub async fn run(
    config: AppConfig,
    page_path: &Path,
    scenario_path: Option<&Path>,
    caps: Capabilities,
    json: bool,
) -> Result<()> {
    let content = std::fs::read_to_string(page_path)
        .with_context(|| format!("reading page {}", page_path.display()))?;
    let doc = parse_page(&content)?;

    let scenario = match scenario_path {
        Some(path) => scenario::load(path)?,
        None => scenario::default_scenario(),
    };

    info!(
        "page: {} reveal targets, {} scenario steps",
        doc.with_class(&config.markers.reveal_class).len(),
        scenario.steps.len()
    );

    // Quiescence horizon: the latest the downstream choreography can still
    // be running, given the scenario's load signal (or the failsafe)
    let hero_total_ms = doc
        .with_class(&config.markers.hero_class)
        .into_iter()
        .next()
        .map(|hero| {
            doc.descendants_with_class(hero, &config.markers.reveal_class).len() as u64
                * config.hero.stagger_ms
                + config.hero.settle_ms
        })
        .unwrap_or(0);
    let completion_ms = scenario
        .steps
        .iter()
        .find(|s| matches!(s.action, StepAction::LoadComplete))
        .map(|s| s.at_ms)
        .unwrap_or(config.loader.failsafe_ms)
        .min(config.loader.failsafe_ms);
    let settle_ms = completion_ms
        + config.loader.min_show_ms
        + config.loader.fade_ms
        + config.loader.settle_ms
        + hero_total_ms;
    let last_step_ms = scenario.steps.last().map(|s| s.at_ms).unwrap_or(0);
    let horizon = Duration::from_millis(
        last_step_ms.max(settle_ms) + config.scroll.animation_duration_ms + 1000,
    );

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let session = PageSession::new(doc, config.clone(), caps).with_event_sender(event_tx);
    let start = Instant::now();
    let handle = tokio::spawn(session.run(shutdown_rx, cmd_rx));

    let printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let at_ms = start.elapsed().as_millis() as u64;
            if json {
                println!("{}", event_json(at_ms, &event));
            } else {
                println!("[{at_ms:>6}ms] {}", describe(&event));
            }
        }
    });

    for step in scenario.steps {
        tokio::time::sleep_until(start + Duration::from_millis(step.at_ms)).await;
        if cmd_tx.send(step.action.into_command()).is_err() {
            break;
        }
    }

    tokio::time::sleep_until(start + horizon).await;
    shutdown_tx
        .send(true)
        .map_err(|_| anyhow::anyhow!("session ended early"))?;
    let session = handle.await.context("session task failed")?;

    let summary = summarize(&config, &session, json);
    // The event sender lives in the session; drop it so the printer drains
    drop(session);
    printer.await.context("printer task failed")?;
    println!("{summary}");
    Ok(())
}

fn summarize(config: &AppConfig, session: &PageSession, json: bool) -> String {
    let doc = session.document();
    let targets = doc.with_class(&config.markers.reveal_class);
    let revealed = targets
        .iter()
        .filter(|id| doc.has_class(**id, &config.markers.visible_class))
        .count();

    if json {
        serde_json::json!({
            "summary": {
                "revealed": revealed,
                "targets": targets.len(),
                "loader": format!("{:?}", session.loader_state()).to_lowercase(),
                "hero_gate_active": session.hero_gate_active(),
                "scroll_y": doc.scroll_y(),
            }
        })
        .to_string()
    } else {
        format!(
            "revealed {revealed}/{} targets, loader {:?}, scroll at {:.0}",
            targets.len(),
            session.loader_state(),
            doc.scroll_y()
        )
    }
}

fn describe(event: &SessionEvent) -> String {
    match event {
        SessionEvent::Completing { source, elapsed } => {
            let via = match source {
                CompletionSource::Load => "load signal",
                CompletionSource::Failsafe => "failsafe",
            };
            format!("loading completed via {via} after {}ms", elapsed.as_millis())
        }
        SessionEvent::LoaderHidden => "loader hidden".to_string(),
        SessionEvent::LoaderRemoved => "loader removed".to_string(),
        SessionEvent::RevealEnabled { degraded: true } => {
            "reveal enabled (degraded: everything shown)".to_string()
        }
        SessionEvent::RevealEnabled { degraded: false } => "reveal enabled".to_string(),
        SessionEvent::Revealed { node, source } => {
            format!("revealed {node} via {}", source_name(*source))
        }
        SessionEvent::HeroStep { index, node } => format!("hero step {index}: {node}"),
        SessionEvent::GateReleased => "hero gate released".to_string(),
        SessionEvent::Scrolled { y } => format!("scrolled to {y:.0}"),
        SessionEvent::Inserted { nodes, watched } => {
            format!("inserted {nodes} nodes ({watched} watched)")
        }
        SessionEvent::Removed { nodes } => format!("removed {nodes} nodes"),
    }
}

fn event_json(at_ms: u64, event: &SessionEvent) -> serde_json::Value {
    let body = match event {
        SessionEvent::Completing { source, elapsed } => serde_json::json!({
            "event": "completing",
            "source": match source {
                CompletionSource::Load => "load",
                CompletionSource::Failsafe => "failsafe",
            },
            "elapsed_ms": elapsed.as_millis() as u64,
        }),
        SessionEvent::LoaderHidden => serde_json::json!({ "event": "loader_hidden" }),
        SessionEvent::LoaderRemoved => serde_json::json!({ "event": "loader_removed" }),
        SessionEvent::RevealEnabled { degraded } => serde_json::json!({
            "event": "reveal_enabled",
            "degraded": degraded,
        }),
        SessionEvent::Revealed { node, source } => serde_json::json!({
            "event": "revealed",
            "node": node.raw(),
            "source": source_name(*source),
        }),
        SessionEvent::HeroStep { index, node } => serde_json::json!({
            "event": "hero_step",
            "index": index,
            "node": node.raw(),
        }),
        SessionEvent::GateReleased => serde_json::json!({ "event": "gate_released" }),
        SessionEvent::Scrolled { y } => serde_json::json!({ "event": "scrolled", "y": y }),
        SessionEvent::Inserted { nodes, watched } => serde_json::json!({
            "event": "inserted",
            "nodes": nodes,
            "watched": watched,
        }),
        SessionEvent::Removed { nodes } => serde_json::json!({
            "event": "removed",
            "nodes": nodes,
        }),
    };
    let mut value = body;
    value["at_ms"] = at_ms.into();
    value
}

fn source_name(source: RevealSource) -> &'static str {
    match source {
        RevealSource::Intersection => "intersection",
        RevealSource::Evaluate => "evaluate",
        RevealSource::Hero => "hero",
        RevealSource::Immediate => "immediate",
    }
}
