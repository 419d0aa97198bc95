//! Scenario files
//!
//! A scenario is the scripted environment for a simulated session: timed
//! load signals, scrolling, clicks and structural growth, as `[[step]]`
//! tables in TOML.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use curtain_core::{ElementDef, PageCommand};

#[derive(Debug, Deserialize)]
pub struct ScenarioDef {
    #[serde(default, rename = "step")]
    pub steps: Vec<StepDef>,
}

#[derive(Debug, Deserialize)]
pub struct StepDef {
    /// Milliseconds from scenario start
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: StepAction,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepAction {
    LoadComplete,
    ScrollTo {
        y: f64,
    },
    ScrollBy {
        dy: f64,
    },
    Click {
        anchor: String,
    },
    Insert {
        #[serde(default)]
        parent: Option<String>,
        element: ElementDef,
    },
    Remove {
        id: String,
    },
}

impl StepAction {
    pub fn into_command(self) -> PageCommand {
        match self {
            StepAction::LoadComplete => PageCommand::LoadComplete,
            StepAction::ScrollTo { y } => PageCommand::ScrollTo { y },
            StepAction::ScrollBy { dy } => PageCommand::ScrollBy { dy },
            StepAction::Click { anchor } => PageCommand::Click { anchor },
            StepAction::Insert { parent, element } => PageCommand::Insert { parent, element },
            StepAction::Remove { id } => PageCommand::Remove { id },
        }
    }
}

/// Load a scenario file, steps sorted by time
pub fn load(path: &Path) -> Result<ScenarioDef> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    let mut scenario: ScenarioDef = toml::from_str(&content)
        .with_context(|| format!("parsing scenario {}", path.display()))?;
    scenario.steps.sort_by_key(|s| s.at_ms);
    Ok(scenario)
}

/// The implicit scenario: the page finishes loading immediately
pub fn default_scenario() -> ScenarioDef {
    ScenarioDef {
        steps: vec![StepDef {
            at_ms: 0,
            action: StepAction::LoadComplete,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scenario_steps() {
        let scenario: ScenarioDef = toml::from_str(
            r#"
            [[step]]
            at_ms = 500
            action = "load_complete"

            [[step]]
            at_ms = 1200
            action = "scroll_to"
            y = 900.0

            [[step]]
            at_ms = 3000
            action = "click"
            anchor = "contact-link"

            [[step]]
            at_ms = 2000
            action = "insert"
            [step.element]
            id = "late"
            classes = ["reveal"]
            top = 500.0
            height = 80.0
            "#,
        )
        .unwrap();

        assert_eq!(scenario.steps.len(), 4);
        assert!(matches!(scenario.steps[0].action, StepAction::LoadComplete));
        assert!(matches!(
            scenario.steps[3].action,
            StepAction::Insert { ref parent, .. } if parent.is_none()
        ));
    }

    #[test]
    fn test_default_scenario_completes_immediately() {
        let scenario = default_scenario();
        assert_eq!(scenario.steps.len(), 1);
        assert_eq!(scenario.steps[0].at_ms, 0);
    }
}
