//! Selectors exposed by the hosted widget.
//!
//! The identifiers are chosen by the widget's authors; they are the only
//! surface the harness relies on. Every field can be overridden from a JSON
//! file, absent fields keep the hosted widget's values.

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Deserialize;

use crate::Locator;

/// Class of a row's status icon once the task is completed.
pub const COMPLETED_ICON_CLASS: &str = "panel-icon has-text-success";

/// Class of a row's status icon while the task is active.
pub const ACTIVE_ICON_CLASS: &str = "panel-icon";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WidgetSelectors {
    /// Text of the landing-page link that opens the widget.
    pub landing_link: String,
    pub panel: String,
    pub panel_heading: String,
    pub add_input: String,
    pub add_button: String,
    pub search_input: String,
    /// Task rows only.
    pub task_items: String,
    /// Task rows, or the sentinel row when nothing is listed.
    pub empty_state: String,
    /// Spans inside each row: status icon first, label last.
    pub task_spans: String,
    pub complete_toggle: String,
    pub clear_completed: String,
    pub notification: String,
}

impl Default for WidgetSelectors {
    fn default() -> Self {
        Self {
            landing_link: "Todo List".to_owned(),
            panel: ".panel".to_owned(),
            panel_heading: ".panel-heading".to_owned(),
            add_input: "#input-add".to_owned(),
            add_button: "#add-btn".to_owned(),
            search_input: "#search".to_owned(),
            task_items: "#panel .todo-item".to_owned(),
            empty_state: ".todo-item".to_owned(),
            task_spans: ".mr-auto span".to_owned(),
            complete_toggle: "svg.svg-inline--fa.fa-circle-check".to_owned(),
            clear_completed: "#clear".to_owned(),
            notification: ".notification".to_owned(),
        }
    }
}

impl WidgetSelectors {
    /// Load overrides from a JSON object of `field: selector` pairs.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read selector file {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Invalid selector file {}", path.display()))
    }

    pub fn landing_link(&self) -> Locator {
        Locator::text(&self.landing_link)
    }

    pub fn panel(&self) -> Locator {
        Locator::css(&self.panel)
    }

    pub fn panel_heading(&self) -> Locator {
        Locator::css(&self.panel_heading)
    }

    pub fn add_input(&self) -> Locator {
        Locator::css(&self.add_input)
    }

    pub fn add_button(&self) -> Locator {
        Locator::css(&self.add_button)
    }

    pub fn search_input(&self) -> Locator {
        Locator::css(&self.search_input)
    }

    pub fn task_items(&self) -> Locator {
        Locator::css(&self.task_items)
    }

    pub fn empty_state(&self) -> Locator {
        Locator::css(&self.empty_state)
    }

    pub fn task_spans(&self) -> Locator {
        Locator::css(&self.task_spans)
    }

    pub fn complete_toggle(&self) -> Locator {
        Locator::css(&self.complete_toggle)
    }

    pub fn clear_completed(&self) -> Locator {
        Locator::css(&self.clear_completed)
    }

    pub fn notification(&self) -> Locator {
        Locator::css(&self.notification)
    }
}
