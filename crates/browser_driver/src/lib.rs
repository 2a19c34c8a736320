//! The browser seam used by the to-do widget harness.
//!
//! Scenario code talks to a page only through [`BrowserDriver`]: navigate,
//! click, fill and locate. Everything it asserts is built from
//! [`ElementHandle`] snapshots by the polling helpers in [`expect`](mod@expect).
//!
//! Two drivers are provided:
//! - [`chrome::ChromeDriver`] drives a real Chrome tab over CDP.
//! - [`simulated::SimulatedWidget`] renders the widget in-process from
//!   [`todo_model::TodoWidget`], resolving the same selector table.

#![allow(
    async_fn_in_trait,
    reason = "drivers are only used through generics on a single task"
)]

use anyhow::Result;
use serde::Deserialize;
use url::Url;

pub mod chrome;
pub mod expect;
mod locator;
pub mod selectors;
pub mod simulated;

pub use expect::{Expect, WaitPolicy, expect};
pub use locator::{Locator, Nth, Target};
pub use selectors::WidgetSelectors;

/// Point-in-time view of one matched element.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ElementHandle {
    /// Rendered text with whitespace runs collapsed and trimmed.
    pub text: String,
    /// Raw `class` attribute.
    pub class: String,
    /// Current value for form controls, empty otherwise.
    #[serde(default)]
    pub value: String,
    pub enabled: bool,
    pub visible: bool,
}

/// Navigation, interaction and element lookup on a single page.
///
/// Every failure is final for the running scenario; drivers do not retry.
/// Waiting for the page to settle is the job of [`expect`](mod@expect).
pub trait BrowserDriver {
    /// Load `url` and wait for the navigation to finish.
    async fn navigate(&mut self, url: &Url) -> Result<()>;

    /// Click the single element the locator resolves to.
    async fn click(&mut self, locator: &Locator) -> Result<()>;

    /// Replace the value of the single input the locator resolves to.
    async fn fill(&mut self, locator: &Locator, text: &str) -> Result<()>;

    /// Snapshot the elements the locator refers to, in document order,
    /// after its [`Nth`] position is applied.
    async fn locate(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>>;
}

/// Collapse whitespace runs to a single space and trim.
pub fn normalize_text(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
