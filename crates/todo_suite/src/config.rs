//! Configuration settings for the to-do widget suite.
//!
//! Values can be loaded from environment variables or constructed
//! programmatically. Browser-specific variables such as `CHROME_BIN` are
//! passed through to the driver untouched.

use core::time::Duration;
use std::env;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use browser_driver::WaitPolicy;
use browser_driver::WidgetSelectors;
use browser_driver::chrome::ChromeOptions;
use url::Url;

/// Landing page hosting the widget link.
pub const DEFAULT_BASE_URL: &str = "https://www.techglobal-training.com/frontend";

/// Runtime configuration for a suite run.
#[derive(Clone, Debug)]
pub struct SuiteConfig {
    /// Page navigated to before every scenario
    pub base_url: Url,
    /// Selector table of the widget under test
    pub selectors: WidgetSelectors,
    /// Assertion wait timeout in milliseconds
    pub wait_ms: u64,
    /// Assertion poll interval in milliseconds
    pub poll_ms: u64,
    /// Navigation timeout in milliseconds
    pub navigation_timeout_ms: u64,
    /// Directory receiving `report.json`
    pub report_dir: PathBuf,
    /// Whether Chrome runs without a window
    pub headless: bool,
}

impl SuiteConfig {
    /// Construct a configuration with default timings.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Landing page of the widget
    /// * `selectors` - Selector table of the widget
    #[must_use]
    pub fn new(base_url: Url, selectors: WidgetSelectors) -> Self {
        Self {
            base_url,
            selectors,
            wait_ms: 5_000,
            poll_ms: 100,
            navigation_timeout_ms: 60_000,
            report_dir: default_report_dir(),
            headless: true,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `TODO_BASE_URL`: landing page (default: [`DEFAULT_BASE_URL`])
    /// - `TODO_LINK_TEXT`: text of the link opening the widget
    /// - `TODO_SELECTORS`: JSON file overriding the selector table
    /// - `TODO_WAIT_MS`: assertion timeout (default: 5000, minimum 1)
    /// - `TODO_POLL_MS`: assertion poll interval (default: 100, minimum 1)
    /// - `TODO_NAV_TIMEOUT_MS`: navigation timeout (default: 60000)
    /// - `TODO_REPORT_DIR`: report directory (default: `target/todo_suite`)
    /// - `TODO_HEADFUL`: set to "1" to show the browser window
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("TODO_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let base_url =
            Url::parse(&base_url).with_context(|| format!("Invalid TODO_BASE_URL {base_url:?}"))?;

        let mut selectors = match lookup("TODO_SELECTORS") {
            Some(path) => WidgetSelectors::from_json_file(&PathBuf::from(path))?,
            None => WidgetSelectors::default(),
        };
        if let Some(link) = lookup("TODO_LINK_TEXT") {
            selectors.landing_link = link;
        }

        let millis = |key: &str| lookup(key).and_then(|val| val.parse::<u64>().ok());
        let mut config = Self::new(base_url, selectors);
        config.wait_ms = millis("TODO_WAIT_MS").unwrap_or(config.wait_ms).max(1);
        config.poll_ms = millis("TODO_POLL_MS").unwrap_or(config.poll_ms).max(1);
        config.navigation_timeout_ms = millis("TODO_NAV_TIMEOUT_MS")
            .unwrap_or(config.navigation_timeout_ms)
            .max(1);
        if let Some(dir) = lookup("TODO_REPORT_DIR") {
            config.report_dir = PathBuf::from(dir);
        }
        config.headless = lookup("TODO_HEADFUL").as_deref() != Some("1");
        Ok(config)
    }

    /// Wait settings used by every assertion.
    #[must_use]
    pub const fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy {
            timeout: Duration::from_millis(self.wait_ms),
            poll_interval: Duration::from_millis(self.poll_ms),
        }
    }

    #[must_use]
    pub const fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// Chrome launch options. The executable is resolved by the driver.
    #[must_use]
    pub fn chrome_options(&self) -> ChromeOptions {
        ChromeOptions {
            headless: self.headless,
            navigation_timeout: self.navigation_timeout(),
            ..ChromeOptions::default()
        }
    }
}

/// `target/todo_suite` under the workspace, or under `CARGO_TARGET_DIR`.
pub fn default_report_dir() -> PathBuf {
    let target = env::var("CARGO_TARGET_DIR").map_or_else(
        // crates/todo_suite -> ../../target
        |_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("..").join("target"),
        PathBuf::from,
    );
    target.join("todo_suite")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write as _;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, val)| ((*key).to_owned(), (*val).to_owned()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() -> Result<()> {
        let config = SuiteConfig::from_lookup(lookup_from(&[]))?;
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.selectors, WidgetSelectors::default());
        assert_eq!(config.wait_policy(), WaitPolicy::default());
        assert_eq!(config.navigation_timeout(), Duration::from_secs(60));
        assert!(config.headless);
        Ok(())
    }

    #[test]
    fn variables_override_defaults() -> Result<()> {
        let config = SuiteConfig::from_lookup(lookup_from(&[
            ("TODO_BASE_URL", "http://localhost:3000/frontend"),
            ("TODO_LINK_TEXT", "Tasks"),
            ("TODO_WAIT_MS", "250"),
            ("TODO_POLL_MS", "0"),
            ("TODO_HEADFUL", "1"),
            ("TODO_REPORT_DIR", "/tmp/todo-report"),
        ]))?;
        assert_eq!(config.base_url.as_str(), "http://localhost:3000/frontend");
        assert_eq!(config.selectors.landing_link, "Tasks");
        assert_eq!(config.wait_policy().timeout, Duration::from_millis(250));
        assert_eq!(config.wait_policy().poll_interval, Duration::from_millis(1));
        assert!(!config.headless);
        assert!(!config.chrome_options().headless);
        assert_eq!(config.report_dir, PathBuf::from("/tmp/todo-report"));
        Ok(())
    }

    #[test]
    fn unparsable_numbers_fall_back() -> Result<()> {
        let config = SuiteConfig::from_lookup(lookup_from(&[("TODO_WAIT_MS", "soon")]))?;
        assert_eq!(config.wait_ms, 5_000);
        Ok(())
    }

    #[test]
    fn invalid_url_is_an_error() {
        let outcome = SuiteConfig::from_lookup(lookup_from(&[("TODO_BASE_URL", "not a url")]));
        assert!(outcome.is_err());
    }

    #[test]
    fn selector_file_is_applied() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(br##"{ "search_input": "#filter" }"##)?;
        let path = file.path().display().to_string();
        let config = SuiteConfig::from_lookup(lookup_from(&[("TODO_SELECTORS", path.as_str())]))?;
        assert_eq!(config.selectors.search_input, "#filter");
        assert_eq!(config.selectors.add_input, "#input-add");
        Ok(())
    }
}
