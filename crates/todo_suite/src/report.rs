//! Suite results and their JSON artifact.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScenarioOutcome {
    pub title: String,
    pub passed: bool,
    pub duration_ms: u64,
    /// Full error chain of a failed scenario.
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    pub base_url: String,
    pub passed: usize,
    pub failed: usize,
    pub scenarios: Vec<ScenarioOutcome>,
}

impl SuiteReport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: ScenarioOutcome) {
        if outcome.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.scenarios.push(outcome);
    }

    /// At least one scenario ran and none failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.passed > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioOutcome> {
        self.scenarios.iter().filter(|outcome| !outcome.passed)
    }

    /// Write `report.json` into `dir`, creating it if needed.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join("report.json");
        let bytes = serde_json::to_vec_pretty(self)?;
        write_bytes_if_changed(&path, &bytes)?;
        Ok(path)
    }
}

/// Write bytes to a path only if they differ from any existing contents. Returns true if written.
pub fn write_bytes_if_changed(path: &Path, bytes: &[u8]) -> Result<bool> {
    if let Ok(existing) = fs::read(path)
        && existing == bytes
    {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(title: &str, error: Option<&str>) -> ScenarioOutcome {
        ScenarioOutcome {
            title: title.to_owned(),
            passed: error.is_none(),
            duration_ms: 12,
            error: error.map(str::to_owned),
        }
    }

    #[test]
    fn record_counts_outcomes() {
        let mut report = SuiteReport::new("https://example.test/");
        assert!(!report.is_success());
        report.record(outcome("first", None));
        assert!(report.is_success());
        report.record(outcome("second", Some("step failed")));
        assert_eq!((report.passed, report.failed), (1, 1));
        assert!(!report.is_success());
        let failed: Vec<&str> = report.failures().map(|outcome| outcome.title.as_str()).collect();
        assert_eq!(failed, ["second"]);
    }

    #[test]
    fn report_written_once_per_content() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let nested = dir.path().join("todo_suite");
        let mut report = SuiteReport::new("https://example.test/");
        report.record(outcome("first", None));

        let path = report.write_to(&nested)?;
        let written: serde_json::Value = serde_json::from_slice(&fs::read(&path)?)?;
        assert_eq!(written["passed"], 1);
        assert_eq!(written["scenarios"][0]["title"], "first");
        assert!(written["scenarios"][0]["error"].is_null());

        let bytes = serde_json::to_vec_pretty(&report)?;
        assert!(!write_bytes_if_changed(&path, &bytes)?);
        Ok(())
    }
}
