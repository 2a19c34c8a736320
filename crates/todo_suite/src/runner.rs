//! Runs scenarios, each on its own freshly opened page.

use anyhow::Result;
use browser_driver::chrome::{ChromeDriver, ChromeSession};
use browser_driver::simulated::SimulatedWidget;
use browser_driver::{BrowserDriver, WidgetSelectors};
use log::{error, info, warn};
use todo_model::WidgetRules;
use tokio::time::Instant;
use url::Url;

use crate::config::SuiteConfig;
use crate::page::TodoPage;
use crate::report::{ScenarioOutcome, SuiteReport};
use crate::scenario::Scenario;

/// Source of independent pages, one per scenario.
pub trait DriverFactory {
    type Driver: BrowserDriver;

    async fn open(&mut self) -> Result<Self::Driver>;

    /// Tear down a driver once its scenario is over, pass or fail.
    async fn release(&mut self, driver: Self::Driver) -> Result<()>;
}

impl DriverFactory for ChromeSession {
    type Driver = ChromeDriver;

    async fn open(&mut self) -> Result<ChromeDriver> {
        self.new_driver().await
    }

    async fn release(&mut self, driver: ChromeDriver) -> Result<()> {
        ChromeSession::release(self, driver).await
    }
}

/// Hands out fresh in-process widgets.
pub struct SimulatedFactory {
    pub selectors: WidgetSelectors,
    pub rules: WidgetRules,
}

impl SimulatedFactory {
    pub fn new(selectors: WidgetSelectors) -> Self {
        Self {
            selectors,
            rules: WidgetRules::default(),
        }
    }
}

impl DriverFactory for SimulatedFactory {
    type Driver = SimulatedWidget;

    async fn open(&mut self) -> Result<SimulatedWidget> {
        Ok(SimulatedWidget::with_rules(self.selectors.clone(), self.rules))
    }

    async fn release(&mut self, _driver: SimulatedWidget) -> Result<()> {
        Ok(())
    }
}

pub struct SuiteRunner<'cfg> {
    config: &'cfg SuiteConfig,
}

impl<'cfg> SuiteRunner<'cfg> {
    pub const fn new(config: &'cfg SuiteConfig) -> Self {
        Self { config }
    }

    /// Run `scenarios` in order. Failures are recorded, never propagated.
    pub async fn run<F: DriverFactory>(&self, factory: &mut F, scenarios: &[Scenario]) -> SuiteReport {
        let mut report = SuiteReport::new(self.config.base_url.as_str());
        info!("[SUITE] running {} scenarios against {}", scenarios.len(), self.config.base_url);
        for scenario in scenarios {
            let start = Instant::now();
            let outcome = self.run_one(factory, *scenario).await;
            let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            let error = match outcome {
                Ok(()) => {
                    info!("[SUITE] {} ... ok ({duration_ms} ms)", scenario.title());
                    None
                }
                Err(err) => {
                    error!("[SUITE] {} ... FAILED: {err:#}", scenario.title());
                    Some(format!("{err:#}"))
                }
            };
            report.record(ScenarioOutcome {
                title: scenario.title().to_owned(),
                passed: error.is_none(),
                duration_ms,
                error,
            });
        }
        info!("[SUITE] {} passed, {} failed", report.passed, report.failed);
        report
    }

    /// Fresh page, landing navigation, then the scenario body. The driver
    /// is released whatever the outcome.
    async fn run_one<F: DriverFactory>(&self, factory: &mut F, scenario: Scenario) -> Result<()> {
        info!("[SUITE] {}", scenario.title());
        let driver = factory.open().await?;
        let mut page = TodoPage::new(driver, self.config.selectors.clone(), self.config.wait_policy());
        let outcome = Self::drive(&mut page, &self.config.base_url, scenario).await;
        let released = factory.release(page.into_driver()).await;
        match (outcome, released) {
            (Err(err), Err(release_err)) => {
                warn!("[SUITE] releasing the driver failed: {release_err:#}");
                Err(err)
            }
            (Err(err), Ok(())) => Err(err),
            (Ok(()), released) => released,
        }
    }

    async fn drive<D: BrowserDriver>(page: &mut TodoPage<D>, base_url: &Url, scenario: Scenario) -> Result<()> {
        page.open(base_url).await?;
        scenario.run(page).await
    }
}
