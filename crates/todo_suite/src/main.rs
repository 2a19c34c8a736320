//! Runs the to-do widget scenarios in Chrome.

use anyhow::{Result, bail};
use browser_driver::chrome::ChromeSession;
use env_logger::{Builder, Env};
use log::{error, info};
use std::env;
use std::process::exit;
use todo_suite::config::SuiteConfig;
use todo_suite::report::SuiteReport;
use todo_suite::runner::SuiteRunner;
use todo_suite::scenario::Scenario;
use tokio::runtime::Runtime;

/// Parse the `--filter` argument, given the arguments after the program name.
fn parse_filter<I>(args: I) -> Result<Option<String>>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if let Some(rest) = arg.strip_prefix("--filter=") {
            return Ok(Some(rest.to_owned()));
        }
        if arg == "--filter" {
            return match args.next() {
                Some(value) => Ok(Some(value)),
                None => bail!("--filter requires a value"),
            };
        }
    }
    Ok(None)
}

fn run(filter: Option<&str>) -> Result<SuiteReport> {
    let scenarios = Scenario::matching(filter);
    if let Some(needle) = filter {
        if scenarios.is_empty() {
            bail!("no scenario title contains {needle:?}");
        }
        info!("[SUITE] focusing scenarios containing: {needle}");
    }
    let config = SuiteConfig::from_env()?;

    let runtime = Runtime::new()?;
    let report = runtime.block_on(async {
        let mut session = ChromeSession::launch(config.chrome_options()).await?;
        let report = SuiteRunner::new(&config).run(&mut session, &scenarios).await;
        session.close().await?;
        Ok::<_, anyhow::Error>(report)
    })?;

    let path = report.write_to(&config.report_dir)?;
    info!("[SUITE] report written to {}", path.display());
    Ok(report)
}

fn main() {
    let _log_init: Result<(), _> = Builder::from_env(Env::default().filter_or("RUST_LOG", "info"))
        .is_test(false)
        .try_init();
    match parse_filter(env::args().skip(1)).and_then(|filter| run(filter.as_deref())) {
        Ok(report) if report.is_success() => {
            info!("[SUITE] completed: {} scenarios passed", report.passed);
        }
        Ok(report) => {
            for failure in report.failures() {
                error!(
                    "[SUITE] failed: {}: {}",
                    failure.title,
                    failure.error.as_deref().unwrap_or("unknown error")
                );
            }
            exit(1);
        }
        Err(err) => {
            error!("error: {err:#}");
            exit(1);
        }
    }
}
