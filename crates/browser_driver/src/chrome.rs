//! [`BrowserDriver`] backed by a real Chrome tab over CDP.

use core::time::Duration;
use std::env;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context as _, Result, anyhow};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::target::{CreateBrowserContextParams, CreateTargetParams};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt as _;
use log::{error, info, warn};
use tokio::task::JoinHandle;
use tokio::time::{Instant, timeout};
use url::Url;

use crate::{BrowserDriver, ElementHandle, Locator, Target};

/// Clears a form control through the native setter so framework-managed
/// inputs see the change.
const CLEAR_INPUT_FN: &str = r"function() {
    const descriptor = Object.getOwnPropertyDescriptor(Object.getPrototypeOf(this), 'value');
    if (descriptor && descriptor.set) {
        descriptor.set.call(this, '');
    } else {
        this.value = '';
    }
    this.dispatchEvent(new Event('input', { bubbles: true }));
}";

/// Launch settings for the Chrome process.
#[derive(Clone, Debug)]
pub struct ChromeOptions {
    /// Explicit executable; falls back to [`find_chrome_executable`].
    pub executable: Option<PathBuf>,
    pub headless: bool,
    pub window_size: (u32, u32),
    pub navigation_timeout: Duration,
}

impl Default for ChromeOptions {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
            window_size: (1280, 800),
            navigation_timeout: Duration::from_secs(60),
        }
    }
}

/// Finds a Chrome executable, honouring `CHROME_BIN` first.
///
/// Returns `None` when nothing usable is found so chromiumoxide can apply
/// its own detection.
pub fn find_chrome_executable() -> Option<PathBuf> {
    if let Ok(chrome_bin) = env::var("CHROME_BIN") {
        let path = PathBuf::from(&chrome_bin);
        if path.exists() {
            return Some(path);
        }
        warn!("CHROME_BIN={chrome_bin} does not exist, probing PATH");
    }

    for candidate in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(output) = Command::new(candidate).arg("--version").output() {
            // Snap stubs print no version and complain on stderr.
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            if (stdout.contains("Chrome") || stdout.contains("Chromium")) && !stderr.contains("snap") {
                return Some(PathBuf::from(candidate));
            }
        }
    }
    None
}

/// Running browser with its CDP event pump.
pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
    navigation_timeout: Duration,
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

impl ChromeSession {
    /// Launch Chrome and start pumping its events on a background task.
    pub async fn launch(options: ChromeOptions) -> Result<Self> {
        let (width, height) = options.window_size;
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(width, height)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .arg("--disable-sync")
            .arg("--no-first-run")
            .arg("--no-default-browser-check");
        if let Some(executable) = options.executable.or_else(find_chrome_executable) {
            info!("Using Chrome at {}", executable.display());
            builder = builder.chrome_executable(executable);
        }
        if !options.headless {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|err| anyhow!("Browser config error: {err}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("Failed to launch Chrome")?;

        let handler_task = tokio::task::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    error!("Browser event error: {err:?}");
                }
            }
        });

        Ok(Self {
            browser,
            handler: handler_task,
            navigation_timeout: options.navigation_timeout,
        })
    }

    /// Open a tab in a fresh incognito browser context.
    ///
    /// Cookies and storage of one context are invisible to every other, so
    /// each driver starts from the state a first visit would see.
    pub async fn new_driver(&mut self) -> Result<ChromeDriver> {
        let context = self
            .browser
            .create_browser_context(CreateBrowserContextParams::default())
            .await
            .context("Failed to create a browser context")?;
        let params = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context.clone())
            .build()
            .map_err(|err| anyhow!("Target params error: {err}"))?;
        let page = match self.browser.new_page(params).await {
            Ok(page) => page,
            Err(err) => {
                self.dispose_context(context).await;
                return Err(anyhow!("Failed to open a new tab: {err}"));
            }
        };
        Ok(ChromeDriver {
            page,
            context,
            navigation_timeout: self.navigation_timeout,
        })
    }

    /// Close the driver's tab and dispose of its browser context.
    pub async fn release(&mut self, driver: ChromeDriver) -> Result<()> {
        let ChromeDriver { page, context, .. } = driver;
        let closed = page.close().await.context("Failed to close tab");
        self.dispose_context(context).await;
        closed
    }

    async fn dispose_context(&self, context: BrowserContextId) {
        if let Err(err) = self.browser.dispose_browser_context(context).await {
            warn!("Failed to dispose browser context: {err}");
        }
    }

    /// Close the browser process.
    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await.context("Failed to close Chrome")?;
        Ok(())
    }
}

/// One Chrome tab in its own browser context.
pub struct ChromeDriver {
    page: Page,
    context: BrowserContextId,
    navigation_timeout: Duration,
}

/// Quote `text` as an XPath string literal.
fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{text}'");
    }
    if !text.contains('"') {
        return format!("\"{text}\"");
    }
    let parts: Vec<String> = text.split('\'').map(|part| format!("'{part}'")).collect();
    format!("concat({})", parts.join(", \"'\", "))
}

/// XPath matching elements whose own text equals `text`.
fn text_xpath(text: &str) -> String {
    format!("//*[normalize-space(text())={}]", xpath_literal(text.trim()))
}

/// Script that snapshots every element matching `target`.
fn snapshot_script(target: &Target) -> Result<String> {
    let collect = match target {
        Target::Css(selector) => format!(
            "Array.from(document.querySelectorAll({}))",
            serde_json::to_string(selector)?
        ),
        Target::Text(text) => format!(
            r"(() => {{
                const found = document.evaluate({}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
                const nodes = [];
                for (let i = 0; i < found.snapshotLength; i++) nodes.push(found.snapshotItem(i));
                return nodes;
            }})()",
            serde_json::to_string(&text_xpath(text))?
        ),
    };
    Ok(format!(
        r"(() => {{
            return {collect}.map((el) => {{
                const style = window.getComputedStyle(el);
                const rect = el.getBoundingClientRect();
                const raw = el.innerText ?? el.textContent ?? '';
                return {{
                    text: raw.replace(/\s+/g, ' ').trim(),
                    class: el.getAttribute('class') ?? '',
                    value: typeof el.value === 'string' ? el.value : '',
                    enabled: !el.disabled,
                    visible: style.visibility !== 'hidden' && style.display !== 'none'
                        && rect.width > 0 && rect.height > 0,
                }};
            }});
        }})();"
    ))
}

impl ChromeDriver {
    /// Browser context the tab lives in.
    pub const fn context(&self) -> &BrowserContextId {
        &self.context
    }

    async fn elements(&self, locator: &Locator) -> Result<Vec<Element>> {
        let found = match locator.target() {
            Target::Css(selector) => self.page.find_elements(selector.as_str()).await,
            Target::Text(text) => self.page.find_xpaths(text_xpath(text)).await,
        };
        found.with_context(|| format!("Element lookup failed for {locator}"))
    }

    async fn element(&self, locator: &Locator) -> Result<Element> {
        locator.pick_one(self.elements(locator).await?)
    }
}

impl BrowserDriver for ChromeDriver {
    async fn navigate(&mut self, url: &Url) -> Result<()> {
        info!("[NAV] Starting navigation to: {url}");
        let start = Instant::now();

        match timeout(self.navigation_timeout, self.page.goto(url.as_str())).await {
            Ok(Ok(_)) => {}
            Ok(Err(err)) => return Err(anyhow!("Navigation goto failed for {url}: {err}")),
            Err(_) => return Err(anyhow!("Navigation goto timeout for {url}")),
        }

        match timeout(self.navigation_timeout, self.page.wait_for_navigation()).await {
            Ok(Ok(_)) => {
                info!("[NAV] Navigation completed in {:?} for: {url}", start.elapsed());
                Ok(())
            }
            Ok(Err(err)) => Err(anyhow!("Wait for navigation failed for {url}: {err}")),
            Err(_) => Err(anyhow!("Wait for navigation timeout for {url}")),
        }
    }

    async fn click(&mut self, locator: &Locator) -> Result<()> {
        let element = self.element(locator).await?;
        element
            .click()
            .await
            .with_context(|| format!("Click failed on {locator}"))?;
        Ok(())
    }

    async fn fill(&mut self, locator: &Locator, text: &str) -> Result<()> {
        let element = self.element(locator).await?;
        element
            .focus()
            .await
            .with_context(|| format!("Focus failed on {locator}"))?;
        element
            .call_js_fn(CLEAR_INPUT_FN, false)
            .await
            .with_context(|| format!("Clearing {locator} failed"))?;
        if !text.is_empty() {
            element
                .type_str(text)
                .await
                .with_context(|| format!("Typing into {locator} failed"))?;
        }
        Ok(())
    }

    async fn locate(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>> {
        let result = self
            .page
            .evaluate(snapshot_script(locator.target())?)
            .await
            .with_context(|| format!("Snapshot script failed for {locator}"))?;
        let value = result
            .value()
            .ok_or_else(|| anyhow!("Snapshot of {locator} returned no value"))?;
        let all: Vec<ElementHandle> = serde_json::from_value(value.clone())
            .with_context(|| format!("Failed to parse snapshot of {locator}"))?;
        Ok(locator.pick(all))
    }
}
