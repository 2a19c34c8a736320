//! Page object for the to-do widget.
//!
//! Every action is mirrored into a shadow [`TodoWidget`], so the expected
//! page state is always derived from the behavior model rather than
//! restated by each scenario.

use anyhow::{Context as _, Result};
use browser_driver::selectors::{ACTIVE_ICON_CLASS, COMPLETED_ICON_CLASS};
use browser_driver::{BrowserDriver, Expect, Locator, WaitPolicy, WidgetSelectors, expect};
use log::debug;
use todo_model::{AddRejection, EMPTY_LIST_TEXT, PANEL_TITLE, TodoWidget};
use url::Url;

pub struct TodoPage<D> {
    driver: D,
    selectors: WidgetSelectors,
    policy: WaitPolicy,
    shadow: TodoWidget,
}

impl<D: BrowserDriver> TodoPage<D> {
    pub fn new(driver: D, selectors: WidgetSelectors, policy: WaitPolicy) -> Self {
        Self {
            driver,
            selectors,
            policy,
            shadow: TodoWidget::new(),
        }
    }

    /// The model state the page is expected to show.
    pub const fn model(&self) -> &TodoWidget {
        &self.shadow
    }

    pub const fn driver(&self) -> &D {
        &self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    fn expect(&mut self, locator: Locator) -> Expect<'_, D> {
        expect(&mut self.driver, locator, self.policy)
    }

    /// Navigate to the landing page and open the widget.
    ///
    /// Always lands on an empty task list.
    pub async fn open(&mut self, base_url: &Url) -> Result<()> {
        self.driver.navigate(base_url).await?;
        let link = self.selectors.landing_link();
        self.expect(link.clone()).to_be_visible().await?;
        self.driver
            .click(&link)
            .await
            .context("Failed to open the widget from the landing page")?;
        let panel = self.selectors.panel();
        self.expect(panel).to_be_visible().await?;
        self.shadow = TodoWidget::new();
        Ok(())
    }

    /// Type `label` into the add input and press the add button.
    ///
    /// Returns the outcome the model predicts for this add.
    pub async fn add_task(&mut self, label: &str) -> Result<Result<usize, AddRejection>> {
        let input = self.selectors.add_input();
        let button = self.selectors.add_button();
        self.driver.fill(&input, label).await?;
        self.driver.click(&button).await?;
        let predicted = self.shadow.add_task(label);
        debug!("add {label:?} -> {predicted:?}");
        Ok(predicted)
    }

    pub async fn add_tasks(&mut self, labels: &[&str]) -> Result<()> {
        for label in labels {
            let _predicted = self.add_task(label).await?;
        }
        Ok(())
    }

    /// Toggle the task at `row` of the visible list by clicking its label.
    pub async fn toggle_by_label(&mut self, row: usize) -> Result<()> {
        let label = self.selectors.task_spans().nth(row * 2 + 1);
        self.driver.click(&label).await?;
        self.toggle_shadow(row)
    }

    /// Toggle the task at `row` of the visible list through its check icon.
    pub async fn toggle_by_icon(&mut self, row: usize) -> Result<()> {
        let icon = self.selectors.complete_toggle().nth(row);
        self.driver.click(&icon).await?;
        self.toggle_shadow(row)
    }

    /// The page accepted a click on `row`; the model must have that row too.
    fn toggle_shadow(&mut self, row: usize) -> Result<()> {
        let completed = self
            .shadow
            .toggle_visible(row)
            .with_context(|| format!("model has no visible row {row}"))?;
        debug!("toggle row {row} -> completed={completed}");
        Ok(())
    }

    pub async fn clear_completed(&mut self) -> Result<()> {
        let button = self.selectors.clear_completed();
        self.driver.click(&button).await?;
        self.shadow.clear_completed();
        Ok(())
    }

    pub async fn search(&mut self, filter: &str) -> Result<()> {
        let input = self.selectors.search_input();
        self.driver.fill(&input, filter).await?;
        self.shadow.search(filter);
        Ok(())
    }

    /// Panel visible, titled, controls enabled, nothing listed or reported.
    pub async fn expect_initial_state(&mut self) -> Result<()> {
        self.expect_panel().await?;
        self.expect_controls_enabled().await?;
        self.expect_empty().await?;
        self.expect_no_notification().await
    }

    pub async fn expect_panel(&mut self) -> Result<()> {
        let panel = self.selectors.panel();
        let heading = self.selectors.panel_heading();
        self.expect(panel).to_be_visible().await?;
        self.expect(heading).to_have_text(PANEL_TITLE).await
    }

    pub async fn expect_controls_enabled(&mut self) -> Result<()> {
        for control in [
            self.selectors.add_input(),
            self.selectors.add_button(),
            self.selectors.search_input(),
        ] {
            self.expect(control).to_be_enabled().await?;
        }
        Ok(())
    }

    /// The sentinel row is the only list entry.
    pub async fn expect_empty(&mut self) -> Result<()> {
        let empty = self.selectors.empty_state();
        self.expect(empty).to_have_text(EMPTY_LIST_TEXT).await
    }

    /// Number of task rows; zero means the sentinel is showing.
    pub async fn expect_task_count(&mut self, count: usize) -> Result<()> {
        if count == 0 {
            return self.expect_empty().await;
        }
        let items = self.selectors.task_items();
        self.expect(items).to_have_count(count).await
    }

    /// Visible rows carry exactly these labels, in order.
    pub async fn expect_labels(&mut self, labels: &[&str]) -> Result<()> {
        if labels.is_empty() {
            return self.expect_empty().await;
        }
        let items = self.selectors.task_items();
        self.expect(items).to_have_texts(labels).await
    }

    pub async fn expect_completed(&mut self, row: usize, completed: bool) -> Result<()> {
        let icon = self.selectors.task_spans().nth(row * 2);
        let class = if completed {
            COMPLETED_ICON_CLASS
        } else {
            ACTIVE_ICON_CLASS
        };
        self.expect(icon).to_have_class(class).await
    }

    /// The add input holds exactly `text`.
    pub async fn expect_add_input(&mut self, text: &str) -> Result<()> {
        let input = self.selectors.add_input();
        self.expect(input).to_have_value(text).await
    }

    pub async fn expect_notification(&mut self, text: &str) -> Result<()> {
        let notification = self.selectors.notification();
        self.expect(notification).to_have_text(text).await
    }

    pub async fn expect_no_notification(&mut self) -> Result<()> {
        let notification = self.selectors.notification();
        self.expect(notification).to_be_hidden().await
    }

    /// Rows, completion icons and notification match the shadow model.
    pub async fn expect_matches_model(&mut self) -> Result<()> {
        let visible: Vec<(String, bool)> = self
            .shadow
            .visible_tasks()
            .into_iter()
            .map(|task| (task.label.clone(), task.completed))
            .collect();
        let labels: Vec<&str> = visible.iter().map(|(label, _)| label.as_str()).collect();
        self.expect_labels(&labels).await?;
        for (row, (_, completed)) in visible.iter().enumerate() {
            self.expect_completed(row, *completed).await?;
        }
        match self.shadow.notification().map(str::to_owned) {
            Some(text) => self.expect_notification(&text).await,
            None => self.expect_no_notification().await,
        }
    }
}
