//! In-process stand-in for the hosted widget.
//!
//! Renders synthetic elements from a [`TodoWidget`] for the selectors in
//! [`WidgetSelectors`], so the scenario table can run without a browser.
//! A selector outside the table matches nothing, like a selector the real
//! page does not use.

use anyhow::{Result, bail};
use log::debug;
use todo_model::{PANEL_TITLE, TodoWidget, WidgetRules};
use url::Url;

use crate::selectors::{ACTIVE_ICON_CLASS, COMPLETED_ICON_CLASS};
use crate::{BrowserDriver, ElementHandle, Locator, Target, WidgetSelectors};

/// What clicking or filling a synthetic element does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Inert,
    OpenWidget,
    AddInput,
    SearchInput,
    AddButton,
    /// Toggle the task at this row of the filtered view.
    ToggleRow(usize),
    ClearCompleted,
}

struct Rendered {
    handle: ElementHandle,
    action: Action,
}

impl Rendered {
    fn new(text: &str, class: &str, action: Action) -> Self {
        Self {
            handle: ElementHandle {
                text: text.to_owned(),
                class: class.to_owned(),
                value: String::new(),
                enabled: true,
                visible: true,
            },
            action,
        }
    }

    fn with_value(mut self, value: &str) -> Self {
        value.clone_into(&mut self.handle.value);
        self
    }
}

/// State of the loaded page.
struct LoadedPage {
    url: Url,
    widget_open: bool,
    model: TodoWidget,
    add_text: String,
}

/// Simulated browser tab showing the to-do widget.
pub struct SimulatedWidget {
    selectors: WidgetSelectors,
    rules: WidgetRules,
    page: Option<LoadedPage>,
}

impl SimulatedWidget {
    /// Widget following the hosted widget's validation rules.
    pub fn new(selectors: WidgetSelectors) -> Self {
        Self::with_rules(selectors, WidgetRules::default())
    }

    /// Widget with altered validation rules, for exercising failure paths.
    pub fn with_rules(selectors: WidgetSelectors, rules: WidgetRules) -> Self {
        Self {
            selectors,
            rules,
            page: None,
        }
    }

    /// Current model, once a page is loaded.
    pub fn model(&self) -> Option<&TodoWidget> {
        self.page.as_ref().map(|page| &page.model)
    }

    pub fn current_url(&self) -> Option<&Url> {
        self.page.as_ref().map(|page| &page.url)
    }

    fn render(&self, target: &Target) -> Vec<Rendered> {
        let Some(page) = &self.page else {
            return Vec::new();
        };
        let sel = &self.selectors;
        let css = match target {
            Target::Text(text) => {
                return if !page.widget_open && text.trim() == sel.landing_link.trim() {
                    vec![Rendered::new(&sel.landing_link, "card", Action::OpenWidget)]
                } else {
                    Vec::new()
                };
            }
            Target::Css(css) => css.as_str(),
        };
        if !page.widget_open {
            return Vec::new();
        }

        let model = &page.model;
        let rows = || {
            model
                .visible_tasks()
                .into_iter()
                .enumerate()
                .map(|(row, task)| Rendered::new(&task.label, "todo-item", Action::ToggleRow(row)))
                .collect::<Vec<_>>()
        };

        if css == sel.panel {
            vec![Rendered::new(PANEL_TITLE, "panel", Action::Inert)]
        } else if css == sel.panel_heading {
            vec![Rendered::new(PANEL_TITLE, "panel-heading", Action::Inert)]
        } else if css == sel.add_input {
            vec![Rendered::new("", "input", Action::AddInput).with_value(&page.add_text)]
        } else if css == sel.add_button {
            vec![Rendered::new("ADD", "button", Action::AddButton)]
        } else if css == sel.search_input {
            vec![Rendered::new("", "input", Action::SearchInput).with_value(model.filter())]
        } else if css == sel.task_items {
            rows()
        } else if css == sel.empty_state {
            match model.sentinel() {
                Some(sentinel) => vec![Rendered::new(sentinel, "todo-item", Action::Inert)],
                None => rows(),
            }
        } else if css == sel.task_spans {
            model
                .visible_tasks()
                .into_iter()
                .enumerate()
                .flat_map(|(row, task)| {
                    let icon = if task.completed {
                        COMPLETED_ICON_CLASS
                    } else {
                        ACTIVE_ICON_CLASS
                    };
                    [
                        Rendered::new("", icon, Action::ToggleRow(row)),
                        Rendered::new(&task.label, "", Action::ToggleRow(row)),
                    ]
                })
                .collect()
        } else if css == sel.complete_toggle {
            (0..model.visible_tasks().len())
                .map(|row| Rendered::new("", "svg-inline--fa fa-circle-check", Action::ToggleRow(row)))
                .collect()
        } else if css == sel.clear_completed {
            vec![Rendered::new("Remove completed tasks!", "button", Action::ClearCompleted)]
        } else if css == sel.notification {
            model
                .notification()
                .map(|text| Rendered::new(text, "notification is-danger", Action::Inert))
                .into_iter()
                .collect()
        } else {
            Vec::new()
        }
    }

    fn resolve(&self, locator: &Locator) -> Result<Action> {
        let rendered = locator.pick_one(self.render(locator.target()))?;
        Ok(rendered.action)
    }

    fn loaded(&mut self) -> Result<&mut LoadedPage> {
        match self.page.as_mut() {
            Some(page) => Ok(page),
            None => bail!("no page loaded"),
        }
    }
}

impl BrowserDriver for SimulatedWidget {
    async fn navigate(&mut self, url: &Url) -> Result<()> {
        debug!("[SIM] navigate to {url}");
        self.page = Some(LoadedPage {
            url: url.clone(),
            widget_open: false,
            model: TodoWidget::with_rules(self.rules),
            add_text: String::new(),
        });
        Ok(())
    }

    async fn click(&mut self, locator: &Locator) -> Result<()> {
        let action = self.resolve(locator)?;
        let page = self.loaded()?;
        match action {
            Action::Inert | Action::AddInput | Action::SearchInput => {}
            Action::OpenWidget => page.widget_open = true,
            Action::AddButton => match page.model.add_task(&page.add_text) {
                Ok(_) => page.add_text.clear(),
                Err(rejection) => debug!("[SIM] add rejected: {rejection:?}"),
            },
            Action::ToggleRow(row) => {
                if page.model.toggle_visible(row).is_none() {
                    bail!("row {row} vanished before the click on {locator}");
                }
            }
            Action::ClearCompleted => {
                let removed = page.model.clear_completed();
                debug!("[SIM] cleared {removed} completed tasks");
            }
        }
        Ok(())
    }

    async fn fill(&mut self, locator: &Locator, text: &str) -> Result<()> {
        let action = self.resolve(locator)?;
        let page = self.loaded()?;
        match action {
            Action::AddInput => text.clone_into(&mut page.add_text),
            Action::SearchInput => page.model.search(text),
            _ => bail!("{locator} is not an input"),
        }
        Ok(())
    }

    async fn locate(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>> {
        let rendered = self.render(locator.target());
        Ok(locator
            .pick(rendered)
            .into_iter()
            .map(|rendered| rendered.handle)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_model::EMPTY_LIST_TEXT;

    use crate::{WaitPolicy, expect};

    async fn opened() -> Result<SimulatedWidget> {
        let mut sim = SimulatedWidget::new(WidgetSelectors::default());
        sim.navigate(&Url::parse("https://example.test/frontend")?).await?;
        let link = sim.selectors.landing_link();
        sim.click(&link).await?;
        Ok(sim)
    }

    async fn texts(sim: &mut SimulatedWidget, locator: &Locator) -> Result<Vec<String>> {
        Ok(sim
            .locate(locator)
            .await?
            .into_iter()
            .map(|element| element.text)
            .collect())
    }

    #[tokio::test]
    async fn widget_hidden_until_link_clicked() -> Result<()> {
        let mut sim = SimulatedWidget::new(WidgetSelectors::default());
        sim.navigate(&Url::parse("https://example.test/frontend")?).await?;
        let panel = sim.selectors.panel();
        assert!(sim.locate(&panel).await?.is_empty());
        let link = sim.selectors.landing_link();
        sim.click(&link).await?;
        assert_eq!(texts(&mut sim, &panel).await?, [PANEL_TITLE]);
        assert!(sim.locate(&link).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn sentinel_only_under_empty_state_selector() -> Result<()> {
        let mut sim = opened().await?;
        let items = sim.selectors.task_items();
        let empty = sim.selectors.empty_state();
        assert!(sim.locate(&items).await?.is_empty());
        assert_eq!(texts(&mut sim, &empty).await?, [EMPTY_LIST_TEXT]);
        Ok(())
    }

    #[tokio::test]
    async fn add_clears_input_on_success_only() -> Result<()> {
        let mut sim = opened().await?;
        let input = sim.selectors.add_input();
        let button = sim.selectors.add_button();
        sim.fill(&input, "walk").await?;
        sim.click(&button).await?;
        assert_eq!(sim.locate(&input).await?[0].value, "");
        sim.fill(&input, "walk").await?;
        sim.click(&button).await?;
        assert_eq!(sim.locate(&input).await?[0].value, "walk");
        let notification = sim.selectors.notification();
        assert_eq!(
            texts(&mut sim, &notification).await?,
            ["Error: You already have walk in your todo list."]
        );
        Ok(())
    }

    #[tokio::test]
    async fn search_input_shows_the_active_filter() -> Result<()> {
        let mut sim = opened().await?;
        let search = sim.selectors.search_input();
        sim.fill(&search, "hop").await?;
        assert_eq!(sim.model().map(TodoWidget::filter), Some("hop"));
        expect(&mut sim, search, WaitPolicy::immediate())
            .to_have_value("hop")
            .await
    }

    #[tokio::test]
    async fn spans_toggle_their_row() -> Result<()> {
        let mut sim = opened().await?;
        let input = sim.selectors.add_input();
        let button = sim.selectors.add_button();
        for label in ["walk", "run"] {
            sim.fill(&input, label).await?;
            sim.click(&button).await?;
        }
        let spans = sim.selectors.task_spans();
        sim.click(&spans.clone().last()).await?;
        let classes: Vec<String> = sim
            .locate(&spans)
            .await?
            .into_iter()
            .map(|element| element.class)
            .collect();
        assert_eq!(classes, [ACTIVE_ICON_CLASS, "", COMPLETED_ICON_CLASS, ""]);
        Ok(())
    }

    #[tokio::test]
    async fn ambiguous_click_is_rejected() -> Result<()> {
        let mut sim = opened().await?;
        let input = sim.selectors.add_input();
        let button = sim.selectors.add_button();
        for label in ["walk", "run"] {
            sim.fill(&input, label).await?;
            sim.click(&button).await?;
        }
        let toggles = sim.selectors.complete_toggle();
        assert!(sim.click(&toggles).await.is_err());
        assert!(sim.fill(&button, "x").await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn navigation_resets_state() -> Result<()> {
        let mut sim = opened().await?;
        let input = sim.selectors.add_input();
        let button = sim.selectors.add_button();
        sim.fill(&input, "walk").await?;
        sim.click(&button).await?;
        assert_eq!(sim.model().map(TodoWidget::len), Some(1));
        sim.navigate(&Url::parse("https://example.test/frontend")?).await?;
        assert_eq!(sim.model().map(TodoWidget::len), Some(0));
        assert_eq!(
            sim.current_url().map(Url::as_str),
            Some("https://example.test/frontend")
        );
        Ok(())
    }
}
