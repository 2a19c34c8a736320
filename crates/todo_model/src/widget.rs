//! State and transitions of the widget as seen from the page.

use crate::rejection::AddRejection;
use crate::task::Task;
use crate::{EMPTY_LIST_TEXT, MAX_LABEL_CHARS};

/// Validation rules applied to an add.
///
/// The defaults are the hosted widget's rules. Relaxed rules exist so a
/// simulated widget can misbehave on purpose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WidgetRules {
    /// Maximum label length in characters, `None` for unlimited.
    pub max_label_chars: Option<usize>,
    /// Whether a label equal to an active task's label is refused.
    pub reject_duplicates: bool,
}

impl WidgetRules {
    /// Rules that accept every non-empty label.
    pub const fn relaxed() -> Self {
        Self {
            max_label_chars: None,
            reject_duplicates: false,
        }
    }
}

impl Default for WidgetRules {
    fn default() -> Self {
        Self {
            max_label_chars: Some(MAX_LABEL_CHARS),
            reject_duplicates: true,
        }
    }
}

/// The to-do widget: task list, search filter and notification area.
#[derive(Clone, Debug, Default)]
pub struct TodoWidget {
    rules: WidgetRules,
    tasks: Vec<Task>,
    filter: String,
    notification: Option<String>,
}

impl TodoWidget {
    /// Landing state: no tasks, no filter, no notification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Landing state with non-default validation rules.
    pub fn with_rules(rules: WidgetRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    /// Submit the add input.
    ///
    /// Checks run in order: empty, too long, duplicate of an active task.
    /// On success the new task's index is returned and any notification
    /// is cleared. An empty label leaves the whole widget untouched.
    pub fn add_task(&mut self, label: &str) -> Result<usize, AddRejection> {
        match self.validate(label) {
            Ok(()) => {
                self.tasks.push(Task::new(label));
                self.notification = None;
                Ok(self.tasks.len() - 1)
            }
            Err(rejection) => {
                if let Some(text) = rejection.notification() {
                    self.notification = Some(text);
                }
                Err(rejection)
            }
        }
    }

    fn validate(&self, label: &str) -> Result<(), AddRejection> {
        if label.is_empty() {
            return Err(AddRejection::Empty);
        }
        let chars = label.chars().count();
        if self.rules.max_label_chars.is_some_and(|max| chars > max) {
            return Err(AddRejection::TooLong { chars });
        }
        if self.rules.reject_duplicates
            && self
                .tasks
                .iter()
                .any(|task| task.is_active() && task.label == label)
        {
            return Err(AddRejection::Duplicate {
                label: label.to_owned(),
            });
        }
        Ok(())
    }

    /// Flip the completion flag of the task at `index` in the full list.
    ///
    /// Returns the new flag, or `None` when there is no such task.
    pub fn toggle_task(&mut self, index: usize) -> Option<bool> {
        let task = self.tasks.get_mut(index)?;
        task.completed = !task.completed;
        self.notification = None;
        Some(task.completed)
    }

    /// Flip the task shown at `row` of the filtered view.
    pub fn toggle_visible(&mut self, row: usize) -> Option<bool> {
        let index = self.visible_indices().nth(row)?;
        self.toggle_task(index)
    }

    /// Remove every completed task. Returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(Task::is_active);
        self.notification = None;
        before - self.tasks.len()
    }

    /// Replace the search filter. An empty filter shows every task.
    pub fn search(&mut self, filter: &str) {
        filter.clone_into(&mut self.filter);
        self.notification = None;
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Every task, in insertion order, regardless of the filter.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.is_active()).count()
    }

    /// Case-insensitive substring match against the current filter.
    fn matches(&self, task: &Task) -> bool {
        self.filter.is_empty()
            || task
                .label
                .to_lowercase()
                .contains(&self.filter.to_lowercase())
    }

    fn visible_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| self.matches(task))
            .map(|(index, _)| index)
    }

    /// Tasks the list currently renders, in order.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|task| self.matches(task)).collect()
    }

    pub fn visible_labels(&self) -> Vec<String> {
        self.visible_tasks()
            .into_iter()
            .map(|task| task.label.clone())
            .collect()
    }

    /// Sentinel text, present when no row is rendered.
    pub fn sentinel(&self) -> Option<&'static str> {
        self.visible_indices()
            .next()
            .is_none()
            .then_some(EMPTY_LIST_TEXT)
    }

    /// Text of the notification area, if one is showing.
    pub fn notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHORES: [&str; 5] = ["walk", "run", "jump", "skip", "hop"];

    fn with_chores() -> TodoWidget {
        let mut widget = TodoWidget::new();
        for chore in CHORES {
            assert!(widget.add_task(chore).is_ok());
        }
        widget
    }

    #[test]
    fn landing_state() {
        let widget = TodoWidget::new();
        assert!(widget.is_empty());
        assert_eq!(widget.sentinel(), Some(EMPTY_LIST_TEXT));
        assert_eq!(widget.notification(), None);
        assert_eq!(widget.filter(), "");
    }

    #[test]
    fn add_keeps_insertion_order() {
        let widget = with_chores();
        assert_eq!(widget.visible_labels(), CHORES);
        assert_eq!(widget.sentinel(), None);
    }

    #[test]
    fn empty_label_is_ignored() {
        let mut widget = TodoWidget::new();
        assert_eq!(widget.add_task(""), Err(AddRejection::Empty));
        assert!(widget.is_empty());
        assert_eq!(widget.notification(), None);
        assert_eq!(widget.sentinel(), Some(EMPTY_LIST_TEXT));
    }

    #[test]
    fn empty_label_keeps_previous_notification() {
        let mut widget = TodoWidget::new();
        assert!(widget.add_task(&"x".repeat(31)).is_err());
        assert!(widget.add_task("").is_err());
        assert_eq!(
            widget.notification(),
            Some("Error: Todo cannot be more than 30 characters!")
        );
    }

    #[test]
    fn length_limit_counts_characters() {
        let mut widget = TodoWidget::new();
        assert!(widget.add_task(&"é".repeat(30)).is_ok());
        assert_eq!(
            widget.add_task(&"é".repeat(31)),
            Err(AddRejection::TooLong { chars: 31 })
        );
        assert_eq!(widget.len(), 1);
    }

    #[test]
    fn duplicate_of_active_task_is_refused() {
        let mut widget = TodoWidget::new();
        assert_eq!(widget.add_task("Playwright"), Ok(0));
        assert_eq!(
            widget.add_task("Playwright"),
            Err(AddRejection::Duplicate {
                label: "Playwright".to_owned()
            })
        );
        assert_eq!(
            widget.notification(),
            Some("Error: You already have Playwright in your todo list.")
        );
        assert_eq!(widget.len(), 1);
    }

    #[test]
    fn duplicate_check_is_exact() {
        let mut widget = TodoWidget::new();
        assert!(widget.add_task("Playwright").is_ok());
        assert!(widget.add_task("playwright").is_ok());
        assert!(widget.add_task("Playwright ").is_ok());
        assert_eq!(widget.len(), 3);
    }

    #[test]
    fn completed_task_frees_its_label() {
        let mut widget = TodoWidget::new();
        assert!(widget.add_task("Playwright").is_ok());
        assert_eq!(widget.toggle_task(0), Some(true));
        assert_eq!(widget.add_task("Playwright"), Ok(1));
        assert_eq!(widget.active_count(), 1);
    }

    #[test]
    fn successful_add_clears_notification() {
        let mut widget = TodoWidget::new();
        assert!(widget.add_task("walk").is_ok());
        assert!(widget.add_task("walk").is_err());
        assert!(widget.notification().is_some());
        assert!(widget.add_task("run").is_ok());
        assert_eq!(widget.notification(), None);
    }

    #[test]
    fn toggle_affects_one_task_only() {
        let mut widget = with_chores();
        assert_eq!(widget.toggle_task(2), Some(true));
        let completed: Vec<bool> = widget.tasks().iter().map(|task| task.completed).collect();
        assert_eq!(completed, [false, false, true, false, false]);
        assert_eq!(widget.visible_labels(), CHORES);
        assert_eq!(widget.toggle_task(2), Some(false));
        assert_eq!(widget.toggle_task(9), None);
    }

    #[test]
    fn clear_completed_keeps_active_tasks() {
        let mut widget = with_chores();
        widget.toggle_task(0);
        widget.toggle_task(4);
        assert_eq!(widget.clear_completed(), 2);
        assert_eq!(widget.visible_labels(), ["run", "jump", "skip"]);
        assert_eq!(widget.clear_completed(), 0);
    }

    #[test]
    fn clearing_everything_restores_sentinel() {
        let mut widget = with_chores();
        for index in 0..CHORES.len() {
            widget.toggle_task(index);
        }
        assert_eq!(widget.clear_completed(), CHORES.len());
        assert_eq!(widget.sentinel(), Some(EMPTY_LIST_TEXT));
    }

    #[test]
    fn search_filters_view_not_list() {
        let mut widget = with_chores();
        widget.search("hop");
        assert_eq!(widget.visible_labels(), ["hop"]);
        assert_eq!(widget.len(), CHORES.len());
        widget.search("");
        assert_eq!(widget.visible_labels(), CHORES);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let mut widget = with_chores();
        widget.search("U");
        assert_eq!(widget.visible_labels(), ["run", "jump"]);
    }

    #[test]
    fn fully_filtered_view_shows_sentinel() {
        let mut widget = with_chores();
        widget.search("swim");
        assert!(widget.visible_tasks().is_empty());
        assert_eq!(widget.sentinel(), Some(EMPTY_LIST_TEXT));
    }

    #[test]
    fn toggle_visible_maps_through_filter() {
        let mut widget = with_chores();
        widget.search("j");
        assert_eq!(widget.toggle_visible(0), Some(true));
        assert!(widget.tasks()[2].completed);
        assert_eq!(widget.toggle_visible(1), None);
    }

    #[test]
    fn relaxed_rules_accept_anything_non_empty() {
        let mut widget = TodoWidget::with_rules(WidgetRules::relaxed());
        assert!(widget.add_task(&"x".repeat(40)).is_ok());
        assert!(widget.add_task("dup").is_ok());
        assert!(widget.add_task("dup").is_ok());
        assert_eq!(widget.add_task(""), Err(AddRejection::Empty));
        assert_eq!(widget.len(), 3);
    }
}
