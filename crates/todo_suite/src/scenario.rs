//! Scenario table for the to-do widget.
//!
//! Each scenario starts from a freshly opened widget (the runner takes
//! care of that) and is a sequence of named steps.

use core::future::Future;

use anyhow::{Context as _, Result, ensure};
use browser_driver::BrowserDriver;
use log::info;
use todo_model::AddRejection;

use crate::page::TodoPage;

/// Five chores used by the multi-task scenarios.
pub const CHORES: [&str; 5] = ["walk", "run", "jump", "skip", "hop"];

/// Label added, completed and cleared in the single task scenario.
pub const SINGLE_TASK: &str = "Complete playwright project.";

/// 37 characters, over the widget's limit.
pub const OVERLONG_TASK: &str = "qwertyuioplkjhgfdsazxcvbnjm1234567890";

pub const VALID_TASK: &str = "Playwright";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scenario {
    ModalVerification,
    SingleTask,
    MultipleTasks,
    SearchFilter,
    Validation,
    ClearTwice,
    CompletedLabelReuse,
}

/// Run one named step, attaching its name to any failure.
pub async fn step<T, F>(title: &str, body: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    info!("  step: {title}");
    body.await.with_context(|| format!("step failed: {title}"))
}

impl Scenario {
    pub const ALL: [Self; 7] = [
        Self::ModalVerification,
        Self::SingleTask,
        Self::MultipleTasks,
        Self::SearchFilter,
        Self::Validation,
        Self::ClearTwice,
        Self::CompletedLabelReuse,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            Self::ModalVerification => "Todo App Modal Verification",
            Self::SingleTask => "Single Task Addition and Removal",
            Self::MultipleTasks => "Multiple Task Operations",
            Self::SearchFilter => "Search and Filter Functionality in todo App",
            Self::Validation => "Task Validation and Error Handling",
            Self::ClearTwice => "Clearing Completed Tasks Twice",
            Self::CompletedLabelReuse => "Completed Task Label Reuse",
        }
    }

    /// Scenarios whose title contains `filter`, ignoring case. `None` selects all.
    pub fn matching(filter: Option<&str>) -> Vec<Self> {
        let needle = filter.map(str::to_lowercase);
        Self::ALL
            .into_iter()
            .filter(|scenario| {
                needle
                    .as_deref()
                    .is_none_or(|needle| scenario.title().to_lowercase().contains(needle))
            })
            .collect()
    }

    /// Run against an opened widget.
    pub async fn run<D: BrowserDriver>(self, page: &mut TodoPage<D>) -> Result<()> {
        match self {
            Self::ModalVerification => modal_verification(page).await,
            Self::SingleTask => single_task(page).await,
            Self::MultipleTasks => multiple_tasks(page).await,
            Self::SearchFilter => search_filter(page).await,
            Self::Validation => validation(page).await,
            Self::ClearTwice => clear_twice(page).await,
            Self::CompletedLabelReuse => completed_label_reuse(page).await,
        }
    }
}

async fn modal_verification<D: BrowserDriver>(page: &mut TodoPage<D>) -> Result<()> {
    step(
        "Confirm that the todo-app modal is visible with the title \"My Tasks\"",
        page.expect_panel(),
    )
    .await?;
    step(
        "Validate that the add input, add button and search field are enabled",
        page.expect_controls_enabled(),
    )
    .await?;
    step(
        "Validate that the task list is empty, displaying \"No tasks found!\"",
        page.expect_empty(),
    )
    .await?;
    step("Validate that no notification is shown", page.expect_no_notification()).await
}

async fn single_task<D: BrowserDriver>(page: &mut TodoPage<D>) -> Result<()> {
    step("Add a new task to the list", async {
        let outcome = page.add_task(SINGLE_TASK).await?;
        ensure!(outcome.is_ok(), "model rejected {SINGLE_TASK:?}: {outcome:?}");
        Ok(())
    })
    .await?;
    step("Validate that the new task appears in the list", page.expect_labels(&[SINGLE_TASK])).await?;
    step("Validate that exactly one task is listed", page.expect_task_count(1)).await?;
    step("Mark the task as completed by clicking on it", page.toggle_by_label(0)).await?;
    step("Validate that the task is marked as completed", page.expect_completed(0, true)).await?;
    step("Remove completed tasks", page.clear_completed()).await?;
    step("Validate that the task list is empty again", page.expect_empty()).await
}

async fn multiple_tasks<D: BrowserDriver>(page: &mut TodoPage<D>) -> Result<()> {
    step("Add five tasks individually", page.add_tasks(&CHORES)).await?;
    step("Validate that the listed tasks match the added ones", page.expect_labels(&CHORES)).await?;
    step("Mark every task as completed", async {
        for row in 0..CHORES.len() {
            page.toggle_by_icon(row).await?;
        }
        page.expect_matches_model().await
    })
    .await?;
    step("Remove completed tasks", page.clear_completed()).await?;
    step("Validate that the task list is empty again", page.expect_empty()).await
}

async fn search_filter<D: BrowserDriver>(page: &mut TodoPage<D>) -> Result<()> {
    let target = CHORES[4];
    step("Add five tasks individually", page.add_tasks(&CHORES)).await?;
    step("Validate that the listed tasks match the added ones", page.expect_labels(&CHORES)).await?;
    step("Search for one task by its full name", page.search(target)).await?;
    step("Validate that only the searched task is listed", async {
        page.expect_labels(&[target]).await?;
        page.expect_task_count(1).await
    })
    .await?;
    step("Clear the search field", page.search("")).await?;
    step("Validate that every task is listed again", page.expect_labels(&CHORES)).await
}

async fn validation<D: BrowserDriver>(page: &mut TodoPage<D>) -> Result<()> {
    step("Attempt to add an empty task", async {
        let outcome = page.add_task("").await?;
        ensure!(outcome == Err(AddRejection::Empty), "unexpected outcome {outcome:?}");
        Ok(())
    })
    .await?;
    step("Validate that the task list is still empty", page.expect_empty()).await?;
    step("Add a task longer than 30 characters", async {
        let outcome = page.add_task(OVERLONG_TASK).await?;
        ensure!(
            matches!(outcome, Err(AddRejection::TooLong { .. })),
            "unexpected outcome {outcome:?}"
        );
        Ok(())
    })
    .await?;
    step("Validate the length error and that nothing was added", async {
        let message = AddRejection::TooLong {
            chars: OVERLONG_TASK.chars().count(),
        }
        .to_string();
        page.expect_notification(&message).await?;
        page.expect_task_count(0).await
    })
    .await?;
    step("Add a valid task", async {
        let outcome = page.add_task(VALID_TASK).await?;
        ensure!(outcome.is_ok(), "model rejected {VALID_TASK:?}: {outcome:?}");
        Ok(())
    })
    .await?;
    step("Validate that exactly one task is listed without error", async {
        page.expect_task_count(1).await?;
        page.expect_no_notification().await
    })
    .await?;
    step("Add the same task again", async {
        let outcome = page.add_task(VALID_TASK).await?;
        ensure!(
            matches!(outcome, Err(AddRejection::Duplicate { .. })),
            "unexpected outcome {outcome:?}"
        );
        Ok(())
    })
    .await?;
    step("Validate the duplicate error and that the count is unchanged", async {
        let message = AddRejection::Duplicate {
            label: VALID_TASK.to_owned(),
        }
        .to_string();
        page.expect_notification(&message).await?;
        page.expect_task_count(1).await
    })
    .await?;
    step("Validate the page against the model", page.expect_matches_model()).await
}

async fn clear_twice<D: BrowserDriver>(page: &mut TodoPage<D>) -> Result<()> {
    step("Add two tasks", page.add_tasks(&CHORES[..2])).await?;
    step("Complete the first task", page.toggle_by_icon(0)).await?;
    step("Remove completed tasks", page.clear_completed()).await?;
    step("Validate that the active task remains", page.expect_labels(&CHORES[1..2])).await?;
    step("Remove completed tasks again", page.clear_completed()).await?;
    step("Validate that the second clear changed nothing", async {
        page.expect_labels(&CHORES[1..2]).await?;
        page.expect_matches_model().await
    })
    .await
}

async fn completed_label_reuse<D: BrowserDriver>(page: &mut TodoPage<D>) -> Result<()> {
    step("Add a task", page.add_tasks(&[VALID_TASK])).await?;
    step("Complete the task", page.toggle_by_icon(0)).await?;
    step("Add the same label again", async {
        let outcome = page.add_task(VALID_TASK).await?;
        ensure!(outcome.is_ok(), "model rejected the label of a completed task: {outcome:?}");
        Ok(())
    })
    .await?;
    step("Validate that both tasks are listed without error", async {
        page.expect_task_count(2).await?;
        page.expect_matches_model().await
    })
    .await
}
