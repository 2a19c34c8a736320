//! Black-box behavior model of the hosted to-do list widget.
//!
//! The widget itself is remote and opaque. This crate captures only what a
//! user can observe through the page:
//!
//! ```text
//! add(label) ──► validation ──► TaskList (insertion order)
//!                    │                 │
//!                    ▼                 ▼
//!            ErrorNotification   SearchFilter ──► visible rows / sentinel
//! ```
//!
//! The model is used two ways: scenario code derives expected outcomes from
//! it, and the in-process simulated widget renders a page from it.
//!
//! # Example
//!
//! ```
//! use todo_model::{AddRejection, TodoWidget, EMPTY_LIST_TEXT};
//!
//! let mut widget = TodoWidget::new();
//! assert_eq!(widget.sentinel(), Some(EMPTY_LIST_TEXT));
//!
//! widget.add_task("Playwright").unwrap();
//! let rejected = widget.add_task("Playwright").unwrap_err();
//! assert_eq!(
//!     rejected.to_string(),
//!     "Error: You already have Playwright in your todo list."
//! );
//! assert!(matches!(rejected, AddRejection::Duplicate { .. }));
//! ```

mod rejection;
mod task;
mod widget;

pub use rejection::AddRejection;
pub use task::Task;
pub use widget::{TodoWidget, WidgetRules};

/// Longest label, in characters, the widget accepts.
pub const MAX_LABEL_CHARS: usize = 30;

/// Text rendered in place of list rows when nothing is visible.
pub const EMPTY_LIST_TEXT: &str = "No tasks found!";

/// Heading of the widget's panel.
pub const PANEL_TITLE: &str = "My Tasks";
