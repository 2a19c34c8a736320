/// One row of the to-do list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    /// Text the user entered.
    pub label: String,
    /// Whether the task has been marked done.
    pub completed: bool,
}

impl Task {
    /// A fresh, not yet completed task.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            completed: false,
        }
    }

    /// Active tasks are the ones that still block a duplicate label.
    pub const fn is_active(&self) -> bool {
        !self.completed
    }
}
