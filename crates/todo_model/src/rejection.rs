//! Reasons the widget refuses an add.

use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::MAX_LABEL_CHARS;

/// Why an add action left the task list unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddRejection {
    /// Empty input. Ignored silently by the widget.
    Empty,
    /// Label longer than the widget's limit.
    TooLong {
        /// Length of the offending label in characters.
        chars: usize,
    },
    /// An active task already carries this exact label.
    Duplicate {
        /// The offending label, echoed in the notification.
        label: String,
    },
}

impl AddRejection {
    /// Notification text the widget shows for this rejection, if any.
    ///
    /// Empty input produces no notification.
    pub fn notification(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::TooLong { .. } | Self::Duplicate { .. } => Some(self.to_string()),
        }
    }
}

impl Display for AddRejection {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Empty => write!(formatter, "Todo is empty"),
            Self::TooLong { .. } => write!(
                formatter,
                "Error: Todo cannot be more than {MAX_LABEL_CHARS} characters!"
            ),
            Self::Duplicate { label } => {
                write!(formatter, "Error: You already have {label} in your todo list.")
            }
        }
    }
}

impl std::error::Error for AddRejection {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_long_message_is_fixed() {
        let rejection = AddRejection::TooLong { chars: 38 };
        assert_eq!(
            rejection.notification().as_deref(),
            Some("Error: Todo cannot be more than 30 characters!")
        );
    }

    #[test]
    fn duplicate_message_interpolates_label() {
        let rejection = AddRejection::Duplicate {
            label: "walk the dog".to_owned(),
        };
        assert_eq!(
            rejection.notification().as_deref(),
            Some("Error: You already have walk the dog in your todo list.")
        );
    }

    #[test]
    fn empty_is_silent() {
        assert_eq!(AddRejection::Empty.notification(), None);
    }
}
