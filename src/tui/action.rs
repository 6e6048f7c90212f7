use serde::{Deserialize, Serialize};
use std::fmt;

/// All possible actions in the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Action {
    // Navigation
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    ColumnTop,
    ColumnBottom,
    FirstColumn,
    LastColumn,

    // View
    ToggleHistogram,
    ToggleHelp,

    // File Operations
    SaveHistogram,

    // Application
    Quit,
}

impl Action {
    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Action::MoveUp => "Next bucket up",
            Action::MoveDown => "Next bucket down",
            Action::MoveLeft => "Previous column",
            Action::MoveRight => "Next column",
            Action::ColumnTop => "Top bucket of column",
            Action::ColumnBottom => "Bottom bucket of column",
            Action::FirstColumn => "First column",
            Action::LastColumn => "Last column",
            Action::ToggleHistogram => "Toggle histogram",
            Action::ToggleHelp => "Toggle help",
            Action::SaveHistogram => "Save histogram PNG",
            Action::Quit => "Quit",
        }
    }

    /// Get category for grouping in help screen
    pub fn category(&self) -> ActionCategory {
        match self {
            Action::MoveUp
            | Action::MoveDown
            | Action::MoveLeft
            | Action::MoveRight
            | Action::ColumnTop
            | Action::ColumnBottom
            | Action::FirstColumn
            | Action::LastColumn => ActionCategory::Navigation,

            Action::ToggleHistogram | Action::ToggleHelp => ActionCategory::View,

            Action::SaveHistogram => ActionCategory::FileOps,

            Action::Quit => ActionCategory::Application,
        }
    }

    /// Get all possible actions (for help and validation)
    pub fn all() -> Vec<Action> {
        vec![
            Action::MoveUp,
            Action::MoveDown,
            Action::MoveLeft,
            Action::MoveRight,
            Action::ColumnTop,
            Action::ColumnBottom,
            Action::FirstColumn,
            Action::LastColumn,
            Action::ToggleHistogram,
            Action::ToggleHelp,
            Action::SaveHistogram,
            Action::Quit,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    Navigation,
    View,
    FileOps,
    Application,
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionCategory::Navigation => write!(f, "Navigation"),
            ActionCategory::View => write!(f, "View"),
            ActionCategory::FileOps => write!(f, "File Operations"),
            ActionCategory::Application => write!(f, "Application"),
        }
    }
}
