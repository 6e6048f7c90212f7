use crate::tui::action::Action;
use color_eyre::Result;
use ratatui::{Frame, layout::Rect};

/// Base trait for the viewer's panes
///
/// Panes take the actions routed to them and draw themselves into the area the
/// app lays out for them.
pub trait Component {
    /// Handle an action
    ///
    /// Returns Ok(true) if the action was handled and consumed.
    /// Returns Ok(false) if the action should propagate.
    fn handle_action(&mut self, action: Action) -> Result<bool>;

    /// Render the component within `area`
    fn render(&mut self, frame: &mut Frame, area: Rect);

    /// Actions this component reacts to, used for the help line
    fn supported_actions(&self) -> &[Action];

    /// Component name for logging
    fn name(&self) -> &str;
}
