//! Component trait: the building block for every UI element.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};
use tokio::sync::mpsc::UnboundedSender;

use smartdns_core::Translator;

use crate::action::Action;
use crate::theme::Theme;

/// Render-time context. Chrome strings and colors are resolved from this on
/// every frame, so a language or theme switch needs no per-screen update.
#[derive(Debug, Clone, Copy)]
pub struct View {
    pub tr: Translator,
    pub theme: Theme,
}

/// Every UI element implements Component.
///
/// Lifecycle: `init` → (`handle_key_event` | `handle_paste` | `update` | `render`)*
pub trait Component: Send {
    /// Called once when the component is mounted.
    /// Receives the action sender for dispatching actions to the app loop.
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    /// Handle a keyboard event. Return an Action to dispatch, or None.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Handle pasted text. Ignored unless a text field is being edited.
    fn handle_paste(&mut self, _text: &str) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Process a dispatched action. May return a follow-up action.
    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Render into the provided frame area.
    fn render(&self, frame: &mut Frame, area: Rect, view: &View);

    /// Whether a text field owns the keyboard, suppressing global keys.
    fn captures_input(&self) -> bool {
        false
    }

    /// Set focus state.
    fn set_focused(&mut self, _focused: bool) {}

    /// Unique identifier for this component (for logging).
    fn id(&self) -> &'static str;
}
