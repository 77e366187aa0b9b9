//! Reusable widgets shared by the screens.

pub mod line_editor;
pub mod toasts;
