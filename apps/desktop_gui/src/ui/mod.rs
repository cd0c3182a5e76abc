//! UI layer for the desktop app: app shell, pages, dialogs, theme, and widgets.

pub mod app;
pub mod theme;
pub mod widgets;

pub use app::BookshelfApp;
