//! Controller layer: UI events, page state transitions, and store orchestration.

pub mod events;
pub mod orchestration;
pub mod reducer;

pub use events::{Dialog, UiEvent};
pub use orchestration::BookController;
pub use reducer::Page;
