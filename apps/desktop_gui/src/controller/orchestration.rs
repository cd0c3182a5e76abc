//! Runs each accepted UI event through validation and at most one store
//! write, then settles the page and the dialog to show.

use shared::{domain::Isbn, error::ValidationError};

use crate::backend_bridge::StoreBridge;

use super::events::{Dialog, UiError, UiErrorCategory, UiErrorContext, UiEvent};
use super::reducer::{Page, ViewState};

pub const BOOK_ADDED: &str = "Book added successfully.";
pub const BOOK_UPDATED: &str = "Book updated successfully.";
pub const BOOK_DELETED: &str = "Book deleted successfully.";
pub const NO_CHANGES: &str = "No changes made. Book remains the same.";

pub struct BookController {
    bridge: StoreBridge,
    state: ViewState,
}

impl BookController {
    pub fn new(bridge: StoreBridge) -> Self {
        Self {
            bridge,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    /// Applies one user action. Returns the dialog it raised, if any; the
    /// dialog also stays in the view state until answered.
    pub fn dispatch(&mut self, event: UiEvent) -> Option<Dialog> {
        if !self.state.accepts(&event) {
            tracing::warn!(
                event = event.name(),
                page = ?self.state.page(),
                "ignoring event not valid in current state"
            );
            return None;
        }
        tracing::debug!(event = event.name(), "handling ui event");

        let dialog = match event {
            UiEvent::Start | UiEvent::Back => self.show_list(),
            UiEvent::OpenAdd => {
                self.state.enter_add();
                None
            }
            UiEvent::OpenEdit(isbn) => self.open_edit(&isbn),
            UiEvent::SubmitAdd => Some(self.submit_add()),
            UiEvent::SubmitEdit => match self.state.page().clone() {
                Page::Edit { isbn } => Some(self.submit_edit(isbn)),
                _ => None,
            },
            UiEvent::RequestDelete(isbn) => Some(Dialog::ConfirmDelete { isbn }),
            UiEvent::ConfirmDelete => self.confirm_delete(),
            UiEvent::CancelDelete | UiEvent::DismissDialog => {
                self.state.take_dialog();
                None
            }
        };

        if let Some(dialog) = &dialog {
            self.state.raise(dialog.clone());
        }
        dialog
    }

    /// Reloads the inventory and lands on the list page. A failed load still
    /// shows the (empty) list so the UI stays usable.
    fn show_list(&mut self) -> Option<Dialog> {
        match self.bridge.list_books() {
            Ok(books) => {
                self.state.enter_list(books);
                None
            }
            Err(err) => {
                self.state.enter_list(Vec::new());
                Some(storage_failure(UiErrorContext::LoadBooks, err))
            }
        }
    }

    fn open_edit(&mut self, isbn: &Isbn) -> Option<Dialog> {
        let book = self
            .state
            .books()
            .iter()
            .find(|book| &book.isbn == isbn)
            .cloned();
        match book {
            Some(book) => {
                self.state.enter_edit(&book);
                None
            }
            None => Some(self.vanished(UiErrorContext::EditBook, isbn)),
        }
    }

    fn submit_add(&mut self) -> Dialog {
        let context = UiErrorContext::AddBook;
        let book = match self.state.form().validate_new() {
            Ok(book) => book,
            Err(err) => return self.rejected(context, err),
        };

        match self.bridge.book_by_isbn(&book.isbn) {
            Ok(Some(_)) => return self.rejected(context, ValidationError::DuplicateIsbn(book.isbn)),
            Ok(None) => {}
            Err(err) => return storage_failure(context, err),
        }

        if let Err(err) = self.bridge.insert_book(&book) {
            return storage_failure(context, err);
        }
        tracing::info!(isbn = %book.isbn, "book added");
        self.show_list()
            .unwrap_or_else(|| Dialog::Success(BOOK_ADDED.to_string()))
    }

    fn submit_edit(&mut self, isbn: Isbn) -> Dialog {
        let context = UiErrorContext::EditBook;

        let details = match self.state.form().validate_details() {
            Ok(details) => details,
            Err(err) => return self.rejected(context, err),
        };

        let current = match self.bridge.book_by_isbn(&isbn) {
            Ok(Some(book)) => book,
            Ok(None) => return self.vanished(context, &isbn),
            Err(err) => return storage_failure(context, err),
        };

        if current.details() == details {
            tracing::info!(%isbn, "edit submitted without changes");
            return self
                .show_list()
                .unwrap_or_else(|| Dialog::Info(NO_CHANGES.to_string()));
        }

        match self.bridge.update_book(&isbn, &details) {
            Ok(true) => {
                tracing::info!(%isbn, "book updated");
                self.show_list()
                    .unwrap_or_else(|| Dialog::Success(BOOK_UPDATED.to_string()))
            }
            Ok(false) => self.vanished(context, &isbn),
            Err(err) => storage_failure(context, err),
        }
    }

    fn confirm_delete(&mut self) -> Option<Dialog> {
        let Some(Dialog::ConfirmDelete { isbn }) = self.state.take_dialog() else {
            return None;
        };
        let context = UiErrorContext::DeleteBook;

        let outcome = match self.bridge.delete_book(&isbn) {
            Ok(true) => {
                tracing::info!(%isbn, "book deleted");
                Dialog::Success(BOOK_DELETED.to_string())
            }
            Ok(false) => report(UiError::missing_book(context, &isbn)),
            Err(err) => storage_failure(context, err),
        };
        Some(self.show_list().unwrap_or(outcome))
    }

    fn rejected(&self, context: UiErrorContext, err: ValidationError) -> Dialog {
        report(UiError::validation(context, &err))
    }

    /// The record disappeared underneath the UI; refresh the list around the
    /// error.
    fn vanished(&mut self, context: UiErrorContext, isbn: &Isbn) -> Dialog {
        let missing = report(UiError::missing_book(context, isbn));
        self.show_list().unwrap_or(missing)
    }
}

fn storage_failure(context: UiErrorContext, err: anyhow::Error) -> Dialog {
    report(UiError::storage(context, &err))
}

/// Logs the error at a level matching its category and wraps it for display.
fn report(err: UiError) -> Dialog {
    match err.category() {
        UiErrorCategory::Validation => {
            tracing::warn!(context = ?err.context(), "form rejected: {}", err.message());
        }
        UiErrorCategory::Storage => {
            tracing::error!(context = ?err.context(), "storage operation failed: {}", err.message());
        }
    }
    Dialog::Error(err)
}

#[cfg(test)]
#[path = "../tests/controller_tests.rs"]
mod tests;
