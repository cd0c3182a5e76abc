//! UI events, dialogs, and error modeling for the book controller.

use shared::{domain::Isbn, error::ValidationError};

/// User actions delivered from the UI to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Start,
    OpenAdd,
    OpenEdit(Isbn),
    Back,
    SubmitAdd,
    SubmitEdit,
    RequestDelete(Isbn),
    ConfirmDelete,
    CancelDelete,
    DismissDialog,
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::Start => "start",
            UiEvent::OpenAdd => "open_add",
            UiEvent::OpenEdit(_) => "open_edit",
            UiEvent::Back => "back",
            UiEvent::SubmitAdd => "submit_add",
            UiEvent::SubmitEdit => "submit_edit",
            UiEvent::RequestDelete(_) => "request_delete",
            UiEvent::ConfirmDelete => "confirm_delete",
            UiEvent::CancelDelete => "cancel_delete",
            UiEvent::DismissDialog => "dismiss_dialog",
        }
    }
}

/// Modal shown over the current page until the user answers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Success(String),
    Info(String),
    Error(UiError),
    ConfirmDelete { isbn: Isbn },
}

impl Dialog {
    pub fn title(&self) -> &'static str {
        match self {
            Dialog::Success(_) => "Success",
            Dialog::Info(_) => "Information",
            Dialog::Error(_) => "Error",
            Dialog::ConfirmDelete { .. } => "Confirmation",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Dialog::Success(message) | Dialog::Info(message) => message.clone(),
            Dialog::Error(err) => err.message().to_string(),
            Dialog::ConfirmDelete { isbn } => {
                format!("Do you want to delete the book with ISBN: {isbn}?")
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Dialog::Error(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    LoadBooks,
    AddBook,
    EditBook,
    DeleteBook,
}

impl UiErrorContext {
    fn failure_prefix(self) -> &'static str {
        match self {
            UiErrorContext::LoadBooks => "Failed to load books",
            UiErrorContext::AddBook => "Failed to add book",
            UiErrorContext::EditBook => "Failed to update book",
            UiErrorContext::DeleteBook => "Failed to delete book",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn validation(context: UiErrorContext, err: &ValidationError) -> Self {
        Self {
            category: UiErrorCategory::Validation,
            context,
            message: err.to_string(),
        }
    }

    pub fn storage(context: UiErrorContext, err: &anyhow::Error) -> Self {
        Self {
            category: UiErrorCategory::Storage,
            context,
            message: format!("{}: {err:#}", context.failure_prefix()),
        }
    }

    pub fn missing_book(context: UiErrorContext, isbn: &Isbn) -> Self {
        Self {
            category: UiErrorCategory::Storage,
            context,
            message: format!("Book with ISBN {isbn} no longer exists."),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
