//! Page state machine. Pure state: no store access happens here.

use shared::{
    domain::{Book, Isbn},
    validation::BookForm,
};

use super::events::{Dialog, UiEvent};

pub const WELCOME_STATUS: &str = "Welcome to Library Management System";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Landing,
    List,
    Add,
    Edit { isbn: Isbn },
}

#[derive(Debug, Clone)]
pub struct ViewState {
    page: Page,
    form: BookForm,
    books: Vec<Book>,
    dialog: Option<Dialog>,
    status: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            page: Page::Landing,
            form: BookForm::default(),
            books: Vec::new(),
            dialog: None,
            status: WELCOME_STATUS.to_string(),
        }
    }
}

impl ViewState {
    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn form(&self) -> &BookForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut BookForm {
        &mut self.form
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Whether `event` is a legal transition from the current state. An open
    /// dialog blocks everything except its own answers.
    pub fn accepts(&self, event: &UiEvent) -> bool {
        match (&self.dialog, event) {
            (Some(Dialog::ConfirmDelete { .. }), UiEvent::ConfirmDelete | UiEvent::CancelDelete) => {
                true
            }
            (Some(Dialog::ConfirmDelete { .. }), _) => false,
            (Some(_), UiEvent::DismissDialog) => true,
            (Some(_), _) => false,
            (None, UiEvent::ConfirmDelete | UiEvent::CancelDelete | UiEvent::DismissDialog) => {
                false
            }
            (None, UiEvent::Start) => self.page == Page::Landing,
            (None, UiEvent::OpenAdd | UiEvent::OpenEdit(_) | UiEvent::RequestDelete(_)) => {
                self.page == Page::List
            }
            (None, UiEvent::Back) => matches!(self.page, Page::Add | Page::Edit { .. }),
            (None, UiEvent::SubmitAdd) => self.page == Page::Add,
            (None, UiEvent::SubmitEdit) => matches!(self.page, Page::Edit { .. }),
        }
    }

    pub fn enter_list(&mut self, books: Vec<Book>) {
        self.status = match books.len() {
            0 => "No books in inventory".to_string(),
            1 => "1 book in inventory".to_string(),
            n => format!("{n} books in inventory"),
        };
        self.page = Page::List;
        self.form = BookForm::default();
        self.books = books;
    }

    pub fn enter_add(&mut self) {
        self.page = Page::Add;
        self.form = BookForm::default();
        self.status = "Adding a new book".to_string();
    }

    pub fn enter_edit(&mut self, book: &Book) {
        self.page = Page::Edit {
            isbn: book.isbn.clone(),
        };
        self.form = BookForm::from_book(book);
        self.status = format!("Editing book {}", book.isbn);
    }

    pub fn raise(&mut self, dialog: Dialog) {
        self.dialog = Some(dialog);
    }

    pub fn take_dialog(&mut self) -> Option<Dialog> {
        self.dialog.take()
    }
}
