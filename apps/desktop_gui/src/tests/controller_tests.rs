use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::domain::{Book, BookDetails, Isbn};
use storage::BookStore;

use super::*;
use crate::controller::events::{UiErrorCategory, UiErrorContext};

#[derive(Default)]
struct FakeBookStore {
    books: Mutex<BTreeMap<Isbn, Book>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl FakeBookStore {
    fn with_books(books: &[Book]) -> Arc<Self> {
        let store = Self::default();
        {
            let mut stored = store.books.lock().expect("lock");
            for book in books {
                stored.insert(book.isbn.clone(), book.clone());
            }
        }
        Arc::new(store)
    }

    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn snapshot(&self) -> Vec<Book> {
        self.books.lock().expect("lock").values().cloned().collect()
    }

    fn remove_behind_ui(&self, isbn: &Isbn) {
        self.books.lock().expect("lock").remove(isbn);
    }

    fn record_write(&self) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("disk I/O error"));
        }
        Ok(())
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(anyhow!("database is locked"));
        }
        Ok(())
    }
}

#[async_trait]
impl BookStore for FakeBookStore {
    async fn list_books(&self) -> Result<Vec<Book>> {
        self.check_read()?;
        Ok(self.snapshot())
    }

    async fn book_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>> {
        self.check_read()?;
        Ok(self.books.lock().expect("lock").get(isbn).cloned())
    }

    async fn insert_book(&self, book: &Book) -> Result<()> {
        self.record_write()?;
        let mut books = self.books.lock().expect("lock");
        if books.contains_key(&book.isbn) {
            return Err(anyhow!("UNIQUE constraint failed: book.ISBN"));
        }
        books.insert(book.isbn.clone(), book.clone());
        Ok(())
    }

    async fn update_book(&self, isbn: &Isbn, details: &BookDetails) -> Result<bool> {
        self.record_write()?;
        let mut books = self.books.lock().expect("lock");
        match books.get_mut(isbn) {
            Some(book) => {
                *book = Book::from_details(isbn.clone(), details.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_book(&self, isbn: &Isbn) -> Result<bool> {
        self.record_write()?;
        Ok(self.books.lock().expect("lock").remove(isbn).is_some())
    }
}

fn isbn(raw: &str) -> Isbn {
    Isbn::parse(raw).expect("isbn")
}

fn dune() -> Book {
    Book {
        isbn: isbn("111"),
        title: "Dune".to_string(),
        author: "Herbert".to_string(),
        year_published: 1965,
        price: 20,
    }
}

fn controller_with(store: Arc<FakeBookStore>) -> BookController {
    let bridge = StoreBridge::new(store).expect("bridge");
    let mut controller = BookController::new(bridge);
    assert_eq!(controller.dispatch(UiEvent::Start), None);
    controller
}

fn fill_dune_form(controller: &mut BookController) {
    let form = controller.state_mut().form_mut();
    form.isbn = "111".to_string();
    form.title = "Dune".to_string();
    form.author = "Herbert".to_string();
    form.year = "1965".to_string();
    form.price = "20".to_string();
}

fn error_message(dialog: Option<Dialog>) -> String {
    match dialog {
        Some(Dialog::Error(err)) => err.message().to_string(),
        other => panic!("expected error dialog, got {other:?}"),
    }
}

#[test]
fn starts_on_landing_page_with_welcome_status() {
    let bridge = StoreBridge::new(FakeBookStore::with_books(&[])).expect("bridge");
    let controller = BookController::new(bridge);
    assert_eq!(controller.state().page(), &Page::Landing);
    assert_eq!(
        controller.state().status(),
        "Welcome to Library Management System"
    );
}

#[test]
fn start_shows_empty_list() {
    let controller = controller_with(FakeBookStore::with_books(&[]));
    assert_eq!(controller.state().page(), &Page::List);
    assert!(controller.state().books().is_empty());
    assert!(controller.state().dialog().is_none());
}

#[test]
fn adding_fresh_book_stores_it_and_returns_to_list() {
    let store = FakeBookStore::with_books(&[]);
    let mut controller = controller_with(store.clone());

    controller.dispatch(UiEvent::OpenAdd);
    assert_eq!(controller.state().page(), &Page::Add);
    fill_dune_form(&mut controller);

    let dialog = controller.dispatch(UiEvent::SubmitAdd);
    assert_eq!(dialog, Some(Dialog::Success(BOOK_ADDED.to_string())));
    assert_eq!(controller.state().page(), &Page::List);
    assert_eq!(controller.state().books(), &[dune()]);
    assert_eq!(store.snapshot(), vec![dune()]);
}

#[test]
fn duplicate_isbn_is_rejected_without_writing() {
    let store = FakeBookStore::with_books(&[dune()]);
    let mut controller = controller_with(store.clone());

    controller.dispatch(UiEvent::OpenAdd);
    fill_dune_form(&mut controller);
    controller.state_mut().form_mut().title = "Another Dune".to_string();

    let message = error_message(controller.dispatch(UiEvent::SubmitAdd));
    assert_eq!(message, "ISBN already exists.");
    assert_eq!(controller.state().page(), &Page::Add);
    assert_eq!(controller.state().form().title, "Another Dune");
    assert_eq!(store.writes(), 0);
    assert_eq!(store.snapshot(), vec![dune()]);
}

#[test]
fn invalid_add_keeps_form_populated() {
    let store = FakeBookStore::with_books(&[]);
    let mut controller = controller_with(store.clone());

    controller.dispatch(UiEvent::OpenAdd);
    fill_dune_form(&mut controller);
    controller.state_mut().form_mut().year = "2025".to_string();

    let message = error_message(controller.dispatch(UiEvent::SubmitAdd));
    assert_eq!(message, "Year must be between 1900 and 2024.");
    assert_eq!(controller.state().page(), &Page::Add);
    assert_eq!(controller.state().form().year, "2025");
    assert_eq!(controller.state().form().isbn, "111");

    controller.dispatch(UiEvent::DismissDialog);
    controller.state_mut().form_mut().year = "1965".to_string();
    controller.state_mut().form_mut().price = "0".to_string();
    let message = error_message(controller.dispatch(UiEvent::SubmitAdd));
    assert_eq!(message, "Price must be greater than 0.");
    assert_eq!(store.writes(), 0);
}

#[test]
fn blank_field_is_rejected() {
    let mut controller = controller_with(FakeBookStore::with_books(&[]));
    controller.dispatch(UiEvent::OpenAdd);
    fill_dune_form(&mut controller);
    controller.state_mut().form_mut().author = "  ".to_string();

    let dialog = controller.dispatch(UiEvent::SubmitAdd);
    let Some(Dialog::Error(err)) = dialog else {
        panic!("expected error dialog");
    };
    assert_eq!(err.category(), UiErrorCategory::Validation);
    assert_eq!(err.message(), "All fields must be filled.");
}

#[test]
fn editing_price_updates_store() {
    let store = FakeBookStore::with_books(&[dune()]);
    let mut controller = controller_with(store.clone());

    controller.dispatch(UiEvent::OpenEdit(isbn("111")));
    assert_eq!(
        controller.state().page(),
        &Page::Edit { isbn: isbn("111") }
    );
    assert_eq!(controller.state().form().price, "20");

    controller.state_mut().form_mut().price = "25".to_string();
    let dialog = controller.dispatch(UiEvent::SubmitEdit);
    assert_eq!(dialog, Some(Dialog::Success(BOOK_UPDATED.to_string())));
    assert_eq!(controller.state().page(), &Page::List);
    assert_eq!(store.snapshot()[0].price, 25);
    assert_eq!(controller.state().books()[0].price, 25);
}

#[test]
fn unchanged_edit_is_a_no_op() {
    let store = FakeBookStore::with_books(&[dune()]);
    let mut controller = controller_with(store.clone());

    controller.dispatch(UiEvent::OpenEdit(isbn("111")));
    let dialog = controller.dispatch(UiEvent::SubmitEdit);

    assert_eq!(dialog, Some(Dialog::Info(NO_CHANGES.to_string())));
    assert_eq!(controller.state().page(), &Page::List);
    assert_eq!(store.writes(), 0);
}

#[test]
fn invalid_edit_is_rejected_and_stays_on_form() {
    let store = FakeBookStore::with_books(&[dune()]);
    let mut controller = controller_with(store.clone());

    controller.dispatch(UiEvent::OpenEdit(isbn("111")));
    controller.state_mut().form_mut().year = "1899".to_string();
    let message = error_message(controller.dispatch(UiEvent::SubmitEdit));
    assert_eq!(message, "Year must be between 1900 and 2024.");
    assert_eq!(
        controller.state().page(),
        &Page::Edit { isbn: isbn("111") }
    );

    controller.dispatch(UiEvent::DismissDialog);
    controller.state_mut().form_mut().year = "1965".to_string();
    controller.state_mut().form_mut().price = "-1".to_string();
    let message = error_message(controller.dispatch(UiEvent::SubmitEdit));
    assert_eq!(message, "Price must be greater than 0.");
    assert_eq!(store.writes(), 0);
    assert_eq!(store.snapshot(), vec![dune()]);
}

#[test]
fn edit_of_vanished_book_reports_and_refreshes_list() {
    let store = FakeBookStore::with_books(&[dune()]);
    let mut controller = controller_with(store.clone());

    controller.dispatch(UiEvent::OpenEdit(isbn("111")));
    controller.state_mut().form_mut().price = "30".to_string();
    store.remove_behind_ui(&isbn("111"));

    let message = error_message(controller.dispatch(UiEvent::SubmitEdit));
    assert_eq!(message, "Book with ISBN 111 no longer exists.");
    assert_eq!(controller.state().page(), &Page::List);
    assert!(controller.state().books().is_empty());
}

#[test]
fn delete_requires_confirmation() {
    let store = FakeBookStore::with_books(&[dune()]);
    let mut controller = controller_with(store.clone());

    let dialog = controller.dispatch(UiEvent::RequestDelete(isbn("111")));
    let Some(confirm) = dialog else {
        panic!("expected confirmation dialog");
    };
    assert_eq!(confirm.title(), "Confirmation");
    assert_eq!(
        confirm.message(),
        "Do you want to delete the book with ISBN: 111?"
    );

    assert_eq!(controller.dispatch(UiEvent::CancelDelete), None);
    assert!(controller.state().dialog().is_none());
    assert_eq!(store.writes(), 0);
    assert_eq!(controller.state().books().len(), 1);
}

#[test]
fn confirmed_delete_removes_book() {
    let store = FakeBookStore::with_books(&[dune()]);
    let mut controller = controller_with(store.clone());

    controller.dispatch(UiEvent::RequestDelete(isbn("111")));
    let dialog = controller.dispatch(UiEvent::ConfirmDelete);

    assert_eq!(dialog, Some(Dialog::Success(BOOK_DELETED.to_string())));
    assert!(controller.state().books().is_empty());
    assert!(store.snapshot().is_empty());
}

#[test]
fn storage_failure_is_reported_and_form_kept() {
    let store = FakeBookStore::with_books(&[]);
    store.fail_writes.store(true, Ordering::SeqCst);
    let mut controller = controller_with(store.clone());

    controller.dispatch(UiEvent::OpenAdd);
    fill_dune_form(&mut controller);
    let dialog = controller.dispatch(UiEvent::SubmitAdd);

    let Some(Dialog::Error(err)) = dialog else {
        panic!("expected error dialog");
    };
    assert_eq!(err.category(), UiErrorCategory::Storage);
    assert_eq!(err.context(), UiErrorContext::AddBook);
    assert!(err.message().contains("disk I/O error"));
    assert_eq!(controller.state().page(), &Page::Add);
    assert_eq!(controller.state().form().title, "Dune");
    assert!(store.snapshot().is_empty());
}

#[test]
fn failed_update_keeps_edit_form_open() {
    let store = FakeBookStore::with_books(&[dune()]);
    let mut controller = controller_with(store.clone());

    controller.dispatch(UiEvent::OpenEdit(isbn("111")));
    controller.state_mut().form_mut().price = "25".to_string();
    store.fail_writes.store(true, Ordering::SeqCst);
    let dialog = controller.dispatch(UiEvent::SubmitEdit);

    let Some(Dialog::Error(err)) = dialog else {
        panic!("expected error dialog");
    };
    assert_eq!(err.category(), UiErrorCategory::Storage);
    assert_eq!(err.context(), UiErrorContext::EditBook);
    assert!(err.message().contains("disk I/O error"));
    assert_eq!(
        controller.state().page(),
        &Page::Edit { isbn: isbn("111") }
    );
    assert_eq!(controller.state().form().price, "25");
    assert_eq!(store.snapshot(), vec![dune()]);
}

#[test]
fn failed_delete_keeps_book_listed() {
    let store = FakeBookStore::with_books(&[dune()]);
    let mut controller = controller_with(store.clone());

    controller.dispatch(UiEvent::RequestDelete(isbn("111")));
    store.fail_writes.store(true, Ordering::SeqCst);
    let dialog = controller.dispatch(UiEvent::ConfirmDelete);

    let Some(Dialog::Error(err)) = dialog else {
        panic!("expected error dialog");
    };
    assert_eq!(err.category(), UiErrorCategory::Storage);
    assert_eq!(err.context(), UiErrorContext::DeleteBook);
    assert!(err.message().contains("disk I/O error"));
    assert_eq!(controller.state().page(), &Page::List);
    assert_eq!(controller.state().books(), &[dune()]);
    assert_eq!(store.snapshot(), vec![dune()]);
}

#[test]
fn failed_list_load_shows_empty_list_with_error() {
    let store = FakeBookStore::with_books(&[dune()]);
    store.fail_reads.store(true, Ordering::SeqCst);
    let bridge = StoreBridge::new(store.clone()).expect("bridge");
    let mut controller = BookController::new(bridge);

    let dialog = controller.dispatch(UiEvent::Start);

    let Some(Dialog::Error(err)) = dialog else {
        panic!("expected error dialog");
    };
    assert_eq!(err.category(), UiErrorCategory::Storage);
    assert_eq!(err.context(), UiErrorContext::LoadBooks);
    assert!(err.message().contains("database is locked"));
    assert_eq!(controller.state().page(), &Page::List);
    assert!(controller.state().books().is_empty());
    assert_eq!(store.writes(), 0);
}

#[test]
fn open_dialog_blocks_other_events() {
    let store = FakeBookStore::with_books(&[dune()]);
    let mut controller = controller_with(store.clone());

    controller.dispatch(UiEvent::RequestDelete(isbn("111")));
    assert_eq!(controller.dispatch(UiEvent::OpenAdd), None);
    assert_eq!(controller.state().page(), &Page::List);
    assert!(matches!(
        controller.state().dialog(),
        Some(Dialog::ConfirmDelete { .. })
    ));
}

#[test]
fn events_outside_their_page_are_ignored() {
    let mut controller = controller_with(FakeBookStore::with_books(&[]));
    assert_eq!(controller.dispatch(UiEvent::SubmitAdd), None);
    assert_eq!(controller.dispatch(UiEvent::Back), None);
    assert_eq!(controller.dispatch(UiEvent::Start), None);
    assert_eq!(controller.state().page(), &Page::List);
}

#[test]
fn back_returns_to_list_without_writing() {
    let store = FakeBookStore::with_books(&[dune()]);
    let mut controller = controller_with(store.clone());

    controller.dispatch(UiEvent::OpenEdit(isbn("111")));
    controller.state_mut().form_mut().title = "Changed".to_string();
    controller.dispatch(UiEvent::Back);

    assert_eq!(controller.state().page(), &Page::List);
    assert_eq!(store.writes(), 0);
    assert_eq!(controller.state().books()[0].title, "Dune");
}

#[test]
fn full_lifecycle_over_sqlite() {
    let bridge = StoreBridge::open("sqlite::memory:").expect("sqlite bridge");
    let mut controller = BookController::new(bridge);
    controller.dispatch(UiEvent::Start);

    controller.dispatch(UiEvent::OpenAdd);
    fill_dune_form(&mut controller);
    controller.dispatch(UiEvent::SubmitAdd);
    controller.dispatch(UiEvent::DismissDialog);
    assert_eq!(controller.state().books(), &[dune()]);

    controller.dispatch(UiEvent::OpenEdit(isbn("111")));
    controller.state_mut().form_mut().price = "25".to_string();
    controller.dispatch(UiEvent::SubmitEdit);
    controller.dispatch(UiEvent::DismissDialog);
    assert_eq!(controller.state().books()[0].price, 25);

    controller.dispatch(UiEvent::RequestDelete(isbn("111")));
    controller.dispatch(UiEvent::ConfirmDelete);
    assert!(controller.state().books().is_empty());
    assert_eq!(controller.state().status(), "No books in inventory");
}
