//! Runtime bridge: owns the store handle and a current-thread tokio runtime,
//! and runs each store call to completion before returning to the UI.

use std::sync::Arc;

use anyhow::{Context, Result};
use shared::domain::{Book, BookDetails, Isbn};
use storage::{BookStore, Storage};

// Field order matters: the store is dropped while the runtime is still alive.
pub struct StoreBridge {
    store: Arc<dyn BookStore>,
    runtime: tokio::runtime::Runtime,
}

impl StoreBridge {
    /// Wraps an already-built store, such as an in-process fake.
    #[cfg(test)]
    pub fn new(store: Arc<dyn BookStore>) -> Result<Self> {
        let runtime = build_runtime()?;
        Ok(Self { store, runtime })
    }

    /// Opens the SQLite store at `database_url` on a fresh runtime.
    pub fn open(database_url: &str) -> Result<Self> {
        let runtime = build_runtime()?;
        let storage = runtime.block_on(Storage::new(database_url))?;
        Ok(Self {
            store: Arc::new(storage),
            runtime,
        })
    }

    pub fn list_books(&self) -> Result<Vec<Book>> {
        tracing::debug!(command = "list_books", "running store command");
        self.runtime.block_on(self.store.list_books())
    }

    pub fn book_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>> {
        tracing::debug!(command = "book_by_isbn", %isbn, "running store command");
        self.runtime.block_on(self.store.book_by_isbn(isbn))
    }

    pub fn insert_book(&self, book: &Book) -> Result<()> {
        tracing::debug!(command = "insert_book", isbn = %book.isbn, "running store command");
        self.runtime.block_on(self.store.insert_book(book))
    }

    pub fn update_book(&self, isbn: &Isbn, details: &BookDetails) -> Result<bool> {
        tracing::debug!(command = "update_book", %isbn, "running store command");
        self.runtime.block_on(self.store.update_book(isbn, details))
    }

    pub fn delete_book(&self, isbn: &Isbn) -> Result<bool> {
        tracing::debug!(command = "delete_book", %isbn, "running store command");
        self.runtime.block_on(self.store.delete_book(isbn))
    }
}

fn build_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build storage runtime")
}
