use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{fs, path::Path, str::FromStr};

use shared::domain::{Book, BookDetails, Isbn};

/// Data access for the `book` table. Implemented by [`Storage`] and by
/// in-process fakes in tests.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn list_books(&self) -> Result<Vec<Book>>;
    async fn book_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>>;
    async fn insert_book(&self, book: &Book) -> Result<()>;
    /// Returns `false` when no row has this ISBN.
    async fn update_book(&self, isbn: &Isbn, details: &BookDetails) -> Result<bool>;
    /// Returns `false` when no row has this ISBN.
    async fn delete_book(&self, isbn: &Isbn) -> Result<bool>;
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite database url '{database_url}'"))?
            .create_if_missing(true);
        // Every in-memory connection is its own database.
        let max_connections = if database_url.contains(":memory:") {
            1
        } else {
            5
        };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open sqlite database '{database_url}'"))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to apply book schema migrations")?;
        tracing::debug!(database_url, "book storage ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }
}

#[async_trait]
impl BookStore for Storage {
    async fn list_books(&self) -> Result<Vec<Book>> {
        let rows = sqlx::query(
            "SELECT ISBN, title, author, year_published, price FROM book ORDER BY ISBN",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to load books")?;
        rows.iter().map(book_from_row).collect()
    }

    async fn book_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>> {
        let row = sqlx::query(
            "SELECT ISBN, title, author, year_published, price FROM book WHERE ISBN = ?",
        )
        .bind(isbn.as_str())
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to load book {isbn}"))?;
        row.as_ref().map(book_from_row).transpose()
    }

    async fn insert_book(&self, book: &Book) -> Result<()> {
        let result = sqlx::query(
            "INSERT INTO book (ISBN, title, author, year_published, price) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(book.isbn.as_str())
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.year_published)
        .bind(book.price)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(anyhow!("a book with ISBN {} is already stored", book.isbn))
            }
            Err(err) => Err(err).with_context(|| format!("failed to insert book {}", book.isbn)),
        }
    }

    async fn update_book(&self, isbn: &Isbn, details: &BookDetails) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE book SET title = ?, author = ?, year_published = ?, price = ? WHERE ISBN = ?",
        )
        .bind(&details.title)
        .bind(&details.author)
        .bind(details.year_published)
        .bind(details.price)
        .bind(isbn.as_str())
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to update book {isbn}"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_book(&self, isbn: &Isbn) -> Result<bool> {
        let result = sqlx::query("DELETE FROM book WHERE ISBN = ?")
            .bind(isbn.as_str())
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete book {isbn}"))?;
        Ok(result.rows_affected() > 0)
    }
}

fn book_from_row(row: &SqliteRow) -> Result<Book> {
    let raw_isbn: String = row.try_get(0)?;
    let isbn = Isbn::parse(&raw_isbn)
        .map_err(|err| anyhow!("stored book has an invalid ISBN '{raw_isbn}': {err}"))?;
    Ok(Book {
        isbn,
        title: row.try_get(1)?,
        author: row.try_get(2)?,
        year_published: row.try_get(3)?,
        price: row.try_get(4)?,
    })
}

const FALLBACK_DATABASE_URL: &str = "sqlite://./data/books.sqlite3";

/// Per-user location of the inventory database, shared by every binary.
pub fn default_database_url() -> String {
    match dirs::data_local_dir() {
        Some(base) => {
            let path = base.join("bookshelf").join("books.sqlite3");
            format!("sqlite://{}", path.to_string_lossy().replace('\\', "/"))
        }
        None => FALLBACK_DATABASE_URL.into(),
    }
}

/// Explicit URL first, then `BOOKSHELF__DATABASE_URL`, then `DATABASE_URL`,
/// then [`default_database_url`].
pub fn resolve_database_url(
    explicit: Option<String>,
    env: impl Fn(&str) -> Option<String>,
) -> String {
    [explicit, env("BOOKSHELF__DATABASE_URL"), env("DATABASE_URL")]
        .into_iter()
        .flatten()
        .find(|url| !url.trim().is_empty())
        .unwrap_or_else(default_database_url)
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    if database_url.contains(":memory:") || !database_url.starts_with("sqlite:") {
        return Ok(());
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();
    if path.is_empty() {
        return Ok(());
    }

    let Some(parent) = Path::new(path).parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
