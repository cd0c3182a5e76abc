use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use shared::{
    domain::{Book, Isbn},
    error::ValidationError,
    validation::BookForm,
};
use storage::{resolve_database_url, BookStore, Storage};

#[derive(Parser, Debug)]
#[command(name = "bookshelf-tools", about = "Inspect and seed the book inventory")]
struct Cli {
    /// Defaults to BOOKSHELF__DATABASE_URL, DATABASE_URL, then the desktop
    /// app's per-user database.
    #[arg(long)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every book.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Print one book.
    Show {
        isbn: String,
        #[arg(long)]
        json: bool,
    },
    /// Add a book using the same rules as the desktop form.
    Add {
        isbn: String,
        title: String,
        author: String,
        year: String,
        price: String,
    },
    Delete { isbn: String },
    /// Ping the database.
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
    let cli = Cli::parse();
    let database_url = resolve_database_url(cli.database_url, |name| std::env::var(name).ok());
    tracing::debug!(%database_url, "opening inventory");
    let storage = Storage::new(&database_url).await?;

    match cli.command {
        Command::List { json } => {
            let books = storage.list_books().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&books)?);
            } else if books.is_empty() {
                println!("No books found.");
            } else {
                print_books(&books);
            }
        }
        Command::Show { isbn, json } => {
            let isbn = Isbn::parse(&isbn)?;
            let Some(book) = storage.book_by_isbn(&isbn).await? else {
                bail!("no book with ISBN {isbn}");
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&book)?);
            } else {
                print_books(std::slice::from_ref(&book));
            }
        }
        Command::Add {
            isbn,
            title,
            author,
            year,
            price,
        } => {
            let form = BookForm {
                isbn,
                title,
                author,
                year,
                price,
            };
            let book = form.validate_new()?;
            if storage.book_by_isbn(&book.isbn).await?.is_some() {
                return Err(ValidationError::DuplicateIsbn(book.isbn).into());
            }
            storage.insert_book(&book).await?;
            tracing::info!(isbn = %book.isbn, "book added");
            println!("added book isbn={}", book.isbn);
        }
        Command::Delete { isbn } => {
            let isbn = Isbn::parse(&isbn)?;
            if !storage.delete_book(&isbn).await? {
                bail!("no book with ISBN {isbn}");
            }
            println!("deleted book isbn={isbn}");
        }
        Command::Check => {
            storage.health_check().await?;
            println!("database ok: {database_url}");
        }
    }

    Ok(())
}

fn print_books(books: &[Book]) {
    let isbn_width = column_width(books.iter().map(|b| b.isbn.as_str()), "ISBN");
    let title_width = column_width(books.iter().map(|b| b.title.as_str()), "Title");
    let author_width = column_width(books.iter().map(|b| b.author.as_str()), "Author");

    println!(
        "{:<isbn_width$}  {:<title_width$}  {:<author_width$}  {:>4}  {:>6}",
        "ISBN", "Title", "Author", "Year", "Price"
    );
    for book in books {
        println!(
            "{:<isbn_width$}  {:<title_width$}  {:<author_width$}  {:>4}  {:>6}",
            book.isbn.as_str(),
            book.title,
            book.author,
            book.year_published,
            book.price
        );
    }
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
