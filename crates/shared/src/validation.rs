//! Raw form input and the rules that turn it into a [`Book`].

use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;

use crate::{
    domain::{Book, BookDetails, Isbn, MAX_YEAR_PUBLISHED, MIN_YEAR_PUBLISHED},
    error::ValidationError,
};

/// Text exactly as typed into the add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year: String,
    pub price: String,
}

impl BookForm {
    pub fn from_book(book: &Book) -> Self {
        Self {
            isbn: book.isbn.to_string(),
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year_published.to_string(),
            price: book.price.to_string(),
        }
    }

    /// Validates every field for a new record. The duplicate-ISBN rule needs
    /// storage and is checked by the caller.
    pub fn validate_new(&self) -> Result<Book, ValidationError> {
        if self.isbn.trim().is_empty() {
            return Err(ValidationError::EmptyFields);
        }
        let details = self.validate_details()?;
        let isbn = Isbn::parse(&self.isbn)?;
        Ok(Book::from_details(isbn, details))
    }

    /// Validates the mutable fields only; used by the edit flow where the
    /// ISBN is read-only.
    pub fn validate_details(&self) -> Result<BookDetails, ValidationError> {
        let title = self.title.trim();
        let author = self.author.trim();
        let year = self.year.trim();
        let price = self.price.trim();
        if title.is_empty() || author.is_empty() || year.is_empty() || price.is_empty() {
            return Err(ValidationError::EmptyFields);
        }

        // Both fields are parsed before any range check runs.
        let year_published = parse_whole::<i32>(year, "Year")?;
        let price = parse_whole::<i64>(price, "Price")?;

        let year_published = match year_published {
            WholeNumber::Value(year) => year,
            WholeNumber::TooLarge => i32::MAX,
            WholeNumber::TooSmall => i32::MIN,
        };
        check_year(year_published)?;
        let price = match price {
            WholeNumber::Value(price) => price,
            WholeNumber::TooLarge => return Err(ValidationError::PriceTooLarge),
            WholeNumber::TooSmall => i64::MIN,
        };
        check_price(price)?;

        Ok(BookDetails {
            title: title.to_string(),
            author: author.to_string(),
            year_published,
            price,
        })
    }
}

/// A whole number that may not fit the target integer type.
enum WholeNumber<T> {
    Value(T),
    TooLarge,
    TooSmall,
}

fn parse_whole<T>(raw: &str, field: &'static str) -> Result<WholeNumber<T>, ValidationError>
where
    T: FromStr<Err = ParseIntError>,
{
    match raw.parse::<T>() {
        Ok(value) => Ok(WholeNumber::Value(value)),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Ok(WholeNumber::TooLarge),
            IntErrorKind::NegOverflow => Ok(WholeNumber::TooSmall),
            _ => Err(ValidationError::NotANumber { field }),
        },
    }
}

pub fn check_year(year: i32) -> Result<(), ValidationError> {
    if (MIN_YEAR_PUBLISHED..=MAX_YEAR_PUBLISHED).contains(&year) {
        Ok(())
    } else {
        Err(ValidationError::YearOutOfRange { year })
    }
}

pub fn check_price(price: i64) -> Result<(), ValidationError> {
    if price > 0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositivePrice { price })
    }
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
