use thiserror::Error;

use crate::domain::{Isbn, MAX_YEAR_PUBLISHED, MIN_YEAR_PUBLISHED};

/// Rejections raised before anything is written. The display text is what
/// the user sees in the error dialog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All fields must be filled.")]
    EmptyFields,
    #[error("{field} must be a whole number.")]
    NotANumber { field: &'static str },
    #[error("Year must be between {} and {}.", MIN_YEAR_PUBLISHED, MAX_YEAR_PUBLISHED)]
    YearOutOfRange { year: i32 },
    #[error("Price must be greater than 0.")]
    NonPositivePrice { price: i64 },
    #[error("Price is too large.")]
    PriceTooLarge,
    #[error("ISBN already exists.")]
    DuplicateIsbn(Isbn),
}
