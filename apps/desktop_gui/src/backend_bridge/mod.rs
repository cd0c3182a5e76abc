//! Bridge from the synchronous UI loop to the async book store.

pub mod runtime;

pub use runtime::StoreBridge;
