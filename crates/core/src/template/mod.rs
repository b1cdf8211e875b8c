//! Built-in document templates.
//!
//! A small static catalog of rich-text starting points for text documents.
//! Templates are reference material only: a text document may record which
//! template it started from, but nothing ever validates that reference.

mod catalog;

pub use catalog::{Template, all, get};
