//! `SeaORM` entity definitions.

pub mod documents;
pub mod folders;
