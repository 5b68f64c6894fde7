//! Catalog domain types.

mod model;

pub use model::{Author, AuthorKind, ModelRef, ModelSummary, PageResult, Pipeline};
