//! Catalog list synchronisation.
//!
//! [`ListSyncController`] owns the catalog [`QueryState`] and keeps three
//! things converging on it: the URL query string (through a
//! [`Navigator`](crate::ports::Navigator)), the fetched page of models, and
//! the debounced search box.

mod controller;
mod debounce;
mod errors;
mod events;
mod query;

pub use controller::{ListSyncConfig, ListSyncController, ListView};
pub use debounce::Debouncer;
pub use errors::FetchError;
pub use events::ListEvent;
pub use query::{QueryState, SortKey};
