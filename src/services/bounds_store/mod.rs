//! BoundsStore: responsibility and boundaries
//!
//! Stores exactly one rectangle record under a fixed key. It knows nothing about
//! windows, debouncing or defaults; filling absent fields is the controller's job.

mod dry_store;
mod file_store;
mod r#trait;

pub use self::r#trait::{create_bounds_store, BoundsStore};
