//! Testing utilities for module hosts
//!
//! In-memory modules and an opener that serves them by file name, so loader
//! and resolver behaviour can be exercised without building shared objects.

pub mod mocks;
pub mod opener;

pub use mocks::{MockCalls, MockModule};
pub use opener::StaticOpener;
