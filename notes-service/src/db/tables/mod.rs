//! Table operations, one module per table.
//!
//! Each module contains `impl Database` blocks for its table.

pub mod notes;
