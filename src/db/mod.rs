//! SQLite persistence.
//!
//! `init_db` opens the pool and applies `schema.sql`; `Repository` holds the
//! typed queries, one submodule per entity.

pub mod migrations;
pub mod repo;

pub use migrations::{init_db, SCHEMA_VERSION};
pub use repo::Repository;
