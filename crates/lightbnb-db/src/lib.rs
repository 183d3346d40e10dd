//! LightBnB data-access layer
//!
//! Translates typed application requests (user lookup and creation, guest
//! reservation listings, property search and creation) into parameterized
//! queries against a PostgreSQL connection pool, or, in fixture mode, into
//! reads and writes against a JSON-seeded in-memory store.
//!
//! Both backends implement the [`RentalStore`] trait. Zero-row lookups are
//! a normal outcome (`Ok(None)`), never an error; real failures surface as
//! typed [`StoreError`] variants.

pub mod config;
pub mod error;
pub mod fixture;
pub mod pg;
pub mod store;

mod query;

pub use config::DbConfig;
pub use error::{Result, StoreError};
pub use fixture::FixtureStore;
pub use pg::PgStore;
pub use store::{RentalStore, DEFAULT_LIMIT};
