//! LightBnB Types - pure domain records for the data-access layer
//!
//! This crate contains only serde data types with no async runtime or
//! database dependencies, so both backends (and any web tier above them)
//! can share the same definitions.

pub mod property;
pub mod reservation;
pub mod user;

pub use property::*;
pub use reservation::*;
pub use user::*;
