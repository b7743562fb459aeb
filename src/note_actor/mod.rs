//! Admin notes about customers.

pub mod entity;
pub mod error;

pub use error::*;
