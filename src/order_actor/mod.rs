//! Order rows, including the status update log each order carries.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
