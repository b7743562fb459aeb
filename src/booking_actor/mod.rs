//! Appointment bookings and the admin reply workflow.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
