//! Typed handles over the resource actors.
//!
//! Clients apply the session's access rules before a request reaches the
//! actor and convert framework failures into domain errors.

pub mod booking_client;
pub mod customer_client;
pub mod measurement_client;
pub mod note_client;
pub mod order_client;

pub use booking_client::*;
pub use customer_client::*;
pub use measurement_client::*;
pub use note_client::*;
pub use order_client::*;
