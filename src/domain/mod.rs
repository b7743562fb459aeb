pub mod booking;
pub mod customer;
pub mod customer_note;
pub mod measurement;
pub mod order;
pub mod order_update;
pub mod session;
pub mod stats;

pub use booking::*;
pub use customer::*;
pub use customer_note::*;
pub use measurement::*;
pub use order::*;
pub use order_update::*;
pub use session::*;
pub use stats::*;
