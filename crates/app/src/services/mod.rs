//! Business services for route handlers.

pub mod delivery;

pub use delivery::{DeliveryService, ProductAvailability};
