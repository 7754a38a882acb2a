//! Core types for Delivery Date Pro.
//!
//! This module provides type-safe wrappers for the domain concepts shared by
//! the availability engine, the date validator, and the app's persistence
//! layer.

pub mod blackout;
pub mod cutoff;
pub mod date;
pub mod overrides;
pub mod result;
pub mod settings;
pub mod shop;

pub use blackout::{BlackoutDate, BlackoutEntry};
pub use cutoff::{CutoffParseError, CutoffTime};
pub use date::{DateParseError, DeliveryDate, MonthDay};
pub use overrides::ProductOverride;
pub use result::{AvailabilityResult, DateValidation, ExclusionReason};
pub use settings::{ShopSettings, ShopSettingsUpdate};
pub use shop::{ProductId, ShopDomain};
