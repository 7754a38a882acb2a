//! Booked-count lookup.

use std::collections::{BTreeMap, HashMap};

use crate::types::DeliveryDate;

/// Read access to per-date booked counts.
///
/// The engine consults this once per candidate date; the app implements it
/// over a snapshot of `delivery_day_counts` rows prefetched for the scan
/// window, so a call never re-queries mid-scan. Dates with no bookings
/// report zero. The compare-to-threshold decision belongs to the engine and
/// validator, not the lookup.
pub trait CapacityLookup {
    /// Current booked count for a date, zero when none recorded.
    fn count_for(&self, date: DeliveryDate) -> u32;
}

impl CapacityLookup for BTreeMap<DeliveryDate, u32> {
    fn count_for(&self, date: DeliveryDate) -> u32 {
        self.get(&date).copied().unwrap_or(0)
    }
}

impl CapacityLookup for HashMap<DeliveryDate, u32> {
    fn count_for(&self, date: DeliveryDate) -> u32 {
        self.get(&date).copied().unwrap_or(0)
    }
}

impl<C: CapacityLookup + ?Sized> CapacityLookup for &C {
    fn count_for(&self, date: DeliveryDate) -> u32 {
        (**self).count_for(date)
    }
}
