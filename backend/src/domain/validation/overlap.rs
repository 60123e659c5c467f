//! Hard rule: a candidate slot must not intersect existing items.

use chrono_tz::Tz;

use super::violation::{OverlapConflict, Violation};
use crate::domain::wall_clock::local_reading;
use crate::domain::{CalendarItem, CalendarItemId, TimeSlot};

/// Flags every scheduled item whose slot strictly overlaps the candidate.
///
/// Produces at most one violation; the first `listing_limit` conflicts (in
/// start order) are named and the rest are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapValidator {
    listing_limit: usize,
}

impl OverlapValidator {
    /// Conflicts named before the rest are summarised.
    pub const DEFAULT_LISTING_LIMIT: usize = 3;

    /// Build a validator naming at most `listing_limit` conflicts.
    pub const fn new(listing_limit: usize) -> Self {
        Self { listing_limit }
    }

    /// Configured listing limit.
    pub const fn listing_limit(&self) -> usize {
        self.listing_limit
    }

    /// Check `candidate` against `existing`, ignoring `exclude` (the item
    /// being rescheduled, if any).
    pub fn check(
        &self,
        candidate: &TimeSlot,
        existing: &[CalendarItem],
        exclude: Option<CalendarItemId>,
        zone: Tz,
    ) -> Option<Violation> {
        let mut conflicts: Vec<(&CalendarItem, TimeSlot)> = existing
            .iter()
            .filter(|item| Some(item.id) != exclude)
            .filter_map(|item| item.time_slot.map(|slot| (item, slot)))
            .filter(|(_, slot)| slot.overlaps(candidate))
            .collect();
        if conflicts.is_empty() {
            return None;
        }
        conflicts.sort_by(|(left, left_slot), (right, right_slot)| {
            left_slot
                .start()
                .cmp(&right_slot.start())
                .then_with(|| left.name.cmp(&right.name))
        });

        let unlisted = conflicts.len().saturating_sub(self.listing_limit);
        let listed = conflicts
            .into_iter()
            .take(self.listing_limit)
            .map(|(item, slot)| OverlapConflict {
                item_id: item.id,
                name: item.name.clone(),
                start: local_reading(zone, slot.start()),
                end: local_reading(zone, slot.end()),
            })
            .collect();
        Some(Violation::Overlap { listed, unlisted })
    }
}

impl Default for OverlapValidator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LISTING_LIMIT)
    }
}
