//! In-memory calendar store implementing every scheduling port.
//!
//! All state sits behind one mutex, so each batch write is applied under a
//! single lock acquisition and is atomic with respect to readers. Batches are
//! validated in full before anything is changed; a rejected batch leaves the
//! store untouched.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::domain::ports::{
    AnniversaryRepository, AnniversaryRepositoryError, CalendarItemRepository,
    CalendarItemRepositoryError, ConstraintProvider, ConstraintProviderError, ExistingItemsQuery,
    ExistingItemsQueryError,
};
use crate::domain::{
    AnniversaryKey, CalendarItem, CalendarItemId, CalendarItemUpdate, ConstraintSnapshot,
    MaterializationBatch, MemorableEventAnniversary, TimeSlot, UserId,
};

#[derive(Debug, Default)]
struct StoreState {
    items: HashMap<CalendarItemId, CalendarItem>,
    anniversaries: HashMap<AnniversaryKey, MemorableEventAnniversary>,
    constraints: HashMap<UserId, ConstraintSnapshot>,
}

impl StoreState {
    /// A user's items ordered by start, unscheduled items last.
    fn items_for(
        &self,
        user_id: &UserId,
        keep: impl Fn(&CalendarItem) -> bool,
    ) -> Vec<CalendarItem> {
        let mut items: Vec<CalendarItem> = self
            .items
            .values()
            .filter(|item| &item.user_id == user_id && keep(item))
            .cloned()
            .collect();
        items.sort_by_key(|item| {
            let start = item.time_slot.map(|slot| slot.start());
            (start.is_none(), start, item.id)
        });
        items
    }

    fn remove_items_tagged(&mut self, key: &AnniversaryKey) {
        self.items.retain(|_, item| item.anniversary() != Some(key));
    }
}

/// Thread-safe in-memory calendar storage.
///
/// # Examples
/// ```
/// use scheduling_backend::outbound::memory::InMemoryCalendarStore;
///
/// let store = InMemoryCalendarStore::new();
/// assert_eq!(store.item_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCalendarStore {
    state: Mutex<StoreState>,
}

/// Lock failures surface as connection errors so services report the store
/// as unavailable.
const POISONED: &str = "calendar store lock poisoned";

impl InMemoryCalendarStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Option<MutexGuard<'_, StoreState>> {
        self.state.lock().ok()
    }

    /// Insert or replace an item. Returns `false` if the store is poisoned.
    pub fn insert_item(&self, item: CalendarItem) -> bool {
        self.lock()
            .map(|mut state| {
                state.items.insert(item.id, item);
            })
            .is_some()
    }

    /// Record a user's constraint snapshot. Returns `false` if the store is
    /// poisoned.
    pub fn set_constraints(&self, user_id: UserId, snapshot: ConstraintSnapshot) -> bool {
        self.lock()
            .map(|mut state| {
                state.constraints.insert(user_id, snapshot);
            })
            .is_some()
    }

    /// Look up one item.
    pub fn item(&self, item_id: CalendarItemId) -> Option<CalendarItem> {
        self.lock().and_then(|state| state.items.get(&item_id).cloned())
    }

    /// Every item belonging to `user_id`, ordered by start.
    pub fn items_of(&self, user_id: &UserId) -> Vec<CalendarItem> {
        self.lock()
            .map(|state| state.items_for(user_id, |_| true))
            .unwrap_or_default()
    }

    /// Total number of stored items.
    pub fn item_count(&self) -> usize {
        self.lock().map_or(0, |state| state.items.len())
    }
}

#[async_trait]
impl ConstraintProvider for InMemoryCalendarStore {
    async fn fetch(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ConstraintSnapshot>, ConstraintProviderError> {
        let state = self
            .lock()
            .ok_or_else(|| ConstraintProviderError::connection(POISONED))?;
        Ok(state.constraints.get(user_id).cloned())
    }
}

#[async_trait]
impl ExistingItemsQuery for InMemoryCalendarStore {
    async fn overlapping(
        &self,
        user_id: &UserId,
        slot: &TimeSlot,
    ) -> Result<Vec<CalendarItem>, ExistingItemsQueryError> {
        let state = self
            .lock()
            .ok_or_else(|| ExistingItemsQueryError::connection(POISONED))?;
        Ok(state.items_for(user_id, |item| {
            item.time_slot.is_some_and(|existing| existing.overlaps(slot))
        }))
    }

    async fn on_date(
        &self,
        user_id: &UserId,
        date: NaiveDate,
        zone: Tz,
    ) -> Result<Vec<CalendarItem>, ExistingItemsQueryError> {
        let state = self
            .lock()
            .ok_or_else(|| ExistingItemsQueryError::connection(POISONED))?;
        Ok(state.items_for(user_id, |item| item.starts_on(date, zone)))
    }
}

#[async_trait]
impl CalendarItemRepository for InMemoryCalendarStore {
    async fn find_all_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CalendarItem>, CalendarItemRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| CalendarItemRepositoryError::connection(POISONED))?;
        Ok(state.items_for(user_id, |_| true))
    }

    async fn apply_updates(
        &self,
        user_id: &UserId,
        updates: &[CalendarItemUpdate],
    ) -> Result<(), CalendarItemRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| CalendarItemRepositoryError::connection(POISONED))?;
        if let Some(missing) = updates.iter().find(|update| {
            state
                .items
                .get(&update.item_id)
                .is_none_or(|item| &item.user_id != user_id)
        }) {
            return Err(CalendarItemRepositoryError::query(format!(
                "item {} not found for user {user_id}",
                missing.item_id
            )));
        }
        for update in updates {
            if let Some(item) = state.items.get_mut(&update.item_id) {
                item.time_slot = Some(update.time_slot);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl AnniversaryRepository for InMemoryCalendarStore {
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<MemorableEventAnniversary>, AnniversaryRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| AnniversaryRepositoryError::connection(POISONED))?;
        let mut anniversaries: Vec<MemorableEventAnniversary> = state
            .anniversaries
            .values()
            .filter(|anniversary| anniversary.user_id() == user_id)
            .cloned()
            .collect();
        anniversaries.sort_by(|left, right| left.title().cmp(right.title()));
        Ok(anniversaries)
    }

    async fn apply(&self, batch: &MaterializationBatch) -> Result<(), AnniversaryRepositoryError> {
        let foreign_removal = batch.removed.iter().any(|key| key.user_id != batch.user_id);
        let foreign_write = batch.materializations.iter().any(|materialization| {
            materialization.anniversary.user_id() != &batch.user_id
                || materialization
                    .items
                    .iter()
                    .any(|item| item.user_id != batch.user_id)
        });
        if foreign_removal || foreign_write {
            return Err(AnniversaryRepositoryError::query(format!(
                "batch for user {} touches another user's anniversaries",
                batch.user_id
            )));
        }

        let mut state = self
            .lock()
            .ok_or_else(|| AnniversaryRepositoryError::connection(POISONED))?;
        for key in &batch.removed {
            state.remove_items_tagged(key);
            state.anniversaries.remove(key);
        }
        for materialization in &batch.materializations {
            let key = materialization.anniversary.key();
            state.remove_items_tagged(&key);
            state
                .anniversaries
                .insert(key, materialization.anniversary.clone());
            for item in &materialization.items {
                state.items.insert(item.id, item.clone());
            }
        }
        Ok(())
    }
}
