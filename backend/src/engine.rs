//! Wiring of the scheduling services over one shared store.

use std::sync::Arc;

use mockable::Clock;

use crate::config::{SchedulingSettings, SettingsError};
use crate::domain::ports::{
    AnniversaryRepository, CalendarItemRepository, ConstraintProvider, ExistingItemsQuery,
};
use crate::domain::{
    AnniversaryService, ConstraintValidationService, RecurringMaterializer,
    TimezoneConversionService,
};

/// The three scheduling services sharing a single storage adapter.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use scheduling_backend::config::SchedulingSettings;
/// use scheduling_backend::engine::SchedulingEngine;
/// use scheduling_backend::outbound::memory::InMemoryCalendarStore;
///
/// let engine = SchedulingEngine::new(
///     Arc::new(InMemoryCalendarStore::new()),
///     &SchedulingSettings::unset(),
///     Arc::new(DefaultClock),
/// )
/// .expect("default settings are valid");
/// let _ = &engine.validation;
/// ```
pub struct SchedulingEngine<S> {
    /// Placement checks.
    pub validation: ConstraintValidationService<S, S>,
    /// Birthday and memorable event maintenance.
    pub anniversaries: AnniversaryService<S>,
    /// Timezone change handling.
    pub timezones: TimezoneConversionService<S>,
}

impl<S> SchedulingEngine<S>
where
    S: ConstraintProvider + ExistingItemsQuery + CalendarItemRepository + AnniversaryRepository,
{
    /// Validate `settings` and build every service over `store`.
    pub fn new(
        store: Arc<S>,
        settings: &SchedulingSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        let materializer =
            RecurringMaterializer::new(clock).with_color(settings.anniversary_color());
        Ok(Self {
            validation: ConstraintValidationService::new(Arc::clone(&store), Arc::clone(&store))
                .with_overlap_listing_limit(settings.overlap_listing_limit()),
            anniversaries: AnniversaryService::new(
                Arc::clone(&store),
                materializer,
                settings.anniversary_policy(),
            ),
            timezones: TimezoneConversionService::new(store),
        })
    }
}
