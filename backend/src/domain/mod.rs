//! Domain primitives, validators, and services for calendar scheduling.
//!
//! Purpose: define strongly typed scheduling values and the services that
//! validate placements, expand anniversaries, and follow timezone changes.
//! Storage is reached only through the traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: failure payload returned by every service.
//! - TimeRange / TimeSlot: daily windows and concrete instants.
//! - CalendarItem / ItemCategory: what a user has on the calendar.
//! - ConstraintValidationService: overlap, sleep, and budget checks.
//! - AnniversaryService / RecurringMaterializer: yearly all-day instances.
//! - TimezoneConversionService / TimezoneReprojector: wall-clock preservation.

pub mod anniversary;
pub mod anniversary_service;
pub mod calendar_item;
pub mod constraints;
pub mod error;
pub mod materializer;
pub mod ports;
pub mod reprojection;
pub mod time_range;
pub mod time_slot;
pub mod user;
pub mod user_events;
pub mod validation;
pub mod wall_clock;

pub use self::anniversary::{
    AnniversaryKey, AnniversaryValidationError, MemorableEventAnniversary, MemorableEventDraft,
};
pub use self::anniversary_service::{AnniversaryPolicy, AnniversaryService, AnniversarySyncSummary};
pub use self::calendar_item::{
    CalendarItem, CalendarItemId, CalendarItemUpdate, ItemCategory, ItemKind,
    ParseItemCategoryError,
};
pub use self::constraints::{
    ConstraintSnapshot, ConstraintSnapshotError, ConstraintSnapshotWire, DailyBudget,
    TimeRangeWire,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::materializer::{
    Materialization, MaterializationBatch, MaterializationError, RecurringMaterializer,
};
pub use self::reprojection::{
    ReprojectionError, ReprojectionSummary, TimezoneConversionService, TimezoneReprojector,
};
pub use self::time_range::{TimeRange, TimeRangeValidationError};
pub use self::time_slot::{TimeSlot, TimeSlotValidationError};
pub use self::user::{UserId, UserValidationError};
pub use self::user_events::{BirthdayChanged, TimezoneChanged};
pub use self::validation::{
    ConstraintValidationService, DailyBudgetValidator, OverlapConflict, OverlapValidator,
    SleepHourValidator, ValidationMode, ValidationRequest, Violation,
};
pub use self::wall_clock::{local_reading, parse_zone, resolve_local};
