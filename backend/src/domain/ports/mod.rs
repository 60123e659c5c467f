//! Driven ports for the scheduling core.
//!
//! Each collaborator is an `async_trait` with a typed error enum, a mockall
//! mock under `cfg(test)`, and a no-op fixture implementation.

mod macros;
pub(crate) use macros::define_port_error;

mod anniversary_repository;
mod calendar_item_repository;
mod constraint_provider;
mod existing_items_query;

#[cfg(test)]
pub use anniversary_repository::MockAnniversaryRepository;
pub use anniversary_repository::{
    AnniversaryRepository, AnniversaryRepositoryError, FixtureAnniversaryRepository,
};
#[cfg(test)]
pub use calendar_item_repository::MockCalendarItemRepository;
pub use calendar_item_repository::{
    CalendarItemRepository, CalendarItemRepositoryError, FixtureCalendarItemRepository,
};
#[cfg(test)]
pub use constraint_provider::MockConstraintProvider;
pub use constraint_provider::{
    ConstraintProvider, ConstraintProviderError, FixtureConstraintProvider,
};
#[cfg(test)]
pub use existing_items_query::MockExistingItemsQuery;
pub use existing_items_query::{
    ExistingItemsQuery, ExistingItemsQueryError, FixtureExistingItemsQuery,
};
