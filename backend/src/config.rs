//! Scheduling configuration loaded via OrthoConfig.
//!
//! Values come from CLI arguments, `SCHEDULING_*` environment variables, or a
//! configuration file. Every field is optional; accessors fall back to the
//! defaults below.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{AnniversaryPolicy, OverlapValidator};

const DEFAULT_HORIZON_YEARS: u32 = 5;
const DEFAULT_BIRTHDAY_TITLE: &str = "My Birthday";
const DEFAULT_ANNIVERSARY_COLOR: &str = "#FF6B9D";

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The materialization horizon was zero.
    #[error("horizon_years must be at least 1")]
    ZeroHorizon,
    /// The overlap listing limit was zero.
    #[error("overlap_listing_limit must be at least 1")]
    ZeroListingLimit,
    /// The reserved birthday title was blank.
    #[error("birthday_title must not be blank")]
    BlankBirthdayTitle,
}

/// Configuration values for the scheduling core.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SCHEDULING")]
pub struct SchedulingSettings {
    /// Years of instances generated per anniversary.
    pub horizon_years: Option<u32>,
    /// Title reserved for the birthday anniversary.
    pub birthday_title: Option<String>,
    /// Display colour stamped on generated anniversary items.
    pub anniversary_color: Option<String>,
    /// Conflicts named in an overlap violation before the rest are counted.
    pub overlap_listing_limit: Option<usize>,
}

impl SchedulingSettings {
    /// Settings with every field unset, so each accessor yields its default.
    pub const fn unset() -> Self {
        Self {
            horizon_years: None,
            birthday_title: None,
            anniversary_color: None,
            overlap_listing_limit: None,
        }
    }

    /// Materialization horizon in years.
    pub fn horizon_years(&self) -> u32 {
        self.horizon_years.unwrap_or(DEFAULT_HORIZON_YEARS)
    }

    /// Reserved birthday title.
    pub fn birthday_title(&self) -> &str {
        self.birthday_title
            .as_deref()
            .unwrap_or(DEFAULT_BIRTHDAY_TITLE)
    }

    /// Colour for generated anniversary items.
    pub fn anniversary_color(&self) -> &str {
        self.anniversary_color
            .as_deref()
            .unwrap_or(DEFAULT_ANNIVERSARY_COLOR)
    }

    /// Conflicts listed per overlap violation.
    pub fn overlap_listing_limit(&self) -> usize {
        self.overlap_listing_limit
            .unwrap_or(OverlapValidator::DEFAULT_LISTING_LIMIT)
    }

    /// Reject values the services cannot work with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.horizon_years() == 0 {
            return Err(SettingsError::ZeroHorizon);
        }
        if self.overlap_listing_limit() == 0 {
            return Err(SettingsError::ZeroListingLimit);
        }
        if self.birthday_title().trim().is_empty() {
            return Err(SettingsError::BlankBirthdayTitle);
        }
        Ok(())
    }

    /// Anniversary policy derived from these settings.
    pub fn anniversary_policy(&self) -> AnniversaryPolicy {
        AnniversaryPolicy {
            horizon_years: self.horizon_years(),
            birthday_title: self.birthday_title().to_owned(),
        }
    }
}
