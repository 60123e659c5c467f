//! Decoded events that trigger batch recalculation of a user's calendar.
//!
//! Transport adapters deserialise their payloads into these types; the
//! services never see wire envelopes. Zone fields carry raw IANA identifiers
//! and are validated by the receiving service.

use serde::{Deserialize, Serialize};

use super::UserId;

/// The user's date of birth was set or changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthdayChanged {
    /// Affected user.
    pub user_id: UserId,
    /// Day of month of the birthday.
    pub day: u32,
    /// Month of the birthday.
    pub month: u32,
    /// User's current IANA timezone, for example `"Europe/London"`.
    pub zone: String,
}

/// The user moved their calendar to a different timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimezoneChanged {
    /// Affected user.
    pub user_id: UserId,
    /// Zone the stored items were scheduled against.
    pub old_zone: String,
    /// Zone whose wall clock the items should now follow.
    pub new_zone: String,
}
