//! Default-filling and required-key checks on configuration slots
//!
//! A slot is an `Option` field of the host record. Defaults only ever fill
//! absent slots; values the host supplied are left untouched.

use tracing::trace;

use crate::error::ConfigError;

/// Fill an absent slot with a literal value
pub fn default_val<'a, T>(slot: &'a mut Option<T>, key: &'static str, value: T) -> &'a mut T {
    if slot.is_none() {
        trace!(key = key, "Applying default value");
    }
    slot.get_or_insert(value)
}

/// Fill an absent slot from a producer. The producer runs at most once, and
/// only when the slot is empty.
pub fn default_with<'a, T, F>(slot: &'a mut Option<T>, key: &'static str, producer: F) -> &'a mut T
where
    F: FnOnce() -> T,
{
    slot.get_or_insert_with(|| {
        trace!(key = key, "Producing default value");
        producer()
    })
}

/// Fail with a configuration error naming `key` if the slot is absent
pub fn require_val<'a, T>(slot: &'a Option<T>, key: &'static str) -> Result<&'a T, ConfigError> {
    slot.as_ref().ok_or(ConfigError::MissingKey(key))
}
