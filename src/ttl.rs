//! TTL constants, seconds normalisation, and serde helpers for second-granular durations.

// self
use crate::_prelude::*;

/// Maximum TTL applied when the configuration does not set one.
pub const DEFAULT_MAX_TTL: Duration = Duration::seconds(600);

/// Converts caller-supplied seconds into a [`Duration`].
pub fn from_secs(secs: u64) -> Result<Duration> {
	i64::try_from(secs)
		.map(Duration::seconds)
		.map_err(|_| Error::InvalidTtl { ttl: Duration::MAX })
}

/// Returns the instant `ttl` after `now` in milliseconds since the Unix epoch, or `None` when it
/// cannot be represented.
pub fn expiry_millis(now: OffsetDateTime, ttl: Duration) -> Option<i64> {
	now.checked_add(ttl)
		.and_then(|instant| i64::try_from(instant.unix_timestamp_nanos() / 1_000_000).ok())
}

/// Serializes a [`Duration`] as whole seconds.
pub mod seconds {
	// crates.io
	use serde::{Deserializer, Serializer};
	// self
	use crate::_prelude::*;

	/// Serializes `value` as an integer number of seconds.
	pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_i64(value.whole_seconds())
	}

	/// Deserializes an integer number of seconds.
	pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
	where
		D: Deserializer<'de>,
	{
		i64::deserialize(deserializer).map(Duration::seconds)
	}
}

/// Serializes an optional [`Duration`] as whole seconds.
pub mod option_seconds {
	// crates.io
	use serde::{Deserializer, Serializer};
	// self
	use crate::_prelude::*;

	/// Serializes `value` as an optional integer number of seconds.
	pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match value {
			Some(duration) => serializer.serialize_some(&duration.whole_seconds()),
			None => serializer.serialize_none(),
		}
	}

	/// Deserializes an optional integer number of seconds.
	pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
	where
		D: Deserializer<'de>,
	{
		Option::<i64>::deserialize(deserializer).map(|secs| secs.map(Duration::seconds))
	}
}
