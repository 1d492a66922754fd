//! Backend configuration record and its persistence in host storage.
//!
//! A single JSON record lives under [`CONFIG_KEY`]. Writes replace the whole record; there is no
//! partial merge. Reads apply the same defaulting as writes so records written by older
//! versions (or by hand) still resolve to a usable base URL and maximum TTL.

// crates.io
use serde::Deserializer;
// self
use crate::{
	_prelude::*,
	auth::{ScopeId, Secret},
	store::{Storage, StoreError},
	ttl::{self, DEFAULT_MAX_TTL},
};

/// Storage key holding the JSON-encoded configuration record.
pub const CONFIG_KEY: &str = "config";
/// Canonical base URL of the upstream API.
pub const DEFAULT_BASE_URL: &str = "https://api.vercel.com/v3";

/// Stored backend configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
	/// API key authenticating every upstream call.
	#[serde(default)]
	pub api_key: Secret,
	/// Base URL of the upstream API.
	#[serde(default)]
	pub base_url: String,
	/// Largest TTL a caller may request.
	#[serde(default, with = "ttl::seconds")]
	pub max_ttl: Duration,
	/// Scope applied to issued tokens when the caller does not supply one.
	#[serde(default, deserialize_with = "deserialize_scope", skip_serializing_if = "Option::is_none")]
	pub default_scope: Option<ScopeId>,
}
impl BackendConfig {
	/// Fills an empty base URL and a non-positive maximum TTL with their defaults.
	///
	/// Applying the defaults to an already-defaulted record is a no-op.
	pub fn with_defaults(mut self) -> Self {
		if self.base_url.is_empty() {
			self.base_url = DEFAULT_BASE_URL.into();
		}
		if !self.max_ttl.is_positive() {
			self.max_ttl = DEFAULT_MAX_TTL;
		}

		self
	}

	/// Returns `true` when the record carries an API key and can back upstream calls.
	pub fn is_configured(&self) -> bool {
		!self.api_key.is_empty()
	}

	/// Returns the caller-visible view of the record, without the API key.
	pub fn summary(&self) -> ConfigSummary {
		ConfigSummary {
			api_key_set: self.is_configured(),
			base_url: self.base_url.clone(),
			max_ttl: self.max_ttl,
			default_scope: self.default_scope.clone(),
		}
	}
}

/// Returns the record when it exists and carries an API key.
pub fn require_configured(config: Option<&BackendConfig>) -> Result<&BackendConfig> {
	config.filter(|config| config.is_configured()).ok_or(Error::NotConfigured)
}

/// Configuration write accepted from the host.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigCandidate {
	/// API key for the upstream account; required.
	#[serde(default)]
	pub api_key: String,
	/// Optional base URL override.
	#[serde(default)]
	pub base_url: Option<String>,
	/// Optional maximum TTL in seconds; zero means "use the default".
	#[serde(default)]
	pub max_ttl: Option<u64>,
	/// Optional default scope.
	#[serde(default)]
	pub default_scope: Option<String>,
}
impl ConfigCandidate {
	/// Creates a candidate carrying only the API key.
	pub fn new(api_key: impl Into<String>) -> Self {
		Self { api_key: api_key.into(), ..Default::default() }
	}

	/// Overrides the upstream base URL.
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = Some(base_url.into());

		self
	}

	/// Overrides the maximum TTL, in seconds.
	pub fn with_max_ttl_secs(mut self, secs: u64) -> Self {
		self.max_ttl = Some(secs);

		self
	}

	/// Sets the default scope.
	pub fn with_default_scope(mut self, scope: impl Into<String>) -> Self {
		self.default_scope = Some(scope.into());

		self
	}

	/// Validates the candidate and produces a defaulted [`BackendConfig`].
	///
	/// A maximum TTL whose expiry instant cannot be represented is rejected so every stored
	/// record can back a default issuance.
	pub fn into_config(self) -> Result<BackendConfig> {
		if self.api_key.is_empty() {
			return Err(Error::MissingApiKey);
		}

		let base_url = match self.base_url {
			Some(raw) if !raw.is_empty() => {
				Url::parse(&raw).map_err(|source| Error::InvalidBaseUrl { source })?;

				raw
			},
			_ => String::new(),
		};
		let max_ttl = match self.max_ttl {
			Some(secs) => ttl::from_secs(secs)?,
			None => Duration::ZERO,
		};

		if ttl::expiry_millis(OffsetDateTime::now_utc(), max_ttl).is_none() {
			return Err(Error::InvalidTtl { ttl: max_ttl });
		}

		let default_scope = ScopeId::from_optional(self.default_scope.as_deref())?;

		Ok(BackendConfig { api_key: Secret::new(self.api_key), base_url, max_ttl, default_scope }
			.with_defaults())
	}
}

/// Derived, non-secret view of the stored configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConfigSummary {
	/// Whether an API key is stored.
	pub api_key_set: bool,
	/// Base URL of the upstream API.
	pub base_url: String,
	/// Largest TTL a caller may request.
	#[serde(with = "ttl::seconds")]
	pub max_ttl: Duration,
	/// Scope applied when the caller does not supply one.
	pub default_scope: Option<ScopeId>,
}

/// Reads and writes the configuration record in host storage.
#[derive(Clone)]
pub struct ConfigStore {
	storage: Arc<dyn Storage>,
}
impl ConfigStore {
	/// Wraps host storage.
	pub fn new(storage: Arc<dyn Storage>) -> Self {
		Self { storage }
	}

	/// Loads the configuration record, or `None` when nothing has been stored yet.
	pub async fn get(&self) -> Result<Option<BackendConfig>> {
		let Some(bytes) = self.storage.get(CONFIG_KEY).await? else {
			return Ok(None);
		};
		let mut de = serde_json::Deserializer::from_slice(&bytes);
		let config: BackendConfig = serde_path_to_error::deserialize(&mut de)
			.map_err(|source| Error::Decode { source })?;

		Ok(Some(config.with_defaults()))
	}

	/// Validates `candidate` and replaces the stored record with it.
	///
	/// Nothing is written when validation fails.
	pub async fn put(&self, candidate: ConfigCandidate) -> Result<BackendConfig> {
		let config = candidate.into_config()?;
		let bytes = serde_json::to_vec(&config)
			.map_err(|e| StoreError::Serialization { message: e.to_string() })?;

		self.storage.put(CONFIG_KEY, bytes).await?;

		Ok(config)
	}

	/// Removes the record; removing a missing record succeeds.
	pub async fn delete(&self) -> Result<()> {
		self.storage.delete(CONFIG_KEY).await?;

		Ok(())
	}

	/// Returns `true` when a record is stored, without decoding it.
	pub async fn exists(&self) -> Result<bool> {
		Ok(self.storage.get(CONFIG_KEY).await?.is_some())
	}
}
impl Debug for ConfigStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ConfigStore(..)")
	}
}

fn deserialize_scope<'de, D>(deserializer: D) -> Result<Option<ScopeId>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<String>::deserialize(deserializer)?;

	ScopeId::from_optional(raw.as_deref()).map_err(serde::de::Error::custom)
}
