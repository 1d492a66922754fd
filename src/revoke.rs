//! Token revocation keyed by the identifier captured in lease internal data.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	auth::TokenId,
	config::{self, BackendConfig},
	upstream::{UpstreamConnector, UpstreamSettings},
};

/// Value stored under [`SECRET_TYPE_FIELD`] for every lease this backend issues.
pub const SECRET_TYPE: &str = "vercel_token";
/// Lease internal field naming the kind of secret.
pub const SECRET_TYPE_FIELD: &str = "secret_type";
/// Lease internal field holding the upstream token identifier.
pub const TOKEN_ID_FIELD: &str = "token_id";

/// Host-held lease metadata, opaque to callers.
///
/// The host persists the map verbatim and hands it back on revoke, so unknown fields survive
/// untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaseInternal(Map<String, Value>);
impl LeaseInternal {
	/// Builds the metadata for a freshly issued token.
	pub fn for_token(id: &TokenId) -> Self {
		let mut map = Map::new();

		map.insert(SECRET_TYPE_FIELD.into(), Value::String(SECRET_TYPE.into()));
		map.insert(TOKEN_ID_FIELD.into(), Value::String(id.to_string()));

		Self(map)
	}

	/// Wraps metadata handed back by the host.
	pub fn from_map(map: Map<String, Value>) -> Self {
		Self(map)
	}

	/// Returns the raw metadata.
	pub fn as_map(&self) -> &Map<String, Value> {
		&self.0
	}

	/// Returns the recorded secret type, if any.
	pub fn secret_type(&self) -> Option<&str> {
		self.0.get(SECRET_TYPE_FIELD).and_then(Value::as_str)
	}

	/// Extracts the upstream token identifier.
	///
	/// An absent, non-string, or empty field is reported as missing lease data.
	pub fn token_id(&self) -> Result<TokenId> {
		let raw = self
			.0
			.get(TOKEN_ID_FIELD)
			.and_then(Value::as_str)
			.filter(|raw| !raw.is_empty())
			.ok_or(Error::MissingLeaseData { field: TOKEN_ID_FIELD })?;

		Ok(TokenId::new(raw)?)
	}
}
impl From<Map<String, Value>> for LeaseInternal {
	fn from(map: Map<String, Value>) -> Self {
		Self::from_map(map)
	}
}

/// Deletes upstream tokens named by lease metadata.
///
/// Holds no state between issuance and revocation, so repeated revokes of the same lease are
/// forwarded to upstream each time.
#[derive(Clone)]
pub struct TokenRevoker {
	connector: Arc<dyn UpstreamConnector>,
}
impl TokenRevoker {
	/// Creates a revoker that reaches upstream through `connector`.
	pub fn new(connector: Arc<dyn UpstreamConnector>) -> Self {
		Self { connector }
	}

	/// Revokes the token recorded in `internal` using the current configuration.
	pub async fn revoke(
		&self,
		internal: &LeaseInternal,
		config: Option<&BackendConfig>,
	) -> Result<()> {
		let config = config::require_configured(config)?;
		let id = internal.token_id()?;
		let client = self.connector.connect(&UpstreamSettings::from(config))?;

		client
			.delete_token(&id)
			.await
			.map_err(|source| Error::RevocationFailed { token_id: id.to_string(), source })?;

		Ok(())
	}
}
impl Debug for TokenRevoker {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("TokenRevoker(..)")
	}
}
