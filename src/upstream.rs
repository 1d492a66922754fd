//! Contract for the remote token-issuing API and the seam that selects an implementation.
//!
//! Issuance and revocation never construct clients themselves. The composition root hands an
//! [`UpstreamConnector`] to the [`Backend`](crate::backend::Backend), which asks it for a client
//! bound to the currently stored API key and base URL on every call. Production code uses
//! [`ReqwestConnector`]; tests and demos use [`MemoryUpstream`].

#[cfg(feature = "reqwest")] pub mod api;
pub mod memory;

#[cfg(feature = "reqwest")] pub use api::{ApiClient, ReqwestConnector};
pub use memory::MemoryUpstream;

// self
use crate::{
	_prelude::*,
	auth::{ScopeId, Secret, TokenId},
	config::BackendConfig,
	error::UpstreamError,
	ttl::expiry_millis,
};

/// Boxed future returned by [`UpstreamClient`] operations.
pub type UpstreamFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, UpstreamError>> + 'a + Send>>;

/// Creates and deletes tokens on the upstream service.
///
/// Futures must own or borrow everything they need so dropping them aborts the in-flight call.
pub trait UpstreamClient
where
	Self: Send + Sync,
{
	/// Creates a token and returns its identifier plus the one-time bearer secret.
	fn create_token<'a>(
		&'a self,
		request: &'a CreateTokenRequest,
	) -> UpstreamFuture<'a, CreatedToken>;

	/// Deletes the token identified by `id`, returning the identifier echoed by upstream.
	fn delete_token<'a>(&'a self, id: &'a TokenId) -> UpstreamFuture<'a, TokenId>;
}

/// Builds [`UpstreamClient`]s bound to a particular API key and base URL.
pub trait UpstreamConnector
where
	Self: Send + Sync,
{
	/// Returns a client authenticated with `settings`.
	fn connect(
		&self,
		settings: &UpstreamSettings,
	) -> Result<Arc<dyn UpstreamClient>, UpstreamError>;
}

/// Connection parameters taken from the stored configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamSettings {
	/// API key sent as a bearer credential.
	pub api_key: Secret,
	/// Base URL every endpoint path is appended to.
	pub base_url: String,
}
impl From<&BackendConfig> for UpstreamSettings {
	fn from(config: &BackendConfig) -> Self {
		Self { api_key: config.api_key.clone(), base_url: config.base_url.clone() }
	}
}

/// Token creation payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreateTokenRequest {
	/// Human-readable token name.
	pub name: String,
	/// Expiry instant in milliseconds since the Unix epoch (UTC).
	#[serde(rename = "expiresAt")]
	pub expires_at: i64,
	/// Team scope, sent as a query parameter rather than in the body.
	#[serde(skip)]
	pub scope: Option<ScopeId>,
}
impl CreateTokenRequest {
	/// Builds a request expiring `ttl` after `now`.
	///
	/// The TTL must be strictly positive and the resulting instant representable in
	/// milliseconds.
	pub fn new(
		name: impl Into<String>,
		ttl: Duration,
		scope: Option<ScopeId>,
		now: OffsetDateTime,
	) -> Result<Self> {
		if !ttl.is_positive() {
			return Err(Error::InvalidTtl { ttl });
		}

		let expires_at = expiry_millis(now, ttl).ok_or(Error::InvalidTtl { ttl })?;

		Ok(Self { name: name.into(), expires_at, scope })
	}
}

/// Token returned by [`UpstreamClient::create_token`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedToken {
	/// Upstream identifier used for revocation.
	pub id: TokenId,
	/// Bearer secret; upstream reveals it only once.
	pub bearer_token: Secret,
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn request_computes_millisecond_expiry() {
		let now = macros::datetime!(2025-01-01 00:00 UTC) + Duration::microseconds(123_456);
		let request = CreateTokenRequest::new("name", Duration::seconds(600), None, now)
			.expect("Positive TTL should be accepted.");
		let expected = macros::datetime!(2025-01-01 00:10 UTC).unix_timestamp() * 1_000 + 123;

		assert_eq!(request.expires_at, expected);

		let payload = serde_json::to_value(&request).expect("Request should serialize.");

		assert_eq!(payload, serde_json::json!({ "name": "name", "expiresAt": request.expires_at }));
	}

	#[test]
	fn request_rejects_non_positive_and_unrepresentable_ttl() {
		let now = OffsetDateTime::now_utc();

		for ttl in [Duration::ZERO, Duration::seconds(-5), Duration::MAX] {
			let err = CreateTokenRequest::new("name", ttl, None, now)
				.expect_err("TTL should be rejected.");

			assert!(matches!(err, Error::InvalidTtl { ttl: rejected } if rejected == ttl));
		}
	}

	#[test]
	fn scope_is_not_serialized() {
		let scope = ScopeId::new("team_a").expect("Scope fixture should be valid.");
		let now = OffsetDateTime::now_utc();
		let request = CreateTokenRequest::new("name", Duration::seconds(1), Some(scope), now)
			.expect("Request should build.");
		let payload = serde_json::to_string(&request).expect("Request should serialize.");

		assert!(!payload.contains("team_a"));
	}
}
