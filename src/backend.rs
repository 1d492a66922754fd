//! Host-facing composition root.
//!
//! [`Backend`] wires configuration storage, issuance, and revocation together and exposes the
//! operations the host dispatches to: configure, delete configuration, issue, revoke, and info.
//! Every call reads the current configuration from host storage, so a reconfiguration takes
//! effect on the next call without restarting the backend.

// self
use crate::{
	_prelude::*,
	auth::{ScopeId, Secret, TokenId},
	build_info::BuildInfo,
	config::{self, ConfigCandidate, ConfigStore, ConfigSummary},
	issue::{TokenIssuer, TokenRequest},
	obs::{self, OperationKind},
	revoke::{LeaseInternal, TokenRevoker},
	store::Storage,
	ttl,
	upstream::UpstreamConnector,
};

/// Credential fields returned to the caller exactly once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TokenData {
	/// Upstream identifier of the token.
	pub token_id: TokenId,
	/// Bearer secret; serialized in clear text for the host.
	pub bearer_token: Secret,
	/// Scope the token is valid under.
	pub scope: Option<ScopeId>,
}

/// Lease metadata the host stores and schedules expiry with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Lease {
	/// Effective TTL.
	#[serde(with = "ttl::seconds")]
	pub ttl: Duration,
	/// Opaque data handed back on revoke.
	pub internal: LeaseInternal,
}

/// Result of a successful issuance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TokenResponse {
	/// Caller-visible credential.
	pub data: TokenData,
	/// Host-visible lease.
	pub lease: Lease,
}

/// Backend instance owning a single global configuration.
#[derive(Clone)]
pub struct Backend {
	config: ConfigStore,
	issuer: TokenIssuer,
	revoker: TokenRevoker,
	build_info: BuildInfo,
}
impl Backend {
	/// Creates a backend over host `storage` that reaches upstream through `connector`.
	pub fn new(storage: Arc<dyn Storage>, connector: Arc<dyn UpstreamConnector>) -> Self {
		Self {
			config: ConfigStore::new(storage),
			issuer: TokenIssuer::new(connector.clone()),
			revoker: TokenRevoker::new(connector),
			build_info: BuildInfo::from_build_env(),
		}
	}

	/// Creates a backend that talks to the real API over reqwest.
	#[cfg(feature = "reqwest")]
	pub fn with_reqwest(storage: Arc<dyn Storage>) -> Result<Self> {
		let connector = crate::upstream::ReqwestConnector::new()?;

		Ok(Self::new(storage, Arc::new(connector)))
	}

	/// Replaces the build metadata reported by [`Backend::info`].
	pub fn with_build_info(mut self, build_info: BuildInfo) -> Self {
		self.build_info = build_info;

		self
	}

	/// Returns the configuration store.
	pub fn config_store(&self) -> &ConfigStore {
		&self.config
	}

	/// Validates and stores a new configuration, replacing any previous record.
	pub async fn configure(&self, candidate: ConfigCandidate) -> Result<()> {
		obs::observe(OperationKind::Configure, "configure", async move {
			self.config.put(candidate).await?;

			Ok(())
		})
		.await
	}

	/// Returns `true` when a configuration record is stored.
	pub async fn config_exists(&self) -> Result<bool> {
		self.config.exists().await
	}

	/// Returns the derived, non-secret view of the stored configuration.
	pub async fn config_summary(&self) -> Result<ConfigSummary> {
		let config = self.config.get().await?;

		Ok(config::require_configured(config.as_ref())?.summary())
	}

	/// Removes the stored configuration; fails with [`Error::NotConfigured`] when none exists.
	pub async fn delete_config(&self) -> Result<()> {
		obs::observe(OperationKind::DeleteConfig, "delete_config", async move {
			if self.config.get().await?.is_none() {
				return Err(Error::NotConfigured);
			}

			self.config.delete().await
		})
		.await
	}

	/// Issues a token and builds the host response.
	pub async fn issue(&self, request: &TokenRequest) -> Result<TokenResponse> {
		obs::observe(OperationKind::Issue, "issue", async move {
			let config = self.config.get().await?;
			let issued = self.issuer.issue(request, config.as_ref()).await?;
			let internal = LeaseInternal::for_token(&issued.id);

			Ok(TokenResponse {
				data: TokenData {
					token_id: issued.id,
					bearer_token: issued.bearer_token,
					scope: issued.scope,
				},
				lease: Lease { ttl: issued.ttl, internal },
			})
		})
		.await
	}

	/// Revokes the token recorded in a lease's internal data.
	pub async fn revoke(&self, internal: &LeaseInternal) -> Result<()> {
		obs::observe(OperationKind::Revoke, "revoke", async move {
			let config = self.config.get().await?;

			self.revoker.revoke(internal, config.as_ref()).await
		})
		.await
	}

	/// Returns static build metadata.
	pub fn info(&self) -> &BuildInfo {
		&self.build_info
	}
}
impl Debug for Backend {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Backend").field("build_info", &self.build_info).finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{store::MemoryStorage, upstream::MemoryUpstream};

	fn backend() -> (Backend, Arc<MemoryStorage>, MemoryUpstream) {
		let storage = Arc::new(MemoryStorage::default());
		let upstream = MemoryUpstream::default();
		let backend = Backend::new(storage.clone(), Arc::new(upstream.clone()));

		(backend, storage, upstream)
	}

	#[tokio::test]
	async fn issue_response_serializes_for_host() {
		let (backend, _, _) = backend();

		backend
			.configure(ConfigCandidate::new("k1").with_default_scope("team_a"))
			.await
			.expect("Configure should succeed.");

		let response = backend
			.issue(&TokenRequest::default().with_ttl(Duration::seconds(30)))
			.await
			.expect("Issue should succeed.");

		assert_eq!(
			serde_json::to_value(&response).expect("Response should serialize."),
			json!({
				"data": { "token_id": "tok_1", "bearer_token": "bearer-1", "scope": "team_a" },
				"lease": {
					"ttl": 30,
					"internal": { "secret_type": "vercel_token", "token_id": "tok_1" }
				}
			})
		);
	}

	#[tokio::test]
	async fn revoke_uses_lease_internal_data() {
		let (backend, _, upstream) = backend();

		backend.configure(ConfigCandidate::new("k1")).await.expect("Configure should succeed.");

		let response =
			backend.issue(&TokenRequest::default()).await.expect("Issue should succeed.");

		assert_eq!(response.lease.ttl, Duration::seconds(600));
		assert_eq!(upstream.live_count(), 1);

		backend.revoke(&response.lease.internal).await.expect("Revoke should succeed.");

		assert_eq!(upstream.live_count(), 0);
	}

	#[tokio::test]
	async fn operations_require_configuration() {
		let (backend, _, upstream) = backend();

		assert!(matches!(
			backend.issue(&TokenRequest::default()).await,
			Err(Error::NotConfigured)
		));
		let internal: LeaseInternal = serde_json::from_value(json!({ "token_id": "x" }))
			.expect("Lease fixture should deserialize.");

		assert!(matches!(backend.revoke(&internal).await, Err(Error::NotConfigured)));
		assert!(matches!(backend.config_summary().await, Err(Error::NotConfigured)));
		assert!(matches!(backend.delete_config().await, Err(Error::NotConfigured)));
		assert!(upstream.connections().is_empty());
	}

	#[tokio::test]
	async fn delete_config_invalidates_issuance() {
		let (backend, storage, _) = backend();

		backend.configure(ConfigCandidate::new("k1")).await.expect("Configure should succeed.");

		assert!(backend.config_exists().await.expect("Existence check should succeed."));

		backend.delete_config().await.expect("Delete should succeed.");

		assert!(!storage.contains(config::CONFIG_KEY));
		assert!(matches!(
			backend.issue(&TokenRequest::default()).await,
			Err(Error::NotConfigured)
		));
	}

	#[tokio::test]
	async fn storage_failures_surface() {
		let (backend, storage, _) = backend();

		storage.fail_get(true);

		let err = backend
			.issue(&TokenRequest::default())
			.await
			.expect_err("Storage failure should surface.");

		assert!(matches!(err, Error::Storage(_)));
		assert!(err.is_environment_failure());
	}

	#[test]
	fn debug_omits_internals() {
		let (backend, _, _) = backend();

		assert!(format!("{backend:?}").starts_with("Backend {"));
	}
}
