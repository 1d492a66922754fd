//! Token issuance: TTL and scope negotiation followed by the upstream create call.

// self
use crate::{
	_prelude::*,
	auth::{ScopeId, Secret, TokenId},
	config::{self, BackendConfig},
	obs,
	ttl,
	upstream::{CreateTokenRequest, UpstreamConnector, UpstreamSettings},
};

/// Prefix of every upstream token name; a nanosecond timestamp follows it.
pub const TOKEN_NAME_PREFIX: &str = "vercel-token-backend";

/// Issuance parameters supplied by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TokenRequest {
	/// Requested TTL; the configured maximum applies when absent or zero.
	#[serde(default, with = "ttl::option_seconds")]
	pub ttl: Option<Duration>,
	/// Requested scope; an empty string counts as absent.
	#[serde(default)]
	pub scope: Option<String>,
}
impl TokenRequest {
	/// Requests a TTL.
	pub fn with_ttl(mut self, ttl: Duration) -> Self {
		self.ttl = Some(ttl);

		self
	}

	/// Requests a scope.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}
}

/// TTL and scope after negotiation against the configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenPlan {
	/// Effective TTL.
	pub ttl: Duration,
	/// Effective scope, if any.
	pub scope: Option<ScopeId>,
}
impl TokenPlan {
	/// Resolves `request` against `config`.
	///
	/// A requested TTL of zero counts as absent, and one equal to the maximum is allowed. A
	/// requested scope must match the configured default scope when both are set.
	pub fn resolve(request: &TokenRequest, config: &BackendConfig) -> Result<Self> {
		let max = config.max_ttl;
		let ttl = request.ttl.filter(|ttl| !ttl.is_zero()).unwrap_or(max);

		if ttl > max {
			return Err(Error::TtlExceeded { requested: ttl, max });
		}

		let requested = ScopeId::from_optional(request.scope.as_deref())?;
		let scope = match (config.default_scope.clone(), requested) {
			(Some(configured), Some(requested)) if configured != requested =>
				return Err(Error::ScopeConflict {
					configured: configured.into(),
					requested: requested.into(),
				}),
			(Some(configured), _) => Some(configured),
			(None, requested) => requested,
		};

		Ok(Self { ttl, scope })
	}
}

/// Credential handed back to the host; the bearer token is never persisted here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedCredential {
	/// Upstream identifier, needed later for revocation.
	pub id: TokenId,
	/// One-time bearer secret.
	pub bearer_token: Secret,
	/// Scope the token is valid under.
	pub scope: Option<ScopeId>,
	/// Effective TTL the host should schedule expiry with.
	pub ttl: Duration,
}

/// Issues upstream tokens for validated requests.
#[derive(Clone)]
pub struct TokenIssuer {
	connector: Arc<dyn UpstreamConnector>,
}
impl TokenIssuer {
	/// Creates an issuer that reaches upstream through `connector`.
	pub fn new(connector: Arc<dyn UpstreamConnector>) -> Self {
		Self { connector }
	}

	/// Issues a token using the current clock.
	pub async fn issue(
		&self,
		request: &TokenRequest,
		config: Option<&BackendConfig>,
	) -> Result<IssuedCredential> {
		self.issue_at(request, config, OffsetDateTime::now_utc()).await
	}

	/// Issues a token treating `now` as the current instant.
	pub async fn issue_at(
		&self,
		request: &TokenRequest,
		config: Option<&BackendConfig>,
		now: OffsetDateTime,
	) -> Result<IssuedCredential> {
		let config = config::require_configured(config)?;
		let plan = TokenPlan::resolve(request, config)?;
		let name = token_name(now);

		obs::log_token_creation(&name, plan.ttl);

		let create = CreateTokenRequest::new(name, plan.ttl, plan.scope.clone(), now)?;
		let client = self.connector.connect(&UpstreamSettings::from(config))?;
		let created = client.create_token(&create).await?;

		Ok(IssuedCredential {
			id: created.id,
			bearer_token: created.bearer_token,
			scope: plan.scope,
			ttl: plan.ttl,
		})
	}
}
impl Debug for TokenIssuer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("TokenIssuer(..)")
	}
}

fn token_name(now: OffsetDateTime) -> String {
	format!("{TOKEN_NAME_PREFIX}-{}", now.unix_timestamp_nanos())
}
